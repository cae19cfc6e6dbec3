use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

const BEARER_PREFIX: &str = "Bearer ";

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str> {
    let auth_header = match headers.get(header::AUTHORIZATION) {
        Some(h) => h.to_str().map_err(|_| Error::AuthFailTokenWrongFormat)?,
        None => return Err(Error::AuthFailNoToken),
    };

    let token = auth_header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(Error::AuthFailTokenWrongFormat)?
        .trim();

    if token.is_empty() || token.contains(' ') {
        return Err(Error::AuthFailTokenWrongFormat);
    }

    Ok(token)
}

pub async fn mw_require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    debug!("MIDDLEWARE: require_auth");

    let token = extract_bearer(req.headers())?;

    // Every verification failure looks the same to the caller.
    let claims = state
        .tokens
        .verify(token)
        .map_err(|_| Error::InvalidToken)?;

    let ctx = Ctx::new(claims.sub, claims.email);

    // Store Ctx in request extensions
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

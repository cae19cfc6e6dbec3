use crate::core::error::{Error, Result};
use axum::{extract::FromRequestParts, http::request::Parts};

/// Verified identity of the caller, bound by the auth middleware.
///
/// This is the only place handlers learn who is making a request.
#[derive(Clone, Debug)]
pub struct Ctx {
    user_id: String,
    email: String,
}

impl Ctx {
    pub fn new(user_id: String, email: String) -> Self {
        Self { user_id, email }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<Ctx>()
            .cloned()
            .ok_or(Error::AuthFailCtxNotInRequestExt)
    }
}

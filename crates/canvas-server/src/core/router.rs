//! Core Router
//!
//! Public user routes, then everything behind the auth middleware.

use crate::canvas::handlers as canvas_handlers;
use crate::core::auth::handlers as auth_handlers;
use crate::core::auth::middleware::mw_require_auth;
use crate::core::AppState;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/users/profile", get(auth_handlers::profile))
        .route(
            "/canvas",
            get(canvas_handlers::list_canvases).post(canvas_handlers::create_canvas),
        )
        .route(
            "/canvas/{id}",
            get(canvas_handlers::get_canvas)
                .put(canvas_handlers::update_canvas)
                .delete(canvas_handlers::delete_canvas),
        )
        .route("/canvas/{id}/share", put(canvas_handlers::share_canvas))
        .route_layer(middleware::from_fn_with_state(state.clone(), mw_require_auth));

    Router::new()
        .route("/users/register", post(auth_handlers::register))
        .route("/users/login", post(auth_handlers::login))
        .route("/health", get(health_check))
        .merge(protected)
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK - Canvas Server"
}

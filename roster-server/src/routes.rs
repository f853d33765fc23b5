//! Router assembly.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::avatar::handlers::{delete_avatar, get_avatar, upload_avatar};
use crate::infra::app_state::AppState;
use crate::users::auth::auth_middleware;
use crate::users::handlers::{
    delete_me, get_user, login, logout, logout_all, me, register, update_me,
};

/// Build the full application router. Authenticated routes sit behind
/// the bearer-token middleware; everything else is public.
pub fn create_app(state: AppState) -> Router {
    let public = Router::new()
        .route("/users", post(register))
        .route("/users/login", post(login))
        .route("/users/{id}", get(get_user));

    let protected = Router::new()
        .route("/users/me", get(me).patch(update_me).delete(delete_me))
        .route("/users/logout", post(logout))
        .route("/users/logoutall", post(logout_all))
        .route(
            "/users/me/avatar",
            post(upload_avatar).get(get_avatar).delete(delete_avatar),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

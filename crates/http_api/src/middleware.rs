use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::{errors::HttpError, state::HttpState};

pub const ADMIN_USER_HEADER: &str = "x-admin-user";

/// Resolves the caller's active admin role and stores it as a request
/// extension for the admin handlers.
pub async fn require_admin(
    State(state): State<HttpState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HttpError> {
    let user_id = req
        .headers()
        .get(ADMIN_USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let caller = state
        .run(move |ctx| ctx.app_state.services.roles.resolve(user_id.as_deref()))
        .await?;
    tracing::debug!(user_id = %caller.user_id, role = %caller.role, "admin request");
    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}

//! User read/write controller.

use crate::{
    responses::{ok, ApiResult, MessageResponse, NameResponse},
    state::AppState,
};
use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Router,
};
use tracing::debug;

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add/:name", get(add_user))
        .route("/get/:id", get(get_user))
}

/// Insert a user with the given name.
async fn add_user(
    State(state): State<AppState>,
    name: Result<Path<String>, PathRejection>,
) -> ApiResult<MessageResponse> {
    let Path(name) = name?;
    debug!("Add user request: {}", name);

    state.user_service.add_user(&name).await?;
    ok(MessageResponse::new("User added"))
}

/// Look a user's name up by id, through the cache.
async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<NameResponse> {
    let Path(id) = id?;
    debug!("Get user request: {}", id);

    let name = state.user_service.get_user_name(&id).await?;
    ok(NameResponse { name })
}

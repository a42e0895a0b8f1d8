//! User REST resource.

use std::sync::Arc;

use axum::{
    extract::State,
    response::Json,
    routing::get,
    Router,
};

use common::AppResult;
use domain::UserPatch;

use super::extractors::{UserPath, ValidatedJson};
use crate::dto::{UpdateUserRequest, UserCollectionResponse, UserDto};
use crate::service::UserService;

/// Create user routes
pub fn user_routes() -> Router<Arc<dyn UserService>> {
    Router::new()
        .route("/", get(find_all).post(save).put(update))
        .route(
            "/:user_id",
            get(find_by_id).put(update_by_id).delete(delete_by_id),
        )
        .route("/username/:username", get(find_by_username))
}

/// List provisioned users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Users with a linked credential", body = UserCollectionResponse)
    )
)]
pub async fn find_all(
    State(service): State<Arc<dyn UserService>>,
) -> AppResult<Json<UserCollectionResponse>> {
    let users = service.find_all().await?;
    Ok(Json(UserCollectionResponse::from(users)))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    tag = "Users",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "User not found or without credential")
    )
)]
pub async fn find_by_id(
    State(service): State<Arc<dyn UserService>>,
    UserPath(user_id): UserPath<i32>,
) -> AppResult<Json<UserDto>> {
    let user = service.find_by_id(user_id).await?;
    Ok(Json(user))
}

/// Get user by credential username
#[utoipa::path(
    get,
    path = "/api/users/username/{username}",
    tag = "Users",
    params(("username" = String, Path, description = "Credential username")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "No user with this username")
    )
)]
pub async fn find_by_username(
    State(service): State<Arc<dyn UserService>>,
    UserPath(username): UserPath<String>,
) -> AppResult<Json<UserDto>> {
    let user = service.find_by_username(&username).await?;
    Ok(Json(user))
}

/// Create user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = UserDto,
    responses(
        (status = 200, description = "User created", body = UserDto),
        (status = 400, description = "Invalid body")
    )
)]
pub async fn save(
    State(service): State<Arc<dyn UserService>>,
    ValidatedJson(user_dto): ValidatedJson<UserDto>,
) -> AppResult<Json<UserDto>> {
    let user = service.save(user_dto).await?;
    Ok(Json(user))
}

/// Replace user named by `userId` in the body
#[utoipa::path(
    put,
    path = "/api/users",
    tag = "Users",
    request_body = UserDto,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 400, description = "Invalid body or missing userId"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update(
    State(service): State<Arc<dyn UserService>>,
    ValidatedJson(user_dto): ValidatedJson<UserDto>,
) -> AppResult<Json<UserDto>> {
    let user = service.update(user_dto).await?;
    Ok(Json(user))
}

/// Partially update user by ID
#[utoipa::path(
    put,
    path = "/api/users/{user_id}",
    tag = "Users",
    params(("user_id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 400, description = "Invalid body"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_by_id(
    State(service): State<Arc<dyn UserService>>,
    UserPath(user_id): UserPath<i32>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserDto>> {
    let user = service.update_by_id(user_id, UserPatch::from(req)).await?;
    Ok(Json(user))
}

/// Delete the user's credential
#[utoipa::path(
    delete,
    path = "/api/users/{user_id}",
    tag = "Users",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Credential unlinked and deleted", body = bool),
        (status = 404, description = "User not found or without credential")
    )
)]
pub async fn delete_by_id(
    State(service): State<Arc<dyn UserService>>,
    UserPath(user_id): UserPath<i32>,
) -> AppResult<Json<bool>> {
    service.delete_by_id(user_id).await?;
    Ok(Json(true))
}

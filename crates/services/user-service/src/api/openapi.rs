//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::dto::{CredentialDto, UpdateUserRequest, UserCollectionResponse, UserDto};
use domain::RoleBasedAuthority;

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::user_resource::find_all,
        crate::api::user_resource::find_by_id,
        crate::api::user_resource::find_by_username,
        crate::api::user_resource::save,
        crate::api::user_resource::update,
        crate::api::user_resource::update_by_id,
        crate::api::user_resource::delete_by_id,
    ),
    components(
        schemas(
            UserDto,
            CredentialDto,
            RoleBasedAuthority,
            UpdateUserRequest,
            UserCollectionResponse,
        )
    ),
    tags(
        (name = "Users", description = "User management endpoints"),
    )
)]
pub struct ApiDoc;

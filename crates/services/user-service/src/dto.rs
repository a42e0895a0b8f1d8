//! Transfer objects exchanged over the REST API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use domain::{Credential, RoleBasedAuthority, User, UserFields, UserPatch};

/// User as seen by API clients.
///
/// `userId` and `credential` are ignored when the DTO is used to create a
/// user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[serde(default)]
    #[schema(example = 1)]
    pub user_id: Option<i32>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "firstName must not be empty"))]
    #[schema(example = "John")]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "lastName must not be empty"))]
    #[schema(example = "Doe")]
    pub last_name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    #[validate(email(message = "email must be a valid address"))]
    #[schema(example = "john.doe@example.com")]
    pub email: String,
    #[serde(default)]
    #[schema(example = "1234567890")]
    pub phone: String,
    #[serde(default, rename = "credential")]
    pub credential_dto: Option<CredentialDto>,
}

/// Credential nested inside a [`UserDto`].
///
/// The password is accepted on input and never written out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CredentialDto {
    pub credential_id: Option<i32>,
    #[schema(example = "testuser")]
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role_based_authority: RoleBasedAuthority,
    pub is_enabled: bool,
    pub is_account_non_expired: bool,
    pub is_account_non_locked: bool,
    pub is_credentials_non_expired: bool,
}

/// Partial user update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255, message = "firstName must not be empty"))]
    #[schema(example = "Jane")]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 255, message = "lastName must not be empty"))]
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Envelope for user listings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserCollectionResponse {
    pub dtos: Vec<UserDto>,
}

impl From<Credential> for CredentialDto {
    fn from(credential: Credential) -> Self {
        Self {
            credential_id: Some(credential.credential_id),
            username: credential.username,
            password: credential.password,
            role_based_authority: credential.role_based_authority,
            is_enabled: credential.is_enabled,
            is_account_non_expired: credential.is_account_non_expired,
            is_account_non_locked: credential.is_account_non_locked,
            is_credentials_non_expired: credential.is_credentials_non_expired,
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            user_id: Some(user.user_id),
            first_name: user.first_name,
            last_name: user.last_name,
            image_url: user.image_url,
            email: user.email,
            phone: user.phone,
            credential_dto: user.credential.map(CredentialDto::from),
        }
    }
}

impl From<UserDto> for UserFields {
    fn from(dto: UserDto) -> Self {
        Self {
            first_name: dto.first_name,
            last_name: dto.last_name,
            image_url: dto.image_url,
            email: dto.email,
            phone: dto.phone,
        }
    }
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            image_url: req.image_url,
            email: req.email,
            phone: req.phone,
        }
    }
}

impl From<Vec<UserDto>> for UserCollectionResponse {
    fn from(dtos: Vec<UserDto>) -> Self {
        Self { dtos }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn provisioned_user() -> User {
        User {
            user_id: 7,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            image_url: None,
            email: "john.doe@example.com".to_string(),
            phone: "1234567890".to_string(),
            credential: Some(Credential {
                credential_id: 3,
                username: "testuser".to_string(),
                password: "password123".to_string(),
                role_based_authority: RoleBasedAuthority::RoleUser,
                is_enabled: true,
                is_account_non_expired: true,
                is_account_non_locked: true,
                is_credentials_non_expired: true,
                user_id: Some(7),
            }),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn user_dto_serializes_credential_under_its_wire_name() {
        let value = serde_json::to_value(UserDto::from(provisioned_user())).unwrap();

        assert_eq!(value["userId"], 7);
        assert_eq!(value["firstName"], "John");
        assert_eq!(value["credential"]["username"], "testuser");
        assert_eq!(value["credential"]["roleBasedAuthority"], "ROLE_USER");
        assert!(value.get("credentialDto").is_none());
        assert!(value["credential"].get("password").is_none());
    }

    #[test]
    fn credential_password_is_accepted_on_input() {
        let dto: UserDto = serde_json::from_value(json!({
            "firstName": "John",
            "lastName": "Doe",
            "email": "john.doe@example.com",
            "phone": "1234567890",
            "credential": { "username": "testuser", "password": "secret" }
        }))
        .unwrap();

        let credential = dto.credential_dto.unwrap();
        assert_eq!(credential.password, "secret");
        assert_eq!(credential.role_based_authority, RoleBasedAuthority::RoleUser);
    }

    #[test]
    fn user_fields_drop_id_and_credential() {
        let dto = UserDto::from(provisioned_user());
        let fields = UserFields::from(dto);

        assert_eq!(fields.first_name, "John");
        assert_eq!(fields.email, "john.doe@example.com");
    }

    #[test]
    fn validation_rejects_blank_name_and_bad_email() {
        let dto = UserDto {
            first_name: String::new(),
            last_name: "Doe".to_string(),
            email: "not-an-email".to_string(),
            ..Default::default()
        };

        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("email"));
        assert!(!fields.contains_key("last_name"));
    }

    #[test]
    fn update_request_validates_only_present_fields() {
        let req = UpdateUserRequest {
            first_name: Some("Jane".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_ok());

        let req = UpdateUserRequest {
            email: Some("broken".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}

//! Request extractors that report failures with the JSON error body.
//!
//! axum's own `Json` and `Path` rejections answer in plain text; these
//! wrappers turn them into `AppError::Validation` so every 400 from the
//! user resource has the same shape.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use common::AppError;

/// JSON body that is deserialized and then checked with `validator`.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;

        body.validate().map_err(first_violation)?;
        Ok(ValidatedJson(body))
    }
}

/// Path parameters; an unparsable segment such as `/api/users/abc` is a 400.
pub struct UserPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for UserPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;

        Ok(UserPath(value))
    }
}

/// Message of the first field that failed validation.
fn first_violation(errors: ValidationErrors) -> AppError {
    let message = errors
        .field_errors()
        .into_values()
        .flat_map(|violations| violations.iter())
        .find_map(|violation| violation.message.as_ref())
        .map(|message| message.to_string())
        .unwrap_or_else(|| "Request body failed validation".to_string());

    AppError::validation(message)
}

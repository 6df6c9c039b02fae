//! Request body extractors that report rejections in the API's error shape.

use axum::extract::{FromRequest, Request};
use axum::Json;
use hrflow_core::error::CoreError;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// `Json<T>` whose rejections (bad content type, malformed JSON, missing
/// fields) become a 400 `BAD_REQUEST` instead of axum's plain-text reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}

/// [`JsonBody`] that also runs the body's `validator` rules.
///
/// Rule failures become a 400 `VALIDATION_ERROR` listing the offending
/// fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(value) = JsonBody::<T>::from_request(req, state).await?;
        value.validate().map_err(|errors| {
            let mut fields: Vec<String> =
                errors.field_errors().keys().map(|k| k.to_string()).collect();
            fields.sort_unstable();
            AppError::Core(CoreError::validation(format!(
                "Invalid or missing fields: {}",
                fields.join(", ")
            )))
        })?;
        Ok(ValidJson(value))
    }
}

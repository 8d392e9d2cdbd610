//! JSON body extractor that runs `validator` rules after deserializing.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use drivehub_core::error::AppError;

use crate::error::ApiError;

/// A JSON body that has been deserialized and validated.
///
/// Malformed JSON and rule violations both surface as validation errors in
/// the standard error body.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(format!("Invalid JSON body: {}", e.body_text())))?;

        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

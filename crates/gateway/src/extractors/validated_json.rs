//! Validated JSON extractors.

use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use common::{AppError, AppResult};

/// JSON extractor that automatically validates the payload.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        validate(&value)?;
        Ok(ValidatedJson(value))
    }
}

/// Validated JSON body that may be left out; an empty body means `T::default()`.
pub struct OptionalJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for OptionalJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Default,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(OptionalJson(T::default()));
        }

        let value: T = serde_json::from_slice(&body).map_err(|e| {
            AppError::validation(format!("Failed to parse the request body as JSON: {}", e))
        })?;

        validate(&value)?;
        Ok(OptionalJson(value))
    }
}

fn validate<T: Validate>(value: &T) -> AppResult<()> {
    value.validate().map_err(|e| {
        let message = first_message(&e).unwrap_or_else(|| "Validation failed".to_string());
        AppError::validation(message)
    })
}

/// First readable message, looking into nested structs and lists.
fn first_message(errors: &ValidationErrors) -> Option<String> {
    errors.errors().iter().find_map(|(field, kind)| match kind {
        ValidationErrorsKind::Field(errs) => errs.first().map(|error| {
            error
                .message
                .as_ref()
                .map(|msg| msg.to_string())
                .unwrap_or_else(|| format!("{} is invalid", field))
        }),
        ValidationErrorsKind::Struct(inner) => first_message(inner),
        ValidationErrorsKind::List(items) => items.values().find_map(|inner| first_message(inner)),
    })
}

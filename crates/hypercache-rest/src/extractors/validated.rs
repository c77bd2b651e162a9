//! Validated JSON extractor.
//!
//! `ValidatedJson<T>` deserializes the body and validates it with the
//! `validator` crate. Every rejection (bad JSON, wrong content type, missing
//! fields, failed validation) is a 400 with the standard error body.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use hypercache_core::HyperCacheError;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// JSON extractor that validates the deserialized value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection type for validated JSON extraction.
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    /// JSON parsing/deserialization error.
    JsonError(JsonRejection),
    /// Validation error.
    ValidationError(ValidationErrors),
}

impl ValidatedJsonRejection {
    fn message(&self) -> String {
        match self {
            Self::JsonError(rejection) => rejection.body_text(),
            Self::ValidationError(errors) => validation_messages(errors).join("; "),
        }
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        AppError(HyperCacheError::InvalidArgument(self.message())).into_response()
    }
}

/// Flattens validator errors into one message per failed rule, sorted by field.
fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                err.message
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| format!("Validation failed for field '{}'", field))
            })
        })
        .collect()
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct TestRequest {
        #[validate(length(min = 1, message = "name must not be empty"))]
        name: String,
        #[validate(range(min = 0, message = "count must not be negative"))]
        count: i64,
    }

    #[test]
    fn test_validation_messages_single_field() {
        let req = TestRequest {
            name: String::new(),
            count: 1,
        };

        let errors = req.validate().unwrap_err();
        assert_eq!(validation_messages(&errors), vec!["name must not be empty"]);
    }

    #[test]
    fn test_validation_messages_multiple_fields() {
        let req = TestRequest {
            name: String::new(),
            count: -1,
        };

        let errors = req.validate().unwrap_err();
        assert_eq!(
            validation_messages(&errors),
            vec!["count must not be negative", "name must not be empty"]
        );
    }

    #[test]
    fn test_validation_rejection_is_bad_request() {
        let req = TestRequest {
            name: String::new(),
            count: 0,
        };

        let rejection = ValidatedJsonRejection::ValidationError(req.validate().unwrap_err());
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_valid_request_passes() {
        let req = TestRequest {
            name: "ok".to_string(),
            count: 0,
        };
        assert!(req.validate().is_ok());
    }
}

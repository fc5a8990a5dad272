use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;

/// JSON body extractor that runs `Validate` before the handler sees the value.
/// Malformed JSON and validation failures both become `ApiError`s.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;

        value
            .validate()
            .map_err(|errors| ApiError::bad_request(format_validation_errors(&errors)))?;

        Ok(Self(value))
    }
}

/// `Validation failed: name: must not be blank; price: must not be null`, fields sorted.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid ({})", error.code));
                format!("{field}: {message}")
            })
        })
        .collect();

    if messages.is_empty() {
        return "Validation failed".to_string();
    }

    messages.sort();
    format!("Validation failed: {}", messages.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::ProductRequest;
    use rust_decimal::Decimal;

    #[test]
    fn formats_every_violation() {
        let req = ProductRequest {
            id: None,
            name: " ".to_string(),
            description: None,
            price: None,
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(
            format_validation_errors(&errors),
            "Validation failed: name: must not be blank; price: must not be null"
        );
    }

    #[test]
    fn formats_negative_price() {
        let req = ProductRequest::new("Name", None, Decimal::new(-500, 2));
        let errors = req.validate().unwrap_err();
        assert_eq!(
            format_validation_errors(&errors),
            "Validation failed: price: must be greater than or equal to 0.00"
        );
    }
}

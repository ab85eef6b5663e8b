use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use kxl_core::AppError;
use serde::de::DeserializeOwned;
use std::str::FromStr;
use validator::{Validate, ValidationErrors};

/// First validation message, in field order, so responses are stable.
fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("validation error: {field} is invalid"))
            })
        })
        .next()
        .unwrap_or_else(|| "validation error".to_string())
}

fn rejection_message(rejection: &JsonRejection) -> String {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return "validation error: expected application/json".to_string();
    }

    let body = rejection.body_text();
    if body.contains("missing field") {
        return "validation error: missing required fields".to_string();
    }
    if body.contains("invalid type") || body.contains("invalid value") {
        return "validation error: invalid field type".to_string();
    }
    "validation error: invalid request body".to_string()
}

/// `Json<T>` that also runs `validator` rules. Every failure is a `40001`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection_message(&rejection)))?;

        value
            .validate()
            .map_err(|errors| AppError::validation(first_message(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

/// Parses an id taken from the path. Malformed ids are a `40001`.
pub fn parse_path_id<T: FromStr>(raw: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::validation("validation error: invalid id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use kxl_core::errors::codes;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "validation error: missing required fields"))]
        name: String,
        #[validate(email(message = "validation error: invalid email"))]
        email: String,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_payload() {
        let req = json_request(r#"{"name":"a","email":"a@example.com"}"#);
        let ValidatedJson(payload) = ValidatedJson::<Payload>::from_request(req, &())
            .await
            .unwrap();
        assert_eq!(payload.name, "a");
    }

    #[tokio::test]
    async fn test_rule_violation_is_validation_error() {
        let req = json_request(r#"{"name":"a","email":"nope"}"#);
        let err = ValidatedJson::<Payload>::from_request(req, &())
            .await
            .unwrap_err();
        assert!(err.is(codes::VALIDATION));
        assert_eq!(err.message, "validation error: invalid email");
    }

    #[tokio::test]
    async fn test_missing_field() {
        let req = json_request(r#"{"name":"a"}"#);
        let err = ValidatedJson::<Payload>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.message, "validation error: missing required fields");
    }

    #[test]
    fn test_parse_path_id() {
        let id = uuid::Uuid::new_v4();
        let parsed: uuid::Uuid = parse_path_id(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
        let err = parse_path_id::<uuid::Uuid>("nope").unwrap_err();
        assert!(err.is(codes::VALIDATION));
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let req = Request::builder()
            .method("POST")
            .body(Body::from("{}"))
            .unwrap();
        let err = ValidatedJson::<Payload>::from_request(req, &())
            .await
            .unwrap_err();
        assert!(err.is(codes::VALIDATION));
    }
}

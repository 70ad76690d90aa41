use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::FromRequestParts;

use crate::api::v1::response::ApiResponse;
use crate::error::OcrBenchError;

/// `Query` whose rejection is the v1 error envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiResponse<()>))]
pub struct AppQuery<T>(pub T);

/// `Path` whose rejection is the v1 error envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiResponse<()>))]
pub struct AppPath<T>(pub T);

impl From<QueryRejection> for ApiResponse<()> {
    fn from(rejection: QueryRejection) -> Self {
        let message = rejection.body_text();
        let error = match extract_missing_field(&message) {
            Some(field) => OcrBenchError::Validation(format!("Missing required parameter: {field}")),
            None => OcrBenchError::Validation(message),
        };
        error.into()
    }
}

impl From<PathRejection> for ApiResponse<()> {
    fn from(rejection: PathRejection) -> Self {
        OcrBenchError::Validation(rejection.body_text()).into()
    }
}

fn extract_missing_field(message: &str) -> Option<&str> {
    let prefix = "missing field `";
    let start = message.find(prefix)? + prefix.len();
    let remaining = message.get(start..)?;
    let end = remaining.find('`')?;
    remaining.get(..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_missing_field() {
        assert_eq!(
            extract_missing_field("Failed to deserialize query string: missing field `email`"),
            Some("email")
        );
        assert_eq!(extract_missing_field("invalid digit found in string"), None);
    }
}

use modkit::ApiError;

use crate::domain::error::{DomainError, ErrorKind};

/// Map a domain error to the HTTP error envelope.
///
/// Storage failures are logged and hidden behind a generic 500.
pub fn map_domain_error(e: &DomainError) -> ApiError {
    match e.kind() {
        ErrorKind::NotFound => ApiError::not_found(e.to_string()),
        ErrorKind::Conflict => ApiError::conflict(e.to_string()),
        ErrorKind::Validation => ApiError::bad_request(e.to_string()),
        ErrorKind::Internal => ApiError::internal(e),
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        map_domain_error(&e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use uuid::Uuid;

    #[test]
    fn status_per_kind() {
        let cases = [
            (DomainError::user_not_found(Uuid::nil()), StatusCode::NOT_FOUND),
            (
                DomainError::email_already_exists("a@b.co"),
                StatusCode::CONFLICT,
            ),
            (DomainError::invalid_email("x"), StatusCode::BAD_REQUEST),
            (DomainError::MissingFields, StatusCode::BAD_REQUEST),
            (DomainError::EmailUnchanged, StatusCode::BAD_REQUEST),
            (
                DomainError::invalid_pagination("page must be at least 1"),
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::storage("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(map_domain_error(&err).status, status, "{err:?}");
        }
    }

    #[test]
    fn storage_message_is_generic() {
        let api = map_domain_error(&DomainError::storage("lock poisoned"));
        assert_eq!(api.message, "Internal server error");
    }

    #[test]
    fn client_errors_keep_domain_message() {
        let api = map_domain_error(&DomainError::MissingFields);
        assert_eq!(api.message, "Email and name are required");
    }
}

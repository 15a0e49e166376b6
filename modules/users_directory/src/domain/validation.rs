//! Input rules for directory records and the patch application function.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::contract::model::{NewUser, User};
use crate::domain::error::DomainError;

#[allow(clippy::expect_used)]
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex must compile"));

/// `local@domain.tld` with no whitespace and exactly one `@`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(DomainError::invalid_email(email))
    }
}

/// Returns the trimmed name.
pub fn normalize_name(name: &str) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Presence first, then email format.
pub fn validate_new_user(new_user: &NewUser) -> Result<(), DomainError> {
    if new_user.email.trim().is_empty() || new_user.name.trim().is_empty() {
        return Err(DomainError::MissingFields);
    }
    validate_email(&new_user.email)
}

/// Validated field changes ready to apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changes {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// New record with `changes` applied and `updated_at` moved forward.
///
/// `updated_at` never repeats: if the clock has not advanced past the
/// previous value, the previous value plus one nanosecond is used.
pub fn apply_changes(current: &User, changes: Changes, now: DateTime<Utc>) -> User {
    let updated_at = if now > current.updated_at {
        now
    } else {
        current.updated_at + chrono::Duration::nanoseconds(1)
    };
    User {
        id: current.id,
        email: changes.email.unwrap_or_else(|| current.email.clone()),
        name: changes.name.unwrap_or_else(|| current.name.clone()),
        created_at: current.created_at,
        updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user() -> User {
        let at = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "alice@example.com".into(),
            name: "Alice".into(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn email_format() {
        for ok in ["alice@example.com", "a.b+c@sub.domain.io", "x@y.z"] {
            assert!(is_valid_email(ok), "{ok} should be valid");
        }
        for bad in [
            "",
            "not-an-email",
            "a@b",
            "@example.com",
            "a@.",
            "a b@example.com",
            "a@@example.com",
            "alice@example .com",
        ] {
            assert!(!is_valid_email(bad), "{bad} should be invalid");
        }
    }

    #[test]
    fn missing_fields_checked_before_format() {
        let err = validate_new_user(&NewUser::new("not-an-email", "   ")).unwrap_err();
        assert_eq!(err, DomainError::MissingFields);

        let err = validate_new_user(&NewUser::new("not-an-email", "X")).unwrap_err();
        assert!(matches!(err, DomainError::InvalidEmail { .. }));

        assert!(validate_new_user(&NewUser::new("x@y.io", "X")).is_ok());
    }

    #[test]
    fn names_are_trimmed() {
        assert_eq!(normalize_name("  Alice B ").unwrap(), "Alice B");
        assert_eq!(normalize_name(" \t").unwrap_err(), DomainError::EmptyName);
    }

    #[test]
    fn apply_changes_keeps_identity_and_bumps_timestamp() {
        let current = user();
        let updated = apply_changes(
            &current,
            Changes {
                name: Some("New".into()),
                ..Default::default()
            },
            current.updated_at,
        );

        assert_eq!(updated.id, current.id);
        assert_eq!(updated.email, current.email);
        assert_eq!(updated.name, "New");
        assert_eq!(updated.created_at, current.created_at);
        assert!(updated.updated_at > current.updated_at);
    }

    #[test]
    fn apply_changes_uses_clock_when_it_advanced() {
        let current = user();
        let later = current.updated_at + chrono::Duration::seconds(5);
        let updated = apply_changes(&current, Changes::default(), later);
        assert_eq!(updated.updated_at, later);
    }
}

pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use crate::models::UserResponse;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

// Re-export necessary items
pub use extractors::CurrentUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenPair, TokenService};

lazy_static! {
    static ref HAS_LETTER: regex::Regex = regex::Regex::new(r"[A-Za-z]").unwrap();
    static ref HAS_DIGIT: regex::Regex = regex::Regex::new(r"[0-9]").unwrap();
}

/// Passwords must be at least 8 characters with at least one letter and one
/// digit.
fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < 8 {
        return Err(ValidationError::new(
            "Password must be at least 8 characters",
        ));
    }
    if !HAS_LETTER.is_match(password) || !HAS_DIGIT.is_match(password) {
        return Err(ValidationError::new(
            "Password must contain at least one letter and one number",
        ));
    }
    Ok(())
}

/// Payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom = "validate_password")]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Payload for exchanging a refresh token for a new pair.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Response body for successful registration and login.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            email: "test@example.com".to_string(),
            password: "Password123".to_string(),
            name: "Test User".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterRequest {
            email: "testexample.com".to_string(),
            password: "Password123".to_string(),
            name: "Test User".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            email: "test@example.com".to_string(),
            password: "Pw1".to_string(),
            name: "Test User".to_string(),
        };
        assert!(short_password.validate().is_err());

        let no_digit = RegisterRequest {
            email: "test@example.com".to_string(),
            password: "Passwords".to_string(),
            name: "Test User".to_string(),
        };
        assert!(no_digit.validate().is_err());

        let no_letter = RegisterRequest {
            email: "test@example.com".to_string(),
            password: "12345678".to_string(),
            name: "Test User".to_string(),
        };
        assert!(no_letter.validate().is_err());

        let empty_name = RegisterRequest {
            email: "test@example.com".to_string(),
            password: "Password123".to_string(),
            name: "".to_string(),
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            email: "test@example.com".to_string(),
            password: "Password123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = LoginRequest {
            email: "not-an-email".to_string(),
            password: "Password123".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let empty_password = LoginRequest {
            email: "test@example.com".to_string(),
            password: "".to_string(),
        };
        assert!(empty_password.validate().is_err());
    }

    #[test]
    fn test_refresh_request_field_name() {
        let request: RefreshRequest =
            serde_json::from_value(serde_json::json!({"refreshToken": "abc"})).unwrap();
        assert_eq!(request.refresh_token, "abc");
        assert!(request.validate().is_ok());
    }
}

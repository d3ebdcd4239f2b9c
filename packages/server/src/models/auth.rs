use serde::{Deserialize, Serialize};

use super::shared::{validate_optional_text, validate_text_len};
use crate::error::AppError;

/// Request body for user registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Login email; stored lowercased.
    #[schema(example = "asha@example.com")]
    pub email: String,
    /// Password (8-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
    #[schema(example = "Asha Rao")]
    pub full_name: String,
    #[schema(example = "IIT Bombay")]
    pub college: Option<String>,
    #[schema(example = 2026)]
    pub graduation_year: Option<i32>,
    #[schema(example = "Backend Engineer")]
    pub target_role: Option<String>,
}

/// Lowercase and trim an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal shape check: one `@`, non-empty local part, dotted domain, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty() && !tail.ends_with('.'))
}

pub fn validate_graduation_year(year: Option<i32>) -> Result<(), AppError> {
    if let Some(year) = year
        && !(1950..=2100).contains(&year)
    {
        return Err(AppError::Validation(
            "Graduation year must be between 1950 and 2100".into(),
        ));
    }
    Ok(())
}

pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    if !is_valid_email(&normalize_email(&payload.email)) {
        return Err(AppError::Validation("Email address is invalid".into()));
    }
    if payload.password.len() < 8 || payload.password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    validate_text_len(&payload.full_name, "Full name", 128)?;
    validate_optional_text(payload.college.as_deref(), "College", 256)?;
    validate_optional_text(payload.target_role.as_deref(), "Target role", 128)?;
    validate_graduation_year(payload.graduation_year)
}

/// Request body for user login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "asha@example.com")]
    pub email: String,
    /// Account password.
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub user: super::user::UserProfile,
    /// Permissions granted to the user.
    #[schema(example = json!(["submission:submit", "interview:take"]))]
    pub permissions: Vec<String>,
}

/// Claims of the current token.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "asha@example.com")]
    pub email: String,
    #[schema(example = "candidate")]
    pub role: String,
    #[schema(example = json!(["submission:submit", "interview:take"]))]
    pub permissions: Vec<String>,
}

use serde::Serialize;

use crate::database::models::User;

/// Body returned by both register and login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: User,
}

/// Emails are compared exactly after trimming surrounding whitespace.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_string()
}

pub mod accounts;
pub mod prompt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use accounts::{Accounts, AUTH_KEY, REGISTERED_USERS_KEY};
pub use prompt::read_password;

/// Environment variable that supplies a password without prompting
pub const ENV_PASSWORD_VAR: &str = "PCOS_RISK_PASSWORD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Session record held in the store while someone is signed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

impl AuthState {
    pub fn signed_out() -> Self {
        Self {
            user: None,
            is_authenticated: false,
        }
    }

    pub fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
        }
    }
}

#[derive(Debug)]
pub enum AuthError {
    InvalidCredentials,
    NotSignedIn,
    EmailAlreadyRegistered,
    PasswordMismatch,
    EmptyField(&'static str),
    Storage(anyhow::Error),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "Invalid email or password"),
            AuthError::NotSignedIn => write!(f, "Not signed in"),
            AuthError::EmailAlreadyRegistered => write!(f, "Email already registered"),
            AuthError::PasswordMismatch => write!(f, "Passwords do not match"),
            AuthError::EmptyField(field) => write!(f, "{} cannot be empty", field),
            AuthError::Storage(e) => write!(f, "Account storage failed: {:#}", e),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<anyhow::Error> for AuthError {
    fn from(e: anyhow::Error) -> Self {
        AuthError::Storage(e)
    }
}

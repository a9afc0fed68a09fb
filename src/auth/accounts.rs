use anyhow::{anyhow, Context, Result};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::{AuthError, AuthState, User};
use crate::store::KeyValueStore;

/// Key holding the current session.
pub const AUTH_KEY: &str = "pcos_auth";

/// Key holding registered accounts.
pub const REGISTERED_USERS_KEY: &str = "pcos_registered_users";

struct BuiltinUser {
    email: &'static str,
    password: &'static str,
    name: &'static str,
}

/// Demo accounts that always exist.
const BUILTIN_USERS: [BuiltinUser; 2] = [
    BuiltinUser {
        email: "test@example.com",
        password: "password123",
        name: "Test User",
    },
    BuiltinUser {
        email: "demo@pcos.app",
        password: "demo123",
        name: "Demo User",
    },
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisteredUser {
    #[serde(flatten)]
    user: User,
    /// Argon2 PHC string
    password_hash: String,
}

/// Local accounts and the current session, kept in a key-value store.
pub struct Accounts<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Accounts<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create an account and sign it in.
    pub fn register(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
        name: &str,
    ) -> Result<User, AuthError> {
        let email = email.trim();
        let name = name.trim();
        if email.is_empty() {
            return Err(AuthError::EmptyField("Email"));
        }
        if name.is_empty() {
            return Err(AuthError::EmptyField("Name"));
        }
        if password.is_empty() {
            return Err(AuthError::EmptyField("Password"));
        }
        if password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        let mut registered = self.registered_users()?;
        let taken = BUILTIN_USERS.iter().any(|u| u.email == email)
            || registered.iter().any(|u| u.user.email == email);
        if taken {
            return Err(AuthError::EmailAlreadyRegistered);
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        registered.push(RegisteredUser {
            user: user.clone(),
            password_hash: hash_password(password)?,
        });
        self.write_registered_users(&registered)?;
        self.write_session(&AuthState::signed_in(user.clone()))?;

        info!(email = %user.email, "account registered");
        Ok(user)
    }

    /// Sign in with a built-in or registered account.
    pub fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim();

        if let Some(builtin) = BUILTIN_USERS
            .iter()
            .find(|u| u.email == email && u.password == password)
        {
            // Built-in accounts get a fresh identity per session
            let user = User {
                id: Uuid::new_v4().to_string(),
                email: builtin.email.to_string(),
                name: builtin.name.to_string(),
                created_at: Utc::now(),
            };
            self.write_session(&AuthState::signed_in(user.clone()))?;
            info!(email, "signed in");
            return Ok(user);
        }

        let registered = self.registered_users()?;
        if let Some(account) = registered.into_iter().find(|u| u.user.email == email) {
            if verify_password(password, &account.password_hash)? {
                self.write_session(&AuthState::signed_in(account.user.clone()))?;
                info!(email, "signed in");
                return Ok(account.user);
            }
        }

        debug!(email, "sign-in rejected");
        Err(AuthError::InvalidCredentials)
    }

    pub fn logout(&self) -> Result<()> {
        self.store.delete(AUTH_KEY)
    }

    pub fn state(&self) -> Result<AuthState> {
        match self.store.get(AUTH_KEY)? {
            Some(json) => serde_json::from_str(&json).context("Failed to parse session"),
            None => Ok(AuthState::signed_out()),
        }
    }

    pub fn current_user(&self) -> Result<Option<User>> {
        let state = self.state()?;
        if state.is_authenticated {
            Ok(state.user)
        } else {
            Ok(None)
        }
    }

    /// The signed-in user, or `NotSignedIn`. Gates actions that need an account.
    pub fn require_user(&self) -> Result<User, AuthError> {
        self.current_user()?.ok_or(AuthError::NotSignedIn)
    }

    fn write_session(&self, state: &AuthState) -> Result<()> {
        let json = serde_json::to_string(state).context("Failed to serialize session")?;
        self.store.set(AUTH_KEY, &json)
    }

    fn registered_users(&self) -> Result<Vec<RegisteredUser>> {
        match self.store.get(REGISTERED_USERS_KEY)? {
            Some(json) => serde_json::from_str(&json).context("Failed to parse registered users"),
            None => Ok(Vec::new()),
        }
    }

    fn write_registered_users(&self, users: &[RegisteredUser]) -> Result<()> {
        let json = serde_json::to_string(users).context("Failed to serialize registered users")?;
        self.store.set(REGISTERED_USERS_KEY, &json)
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, phc: &str) -> Result<bool> {
    let parsed = PasswordHash::new(phc).map_err(|e| anyhow!("Invalid stored password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

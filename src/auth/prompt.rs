use anyhow::{Context, Result};

use super::ENV_PASSWORD_VAR;

/// Check for a password in the PCOS_RISK_PASSWORD environment variable.
/// Returns Some(password) if the env var is set and non-empty, None otherwise.
pub fn get_password_from_env() -> Option<String> {
    match std::env::var(ENV_PASSWORD_VAR) {
        Ok(val) if !val.is_empty() => Some(val),
        _ => None,
    }
}

/// Read a password from the environment, or prompt for it without echo.
pub fn read_password(prompt: &str) -> Result<String> {
    if let Some(password) = get_password_from_env() {
        return Ok(password);
    }

    let password = rpassword::prompt_password(prompt).context("Failed to read password from terminal")?;

    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    Ok(password)
}

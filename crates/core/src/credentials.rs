//! Auto-generated login credentials for newly created accounts.
//!
//! Both the email and the initial password are derived from the person's
//! display name: lowercase, all whitespace removed, then a fixed suffix.
//! "Jane Roe" becomes `janeroe@<domain>` / `janeroe@123`. The password is
//! shown once, in the creation response, and never stored in plain text.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Suffix appended to the normalized name to form the initial password.
pub const PASSWORD_SUFFIX: &str = "@123";

/// Default domain for derived email addresses.
pub const DEFAULT_EMAIL_DOMAIN: &str = "company.com";

/// Email and plaintext password generated for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCredentials {
    pub email: String,
    pub password: String,
}

/// Lowercase the name and strip every whitespace character.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Derive the credentials for `name` under `domain`.
pub fn derive_credentials(name: &str, domain: &str) -> Result<GeneratedCredentials, CoreError> {
    let local = normalize_name(name);
    if local.is_empty() {
        return Err(CoreError::validation("Name is required"));
    }
    let email = format!("{local}@{domain}");
    if !email.validate_email() {
        return Err(CoreError::validation(format!(
            "Cannot derive a valid email address from the name '{name}'"
        )));
    }
    Ok(GeneratedCredentials {
        email,
        password: format!("{local}{PASSWORD_SUFFIX}"),
    })
}

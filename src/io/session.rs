use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::model::UserIdentity;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Error type for the login gate
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("not logged in: run `ux login <email>` first")]
    NotLoggedIn,
    #[error("\"{0}\" doesn't look like an email address")]
    InvalidEmail(String),
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn user_path(data_dir: &Path) -> PathBuf {
    data_dir.join("user.json")
}

/// Read the stored identity. Missing or malformed → `None`.
pub fn read_identity(data_dir: &Path) -> Option<UserIdentity> {
    let content = fs::read_to_string(user_path(data_dir)).ok()?;
    serde_json::from_str(&content).ok()
}

/// Read the stored identity or fail with [`SessionError::NotLoggedIn`].
pub fn require_identity(data_dir: &Path) -> Result<UserIdentity, SessionError> {
    read_identity(data_dir).ok_or(SessionError::NotLoggedIn)
}

/// Store an identity. No credential check takes place; the address only has
/// to look like an email.
pub fn login(data_dir: &Path, email: &str) -> Result<UserIdentity, SessionError> {
    let email = email.trim();
    if !EMAIL_RE.is_match(email) {
        return Err(SessionError::InvalidEmail(email.to_string()));
    }
    let user = UserIdentity {
        email: email.to_string(),
    };
    let path = user_path(data_dir);
    let content = serde_json::to_string_pretty(&user).map_err(|e| SessionError::WriteError {
        path: path.clone(),
        source: std::io::Error::other(e),
    })?;
    fs::write(&path, content).map_err(|source| SessionError::WriteError { path, source })?;
    Ok(user)
}

/// Forget the stored identity. Returns true if one was stored.
pub fn logout(data_dir: &Path) -> bool {
    fs::remove_file(user_path(data_dir)).is_ok()
}

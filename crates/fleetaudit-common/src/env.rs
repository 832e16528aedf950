//! Dotenv loading

use std::path::Path;

/// Loads `KEY=VALUE` pairs from a dotenv file into the process environment,
/// overriding variables that are already set. A missing or unreadable file is
/// not an error; the environment simply stays as it was.
pub fn load_dotenv(path: &Path) {
    if let Err(e) = dotenvy::from_path_override(path) {
        tracing::debug!(path = %path.display(), error = %e, "dotenv not loaded");
    }
}

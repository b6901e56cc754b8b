use std::process::Command;
use tracing::debug;

/// Resolve the GitHub token using, in order:
/// 1. the token from the config file
/// 2. `GITHUB_TOKEN` environment variable
/// 3. `GH_TOKEN` environment variable
/// 4. `gh auth token` subprocess
///
/// A missing token is not an error: PR reminders are then skipped.
pub fn resolve_token(configured: Option<&str>) -> Option<String> {
    if let Some(token) = configured.map(str::trim)
        && !token.is_empty()
    {
        debug!("Token taken from config");
        return Some(token.to_string());
    }

    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Ok(token) = std::env::var(var)
            && !token.trim().is_empty()
        {
            debug!(var = var, "Token resolved via environment");
            return Some(token.trim().to_string());
        }
    }

    debug!("Attempting to resolve token via `gh auth token`");
    if let Ok(output) = Command::new("gh").args(["auth", "token"]).output()
        && output.status.success()
    {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            debug!("Token resolved via gh CLI");
            return Some(token);
        }
    }

    None
}

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Output};

use tracing::debug;

use crate::config::{placeholders, Identity};
use crate::error::{Result, StarterError};

/// Message of the first commit in a generated project.
pub fn commit_message(template_commit: &str) -> String {
    format!("Initial commit\n\nCreated with ts-starter@{template_commit}")
}

fn config_value(key: &str, fallback: &str) -> String {
    let output = Command::new("git").args(["config", key]).output();
    match output {
        Ok(out) if out.status.success() => {
            let value = String::from_utf8_lossy(&out.stdout).trim().to_string();
            if value.is_empty() {
                fallback.to_string()
            } else {
                value
            }
        }
        Ok(_) | Err(_) => {
            debug!(key, "git config value unavailable");
            fallback.to_string()
        }
    }
}

/// Name and email from the user's git configuration. Missing values fall back
/// to placeholders; the username is filled in separately.
pub fn identity() -> Identity {
    Identity {
        full_name: config_value("user.name", placeholders::NAME),
        email: config_value("user.email", placeholders::EMAIL),
        username: placeholders::USERNAME.to_string(),
    }
}

fn git(project_dir: &Path, args: &[&str]) -> Result<Output> {
    debug!(?args, dir = %project_dir.display(), "running git");
    let output = Command::new("git")
        .current_dir(project_dir)
        .args(args)
        .output()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => StarterError::GitNotFound,
            _ => StarterError::GitCommit {
                reason: e.to_string(),
            },
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(StarterError::GitCommit {
            reason: format!("git {} failed: {}", args.join(" "), stderr.trim()),
        });
    }
    Ok(output)
}

/// Start fresh history in the generated project with everything staged.
pub fn initial_commit(template_commit: &str, project_dir: &Path) -> Result<()> {
    git(project_dir, &["init"])?;
    git(project_dir, &["add", "-A"])?;
    git(
        project_dir,
        &["commit", "-m", &commit_message(template_commit)],
    )?;
    Ok(())
}

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::TemplateSource;
use crate::error::{Result, StarterError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClonedTemplate {
    /// `HEAD` of the template at the cloned ref.
    pub commit_hash: String,
    /// The clone's `.git` directory, discarded before transformation.
    pub history_dir: PathBuf,
}

/// Classify git stderr output into a user-friendly error message with
/// actionable suggestions for common failure modes.
fn classify_clone_error(stderr: &str) -> String {
    if stderr.contains("Authentication failed") || stderr.contains("could not read Username") {
        format!("authentication failed; configure git credentials or use a public repository\n\ngit output:\n{stderr}")
    } else if stderr.contains("Remote branch") && stderr.contains("not found") {
        format!("branch not found; check the {} variable\n\ngit output:\n{stderr}", super::BRANCH_ENV)
    } else if stderr.contains("Repository not found")
        || (stderr.contains("not found") && stderr.contains("repository"))
    {
        format!("repository not found; check the URL\n\ngit output:\n{stderr}")
    } else if stderr.contains("already exists and is not an empty directory") {
        format!("destination already exists\n\ngit output:\n{stderr}")
    } else if stderr.contains("Could not resolve host") || stderr.contains("Connection refused") {
        format!(
            "network error; check your connection and the repository URL\n\ngit output:\n{stderr}"
        )
    } else {
        stderr.to_string()
    }
}

/// Shallow-clone the template into `destination` and report the cloned commit.
///
/// Uses the system `git` binary so that the user's credential helpers and
/// proxy settings apply. A missing binary is reported as
/// [`StarterError::GitNotFound`], any other failure as
/// [`StarterError::GitClone`].
pub fn clone_template(source: &TemplateSource, destination: &Path) -> Result<ClonedTemplate> {
    debug!(
        repository = %source.repository,
        branch = %source.branch,
        destination = %destination.display(),
        "cloning template"
    );

    let output = Command::new("git")
        .env("GIT_TERMINAL_PROMPT", "0")
        .arg("clone")
        .arg("--depth=1")
        .arg(format!("--branch={}", source.branch))
        .arg(&source.repository)
        .arg(destination)
        .output()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => StarterError::GitNotFound,
            _ => StarterError::GitClone {
                url: source.repository.clone(),
                reason: e.to_string(),
            },
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(StarterError::GitClone {
            url: source.repository.clone(),
            reason: classify_clone_error(stderr.trim()),
        });
    }

    let rev_output = Command::new("git")
        .arg("-C")
        .arg(destination)
        .arg("rev-parse")
        .arg("HEAD")
        .output()
        .map_err(|_| StarterError::GitRevParse {
            path: destination.to_path_buf(),
        })?;

    if !rev_output.status.success() {
        return Err(StarterError::GitRevParse {
            path: destination.to_path_buf(),
        });
    }

    Ok(ClonedTemplate {
        commit_hash: String::from_utf8_lossy(&rev_output.stdout).trim().to_string(),
        history_dir: destination.join(".git"),
    })
}

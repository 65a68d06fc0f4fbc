use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::config::PackageManager;
use crate::error::{Result, StarterError};

/// Arguments passed to the package manager to install dependencies.
pub fn install_args(package_manager: PackageManager) -> &'static [&'static str] {
    match package_manager {
        PackageManager::Npm => &["install"],
        PackageManager::Yarn => &[],
    }
}

/// Install dependencies, streaming the manager's output to the terminal.
pub fn install(package_manager: PackageManager, project_dir: &Path) -> Result<()> {
    let tool = package_manager.command();
    let args = install_args(package_manager);
    debug!(tool, ?args, dir = %project_dir.display(), "installing dependencies");

    let status = Command::new(tool)
        .current_dir(project_dir)
        .args(args)
        .status()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => StarterError::ToolNotFound {
                tool: tool.to_string(),
            },
            _ => StarterError::Install {
                tool: tool.to_string(),
                reason: e.to_string(),
            },
        })?;

    if !status.success() {
        return Err(StarterError::Install {
            tool: tool.to_string(),
            reason: format!("exited with {status}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn npm_uses_install_and_yarn_runs_bare() {
        assert_eq!(install_args(PackageManager::Npm), ["install"]);
        assert!(install_args(PackageManager::Yarn).is_empty());
    }
}

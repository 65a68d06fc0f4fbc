pub mod user;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use user::{load_user_config, UserConfig};

use crate::template::TemplateSource;

/// Values reported by the environment probes when git has no identity configured.
pub mod placeholders {
    pub const NAME: &str = "YOUR_NAME";
    pub const EMAIL: &str = "YOUR_EMAIL";
    pub const USERNAME: &str = "YOUR_GITHUB_USER_NAME";
}

pub const DEFAULT_DESCRIPTION: &str = "a TypeScript project";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
}

impl PackageManager {
    pub fn command(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
        }
    }

    /// Lockfile written by this manager.
    pub fn lockfile(self) -> &'static str {
        match self {
            PackageManager::Npm => "package-lock.json",
            PackageManager::Yarn => "yarn.lock",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Optional parts of the template. Every flag maps to files or manifest
/// entries that are removed from the generated project when it is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Features {
    /// Keep the `dom` lib in tsconfig.
    pub dom: bool,
    /// Keep node type definitions and the node-only sources.
    pub node: bool,
    pub strict: bool,
    /// Keep eslint-plugin-functional.
    pub functional: bool,
    pub editorconfig: bool,
    pub cspell: bool,
    pub vscode: bool,
    pub circleci: bool,
    pub appveyor: bool,
    pub travis: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            dom: false,
            node: false,
            strict: false,
            functional: true,
            editorconfig: true,
            cspell: true,
            vscode: true,
            circleci: false,
            appveyor: false,
            travis: false,
        }
    }
}

/// Version-control identity of the person running the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub full_name: String,
    pub email: String,
    pub username: String,
}

impl Identity {
    pub fn placeholder() -> Self {
        Self {
            full_name: placeholders::NAME.to_string(),
            email: placeholders::EMAIL.to_string(),
            username: placeholders::USERNAME.to_string(),
        }
    }

    /// True when both name and email came from a real git configuration.
    pub fn is_configured(&self) -> bool {
        self.full_name != placeholders::NAME && self.email != placeholders::EMAIL
    }
}

/// The resolved, immutable description of one generator run.
///
/// Built only by [`crate::resolve::resolve`]; the pipeline and the
/// orchestrator read from it and never change it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    project_name: String,
    description: String,
    package_manager: PackageManager,
    features: Features,
    install: bool,
    identity: Identity,
    template: TemplateSource,
    license_year: i32,
    working_directory: PathBuf,
}

impl Configuration {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        project_name: String,
        description: String,
        package_manager: PackageManager,
        features: Features,
        install: bool,
        identity: Identity,
        template: TemplateSource,
        license_year: i32,
        working_directory: PathBuf,
    ) -> Self {
        Self {
            project_name,
            description,
            package_manager,
            features,
            install,
            identity,
            template,
            license_year,
            working_directory,
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn package_manager(&self) -> PackageManager {
        self.package_manager
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    pub fn install(&self) -> bool {
        self.install
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn template(&self) -> &TemplateSource {
        &self.template
    }

    pub fn license_year(&self) -> i32 {
        self.license_year
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    /// Directory the template is cloned into.
    pub fn project_dir(&self) -> PathBuf {
        self.working_directory.join(&self.project_name)
    }

    pub fn repository_url(&self) -> String {
        format!(
            "https://github.com/{}/{}",
            self.identity.username, self.project_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_identity_is_not_configured() {
        assert!(!Identity::placeholder().is_configured());
    }

    #[test]
    fn identity_with_only_name_is_not_configured() {
        let identity = Identity {
            full_name: "Satoshi Nakamoto".into(),
            ..Identity::placeholder()
        };
        assert!(!identity.is_configured());
    }

    #[test]
    fn real_identity_is_configured() {
        let identity = Identity {
            full_name: "Satoshi Nakamoto".into(),
            email: "satoshi@example.com".into(),
            username: placeholders::USERNAME.into(),
        };
        assert!(identity.is_configured());
    }

    #[test]
    fn package_manager_lockfiles() {
        assert_eq!(PackageManager::Npm.lockfile(), "package-lock.json");
        assert_eq!(PackageManager::Yarn.lockfile(), "yarn.lock");
        assert_eq!(PackageManager::Yarn.to_string(), "yarn");
    }

    #[test]
    fn features_parse_partial_toml() {
        let features: Features = toml::from_str("strict = true\nvscode = false").unwrap();
        assert!(features.strict);
        assert!(!features.vscode);
        assert!(features.cspell);
        assert!(!features.circleci);
    }
}

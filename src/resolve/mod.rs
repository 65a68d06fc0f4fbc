//! Turns what the user asked for plus what the environment reported into a
//! [`Configuration`].

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex_lite::Regex;

use crate::config::{Configuration, Features, Identity, PackageManager, DEFAULT_DESCRIPTION};
use crate::error::{Result, StarterError};
use crate::template::TemplateSource;

/// npm's hard limit on package name length.
pub const MAX_NAME_LENGTH: usize = 214;

pub const INVALID_NAME_MESSAGE: &str = "Name should be in-kebab-case (for npm)";

const NAME_PATTERN: &str = r"^(?:@[a-z0-9][a-z0-9._]*(?:-[a-z0-9._]+)*/)?[a-z0-9][a-z0-9._]*(?:-[a-z0-9._]+)*$";

static NAME_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn name_pattern() -> Option<&'static Regex> {
    NAME_RE.get_or_init(|| Regex::new(NAME_PATTERN).ok()).as_ref()
}

/// Selections given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgOptions {
    pub project_name: String,
    pub description: String,
    pub package_manager: PackageManager,
    pub features: Features,
    pub install: bool,
}

impl ArgOptions {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            description: DEFAULT_DESCRIPTION.to_string(),
            package_manager: PackageManager::default(),
            features: Features::default(),
            install: true,
        }
    }
}

/// Selections collected by the interactive prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answers {
    pub project_name: String,
    pub description: String,
    pub package_manager: PackageManager,
    pub features: Features,
    /// Not asked; carried over from `--no-install`.
    pub install: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    Args(ArgOptions),
    Answers(Answers),
}

impl UserInput {
    pub fn project_name(&self) -> &str {
        match self {
            UserInput::Args(args) => &args.project_name,
            UserInput::Answers(answers) => &answers.project_name,
        }
    }
}

/// Facts probed from the machine the generator runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub identity: Identity,
    pub template: TemplateSource,
    pub license_year: i32,
    pub working_directory: PathBuf,
}

/// Check a project name against npm's naming rules.
pub fn validate_name(name: &str) -> std::result::Result<(), String> {
    let valid = !name.is_empty()
        && name.len() <= MAX_NAME_LENGTH
        && name_pattern().is_some_and(|re| re.is_match(name));
    if valid {
        Ok(())
    } else {
        Err(INVALID_NAME_MESSAGE.to_string())
    }
}

/// Everything that can reject a project name before any work starts: npm
/// naming rules, then a collision inside `working_directory`.
pub fn validate(name: &str, working_directory: &Path) -> Result<()> {
    validate_name(name).map_err(|message| StarterError::InvalidName {
        name: name.to_string(),
        message,
    })?;
    let path = working_directory.join(name);
    if path.exists() {
        return Err(StarterError::PathExists {
            name: name.to_string(),
            path,
        });
    }
    Ok(())
}

pub fn resolve(input: UserInput, environment: Environment) -> Result<Configuration> {
    let (project_name, description, package_manager, features, install) = match input {
        UserInput::Args(args) => (
            args.project_name,
            args.description,
            args.package_manager,
            args.features,
            args.install,
        ),
        UserInput::Answers(answers) => (
            answers.project_name,
            answers.description,
            answers.package_manager,
            answers.features,
            answers.install,
        ),
    };

    let project_name = project_name.trim().to_string();
    validate(&project_name, &environment.working_directory)?;

    let description = match description.trim() {
        "" => DEFAULT_DESCRIPTION.to_string(),
        given => given.to_string(),
    };

    Ok(Configuration::new(
        project_name,
        description,
        package_manager,
        features,
        install,
        environment.identity,
        environment.template,
        environment.license_year,
        environment.working_directory,
    ))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn environment(working_directory: PathBuf) -> Environment {
        Environment {
            identity: Identity::placeholder(),
            template: TemplateSource::default(),
            license_year: 2024,
            working_directory,
        }
    }

    #[rstest]
    #[case("my-lib")]
    #[case("lib2")]
    #[case("a")]
    #[case("my.lib")]
    #[case("my_lib-two")]
    #[case("@scope/my-lib")]
    fn accepts_npm_names(#[case] name: &str) {
        assert!(validate_name(name).is_ok(), "{name} should be valid");
    }

    #[rstest]
    #[case("")]
    #[case("MyLib")]
    #[case("my lib")]
    #[case("-my-lib")]
    #[case("my-lib-")]
    #[case("my--lib")]
    #[case(".hidden")]
    #[case("_private")]
    #[case("@scope")]
    #[case("@/my-lib")]
    #[case("../escape")]
    fn rejects_invalid_names(#[case] name: &str) {
        assert_eq!(validate_name(name), Err(INVALID_NAME_MESSAGE.to_string()));
    }

    #[test]
    fn name_pattern_is_compiled_once() {
        let first = name_pattern().unwrap();
        let second = name_pattern().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn rejects_overlong_names() {
        let name = "a".repeat(MAX_NAME_LENGTH + 1);
        assert!(validate_name(&name).is_err());
        assert!(validate_name(&name[1..]).is_ok());
    }

    #[test]
    fn args_resolve_with_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = resolve(
            UserInput::Args(ArgOptions::new("  my-lib ")),
            environment(tmp.path().to_path_buf()),
        )
        .unwrap();
        assert_eq!(config.project_name(), "my-lib");
        assert_eq!(config.description(), DEFAULT_DESCRIPTION);
        assert_eq!(config.package_manager(), PackageManager::Npm);
        assert_eq!(config.features(), &Features::default());
        assert!(config.install());
        assert_eq!(config.project_dir(), tmp.path().join("my-lib"));
        assert_eq!(config.license_year(), 2024);
    }

    #[test]
    fn answers_keep_selected_values() {
        let tmp = tempfile::tempdir().unwrap();
        let answers = Answers {
            project_name: "web-thing".into(),
            description: "runs in browsers".into(),
            package_manager: PackageManager::Yarn,
            features: Features {
                dom: true,
                ..Features::default()
            },
            install: false,
        };
        let config = resolve(
            UserInput::Answers(answers),
            environment(tmp.path().to_path_buf()),
        )
        .unwrap();
        assert_eq!(config.description(), "runs in browsers");
        assert_eq!(config.package_manager(), PackageManager::Yarn);
        assert!(config.features().dom);
        assert!(!config.install());
    }

    #[test]
    fn invalid_name_is_reported_with_message() {
        let tmp = tempfile::tempdir().unwrap();
        let err = resolve(
            UserInput::Args(ArgOptions::new("Bad Name")),
            environment(tmp.path().to_path_buf()),
        )
        .unwrap_err();
        assert!(matches!(err, StarterError::InvalidName { .. }));
        assert_eq!(err.to_string(), INVALID_NAME_MESSAGE);
    }

    #[test]
    fn existing_directory_is_a_collision() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("taken")).unwrap();
        let err = resolve(
            UserInput::Args(ArgOptions::new("taken")),
            environment(tmp.path().to_path_buf()),
        )
        .unwrap_err();
        assert!(matches!(err, StarterError::PathExists { .. }));
        assert_eq!(
            err.to_string(),
            "The \"taken\" path already exists in this directory."
        );
    }

    #[test]
    fn validate_checks_rules_before_collisions() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("taken")).unwrap();
        assert!(validate("fresh", tmp.path()).is_ok());
        assert!(matches!(
            validate("taken", tmp.path()),
            Err(StarterError::PathExists { .. })
        ));
        assert!(matches!(
            validate("Taken", tmp.path()),
            Err(StarterError::InvalidName { .. })
        ));
    }

    #[test]
    fn user_input_exposes_project_name() {
        assert_eq!(UserInput::Args(ArgOptions::new("my-lib")).project_name(), "my-lib");
    }

    #[test]
    fn existing_file_is_also_a_collision() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("taken"), "x").unwrap();
        let result = resolve(
            UserInput::Args(ArgOptions::new("taken")),
            environment(tmp.path().to_path_buf()),
        );
        assert!(matches!(result, Err(StarterError::PathExists { .. })));
    }
}

use std::fmt;
use std::path::Path;

use inquire::validator::{ErrorMessage, Validation};
use inquire::{MultiSelect, Select, Text};

use crate::config::{Features, PackageManager};
use crate::error::{Result, StarterError};
use crate::resolve::{validate, Answers, ArgOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    NodeApplication,
    Library,
}

impl ProjectKind {
    pub const ALL: [ProjectKind; 2] = [ProjectKind::NodeApplication, ProjectKind::Library];
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProjectKind::NodeApplication => "Node.js application",
            ProjectKind::Library => "Javascript library",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDefinitions {
    None,
    Node,
    Dom,
    Both,
}

impl TypeDefinitions {
    pub const ALL: [TypeDefinitions; 4] = [
        TypeDefinitions::None,
        TypeDefinitions::Node,
        TypeDefinitions::Dom,
        TypeDefinitions::Both,
    ];

    /// `(node, dom)` feature flags for this choice.
    pub fn flags(self) -> (bool, bool) {
        match self {
            TypeDefinitions::None => (false, false),
            TypeDefinitions::Node => (true, false),
            TypeDefinitions::Dom => (false, true),
            TypeDefinitions::Both => (true, true),
        }
    }
}

impl fmt::Display for TypeDefinitions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeDefinitions::None => "None (the library is platform-independent)",
            TypeDefinitions::Node => "Node.js (parts of the library require access to Node.js globals or built-in modules)",
            TypeDefinitions::Dom => "DOM (parts of the library require access to the Document Object Model)",
            TypeDefinitions::Both => "Both Node.js and DOM (some parts use Node.js globals, others use the DOM)",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extra {
    Strict,
    Functional,
    Cspell,
    Editorconfig,
    Vscode,
    Circleci,
    Appveyor,
    Travis,
}

impl Extra {
    pub const ALL: [Extra; 8] = [
        Extra::Strict,
        Extra::Functional,
        Extra::Cspell,
        Extra::Editorconfig,
        Extra::Vscode,
        Extra::Circleci,
        Extra::Appveyor,
        Extra::Travis,
    ];

    pub fn enabled_in(self, features: &Features) -> bool {
        match self {
            Extra::Strict => features.strict,
            Extra::Functional => features.functional,
            Extra::Cspell => features.cspell,
            Extra::Editorconfig => features.editorconfig,
            Extra::Vscode => features.vscode,
            Extra::Circleci => features.circleci,
            Extra::Appveyor => features.appveyor,
            Extra::Travis => features.travis,
        }
    }

    fn set(self, features: &mut Features, on: bool) {
        let flag = match self {
            Extra::Strict => &mut features.strict,
            Extra::Functional => &mut features.functional,
            Extra::Cspell => &mut features.cspell,
            Extra::Editorconfig => &mut features.editorconfig,
            Extra::Vscode => &mut features.vscode,
            Extra::Circleci => &mut features.circleci,
            Extra::Appveyor => &mut features.appveyor,
            Extra::Travis => &mut features.travis,
        };
        *flag = on;
    }
}

impl fmt::Display for Extra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Extra::Strict => "Enable stricter type-checking",
            Extra::Functional => "Enable eslint-plugin-functional",
            Extra::Cspell => "Include cspell",
            Extra::Editorconfig => "Include .editorconfig",
            Extra::Vscode => "Include VS Code debugging config",
            Extra::Circleci => "Include CircleCI config",
            Extra::Appveyor => "Include Appveyor (Windows-based CI) config",
            Extra::Travis => "Include Travis CI config",
        })
    }
}

/// Fold the type-definition and extras answers into a feature set.
pub fn features_from(
    kind: ProjectKind,
    definitions: Option<TypeDefinitions>,
    extras: &[Extra],
) -> Features {
    let (node, dom) = match kind {
        ProjectKind::NodeApplication => (true, false),
        ProjectKind::Library => definitions.unwrap_or(TypeDefinitions::None).flags(),
    };
    let mut features = Features {
        node,
        dom,
        ..Features::default()
    };
    for extra in Extra::ALL {
        extra.set(&mut features, extras.contains(&extra));
    }
    features
}

fn cancelled(_: inquire::InquireError) -> StarterError {
    StarterError::PromptCancelled
}

/// Ask for everything the command line did not provide. `defaults` seeds the
/// description, package manager and extras; its project name is ignored.
/// Name prompt verdict: npm rules plus a collision in `working_directory`.
fn name_validation(input: &str, working_directory: &Path) -> Validation {
    match validate(input.trim(), working_directory) {
        Ok(()) => Validation::Valid,
        Err(err) => Validation::Invalid(ErrorMessage::Custom(err.to_string())),
    }
}

pub fn collect_answers(defaults: &ArgOptions, working_directory: &Path) -> Result<Answers> {
    let working_directory = working_directory.to_path_buf();
    let project_name = Text::new("Enter the new package name:")
        .with_validator(move |input: &str| Ok(name_validation(input, &working_directory)))
        .prompt()
        .map_err(cancelled)?;

    let kind = Select::new("What are you making?", ProjectKind::ALL.to_vec())
        .with_starting_cursor(1)
        .prompt()
        .map_err(cancelled)?;

    let description = Text::new("Enter the package description:")
        .with_default(&defaults.description)
        .with_validator(|input: &str| {
            Ok(if input.trim().is_empty() {
                Validation::Invalid(ErrorMessage::Custom(
                    "Description should not be empty".to_string(),
                ))
            } else {
                Validation::Valid
            })
        })
        .prompt()
        .map_err(cancelled)?;

    let managers = vec![PackageManager::Npm, PackageManager::Yarn];
    let cursor = managers
        .iter()
        .position(|m| *m == defaults.package_manager)
        .unwrap_or(0);
    let package_manager = Select::new("Will this project use npm or yarn?", managers)
        .with_starting_cursor(cursor)
        .prompt()
        .map_err(cancelled)?;

    let definitions = match kind {
        ProjectKind::NodeApplication => None,
        ProjectKind::Library => Some(
            Select::new(
                "Which global type definitions do you want to include?",
                TypeDefinitions::ALL.to_vec(),
            )
            .prompt()
            .map_err(cancelled)?,
        ),
    };

    let preselected: Vec<usize> = Extra::ALL
        .iter()
        .enumerate()
        .filter(|(_, extra)| extra.enabled_in(&defaults.features))
        .map(|(i, _)| i)
        .collect();
    let extras = MultiSelect::new("More configuration:", Extra::ALL.to_vec())
        .with_default(&preselected)
        .prompt()
        .map_err(cancelled)?;

    Ok(Answers {
        project_name: project_name.trim().to_string(),
        description: description.trim().to_string(),
        package_manager,
        features: features_from(kind, definitions, &extras),
        install: defaults.install,
    })
}

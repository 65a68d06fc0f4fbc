//! External collaborators: git, the package manager and GitHub.
//!
//! The orchestrator only talks to the [`Tasks`] and [`Probe`] traits so that
//! tests can substitute in-process fakes for the subprocesses.

pub mod git;
pub mod github;
pub mod install;

use std::path::{Path, PathBuf};

use chrono::Datelike;

use crate::config::{Identity, PackageManager};
use crate::error::Result;
use crate::resolve::{self, Environment};
use crate::template::{self, ClonedTemplate, TemplateSource};

/// Side-effecting work performed around the transformation pipeline.
pub trait Tasks {
    fn clone_template(&self, source: &TemplateSource, destination: &Path)
        -> Result<ClonedTemplate>;
    fn install(&self, package_manager: PackageManager, project_dir: &Path) -> Result<()>;
    fn initial_commit(&self, template_commit: &str, project_dir: &Path) -> Result<()>;
}

/// Read-only questions about the user's environment. Never fails; unknown
/// values come back as placeholders.
pub trait Probe {
    fn identity(&self) -> Identity;
    fn username(&self, email: &str) -> String;
}

/// Runs the real `git`, `npm` and `yarn` binaries.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiveTasks;

impl Tasks for LiveTasks {
    fn clone_template(
        &self,
        source: &TemplateSource,
        destination: &Path,
    ) -> Result<ClonedTemplate> {
        template::clone_template(source, destination)
    }

    fn install(&self, package_manager: PackageManager, project_dir: &Path) -> Result<()> {
        install::install(package_manager, project_dir)
    }

    fn initial_commit(&self, template_commit: &str, project_dir: &Path) -> Result<()> {
        git::initial_commit(template_commit, project_dir)
    }
}

/// Reads git config and queries the GitHub API.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiveProbe;

impl Probe for LiveProbe {
    fn identity(&self) -> Identity {
        git::identity()
    }

    fn username(&self, email: &str) -> String {
        github::lookup_username(email)
    }
}

/// Gather everything the resolver needs from outside the user's answers.
pub fn probe_environment(
    probe: &impl Probe,
    template: TemplateSource,
    working_directory: PathBuf,
) -> Environment {
    let mut identity = probe.identity();
    identity.username = probe.username(&identity.email);
    Environment {
        identity,
        template,
        license_year: chrono::Local::now().year(),
        working_directory,
    }
}

/// Reject a bad or colliding project name before any git or network call,
/// then probe the environment.
pub fn prepare_environment(
    project_name: &str,
    probe: &impl Probe,
    template: TemplateSource,
    working_directory: PathBuf,
) -> Result<Environment> {
    resolve::validate(project_name.trim(), &working_directory)?;
    Ok(probe_environment(probe, template, working_directory))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::config::placeholders;
    use crate::error::StarterError;

    struct FixedProbe;

    impl Probe for FixedProbe {
        fn identity(&self) -> Identity {
            Identity {
                full_name: "Satoshi Nakamoto".into(),
                email: "satoshi@example.com".into(),
                username: placeholders::USERNAME.into(),
            }
        }

        fn username(&self, email: &str) -> String {
            assert_eq!(email, "satoshi@example.com");
            "satoshi".into()
        }
    }

    #[test]
    fn probe_fills_username_from_email() {
        let env = probe_environment(&FixedProbe, TemplateSource::default(), PathBuf::from("/work"));
        assert_eq!(env.identity.username, "satoshi");
        assert_eq!(env.identity.full_name, "Satoshi Nakamoto");
        assert_eq!(env.working_directory, PathBuf::from("/work"));
        assert!(env.license_year >= 2024);
    }

    #[derive(Default)]
    struct CountingProbe {
        calls: Cell<usize>,
    }

    impl Probe for CountingProbe {
        fn identity(&self) -> Identity {
            self.calls.set(self.calls.get() + 1);
            Identity::placeholder()
        }

        fn username(&self, _email: &str) -> String {
            self.calls.set(self.calls.get() + 1);
            placeholders::USERNAME.into()
        }
    }

    #[test]
    fn invalid_name_is_rejected_before_environment_lookup() {
        let tmp = tempfile::tempdir().unwrap();
        let probe = CountingProbe::default();
        let result = prepare_environment(
            "Bad Name",
            &probe,
            TemplateSource::default(),
            tmp.path().to_path_buf(),
        );
        assert!(matches!(result, Err(StarterError::InvalidName { .. })));
        assert_eq!(probe.calls.get(), 0);
    }

    #[test]
    fn colliding_name_is_rejected_before_environment_lookup() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("taken")).unwrap();
        let probe = CountingProbe::default();
        let result = prepare_environment(
            "taken",
            &probe,
            TemplateSource::default(),
            tmp.path().to_path_buf(),
        );
        assert!(matches!(result, Err(StarterError::PathExists { .. })));
        assert_eq!(probe.calls.get(), 0);
    }

    #[test]
    fn valid_name_looks_up_environment_once() {
        let tmp = tempfile::tempdir().unwrap();
        let probe = CountingProbe::default();
        let env = prepare_environment(
            "my-lib",
            &probe,
            TemplateSource::default(),
            tmp.path().to_path_buf(),
        )
        .unwrap();
        assert_eq!(probe.calls.get(), 2);
        assert_eq!(env.working_directory, tmp.path());
    }
}

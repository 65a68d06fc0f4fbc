use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::Configuration;
use crate::error::{Result, StarterError};
use crate::pipeline::{Phase, Pipeline, PipelineObserver, PipelineReport};
use crate::resolve::{resolve, Environment, UserInput};
use crate::tasks::Tasks;

pub const INSTALL_FAILED_MESSAGE: &str = "Installation failed. You'll need to install manually.";

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffolded {
    pub project_dir: PathBuf,
    /// Template commit the project was generated from.
    pub commit_hash: String,
    /// Files in the generated project, excluding `.git` and `node_modules`.
    pub files: usize,
    pub install_failed: bool,
    pub committed: bool,
    pub report: PipelineReport,
}

/// One spinner per pipeline phase.
#[derive(Default)]
pub struct PhaseSpinner {
    current: Option<ProgressBar>,
}

impl PipelineObserver for PhaseSpinner {
    fn phase_started(&mut self, phase: Phase) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.blue} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(phase.label());
        pb.enable_steady_tick(Duration::from_millis(100));
        self.current = Some(pb);
    }

    fn phase_finished(&mut self, phase: Phase) {
        if let Some(pb) = self.current.take() {
            pb.finish_and_clear();
        }
        println!("{} {}", style("✓").green().bold(), phase.label());
    }
}

impl Drop for PhaseSpinner {
    fn drop(&mut self) {
        if let Some(pb) = self.current.take() {
            pb.abandon();
        }
    }
}

fn remove_history(history_dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(history_dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StarterError::Io {
            context: format!("removing template history {}", history_dir.display()),
            source: e,
        }),
    }
}

fn count_files(root: &Path) -> usize {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !matches!(entry.file_name().to_str(), Some(".git" | "node_modules"))
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .count()
}

/// Clone, transform, install and commit with the canonical pipeline.
pub fn scaffold(config: Configuration, tasks: &impl Tasks) -> Result<Scaffolded> {
    scaffold_with(config, tasks, &Pipeline::canonical(), &mut PhaseSpinner::default())
}

/// [`scaffold`] with an explicit pipeline and progress observer.
pub fn scaffold_with(
    config: Configuration,
    tasks: &impl Tasks,
    pipeline: &Pipeline,
    observer: &mut dyn PipelineObserver,
) -> Result<Scaffolded> {
    let project_dir = config.project_dir();
    let source = config.template();

    println!(
        "{} Cloning {} ({})",
        style("==>").cyan().bold(),
        style(&source.repository).cyan(),
        source.branch
    );
    let cloned = tasks.clone_template(source, &project_dir)?;
    info!(commit = %cloned.commit_hash, "template cloned");
    remove_history(&cloned.history_dir)?;

    let report = pipeline.run_observed(&config, &project_dir, observer)?;
    debug!(applied = report.applied(), total = report.steps.len(), "pipeline finished");

    let mut install_failed = false;
    if config.install() {
        println!(
            "{} Installing dependencies with {}",
            style("==>").cyan().bold(),
            config.package_manager()
        );
        if let Err(e) = tasks.install(config.package_manager(), &project_dir) {
            warn!(error = %e, "dependency installation failed");
            eprintln!(
                "{} {}",
                style("warning:").yellow().bold(),
                style(INSTALL_FAILED_MESSAGE).yellow()
            );
            install_failed = true;
        }
    }

    let committed = if config.identity().is_configured() {
        tasks.initial_commit(&cloned.commit_hash, &project_dir)?;
        true
    } else {
        println!(
            "{} Skipping initial commit: no git user.name/user.email configured",
            style("i").blue().bold()
        );
        false
    };

    let files = count_files(&project_dir);
    println!(
        "\n{} Created {} 🎉",
        style("✓").green().bold(),
        style(config.project_name()).cyan()
    );
    println!("  {} files in {}", files, project_dir.display());

    Ok(Scaffolded {
        project_dir,
        commit_hash: cloned.commit_hash,
        files,
        install_failed,
        committed,
        report,
    })
}

/// Resolve the user's input against the environment, then scaffold.
pub fn generate(input: UserInput, environment: Environment, tasks: &impl Tasks) -> Result<Scaffolded> {
    let config = resolve(input, environment)?;
    scaffold(config, tasks)
}

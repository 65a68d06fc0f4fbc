#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum StarterError {
    #[error("{message}")]
    #[diagnostic(help("Use lowercase words separated by dashes, e.g. my-library"))]
    InvalidName { name: String, message: String },

    #[error("The \"{name}\" path already exists in this directory.")]
    #[diagnostic(help("Choose another project name or remove the existing path"))]
    PathExists { name: String, path: PathBuf },

    #[error("Prompt cancelled by user")]
    PromptCancelled,

    #[error("Failed to parse user config {}", path.display())]
    #[diagnostic(help("Check the TOML syntax in your config file"))]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Git is not installed on your PATH. Please install Git and try again.")]
    #[diagnostic(help(
        "For more information, visit: https://git-scm.com/book/en/v2/Getting-Started-Installing-Git"
    ))]
    GitNotFound,

    #[error("Git clone failed for {url}: {reason}")]
    #[diagnostic(help("Check the repository URL, the branch and your network connection"))]
    GitClone { url: String, reason: String },

    #[error("Git rev-parse failed in {}", path.display())]
    GitRevParse { path: PathBuf },

    #[error("Initial commit failed: {reason}")]
    #[diagnostic(help("The project was generated; commit it manually with `git init && git commit`"))]
    GitCommit { reason: String },

    #[error("`{tool}` is not installed on your PATH")]
    #[diagnostic(help("Install the package manager or rerun with --no-install"))]
    ToolNotFound { tool: String },

    #[error("Installation failed. You'll need to install manually.")]
    Install { tool: String, reason: String },

    #[error("Step '{step}' failed on {}", path.display())]
    #[diagnostic(help(
        "The project directory was left partially transformed; remove it before retrying"
    ))]
    Step {
        step: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StarterError>;

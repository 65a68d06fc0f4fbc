//! Generate TypeScript projects from the typescript-starter template.
//!
//! A run resolves the user's selections into a [`config::Configuration`],
//! clones the template, and applies the [`pipeline::Pipeline`] of typed edits
//! that strip or adjust everything the selections leave out.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod pipeline;
pub mod prompt;
pub mod resolve;
pub mod tasks;
pub mod template;

pub use orchestrator::{generate, scaffold, scaffold_with, Scaffolded};

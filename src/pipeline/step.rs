use std::fmt;
use std::path::Path;

use super::ops::{OpError, Operation, StepOutcome};
use crate::config::Configuration;

/// Canonical phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Identity,
    Metadata,
    Cleanup,
    FeatureDeletion,
    Finalize,
    Strictness,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Identity,
        Phase::Metadata,
        Phase::Cleanup,
        Phase::FeatureDeletion,
        Phase::Finalize,
        Phase::Strictness,
    ];

    /// Progress label shown while the phase runs.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Identity => "Updating LICENSE and repository",
            Phase::Metadata => "Updating package.json",
            Phase::Cleanup => "Deleting unnecessary files",
            Phase::FeatureDeletion => "Removing disabled features",
            Phase::Finalize => "Creating README.md",
            Phase::Strictness => "Configuring type-checking",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One conditional mutation: `effect` runs only when `when` holds.
///
/// Both are plain functions of the configuration, so a step can be inspected
/// (which operation would it perform?) without touching the filesystem.
#[derive(Clone, Copy)]
pub struct Step {
    pub name: &'static str,
    pub phase: Phase,
    pub when: fn(&Configuration) -> bool,
    pub effect: fn(&Configuration) -> Operation,
}

impl Step {
    pub fn applies_to(&self, config: &Configuration) -> bool {
        (self.when)(config)
    }

    pub fn operation(&self, config: &Configuration) -> Operation {
        (self.effect)(config)
    }

    pub fn run(&self, config: &Configuration, root: &Path) -> Result<StepOutcome, OpError> {
        if !self.applies_to(config) {
            return Ok(StepOutcome::Skipped);
        }
        self.operation(config).apply(root)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

pub fn always(_: &Configuration) -> bool {
    true
}

pub mod manifest;
pub mod ops;
pub mod step;
pub mod steps;

use std::path::Path;

use tracing::debug;

pub use manifest::{Manifest, ManifestEdit};
pub use ops::{OpError, Operation, StepOutcome};
pub use step::{Phase, Step};

use crate::config::Configuration;
use crate::error::{Result, StarterError};

/// What happened to one step during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub name: &'static str,
    pub phase: Phase,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub steps: Vec<StepReport>,
}

impl PipelineReport {
    pub fn outcome_of(&self, name: &str) -> Option<StepOutcome> {
        self.steps
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.outcome)
    }

    pub fn applied(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.outcome == StepOutcome::Applied)
            .count()
    }
}

/// Hooks for progress reporting while the pipeline runs.
pub trait PipelineObserver {
    fn phase_started(&mut self, _phase: Phase) {}
    fn phase_finished(&mut self, _phase: Phase) {}
    fn step_finished(&mut self, _report: &StepReport) {}
}

impl PipelineObserver for () {}

/// An ordered list of steps applied to a working copy.
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    /// The fixed step order for the typescript-starter template.
    pub fn canonical() -> Self {
        Self::from_steps(steps::canonical())
    }

    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Same pipeline with every step of `phase` removed.
    pub fn without_phase(mut self, phase: Phase) -> Self {
        self.steps.retain(|s| s.phase != phase);
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }

    pub fn run(&self, config: &Configuration, root: &Path) -> Result<PipelineReport> {
        self.run_observed(config, root, &mut ())
    }

    /// Run every step in order. The first I/O failure aborts the run and is
    /// reported with the failing step's name; nothing is rolled back.
    pub fn run_observed(
        &self,
        config: &Configuration,
        root: &Path,
        observer: &mut dyn PipelineObserver,
    ) -> Result<PipelineReport> {
        let mut report = PipelineReport::default();
        let mut current: Option<Phase> = None;

        for step in &self.steps {
            if current != Some(step.phase) {
                if let Some(done) = current {
                    observer.phase_finished(done);
                }
                observer.phase_started(step.phase);
                current = Some(step.phase);
            }

            let outcome = step.run(config, root).map_err(|e| StarterError::Step {
                step: step.name,
                path: e.path,
                source: e.source,
            })?;
            debug!(step = step.name, phase = ?step.phase, ?outcome, "pipeline step");

            let step_report = StepReport {
                name: step.name,
                phase: step.phase,
                outcome,
            };
            observer.step_finished(&step_report);
            report.steps.push(step_report);
        }

        if let Some(done) = current {
            observer.phase_finished(done);
        }

        Ok(report)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::canonical()
    }
}

//! Workflow step vocabulary and ordered execution
//!
//! Steps form a closed enumeration resolved from the persisted step names;
//! anything outside the vocabulary fails with `UnknownStep` rather than
//! being silently skipped. Execution is strictly ordered with no rollback:
//! the first non-zero status stops the run and becomes the overall result.

use crate::errors::{Result, WorkflowError};
use std::fmt;
use tracing::{debug, info};

/// One named unit of the fixed testing lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Remove the working image
    Destroy,
    /// Build the base image used for testing
    Create,
    /// Run the provisioner against a fresh container
    Provision,
    /// Run the verifier against a fresh container
    Verify,
}

impl Step {
    /// Stored (lowercase) name of this step.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Destroy => "destroy",
            Self::Create => "create",
            Self::Provision => "provision",
            Self::Verify => "verify",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Step {
    type Err = crate::errors::RoleboxError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "destroy" => Ok(Self::Destroy),
            "create" => Ok(Self::Create),
            "provision" => Ok(Self::Provision),
            "verify" => Ok(Self::Verify),
            _ => Err(WorkflowError::UnknownStep {
                name: s.to_string(),
            }
            .into()),
        }
    }
}

/// Resolve a stored step list, failing on the first unknown name.
///
/// An unknown name indicates a corrupted or hand-edited configuration, so
/// nothing runs in that case.
pub fn parse_steps(names: &[String]) -> Result<Vec<Step>> {
    names.iter().map(|name| name.parse()).collect()
}

/// Execute `steps` strictly in order through the caller's dispatcher.
///
/// Stops at the first step returning a non-zero status and returns that
/// status; returns 0 when every step succeeds. Order is preserved exactly
/// as given: no reordering, no deduplication, no parallelism, no rollback
/// of already-executed steps.
pub fn run<E, F>(steps: &[Step], mut run_step: F) -> std::result::Result<i32, E>
where
    F: FnMut(Step) -> std::result::Result<i32, E>,
{
    for step in steps {
        debug!("Running workflow step: {step}");
        let code = run_step(*step)?;
        if code != 0 {
            info!("Workflow step {step} failed with exit code {code}");
            return Ok(code);
        }
    }
    Ok(0)
}

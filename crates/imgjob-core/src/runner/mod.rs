//! Runner abstraction: how a [`JobSpec`] actually gets executed.
//!
//! Concrete runners live in `imgjob-exec` and are plugged into the router.
mod error;
pub use error::RunnerError;

mod context;
pub use context::RunContext;

mod outcome;
pub use outcome::JobOutcome;

mod id;
pub use id::make_run_id;

use async_trait::async_trait;
use imgjob_model::JobSpec;
use tokio_util::sync::CancellationToken;

/// Executes a job in one particular way (submit to a scheduler, run in
/// place, ...).
#[async_trait]
pub trait Runner: Send + Sync {
    /// Runner name used in logs.
    fn name(&self) -> &'static str;

    /// Returns `true` if this runner can handle `spec`.
    fn supports(&self, spec: &JobSpec) -> bool;

    /// Run the job to the point this runner is responsible for.
    ///
    /// Cancelling `cancel` must stop any child process that is still running.
    async fn run(
        &self,
        spec: &JobSpec,
        ctx: &RunContext,
        cancel: CancellationToken,
    ) -> Result<JobOutcome, RunnerError>;
}

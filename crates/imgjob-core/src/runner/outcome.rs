use std::path::PathBuf;

use imgjob_model::JobId;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The scheduler accepted the job.
    Submitted {
        job_id: JobId,
        /// Scheduler log path with the job id substituted.
        log: PathBuf,
    },
    /// The build tool exited 0.
    Built { image: PathBuf },
}

//! Child-process plumbing shared by the runners.
//!
//! Two ways to run a command:
//! - [`run_captured`] collects stdout/stderr, for short tool calls whose
//!   output is parsed (the scheduler's submit command)
//! - [`run_streamed`] lets a long-running command write through, either
//!   inherited or forwarded line by line into tracing
//!
//! Both kill the child when the cancellation token fires.
mod task;
pub use task::SubprocessConfig;

mod logger;
pub use logger::LogConfig;

mod run;
pub use run::{CapturedOutput, describe_status, run_captured, run_streamed, status_code};

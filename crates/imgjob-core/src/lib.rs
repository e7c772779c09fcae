pub mod error;
pub mod router;
pub mod runner;
pub mod script;

pub mod prelude {
    pub use crate::error::CoreError;
    pub use crate::router::RunnerRouter;
    pub use crate::runner::{JobOutcome, RunContext, Runner, RunnerError};
    pub use crate::script::{Directives, ScriptError, parse_directives, render};
}

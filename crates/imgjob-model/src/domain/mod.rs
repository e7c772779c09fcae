mod kv;
pub use kv::KeyValue;

mod env;
pub use env::Env;

mod flag;
pub use flag::Flag;

mod constants;
pub use constants::{
    DEFAULT_BUILD_SUBCOMMAND, DEFAULT_BUILD_TOOL, DEFAULT_DEFINITION, DEFAULT_IMAGE,
    DEFAULT_JOB_NAME, DEFAULT_OUTPUT, DEFAULT_PARTITION, DEFAULT_TASKS_PER_NODE,
};

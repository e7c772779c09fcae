mod error;
pub use error::ExecError;

mod prepare;

pub mod subprocess;

#[cfg(feature = "local")]
pub mod local;

#[cfg(feature = "slurm")]
pub mod slurm;

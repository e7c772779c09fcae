use imgjob_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("missing directive: --{0}")]
    MissingDirective(&'static str),

    #[error("invalid value for --{key}: {source}")]
    InvalidValue {
        key: &'static str,
        #[source]
        source: ModelError,
    },

    #[error("malformed directive on line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

//! CLI error types.

use bladefmt_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} file(s) would be reformatted or could not be formatted")]
    Check(usize),

    #[error("{0} file(s) could not be processed")]
    Failed(usize),

    #[error("{0}")]
    Validation(String),
}

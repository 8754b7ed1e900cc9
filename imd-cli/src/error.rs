use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Configuration error (missing credentials, unreadable config file)
    #[error("Config error: {0}")]
    Config(String),

    /// Master sheet could not be read or parsed
    #[error("{0}")]
    Csv(#[from] imd_catalog::MasterCsvError),

    /// Backend could not be opened or constructed
    #[error("Database error: {0}")]
    Database(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }
}

//! CLI error types and conversions

use crate::driver::DriverError;
use crate::fetcher::FetcherError;
use crate::output::OutputError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Credential verification failure
    #[error("credential error: {0}")]
    CredentialError(String),

    /// Fetcher error
    #[error("fetcher error: {0}")]
    FetcherError(#[from] FetcherError),

    /// Driver error
    #[error("driver error: {0}")]
    DriverError(#[from] DriverError),

    /// Output error
    #[error("output error: {0}")]
    OutputError(#[from] OutputError),
}

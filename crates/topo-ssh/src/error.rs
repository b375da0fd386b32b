use std::string::FromUtf8Error;
use thiserror::Error;

/// Error kind returned by the SSH session layer.
#[derive(Debug, Error)]
pub enum SshError {
    #[error("error while establishing the connection to {0}: {1}")]
    Setup(String, russh::Error),
    #[error("authentication rejected for {0}")]
    AuthRejected(String),
    #[error("timeout while connecting to {0}")]
    ConnectTimeout(String),
    #[error("ssh transport error: {0}")]
    Transport(#[from] russh::Error),
    #[error("command on {0} exited with status {1}")]
    CommandFailure(String, u32),
    #[error("failed to chain through jump host {0} after {1} attempts")]
    ChainFailure(String, u32),
    #[error("missing credentials for hop {0}")]
    MissingCredentials(String),
    #[error("cannot parse remote output as UTF-8: {0}")]
    FromUtf8(#[from] FromUtf8Error),
}

//! Error types for the devnet launcher.

use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the launcher's own layers.
///
/// External-process failures carry the command name and captured stderr;
/// artifact failures carry the offending path. Transport errors are retried
/// by the readiness prober and fatal everywhere else.
#[derive(Debug, Error)]
pub enum DevnetError {
    /// RPC/network failure talking to a node.
    #[error("transport error: {0}")]
    Transport(#[from] jsonrpsee::core::ClientError),

    /// Bounded-retry exhaustion or a command deadline exceeded.
    #[error("timed out waiting for {what}")]
    Timeout {
        /// What was being waited on.
        what: String,
        /// Attempts made before giving up.
        attempts: u64,
    },

    /// The external contract-deployment tool failed.
    #[error("deployment failed: {0}")]
    Deployment(String),

    /// An external command exited non-zero.
    #[error("command `{name}` exited with status {code:?}: {stderr}")]
    Command {
        /// Logical name of the command.
        name: String,
        /// Exit code, if the process exited normally.
        code: Option<i32>,
        /// Captured stderr, empty when the stream was inherited.
        stderr: String,
    },

    /// An external command could not be started at all.
    #[error("failed to spawn `{name}`: {source}")]
    Spawn {
        /// Logical name of the command.
        name: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Artifact file could not be read or written.
    #[error("{}: {source}", .path.display())]
    Io {
        /// Path of the artifact.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Artifact file held malformed JSON.
    #[error("{}: {source}", .path.display())]
    Parse {
        /// Path of the artifact.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// The address book has no entry for a required contract.
    #[error("missing contract address for `{0}`")]
    MissingContract(String),

    /// Bearer token could not be signed.
    #[error("auth token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// An endpoint URL could not be parsed or lacks a port.
    #[error("invalid endpoint `{0}`")]
    InvalidEndpoint(String),
}

impl DevnetError {
    /// True when this error is a timeout, in any of its forms.
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

//! Error types for the PSI protocol.

use std::io;

/// Errors that can occur during PSI protocol execution.
#[derive(Debug, thiserror::Error)]
pub enum PsiError {
    /// The pairing group or the common parameters could not be set up.
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// Connect, bind, accept, send or receive failed, including short reads.
    #[error("Transport error: {0}")]
    Transport(#[from] io::Error),

    /// The peer runs with different set sizes or common parameters.
    #[error("Protocol mismatch on {field}: expected {expected}, got {actual}")]
    ProtocolMismatch {
        field: &'static str,
        expected: String,
        actual: String,
    },

    /// The readiness token did not match.
    #[error("Invalid readiness token")]
    InvalidToken,

    /// A value the protocol requires to be valid was not (zero nonce, zero randomizer).
    #[error("Protocol precondition violated: {0}")]
    Precondition(String),

    /// A group element received from the peer could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A cryptographic operation failed.
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// An item given as bytes was empty.
    #[error("Input data cannot be empty")]
    EmptyInput,
}

impl PsiError {
    pub(crate) fn mismatch(
        field: &'static str,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        PsiError::ProtocolMismatch {
            field,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Returns true for errors raised by the byte stream rather than by the protocol.
    pub fn is_transport(&self) -> bool {
        matches!(self, PsiError::Transport(_))
    }
}

/// Result type for PSI operations.
pub type Result<T> = std::result::Result<T, PsiError>;

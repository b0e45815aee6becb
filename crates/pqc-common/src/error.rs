use crate::backend::BackendFault;
use crate::id::Family;
use std::fmt;
use thiserror::Error;

/// Which caller-supplied buffer a size check was applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    PublicKey,
    PrivateKey,
    Ciphertext,
    SharedSecret,
    Signature,
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BufferKind::PublicKey => "public key",
            BufferKind::PrivateKey => "private key",
            BufferKind::Ciphertext => "ciphertext",
            BufferKind::SharedSecret => "shared secret",
            BufferKind::Signature => "signature",
        };
        f.write_str(name)
    }
}

/// The dispatch operation that was running when a backend reported a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Keygen,
    Encapsulate,
    Decapsulate,
    Sign,
    Verify,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Keygen => "keygen",
            Operation::Encapsulate => "encapsulate",
            Operation::Decapsulate => "decapsulate",
            Operation::Sign => "sign",
            Operation::Verify => "verify",
        };
        f.write_str(name)
    }
}

/// Every failure the registry and dispatch layer can report.
///
/// A rejected signature is not in here: `verify` reports it through
/// [`crate::Verification`] so it can never be mistaken for a fault.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PqcError {
    #[error("Unknown {family} algorithm id: {id}")]
    UnknownAlgorithm { family: Family, id: u8 },

    #[error("Unknown algorithm name: {0}")]
    UnknownName(String),

    #[error("{name} is a {actual} algorithm, not a {expected} algorithm")]
    WrongFamily {
        name: &'static str,
        expected: Family,
        actual: Family,
    },

    #[error("Bad {buffer} buffer for {algorithm}: expected {expected} bytes, got {actual}")]
    BufferSize {
        algorithm: &'static str,
        buffer: BufferKind,
        expected: usize,
        actual: usize,
    },

    #[error("{algorithm} {operation} failed: {fault}")]
    Backend {
        algorithm: &'static str,
        operation: Operation,
        fault: BackendFault,
    },
}

impl PqcError {
    /// True when the failure came from the cryptographic backend rather than
    /// from a caller mistake.
    pub fn is_backend_fault(&self) -> bool {
        matches!(self, PqcError::Backend { .. })
    }
}

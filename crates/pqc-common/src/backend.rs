//! The contract every concrete algorithm implementation has to satisfy.
//!
//! Backends only ever see slices that the dispatch layer has already checked
//! against the descriptor sizes, so an implementation may assume
//! `public_key.len() == public_key_size` and so on. They still report a
//! [`BackendFault`] instead of panicking if that assumption is broken.

use thiserror::Error;

/// A failure inside the cryptographic computation itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendFault {
    #[error("malformed {0}")]
    MalformedInput(&'static str),

    #[error("output needs {needed} bytes but only {capacity} are available")]
    OutputOverflow { needed: usize, capacity: usize },

    #[error("internal fault: {0}")]
    Internal(&'static str),
}

pub type BackendResult<T = ()> = Result<T, BackendFault>;

/// Key-encapsulation backend: one implementation per algorithm.
pub trait KemScheme: Send + Sync {
    /// Writes a fresh key pair into the two buffers.
    fn keygen(&self, public_key: &mut [u8], private_key: &mut [u8]) -> BackendResult;

    /// Writes a ciphertext and the shared secret it encapsulates.
    fn encapsulate(
        &self,
        ciphertext: &mut [u8],
        shared_secret: &mut [u8],
        public_key: &[u8],
    ) -> BackendResult;

    /// Recovers the shared secret. Schemes with implicit rejection return
    /// `Ok` with a pseudorandom secret for a tampered ciphertext.
    fn decapsulate(
        &self,
        shared_secret: &mut [u8],
        ciphertext: &[u8],
        private_key: &[u8],
    ) -> BackendResult;
}

/// Signature backend: one implementation per algorithm.
pub trait SignatureScheme: Send + Sync {
    /// Writes a fresh key pair into the two buffers.
    fn keygen(&self, public_key: &mut [u8], private_key: &mut [u8]) -> BackendResult;

    /// Signs `message` into the front of `signature` and returns the number
    /// of bytes written.
    fn sign(&self, signature: &mut [u8], message: &[u8], private_key: &[u8])
        -> BackendResult<usize>;

    /// `Ok(true)` accepts, `Ok(false)` rejects. `Err` is reserved for faults.
    fn verify(&self, signature: &[u8], message: &[u8], public_key: &[u8]) -> BackendResult<bool>;
}

/// Copies `src` into `dst`, refusing to truncate or to leave bytes unwritten.
pub fn write_exact(dst: &mut [u8], src: &[u8]) -> BackendResult {
    if dst.len() != src.len() {
        return Err(BackendFault::OutputOverflow {
            needed: src.len(),
            capacity: dst.len(),
        });
    }
    dst.copy_from_slice(src);
    Ok(())
}

/// Copies `src` into the front of `dst` and returns how many bytes were used.
pub fn write_prefix(dst: &mut [u8], src: &[u8]) -> BackendResult<usize> {
    if src.len() > dst.len() {
        return Err(BackendFault::OutputOverflow {
            needed: src.len(),
            capacity: dst.len(),
        });
    }
    dst[..src.len()].copy_from_slice(src);
    Ok(src.len())
}

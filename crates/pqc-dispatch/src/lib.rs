//! Uniform dispatch over post-quantum KEMs and signature schemes.
//!
//! ```rust,ignore
//! use pqc_dispatch::{dispatch, registry};
//! use pqc_common::KemId;
//!
//! let kem = registry::kem(KemId::Kyber768);
//! let keys = pqc_dispatch::generate_keypair(kem)?;
//! let enc = pqc_dispatch::encapsulate_owned(kem, keys.public_key())?;
//! let secret = pqc_dispatch::decapsulate_owned(kem, &enc.ciphertext, keys.private_key())?;
//! assert_eq!(enc.shared_secret, secret);
//! ```

pub mod dispatch;
pub mod kem;
pub mod keys;
pub mod registry;
pub mod sign;
#[cfg(test)]
mod tests;

pub use keys::{
    decapsulate_owned, encapsulate_owned, generate_keypair, sign_owned, Encapsulation, KeyPair,
};
pub use registry::{kem_by_id, lookup, lookup_name, sig_by_id};

// Re-export the data model so callers need a single dependency.
pub use pqc_common::{
    Algorithm, AlgorithmRef, Family, KemDescriptor, KemId, PqcError, SigId, SignatureDescriptor,
    Verification, KEM_COUNT, SIG_COUNT,
};

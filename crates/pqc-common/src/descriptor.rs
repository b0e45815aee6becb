use crate::backend::{BackendResult, KemScheme, SignatureScheme};
use crate::error::PqcError;
use crate::id::Family;
use serde::Serialize;
use std::fmt;

/// Identity and key sizes shared by every algorithm, whatever its family.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmInfo {
    id: u8,
    name: &'static str,
    public_key_size: usize,
    private_key_size: usize,
}

impl AlgorithmInfo {
    pub const fn new(
        id: u8,
        name: &'static str,
        public_key_size: usize,
        private_key_size: usize,
    ) -> Self {
        Self {
            id,
            name,
            public_key_size,
            private_key_size,
        }
    }

    pub const fn id(&self) -> u8 {
        self.id
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn public_key_size(&self) -> usize {
        self.public_key_size
    }

    pub const fn private_key_size(&self) -> usize {
        self.private_key_size
    }
}

/// The family-agnostic view of a descriptor.
///
/// Only identity, key sizes and key generation live here. Anything that
/// exists for one family alone is reachable only through the concrete
/// descriptor type, or fallibly through [`AlgorithmRef`].
pub trait Algorithm {
    fn info(&self) -> &AlgorithmInfo;

    fn family(&self) -> Family;

    fn id(&self) -> u8 {
        self.info().id()
    }

    fn name(&self) -> &'static str {
        self.info().name()
    }

    fn public_key_size(&self) -> usize {
        self.info().public_key_size()
    }

    fn private_key_size(&self) -> usize {
        self.info().private_key_size()
    }

    fn is_kem(&self) -> bool {
        self.family() == Family::Kem
    }

    /// Raw backend key generation, used by the dispatch layer after its
    /// buffer checks. Not part of the public surface.
    #[doc(hidden)]
    fn backend_keygen(&self, public_key: &mut [u8], private_key: &mut [u8]) -> BackendResult;
}

/// A key-encapsulation mechanism: base sizes plus ciphertext and shared
/// secret sizes and the encapsulate/decapsulate backend.
#[derive(Clone, Copy)]
pub struct KemDescriptor {
    info: AlgorithmInfo,
    ciphertext_size: usize,
    shared_secret_size: usize,
    backend: &'static dyn KemScheme,
}

impl KemDescriptor {
    pub const fn new(
        info: AlgorithmInfo,
        ciphertext_size: usize,
        shared_secret_size: usize,
        backend: &'static dyn KemScheme,
    ) -> Self {
        Self {
            info,
            ciphertext_size,
            shared_secret_size,
            backend,
        }
    }

    pub const fn info(&self) -> &AlgorithmInfo {
        &self.info
    }

    pub const fn ciphertext_size(&self) -> usize {
        self.ciphertext_size
    }

    pub const fn shared_secret_size(&self) -> usize {
        self.shared_secret_size
    }

    #[doc(hidden)]
    pub fn backend(&self) -> &'static dyn KemScheme {
        self.backend
    }

    /// All four sizes strictly positive.
    pub const fn sizes_are_valid(&self) -> bool {
        self.info.public_key_size > 0
            && self.info.private_key_size > 0
            && self.ciphertext_size > 0
            && self.shared_secret_size > 0
    }
}

impl Algorithm for KemDescriptor {
    fn info(&self) -> &AlgorithmInfo {
        &self.info
    }

    fn family(&self) -> Family {
        Family::Kem
    }

    fn backend_keygen(&self, public_key: &mut [u8], private_key: &mut [u8]) -> BackendResult {
        self.backend.keygen(public_key, private_key)
    }
}

impl fmt::Debug for KemDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KemDescriptor")
            .field("info", &self.info)
            .field("ciphertext_size", &self.ciphertext_size)
            .field("shared_secret_size", &self.shared_secret_size)
            .finish_non_exhaustive()
    }
}

/// A signature scheme: base sizes plus the signature size bound and the
/// sign/verify backend.
#[derive(Clone, Copy)]
pub struct SignatureDescriptor {
    info: AlgorithmInfo,
    max_signature_size: usize,
    backend: &'static dyn SignatureScheme,
}

impl SignatureDescriptor {
    pub const fn new(
        info: AlgorithmInfo,
        max_signature_size: usize,
        backend: &'static dyn SignatureScheme,
    ) -> Self {
        Self {
            info,
            max_signature_size,
            backend,
        }
    }

    pub const fn info(&self) -> &AlgorithmInfo {
        &self.info
    }

    /// Upper bound on the signature length. Variable-length schemes may
    /// write fewer bytes; `sign` reports the actual count.
    pub const fn max_signature_size(&self) -> usize {
        self.max_signature_size
    }

    #[doc(hidden)]
    pub fn backend(&self) -> &'static dyn SignatureScheme {
        self.backend
    }

    pub const fn sizes_are_valid(&self) -> bool {
        self.info.public_key_size > 0
            && self.info.private_key_size > 0
            && self.max_signature_size > 0
    }
}

impl Algorithm for SignatureDescriptor {
    fn info(&self) -> &AlgorithmInfo {
        &self.info
    }

    fn family(&self) -> Family {
        Family::Signature
    }

    fn backend_keygen(&self, public_key: &mut [u8], private_key: &mut [u8]) -> BackendResult {
        self.backend.keygen(public_key, private_key)
    }
}

impl fmt::Debug for SignatureDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureDescriptor")
            .field("info", &self.info)
            .field("max_signature_size", &self.max_signature_size)
            .finish_non_exhaustive()
    }
}

/// A descriptor of either family, for code that enumerates or looks up
/// algorithms without knowing the family up front.
#[derive(Debug, Clone, Copy)]
pub enum AlgorithmRef {
    Kem(&'static KemDescriptor),
    Signature(&'static SignatureDescriptor),
}

impl AlgorithmRef {
    pub fn as_kem(&self) -> Option<&'static KemDescriptor> {
        match *self {
            AlgorithmRef::Kem(kem) => Some(kem),
            AlgorithmRef::Signature(_) => None,
        }
    }

    pub fn as_signature(&self) -> Option<&'static SignatureDescriptor> {
        match *self {
            AlgorithmRef::Signature(sig) => Some(sig),
            AlgorithmRef::Kem(_) => None,
        }
    }

    pub fn expect_kem(&self) -> Result<&'static KemDescriptor, PqcError> {
        self.as_kem().ok_or_else(|| self.wrong_family(Family::Kem))
    }

    pub fn expect_signature(&self) -> Result<&'static SignatureDescriptor, PqcError> {
        self.as_signature()
            .ok_or_else(|| self.wrong_family(Family::Signature))
    }

    pub fn ciphertext_size(&self) -> Result<usize, PqcError> {
        self.expect_kem().map(|kem| kem.ciphertext_size())
    }

    pub fn shared_secret_size(&self) -> Result<usize, PqcError> {
        self.expect_kem().map(|kem| kem.shared_secret_size())
    }

    pub fn signature_size(&self) -> Result<usize, PqcError> {
        self.expect_signature().map(|sig| sig.max_signature_size())
    }

    pub fn summary(&self) -> AlgorithmSummary {
        AlgorithmSummary {
            id: self.id(),
            name: self.name(),
            family: self.family(),
            public_key_size: self.public_key_size(),
            private_key_size: self.private_key_size(),
            ciphertext_size: self.as_kem().map(|kem| kem.ciphertext_size()),
            shared_secret_size: self.as_kem().map(|kem| kem.shared_secret_size()),
            max_signature_size: self.as_signature().map(|sig| sig.max_signature_size()),
        }
    }

    fn wrong_family(&self, expected: Family) -> PqcError {
        PqcError::WrongFamily {
            name: self.name(),
            expected,
            actual: self.family(),
        }
    }
}

impl Algorithm for AlgorithmRef {
    fn info(&self) -> &AlgorithmInfo {
        match self {
            AlgorithmRef::Kem(kem) => kem.info(),
            AlgorithmRef::Signature(sig) => sig.info(),
        }
    }

    fn family(&self) -> Family {
        match self {
            AlgorithmRef::Kem(_) => Family::Kem,
            AlgorithmRef::Signature(_) => Family::Signature,
        }
    }

    fn backend_keygen(&self, public_key: &mut [u8], private_key: &mut [u8]) -> BackendResult {
        match self {
            AlgorithmRef::Kem(kem) => kem.backend_keygen(public_key, private_key),
            AlgorithmRef::Signature(sig) => sig.backend_keygen(public_key, private_key),
        }
    }
}

impl From<&'static KemDescriptor> for AlgorithmRef {
    fn from(kem: &'static KemDescriptor) -> Self {
        AlgorithmRef::Kem(kem)
    }
}

impl From<&'static SignatureDescriptor> for AlgorithmRef {
    fn from(sig: &'static SignatureDescriptor) -> Self {
        AlgorithmRef::Signature(sig)
    }
}

/// Flat, serializable view of a descriptor (used for listings).
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmSummary {
    pub id: u8,
    pub name: &'static str,
    pub family: Family,
    pub public_key_size: usize,
    pub private_key_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ciphertext_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_secret_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_signature_size: Option<usize>,
}

/// Outcome of a signature check. Rejection is a normal result, not an error.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Accepted,
    Rejected,
}

impl Verification {
    pub fn is_accepted(self) -> bool {
        self == Verification::Accepted
    }
}

impl From<bool> for Verification {
    fn from(accepted: bool) -> Self {
        if accepted {
            Verification::Accepted
        } else {
            Verification::Rejected
        }
    }
}

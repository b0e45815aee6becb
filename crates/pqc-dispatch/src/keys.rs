//! Owned, correctly sized buffers on top of the slice API.
//!
//! Secret material (private keys, shared secrets) lives in `Zeroizing`
//! vectors and is wiped on drop.

use crate::dispatch;
use pqc_common::{Algorithm, KemDescriptor, PqcError, SignatureDescriptor};
use std::fmt;
use zeroize::Zeroizing;

pub struct KeyPair {
    public_key: Vec<u8>,
    private_key: Zeroizing<Vec<u8>>,
}

impl KeyPair {
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }

    pub fn into_parts(self) -> (Vec<u8>, Zeroizing<Vec<u8>>) {
        (self.public_key, self.private_key)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key_len", &self.public_key.len())
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Ciphertext to send, plus the shared secret to keep.
pub struct Encapsulation {
    pub ciphertext: Vec<u8>,
    pub shared_secret: Zeroizing<Vec<u8>>,
}

impl fmt::Debug for Encapsulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encapsulation")
            .field("ciphertext_len", &self.ciphertext.len())
            .field("shared_secret", &"<redacted>")
            .finish()
    }
}

pub fn generate_keypair<A: Algorithm + ?Sized>(alg: &A) -> Result<KeyPair, PqcError> {
    let mut public_key = vec![0u8; alg.public_key_size()];
    let mut private_key = Zeroizing::new(vec![0u8; alg.private_key_size()]);
    dispatch::keygen(alg, &mut public_key, &mut private_key)?;
    Ok(KeyPair {
        public_key,
        private_key,
    })
}

pub fn encapsulate_owned(
    kem: &KemDescriptor,
    public_key: &[u8],
) -> Result<Encapsulation, PqcError> {
    let mut ciphertext = vec![0u8; kem.ciphertext_size()];
    let mut shared_secret = Zeroizing::new(vec![0u8; kem.shared_secret_size()]);
    dispatch::encapsulate(kem, &mut ciphertext, &mut shared_secret, public_key)?;
    Ok(Encapsulation {
        ciphertext,
        shared_secret,
    })
}

pub fn decapsulate_owned(
    kem: &KemDescriptor,
    ciphertext: &[u8],
    private_key: &[u8],
) -> Result<Zeroizing<Vec<u8>>, PqcError> {
    let mut shared_secret = Zeroizing::new(vec![0u8; kem.shared_secret_size()]);
    dispatch::decapsulate(kem, &mut shared_secret, ciphertext, private_key)?;
    Ok(shared_secret)
}

/// Signs and returns a vector trimmed to the actual signature length.
pub fn sign_owned(
    sig: &SignatureDescriptor,
    message: &[u8],
    private_key: &[u8],
) -> Result<Vec<u8>, PqcError> {
    let mut signature = vec![0u8; sig.max_signature_size()];
    let len = dispatch::sign(sig, &mut signature, message, private_key)?;
    signature.truncate(len);
    Ok(signature)
}

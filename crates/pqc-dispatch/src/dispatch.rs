//! The algorithm-agnostic operations.
//!
//! Every call checks the caller's buffers against the descriptor before the
//! backend runs, so a backend never sees a slice of the wrong size. Faults
//! are returned as they are; nothing here retries.

use pqc_common::{
    Algorithm, BackendFault, BufferKind, KemDescriptor, Operation, PqcError, SignatureDescriptor,
    Verification,
};
use tracing::{debug, trace};

/// Generates a key pair into `public_key` and `private_key`, which must be
/// exactly `public_key_size` and `private_key_size` bytes long.
pub fn keygen<A: Algorithm + ?Sized>(
    alg: &A,
    public_key: &mut [u8],
    private_key: &mut [u8],
) -> Result<(), PqcError> {
    let name = alg.name();
    check_exact(name, BufferKind::PublicKey, alg.public_key_size(), public_key.len())?;
    check_exact(name, BufferKind::PrivateKey, alg.private_key_size(), private_key.len())?;

    alg.backend_keygen(public_key, private_key)
        .map_err(|fault| backend_fault(name, Operation::Keygen, fault))
}

/// Encapsulates a fresh shared secret to `public_key`.
pub fn encapsulate(
    kem: &KemDescriptor,
    ciphertext: &mut [u8],
    shared_secret: &mut [u8],
    public_key: &[u8],
) -> Result<(), PqcError> {
    let name = kem.name();
    check_exact(name, BufferKind::Ciphertext, kem.ciphertext_size(), ciphertext.len())?;
    check_exact(
        name,
        BufferKind::SharedSecret,
        kem.shared_secret_size(),
        shared_secret.len(),
    )?;
    check_exact(name, BufferKind::PublicKey, kem.public_key_size(), public_key.len())?;

    kem.backend()
        .encapsulate(ciphertext, shared_secret, public_key)
        .map_err(|fault| backend_fault(name, Operation::Encapsulate, fault))
}

/// Recovers the shared secret from `ciphertext`.
///
/// Whether a tampered ciphertext fails or yields a pseudorandom decoy secret
/// is up to the scheme; the result is passed through unchanged.
pub fn decapsulate(
    kem: &KemDescriptor,
    shared_secret: &mut [u8],
    ciphertext: &[u8],
    private_key: &[u8],
) -> Result<(), PqcError> {
    let name = kem.name();
    check_exact(
        name,
        BufferKind::SharedSecret,
        kem.shared_secret_size(),
        shared_secret.len(),
    )?;
    check_exact(name, BufferKind::Ciphertext, kem.ciphertext_size(), ciphertext.len())?;
    check_exact(name, BufferKind::PrivateKey, kem.private_key_size(), private_key.len())?;

    kem.backend()
        .decapsulate(shared_secret, ciphertext, private_key)
        .map_err(|fault| backend_fault(name, Operation::Decapsulate, fault))
}

/// Signs `message` into `signature` and returns the number of bytes written.
///
/// `signature` needs room for `max_signature_size` bytes. Only the returned
/// prefix is the signature.
pub fn sign(
    sig: &SignatureDescriptor,
    signature: &mut [u8],
    message: &[u8],
    private_key: &[u8],
) -> Result<usize, PqcError> {
    let name = sig.name();
    let max = sig.max_signature_size();
    if signature.len() < max {
        return Err(PqcError::BufferSize {
            algorithm: name,
            buffer: BufferKind::Signature,
            expected: max,
            actual: signature.len(),
        });
    }
    check_exact(name, BufferKind::PrivateKey, sig.private_key_size(), private_key.len())?;

    let written = sig
        .backend()
        .sign(signature, message, private_key)
        .map_err(|fault| backend_fault(name, Operation::Sign, fault))?;

    if written > max {
        return Err(backend_fault(
            name,
            Operation::Sign,
            BackendFault::OutputOverflow {
                needed: written,
                capacity: max,
            },
        ));
    }
    Ok(written)
}

/// Checks `signature` over `message`.
///
/// A bad signature is `Ok(Verification::Rejected)`; `Err` means the check
/// itself could not run (wrong public key size, backend fault).
pub fn verify(
    sig: &SignatureDescriptor,
    signature: &[u8],
    message: &[u8],
    public_key: &[u8],
) -> Result<Verification, PqcError> {
    let name = sig.name();
    check_exact(name, BufferKind::PublicKey, sig.public_key_size(), public_key.len())?;

    // The signature is untrusted input: a wrong length is just an invalid one.
    if signature.is_empty() || signature.len() > sig.max_signature_size() {
        trace!(
            "{}: rejecting signature of {} bytes (max {})",
            name,
            signature.len(),
            sig.max_signature_size()
        );
        return Ok(Verification::Rejected);
    }

    sig.backend()
        .verify(signature, message, public_key)
        .map(Verification::from)
        .map_err(|fault| backend_fault(name, Operation::Verify, fault))
}

pub fn public_key_size<A: Algorithm + ?Sized>(alg: &A) -> usize {
    alg.public_key_size()
}

pub fn private_key_size<A: Algorithm + ?Sized>(alg: &A) -> usize {
    alg.private_key_size()
}

pub fn ciphertext_size(kem: &KemDescriptor) -> usize {
    kem.ciphertext_size()
}

pub fn shared_secret_size(kem: &KemDescriptor) -> usize {
    kem.shared_secret_size()
}

pub fn signature_size(sig: &SignatureDescriptor) -> usize {
    sig.max_signature_size()
}

fn check_exact(
    algorithm: &'static str,
    buffer: BufferKind,
    expected: usize,
    actual: usize,
) -> Result<(), PqcError> {
    if expected == actual {
        return Ok(());
    }
    Err(PqcError::BufferSize {
        algorithm,
        buffer,
        expected,
        actual,
    })
}

fn backend_fault(algorithm: &'static str, operation: Operation, fault: BackendFault) -> PqcError {
    debug!("{} {} fault: {}", algorithm, operation, fault);
    PqcError::Backend {
        algorithm,
        operation,
        fault,
    }
}

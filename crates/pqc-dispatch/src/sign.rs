//! Signature backends over `pqcrypto` detached signatures.
//!
//! Dilithium, ML-DSA and SPHINCS+ always emit their maximum length. Falcon
//! signatures vary per message, so callers must use the length `sign`
//! returns.

use pqc_common::{write_exact, write_prefix, BackendFault, BackendResult, SignatureScheme};
use pqcrypto_dilithium::{dilithium2, dilithium3, dilithium5};
use pqcrypto_falcon::{falcon1024, falcon512};
use pqcrypto_mldsa::{mldsa44, mldsa65, mldsa87};
use pqcrypto_sphincsplus::{
    sphincssha2128fsimple, sphincsshake128fsimple, sphincsshake128ssimple,
};
use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _, SecretKey as _};

macro_rules! sig_backend {
    ($(#[$doc:meta])* $backend:ident => $alg:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $backend;

        impl SignatureScheme for $backend {
            fn keygen(&self, public_key: &mut [u8], private_key: &mut [u8]) -> BackendResult {
                let (pk, sk) = $alg::keypair();
                write_exact(public_key, pk.as_bytes())?;
                write_exact(private_key, sk.as_bytes())
            }

            fn sign(
                &self,
                signature: &mut [u8],
                message: &[u8],
                private_key: &[u8],
            ) -> BackendResult<usize> {
                let sk = $alg::SecretKey::from_bytes(private_key)
                    .map_err(|_| BackendFault::MalformedInput("private key"))?;

                pqc_ct::mark_tainted(sk.as_bytes());
                let sig = $alg::detached_sign(message, &sk);
                pqc_ct::mark_verified(sk.as_bytes());
                pqc_ct::mark_verified(sig.as_bytes());

                write_prefix(signature, sig.as_bytes())
            }

            fn verify(
                &self,
                signature: &[u8],
                message: &[u8],
                public_key: &[u8],
            ) -> BackendResult<bool> {
                let pk = $alg::PublicKey::from_bytes(public_key)
                    .map_err(|_| BackendFault::MalformedInput("public key"))?;
                // An unparseable signature is simply not a valid one.
                let sig = match $alg::DetachedSignature::from_bytes(signature) {
                    Ok(sig) => sig,
                    Err(_) => return Ok(false),
                };
                Ok($alg::verify_detached_signature(&sig, message, &pk).is_ok())
            }
        }
    };
}

sig_backend!(
    /// CRYSTALS-Dilithium, NIST level 2.
    Dilithium2 => dilithium2
);
sig_backend!(Dilithium3 => dilithium3);
sig_backend!(Dilithium5 => dilithium5);
sig_backend!(
    /// FIPS 204 ML-DSA-44.
    MlDsa44 => mldsa44
);
sig_backend!(MlDsa65 => mldsa65);
sig_backend!(MlDsa87 => mldsa87);
sig_backend!(
    /// Falcon-512. Variable-length signatures.
    Falcon512 => falcon512
);
sig_backend!(Falcon1024 => falcon1024);
sig_backend!(
    /// SPHINCS+-SHAKE-128f-simple (stateless hash-based).
    SphincsShake128fSimple => sphincsshake128fsimple
);
sig_backend!(SphincsSha2128fSimple => sphincssha2128fsimple);
sig_backend!(
    /// SPHINCS+-SHAKE-128s-simple. Smaller signatures, much slower signing.
    SphincsShake128sSimple => sphincsshake128ssimple
);

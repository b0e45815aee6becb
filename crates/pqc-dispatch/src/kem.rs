//! KEM backends: thin adapters from the slice contract onto `pqcrypto`.
//!
//! Kyber, ML-KEM, HQC and Classic McEliece all use implicit rejection. A
//! tampered ciphertext decapsulates "successfully" to a pseudorandom secret;
//! it never fails.
//!
//! Classic McEliece keygen needs several hundred KiB of stack. Run it on a
//! thread with a generous stack size.

use pqc_common::{write_exact, BackendFault, BackendResult, KemScheme};
use pqcrypto_classicmceliece::mceliece348864;
use pqcrypto_hqc::hqc128;
use pqcrypto_kyber::{kyber1024, kyber512, kyber768};
use pqcrypto_mlkem::{mlkem1024, mlkem512, mlkem768};
use pqcrypto_traits::kem::{Ciphertext as _, PublicKey as _, SecretKey as _, SharedSecret as _};

macro_rules! kem_backend {
    ($(#[$doc:meta])* $backend:ident => $alg:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $backend;

        impl KemScheme for $backend {
            fn keygen(&self, public_key: &mut [u8], private_key: &mut [u8]) -> BackendResult {
                let (pk, sk) = $alg::keypair();
                write_exact(public_key, pk.as_bytes())?;
                write_exact(private_key, sk.as_bytes())
            }

            fn encapsulate(
                &self,
                ciphertext: &mut [u8],
                shared_secret: &mut [u8],
                public_key: &[u8],
            ) -> BackendResult {
                let pk = $alg::PublicKey::from_bytes(public_key)
                    .map_err(|_| BackendFault::MalformedInput("public key"))?;
                let (ss, ct) = $alg::encapsulate(&pk);
                write_exact(ciphertext, ct.as_bytes())?;
                write_exact(shared_secret, ss.as_bytes())?;
                pqc_ct::mark_verified(shared_secret);
                Ok(())
            }

            fn decapsulate(
                &self,
                shared_secret: &mut [u8],
                ciphertext: &[u8],
                private_key: &[u8],
            ) -> BackendResult {
                let ct = $alg::Ciphertext::from_bytes(ciphertext)
                    .map_err(|_| BackendFault::MalformedInput("ciphertext"))?;
                let sk = $alg::SecretKey::from_bytes(private_key)
                    .map_err(|_| BackendFault::MalformedInput("private key"))?;

                // Taint the key the backend actually reads, not the caller's copy.
                pqc_ct::mark_tainted(sk.as_bytes());
                let ss = $alg::decapsulate(&ct, &sk);
                pqc_ct::mark_verified(sk.as_bytes());
                pqc_ct::mark_verified(ss.as_bytes());

                write_exact(shared_secret, ss.as_bytes())
            }
        }
    };
}

kem_backend!(
    /// CRYSTALS-Kyber, NIST level 1.
    Kyber512 => kyber512
);
kem_backend!(
    /// CRYSTALS-Kyber, NIST level 3.
    Kyber768 => kyber768
);
kem_backend!(
    /// CRYSTALS-Kyber, NIST level 5.
    Kyber1024 => kyber1024
);
kem_backend!(
    /// FIPS 203 ML-KEM-512.
    MlKem512 => mlkem512
);
kem_backend!(
    /// FIPS 203 ML-KEM-768.
    MlKem768 => mlkem768
);
kem_backend!(
    /// FIPS 203 ML-KEM-1024.
    MlKem1024 => mlkem1024
);
kem_backend!(
    /// HQC-128, code-based (quasi-cyclic).
    Hqc128 => hqc128
);
kem_backend!(
    /// Classic McEliece 348864. 261 KiB public keys.
    McEliece348864 => mceliece348864
);

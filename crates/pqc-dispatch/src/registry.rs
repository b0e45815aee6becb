//! The two fixed algorithm tables, one per family.
//!
//! Ids are dense and equal to the table index. New algorithms go at the end
//! of a table (and bump the family count); existing entries never move.

use crate::kem;
use crate::sign;
use pqc_common::{
    AlgorithmInfo, AlgorithmRef, Family, KemDescriptor, KemId, PqcError, SigId,
    SignatureDescriptor, KEM_COUNT, SIG_COUNT,
};
use pqcrypto_classicmceliece::mceliece348864;
use pqcrypto_dilithium::{dilithium2, dilithium3, dilithium5};
use pqcrypto_falcon::{falcon1024, falcon512};
use pqcrypto_hqc::hqc128;
use pqcrypto_kyber::{kyber1024, kyber512, kyber768};
use pqcrypto_mldsa::{mldsa44, mldsa65, mldsa87};
use pqcrypto_mlkem::{mlkem1024, mlkem512, mlkem768};
use pqcrypto_sphincsplus::{
    sphincssha2128fsimple, sphincsshake128fsimple, sphincsshake128ssimple,
};
use tracing::trace;

// Sizes come straight from the backend's own constants.
macro_rules! kem_entry {
    ($id:expr, $name:literal, $alg:ident, $backend:expr) => {
        KemDescriptor::new(
            AlgorithmInfo::new(
                $id.as_u8(),
                $name,
                $alg::public_key_bytes(),
                $alg::secret_key_bytes(),
            ),
            $alg::ciphertext_bytes(),
            $alg::shared_secret_bytes(),
            &$backend,
        )
    };
}

macro_rules! sig_entry {
    ($id:expr, $name:literal, $alg:ident, $backend:expr) => {
        SignatureDescriptor::new(
            AlgorithmInfo::new(
                $id.as_u8(),
                $name,
                $alg::public_key_bytes(),
                $alg::secret_key_bytes(),
            ),
            $alg::signature_bytes(),
            &$backend,
        )
    };
}

const KEM_TABLE: [KemDescriptor; KEM_COUNT] = [
    kem_entry!(KemId::Kyber512, "KYBER512", kyber512, kem::Kyber512),
    kem_entry!(KemId::Kyber768, "KYBER768", kyber768, kem::Kyber768),
    kem_entry!(KemId::Kyber1024, "KYBER1024", kyber1024, kem::Kyber1024),
    kem_entry!(KemId::MlKem512, "MLKEM512", mlkem512, kem::MlKem512),
    kem_entry!(KemId::MlKem768, "MLKEM768", mlkem768, kem::MlKem768),
    kem_entry!(KemId::MlKem1024, "MLKEM1024", mlkem1024, kem::MlKem1024),
    kem_entry!(KemId::Hqc128, "HQC128", hqc128, kem::Hqc128),
    kem_entry!(
        KemId::McEliece348864,
        "MCELIECE348864",
        mceliece348864,
        kem::McEliece348864
    ),
];

const SIG_TABLE: [SignatureDescriptor; SIG_COUNT] = [
    sig_entry!(SigId::Dilithium2, "DILITHIUM2", dilithium2, sign::Dilithium2),
    sig_entry!(SigId::Dilithium3, "DILITHIUM3", dilithium3, sign::Dilithium3),
    sig_entry!(SigId::Dilithium5, "DILITHIUM5", dilithium5, sign::Dilithium5),
    sig_entry!(SigId::MlDsa44, "MLDSA44", mldsa44, sign::MlDsa44),
    sig_entry!(SigId::MlDsa65, "MLDSA65", mldsa65, sign::MlDsa65),
    sig_entry!(SigId::MlDsa87, "MLDSA87", mldsa87, sign::MlDsa87),
    sig_entry!(SigId::Falcon512, "FALCON512", falcon512, sign::Falcon512),
    sig_entry!(SigId::Falcon1024, "FALCON1024", falcon1024, sign::Falcon1024),
    sig_entry!(
        SigId::SphincsShake128fSimple,
        "SPHINCSSHAKE128FSIMPLE",
        sphincsshake128fsimple,
        sign::SphincsShake128fSimple
    ),
    sig_entry!(
        SigId::SphincsSha2128fSimple,
        "SPHINCSSHA2128FSIMPLE",
        sphincssha2128fsimple,
        sign::SphincsSha2128fSimple
    ),
    sig_entry!(
        SigId::SphincsShake128sSimple,
        "SPHINCSSHAKE128SSIMPLE",
        sphincsshake128ssimple,
        sign::SphincsShake128sSimple
    ),
];

// Table invariants, checked at compile time.
const _: () = {
    let mut i = 0;
    while i < KEM_COUNT {
        assert!(
            KEM_TABLE[i].info().id() as usize == i,
            "KEM id must equal its table index"
        );
        assert!(KEM_TABLE[i].sizes_are_valid(), "KEM sizes must be positive");
        i += 1;
    }
    let mut i = 0;
    while i < SIG_COUNT {
        assert!(
            SIG_TABLE[i].info().id() as usize == i,
            "signature id must equal its table index"
        );
        assert!(
            SIG_TABLE[i].sizes_are_valid(),
            "signature sizes must be positive"
        );
        i += 1;
    }
};

static KEMS: [KemDescriptor; KEM_COUNT] = KEM_TABLE;
static SIGNATURES: [SignatureDescriptor; SIG_COUNT] = SIG_TABLE;

/// Every registered KEM, in id order.
pub fn kems() -> &'static [KemDescriptor] {
    &KEMS
}

/// Every registered signature scheme, in id order.
pub fn signatures() -> &'static [SignatureDescriptor] {
    &SIGNATURES
}

pub fn kem(id: KemId) -> &'static KemDescriptor {
    &KEMS[id.index()]
}

pub fn signature(id: SigId) -> &'static SignatureDescriptor {
    &SIGNATURES[id.index()]
}

/// Looks up a KEM by raw numeric id. Fails for `id >= KEM_COUNT`.
pub fn kem_by_id(id: u8) -> Result<&'static KemDescriptor, PqcError> {
    KEMS.get(id as usize).ok_or_else(|| unknown(Family::Kem, id))
}

/// Looks up a signature scheme by raw numeric id. Fails for `id >= SIG_COUNT`.
pub fn sig_by_id(id: u8) -> Result<&'static SignatureDescriptor, PqcError> {
    SIGNATURES
        .get(id as usize)
        .ok_or_else(|| unknown(Family::Signature, id))
}

/// Family-qualified lookup returning the untyped handle.
pub fn lookup(family: Family, id: u8) -> Result<AlgorithmRef, PqcError> {
    match family {
        Family::Kem => kem_by_id(id).map(AlgorithmRef::Kem),
        Family::Signature => sig_by_id(id).map(AlgorithmRef::Signature),
    }
}

pub fn kem_by_name(name: &str) -> Result<&'static KemDescriptor, PqcError> {
    KEMS.iter()
        .find(|kem| kem.info().name().eq_ignore_ascii_case(name))
        .ok_or_else(|| PqcError::UnknownName(name.to_string()))
}

pub fn sig_by_name(name: &str) -> Result<&'static SignatureDescriptor, PqcError> {
    SIGNATURES
        .iter()
        .find(|sig| sig.info().name().eq_ignore_ascii_case(name))
        .ok_or_else(|| PqcError::UnknownName(name.to_string()))
}

/// Case-insensitive lookup across both families.
pub fn lookup_name(name: &str) -> Result<AlgorithmRef, PqcError> {
    kem_by_name(name)
        .map(AlgorithmRef::Kem)
        .or_else(|_| sig_by_name(name).map(AlgorithmRef::Signature))
}

/// All algorithms, KEMs first, each family in id order.
pub fn all() -> impl Iterator<Item = AlgorithmRef> {
    KEMS.iter()
        .map(AlgorithmRef::Kem)
        .chain(SIGNATURES.iter().map(AlgorithmRef::Signature))
}

fn unknown(family: Family, id: u8) -> PqcError {
    trace!("no {} algorithm with id {}", family, id);
    PqcError::UnknownAlgorithm { family, id }
}

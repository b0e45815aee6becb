use crate::error::PqcError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two primitive families the registry knows about.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Kem,
    Signature,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Kem => write!(f, "KEM"),
            Family::Signature => write!(f, "signature"),
        }
    }
}

/// Number of registered KEMs. Valid KEM ids are `0..KEM_COUNT`.
pub const KEM_COUNT: usize = 8;

/// Number of registered signature schemes. Valid ids are `0..SIG_COUNT`.
pub const SIG_COUNT: usize = 11;

/// Stable KEM identifiers. The discriminant is the registry index.
#[repr(u8)]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KemId {
    Kyber512 = 0,
    Kyber768 = 1,
    Kyber1024 = 2,
    MlKem512 = 3,
    MlKem768 = 4,
    MlKem1024 = 5,
    Hqc128 = 6,
    McEliece348864 = 7,
}

/// Stable signature identifiers. The discriminant is the registry index.
#[repr(u8)]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigId {
    Dilithium2 = 0,
    Dilithium3 = 1,
    Dilithium5 = 2,
    MlDsa44 = 3,
    MlDsa65 = 4,
    MlDsa87 = 5,
    Falcon512 = 6,
    Falcon1024 = 7,
    SphincsShake128fSimple = 8,
    SphincsSha2128fSimple = 9,
    SphincsShake128sSimple = 10,
}

impl KemId {
    pub const ALL: [KemId; KEM_COUNT] = [
        KemId::Kyber512,
        KemId::Kyber768,
        KemId::Kyber1024,
        KemId::MlKem512,
        KemId::MlKem768,
        KemId::MlKem1024,
        KemId::Hqc128,
        KemId::McEliece348864,
    ];

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl SigId {
    pub const ALL: [SigId; SIG_COUNT] = [
        SigId::Dilithium2,
        SigId::Dilithium3,
        SigId::Dilithium5,
        SigId::MlDsa44,
        SigId::MlDsa65,
        SigId::MlDsa87,
        SigId::Falcon512,
        SigId::Falcon1024,
        SigId::SphincsShake128fSimple,
        SigId::SphincsSha2128fSimple,
        SigId::SphincsShake128sSimple,
    ];

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for KemId {
    type Error = PqcError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        KemId::ALL
            .get(id as usize)
            .copied()
            .ok_or(PqcError::UnknownAlgorithm {
                family: Family::Kem,
                id,
            })
    }
}

impl TryFrom<u8> for SigId {
    type Error = PqcError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        SigId::ALL
            .get(id as usize)
            .copied()
            .ok_or(PqcError::UnknownAlgorithm {
                family: Family::Signature,
                id,
            })
    }
}

impl From<KemId> for u8 {
    fn from(id: KemId) -> u8 {
        id as u8
    }
}

impl From<SigId> for u8 {
    fn from(id: SigId) -> u8 {
        id as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_dense_and_roundtrip() {
        for (index, id) in KemId::ALL.iter().enumerate() {
            assert_eq!(id.index(), index);
            assert_eq!(KemId::try_from(index as u8).unwrap(), *id);
            assert_eq!(u8::from(*id), index as u8);
        }
        for (index, id) in SigId::ALL.iter().enumerate() {
            assert_eq!(id.index(), index);
            assert_eq!(SigId::try_from(index as u8).unwrap(), *id);
        }
    }

    #[test]
    fn test_out_of_range_ids_are_unknown() {
        for id in [KEM_COUNT as u8, KEM_COUNT as u8 + 1, u8::MAX] {
            assert_eq!(
                KemId::try_from(id),
                Err(PqcError::UnknownAlgorithm {
                    family: Family::Kem,
                    id
                })
            );
        }
        assert!(matches!(
            SigId::try_from(SIG_COUNT as u8),
            Err(PqcError::UnknownAlgorithm {
                family: Family::Signature,
                ..
            })
        ));
    }

    #[test]
    fn test_family_serializes_lowercase() {
        let json = serde_json::to_string(&Family::Signature).unwrap();
        assert_eq!(json, "\"signature\"");
        let back: Family = serde_json::from_str("\"kem\"").unwrap();
        assert_eq!(back, Family::Kem);
    }
}

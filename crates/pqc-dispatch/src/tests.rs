use crate::dispatch;
use crate::registry;
use pqc_common::{
    Algorithm, AlgorithmRef, BufferKind, Family, KemId, PqcError, SigId, Verification, KEM_COUNT,
    SIG_COUNT,
};
use rand::RngCore;

fn random_message(len: usize) -> Vec<u8> {
    let mut msg = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut msg);
    msg
}

/// Classic McEliece keygen needs more stack than a test thread gets.
fn with_large_stack<F: FnOnce() + Send + 'static>(f: F) {
    std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap();
}

#[test]
fn test_every_kem_round_trips() {
    with_large_stack(|| {
        for kem in registry::kems() {
            kem_round_trip(kem);
        }
    });
}

fn kem_round_trip(kem: &pqc_common::KemDescriptor) {
    let mut pk = vec![0u8; dispatch::public_key_size(kem)];
    let mut sk = vec![0u8; dispatch::private_key_size(kem)];
    dispatch::keygen(kem, &mut pk, &mut sk).unwrap();

    let mut ct = vec![0u8; dispatch::ciphertext_size(kem)];
    let mut ss_sender = vec![0u8; dispatch::shared_secret_size(kem)];
    dispatch::encapsulate(kem, &mut ct, &mut ss_sender, &pk).unwrap();

    let mut ss_receiver = vec![0u8; dispatch::shared_secret_size(kem)];
    dispatch::decapsulate(kem, &mut ss_receiver, &ct, &sk).unwrap();

    assert_eq!(ss_sender, ss_receiver, "{} secrets differ", kem.name());
    println!(
        "✅ {} round trip ({} byte secret)",
        kem.name(),
        ss_sender.len()
    );
}

#[test]
fn test_code_based_kems() {
    with_large_stack(|| {
        let mceliece = registry::kem(KemId::McEliece348864);
        assert_eq!(mceliece.name(), "MCELIECE348864");
        assert_eq!(mceliece.public_key_size(), 261_120);

        // One byte short of a 261 KiB key is still refused up front.
        let mut pk = vec![0u8; mceliece.public_key_size() - 1];
        let mut sk = vec![0u8; mceliece.private_key_size()];
        assert!(matches!(
            dispatch::keygen(mceliece, &mut pk, &mut sk),
            Err(PqcError::BufferSize {
                buffer: BufferKind::PublicKey,
                expected: 261_120,
                actual: 261_119,
                ..
            })
        ));

        for id in [KemId::Hqc128, KemId::McEliece348864] {
            let kem = registry::kem(id);
            let keys = crate::generate_keypair(kem).unwrap();
            let mut enc = crate::encapsulate_owned(kem, keys.public_key()).unwrap();
            let secret =
                crate::decapsulate_owned(kem, &enc.ciphertext, keys.private_key()).unwrap();
            assert_eq!(*secret, *enc.shared_secret);

            enc.ciphertext[0] ^= 0x01;
            let decoy =
                crate::decapsulate_owned(kem, &enc.ciphertext, keys.private_key()).unwrap();
            assert_ne!(*decoy, *enc.shared_secret);
            println!("✅ {} round trip and implicit rejection", kem.name());
        }
    });
}

#[test]
fn test_every_signature_scheme_round_trips() {
    let message = random_message(1234);

    for sig in registry::signatures() {
        let keys = crate::generate_keypair(sig).unwrap();

        let mut signature = vec![0u8; dispatch::signature_size(sig)];
        let len = dispatch::sign(sig, &mut signature, &message, keys.private_key()).unwrap();
        assert!(len > 0 && len <= sig.max_signature_size());

        let outcome =
            dispatch::verify(sig, &signature[..len], &message, keys.public_key()).unwrap();
        assert_eq!(outcome, Verification::Accepted, "{} did not verify", sig.name());
        println!("✅ {} signed 1234 bytes into {} bytes", sig.name(), len);
    }
}

#[test]
fn test_lookup_boundaries() {
    assert_eq!(registry::kem_by_id(0).unwrap().name(), "KYBER512");
    assert!(registry::kem_by_id(KEM_COUNT as u8 - 1).is_ok());
    assert_eq!(
        registry::kem_by_id(KEM_COUNT as u8).unwrap_err(),
        PqcError::UnknownAlgorithm {
            family: Family::Kem,
            id: KEM_COUNT as u8
        }
    );
    assert!(registry::kem_by_id(KEM_COUNT as u8 + 1).is_err());
    assert!(registry::kem_by_id(u8::MAX).is_err());

    assert_eq!(registry::sig_by_id(0).unwrap().name(), "DILITHIUM2");
    assert!(registry::sig_by_id(SIG_COUNT as u8 - 1).is_ok());
    assert!(matches!(
        registry::sig_by_id(SIG_COUNT as u8),
        Err(PqcError::UnknownAlgorithm {
            family: Family::Signature,
            ..
        })
    ));
    assert!(registry::sig_by_id(SIG_COUNT as u8 + 1).is_err());

    assert!(registry::lookup(Family::Kem, 7).is_ok());
    assert!(registry::lookup(Family::Kem, 8).is_err());
    assert!(registry::lookup(Family::Signature, 10).is_ok());
    assert!(registry::lookup(Family::Signature, 11).is_err());
    println!("✅ Lookup accepts [0, count) and nothing else");
}

#[test]
fn test_ids_match_table_positions() {
    for (index, kem) in registry::kems().iter().enumerate() {
        assert_eq!(kem.id() as usize, index);
        assert!(kem.public_key_size() > 0 && kem.private_key_size() > 0);
        assert!(kem.ciphertext_size() > 0 && kem.shared_secret_size() > 0);
        let typed = KemId::try_from(kem.id()).unwrap();
        assert!(std::ptr::eq(registry::kem(typed), kem));
    }
    for (index, sig) in registry::signatures().iter().enumerate() {
        assert_eq!(sig.id() as usize, index);
        assert!(sig.max_signature_size() > 0);
        let typed = SigId::try_from(sig.id()).unwrap();
        assert!(std::ptr::eq(registry::signature(typed), sig));
    }
    assert_eq!(registry::all().count(), KEM_COUNT + SIG_COUNT);
    println!("✅ Ids are dense and equal to table index");
}

#[test]
fn test_published_sizes() {
    let kyber = registry::kem(KemId::Kyber512);
    assert_eq!(kyber.public_key_size(), 800);
    assert_eq!(kyber.private_key_size(), 1632);
    assert_eq!(kyber.ciphertext_size(), 768);
    assert_eq!(kyber.shared_secret_size(), 32);

    let mlkem = registry::kem(KemId::MlKem768);
    assert_eq!(mlkem.public_key_size(), 1184);
    assert_eq!(mlkem.ciphertext_size(), 1088);

    let dilithium = registry::signature(SigId::Dilithium2);
    assert_eq!(dilithium.public_key_size(), 1312);
    assert_eq!(dilithium.max_signature_size(), 2420);

    let mldsa = registry::signature(SigId::MlDsa44);
    assert_eq!(mldsa.max_signature_size(), 2420);

    let sphincs = registry::signature(SigId::SphincsShake128sSimple);
    assert_eq!(sphincs.public_key_size(), 32);
    assert_eq!(sphincs.max_signature_size(), 7856);
    println!("✅ Descriptor sizes match the published parameter sets");
}

#[test]
fn test_name_lookup() {
    assert_eq!(registry::kem_by_name("kyber768").unwrap().id(), 1);
    assert_eq!(registry::sig_by_name("Falcon512").unwrap().id(), 6);
    assert_eq!(registry::kem_by_name("hqc128").unwrap().id(), 6);
    assert_eq!(registry::sig_by_name("SPHINCSSHAKE128SSIMPLE").unwrap().id(), 10);

    match registry::lookup_name("MLDSA65").unwrap() {
        AlgorithmRef::Signature(sig) => assert_eq!(sig.name(), "MLDSA65"),
        other => panic!("expected a signature scheme, got {:?}", other),
    }
    assert!(registry::lookup_name("MLKEM1024").unwrap().is_kem());

    assert_eq!(
        registry::lookup_name("RSA2048").unwrap_err(),
        PqcError::UnknownName("RSA2048".to_string())
    );
    println!("✅ Name lookup is case-insensitive across families");
}

#[test]
fn test_wrong_family_is_an_error() {
    let handle = registry::lookup(Family::Signature, 0).unwrap();
    assert!(handle.as_kem().is_none());
    assert!(matches!(
        handle.expect_kem(),
        Err(PqcError::WrongFamily {
            name: "DILITHIUM2",
            expected: Family::Kem,
            actual: Family::Signature
        })
    ));
    assert!(handle.ciphertext_size().is_err());
    assert_eq!(handle.signature_size().unwrap(), 2420);

    let handle = registry::lookup(Family::Kem, 0).unwrap();
    assert!(handle.expect_signature().is_err());
    assert_eq!(handle.shared_secret_size().unwrap(), 32);
    println!("✅ Family-specific accessors refuse the other family");
}

#[test]
fn test_keygen_through_untyped_handle() {
    let handle = registry::lookup_name("KYBER1024").unwrap();
    let keys = crate::generate_keypair(&handle).unwrap();
    assert_eq!(keys.public_key().len(), handle.public_key_size());
    assert_eq!(keys.private_key().len(), handle.private_key_size());

    let kem = handle.expect_kem().unwrap();
    let enc = crate::encapsulate_owned(kem, keys.public_key()).unwrap();
    let secret = crate::decapsulate_owned(kem, &enc.ciphertext, keys.private_key()).unwrap();
    assert_eq!(*enc.shared_secret, *secret);
    println!("✅ Keygen dispatches through AlgorithmRef");
}

#[test]
fn test_buffer_size_violations() {
    let kem = registry::kem(KemId::Kyber512);
    let mut pk = vec![0u8; 800];
    let mut sk = vec![0u8; 1632];

    let err = dispatch::keygen(kem, &mut pk[..799], &mut sk).unwrap_err();
    assert_eq!(
        err,
        PqcError::BufferSize {
            algorithm: "KYBER512",
            buffer: BufferKind::PublicKey,
            expected: 800,
            actual: 799
        }
    );
    // Oversized is rejected too.
    let mut big_sk = vec![0u8; 1633];
    assert!(dispatch::keygen(kem, &mut pk, &mut big_sk).is_err());

    dispatch::keygen(kem, &mut pk, &mut sk).unwrap();

    let mut ct = vec![0u8; 768];
    let mut ss = vec![0u8; 31];
    let err = dispatch::encapsulate(kem, &mut ct, &mut ss, &pk).unwrap_err();
    assert!(matches!(
        err,
        PqcError::BufferSize {
            buffer: BufferKind::SharedSecret,
            ..
        }
    ));

    let mut ss = vec![0u8; 32];
    let err = dispatch::decapsulate(kem, &mut ss, &ct[..767], &sk).unwrap_err();
    assert!(matches!(
        err,
        PqcError::BufferSize {
            buffer: BufferKind::Ciphertext,
            ..
        }
    ));

    let sig = registry::signature(SigId::Dilithium2);
    let keys = crate::generate_keypair(sig).unwrap();
    let mut short = vec![0u8; 2419];
    let err = dispatch::sign(sig, &mut short, b"msg", keys.private_key()).unwrap_err();
    assert!(matches!(
        err,
        PqcError::BufferSize {
            buffer: BufferKind::Signature,
            expected: 2420,
            actual: 2419,
            ..
        }
    ));

    // Extra capacity is fine; only the returned prefix is the signature.
    let mut roomy = vec![0u8; 4096];
    let len = dispatch::sign(sig, &mut roomy, b"msg", keys.private_key()).unwrap();
    assert_eq!(len, 2420);

    let err = dispatch::verify(sig, &roomy[..len], b"msg", &keys.public_key()[1..]).unwrap_err();
    assert!(matches!(
        err,
        PqcError::BufferSize {
            buffer: BufferKind::PublicKey,
            ..
        }
    ));
    println!("✅ Mis-sized buffers are refused before the backend runs");
}

#[test]
fn test_bad_length_signatures_are_rejected() {
    let sig = registry::signature(SigId::MlDsa44);
    let keys = crate::generate_keypair(sig).unwrap();
    let signature = crate::sign_owned(sig, b"payload", keys.private_key()).unwrap();

    let empty = dispatch::verify(sig, &[], b"payload", keys.public_key()).unwrap();
    assert_eq!(empty, Verification::Rejected);

    let mut too_long = signature.clone();
    too_long.push(0);
    let outcome = dispatch::verify(sig, &too_long, b"payload", keys.public_key()).unwrap();
    assert_eq!(outcome, Verification::Rejected);

    let truncated = &signature[..signature.len() - 1];
    let outcome = dispatch::verify(sig, truncated, b"payload", keys.public_key()).unwrap();
    assert!(!outcome.is_accepted());
    println!("✅ Empty, truncated and oversized signatures are rejected");
}

#[test]
fn test_tampered_ciphertext_yields_different_secret() {
    for id in [KemId::Kyber768, KemId::MlKem512] {
        let kem = registry::kem(id);
        let keys = crate::generate_keypair(kem).unwrap();
        let mut enc = crate::encapsulate_owned(kem, keys.public_key()).unwrap();

        enc.ciphertext[10] ^= 0x01;
        // Implicit rejection: decapsulation succeeds with a decoy secret.
        let secret = crate::decapsulate_owned(kem, &enc.ciphertext, keys.private_key()).unwrap();
        assert_ne!(*secret, *enc.shared_secret);
        println!("✅ {} tampered ciphertext gives a decoy secret", kem.name());
    }
}

#[test]
fn test_tampering_rejects_signature() {
    let message = random_message(256);

    for id in [SigId::Dilithium3, SigId::Falcon512, SigId::SphincsShake128fSimple] {
        let sig = registry::signature(id);
        let keys = crate::generate_keypair(sig).unwrap();
        let signature = crate::sign_owned(sig, &message, keys.private_key()).unwrap();

        let mut bad_sig = signature.clone();
        let mid = bad_sig.len() / 2;
        bad_sig[mid] ^= 0x01;
        let outcome = dispatch::verify(sig, &bad_sig, &message, keys.public_key()).unwrap();
        assert_eq!(outcome, Verification::Rejected);

        let mut bad_msg = message.clone();
        bad_msg[0] ^= 0x80;
        let outcome = dispatch::verify(sig, &signature, &bad_msg, keys.public_key()).unwrap();
        assert_eq!(outcome, Verification::Rejected);

        let outcome = dispatch::verify(sig, &signature, &message, keys.public_key()).unwrap();
        assert!(outcome.is_accepted());
        println!("✅ {} rejects flipped signature and message bytes", sig.name());
    }
}

#[test]
fn test_wrong_key_rejects() {
    let sig = registry::signature(SigId::Dilithium2);
    let signer = crate::generate_keypair(sig).unwrap();
    let stranger = crate::generate_keypair(sig).unwrap();

    let signature = crate::sign_owned(sig, b"hello", signer.private_key()).unwrap();
    let outcome = dispatch::verify(sig, &signature, b"hello", stranger.public_key()).unwrap();
    assert_eq!(outcome, Verification::Rejected);
    println!("✅ Signature does not verify under another key");
}

#[test]
fn test_keypair_debug_redacts_private_key() {
    let kem = registry::kem(KemId::MlKem512);
    let keys = crate::generate_keypair(kem).unwrap();
    let rendered = format!("{:?}", keys);
    assert!(rendered.contains("<redacted>"));
    assert!(rendered.contains("800"));

    let (pk, sk) = keys.into_parts();
    assert_eq!(pk.len(), 800);
    assert_eq!(sk.len(), kem.private_key_size());
    println!("✅ KeyPair debug output hides the private key");
}

#[test]
fn test_raw_backends_fault_on_mis_sized_buffers() {
    use pqc_common::BackendFault;

    let kem = registry::kem(KemId::MlKem768);
    let keys = crate::generate_keypair(kem).unwrap();
    let enc = crate::encapsulate_owned(kem, keys.public_key()).unwrap();

    let mut short_pk = vec![0u8; 10];
    let mut sk = vec![0u8; kem.private_key_size()];
    assert!(matches!(
        kem.backend_keygen(&mut short_pk, &mut sk),
        Err(BackendFault::OutputOverflow { .. })
    ));

    let mut ss = vec![0u8; kem.shared_secret_size()];
    assert_eq!(
        kem.backend()
            .decapsulate(&mut ss, &enc.ciphertext[..10], keys.private_key()),
        Err(BackendFault::MalformedInput("ciphertext"))
    );

    let sig = registry::signature(SigId::MlDsa44);
    let sig_keys = crate::generate_keypair(sig).unwrap();
    let mut tiny = vec![0u8; 10];
    assert!(matches!(
        sig.backend().sign(&mut tiny, b"msg", sig_keys.private_key()),
        Err(BackendFault::OutputOverflow { .. })
    ));
    println!("✅ Backends fault cleanly when reached without the dispatch checks");
}

//! Round-trip and tamper checks run through the dispatch layer.

use crate::plan::SelftestPlan;
use anyhow::{bail, ensure, Result};
use pqc_common::{Algorithm, AlgorithmRef, Family, KemDescriptor, SignatureDescriptor};
use pqc_dispatch::dispatch;
use rand::RngCore;
use tracing::{info, warn};

#[derive(Debug)]
pub struct Outcome {
    pub name: &'static str,
    pub family: Family,
    pub trials: usize,
    pub error: Option<anyhow::Error>,
}

impl Outcome {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

pub fn run(plan: &SelftestPlan) -> Result<Vec<Outcome>> {
    let mut outcomes = Vec::new();

    for alg in plan.selected()? {
        let (trials, result) = match alg {
            AlgorithmRef::Kem(kem) => (plan.kem_trials, check_kem(kem, plan.kem_trials)),
            AlgorithmRef::Signature(sig) => (
                plan.sig_trials,
                check_signature(sig, plan.sig_trials, plan.message_len),
            ),
        };

        match &result {
            Ok(()) => info!("{}: {} trial(s) passed", alg.name(), trials),
            Err(e) => warn!("{}: {:#}", alg.name(), e),
        }
        outcomes.push(Outcome {
            name: alg.name(),
            family: alg.family(),
            trials,
            error: result.err(),
        });
    }
    Ok(outcomes)
}

fn check_kem(kem: &KemDescriptor, trials: usize) -> Result<()> {
    let mut pk = vec![0u8; dispatch::public_key_size(kem)];
    let mut sk = vec![0u8; dispatch::private_key_size(kem)];
    let mut ct = vec![0u8; dispatch::ciphertext_size(kem)];
    let mut ss_sender = vec![0u8; dispatch::shared_secret_size(kem)];
    let mut ss_receiver = vec![0u8; dispatch::shared_secret_size(kem)];

    for trial in 0..trials {
        dispatch::keygen(kem, &mut pk, &mut sk)?;
        dispatch::encapsulate(kem, &mut ct, &mut ss_sender, &pk)?;
        dispatch::decapsulate(kem, &mut ss_receiver, &ct, &sk)?;
        ensure!(
            ss_sender == ss_receiver,
            "trial {}: shared secrets differ",
            trial
        );

        // Implicit rejection: a corrupted ciphertext must not recover the secret.
        ct[0] ^= 0x01;
        dispatch::decapsulate(kem, &mut ss_receiver, &ct, &sk)?;
        ensure!(
            ss_sender != ss_receiver,
            "trial {}: tampered ciphertext recovered the secret",
            trial
        );
    }
    Ok(())
}

fn check_signature(sig: &SignatureDescriptor, trials: usize, message_len: usize) -> Result<()> {
    let mut pk = vec![0u8; dispatch::public_key_size(sig)];
    let mut sk = vec![0u8; dispatch::private_key_size(sig)];
    let mut signature = vec![0u8; dispatch::signature_size(sig)];
    let mut message = vec![0u8; message_len];
    let mut rng = rand::thread_rng();

    dispatch::keygen(sig, &mut pk, &mut sk)?;

    for trial in 0..trials {
        rng.fill_bytes(&mut message);
        let len = dispatch::sign(sig, &mut signature, &message, &sk)?;
        let signed = &signature[..len];

        if !dispatch::verify(sig, signed, &message, &pk)?.is_accepted() {
            bail!("trial {}: valid signature rejected", trial);
        }

        if !message.is_empty() {
            message[0] ^= 0x01;
            ensure!(
                !dispatch::verify(sig, signed, &message, &pk)?.is_accepted(),
                "trial {}: modified message accepted",
                trial
            );
            message[0] ^= 0x01;
        }

        let mut forged = signed.to_vec();
        forged[len / 2] ^= 0x01;
        ensure!(
            !dispatch::verify(sig, &forged, &message, &pk)?.is_accepted(),
            "trial {}: modified signature accepted",
            trial
        );
    }
    Ok(())
}

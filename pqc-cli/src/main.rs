mod plan;
mod selftest;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use colored::*;
use pqc_common::{Algorithm, AlgorithmRef, AlgorithmSummary};
use pqc_dispatch::registry;
use plan::SelftestPlan;
use std::path::PathBuf;
use std::thread;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SELFTEST_STACK_BYTES: usize = 64 * 1024 * 1024;

#[derive(Parser)]
#[command(name = "pqc")]
#[command(about = "Post-quantum algorithm registry and self-test", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every registered algorithm with its sizes
    List {
        /// Print descriptor summaries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show every size of one algorithm
    Inspect { name: String },
    /// Run round-trip and tamper checks
    Selftest {
        /// JSON plan file
        #[arg(long)]
        plan: Option<PathBuf>,
        #[arg(long)]
        kem_trials: Option<usize>,
        #[arg(long)]
        sig_trials: Option<usize>,
        /// Restrict to these algorithms (repeatable)
        #[arg(long = "algorithm")]
        algorithms: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::List { json } => list(json),
        Commands::Inspect { name } => inspect(&name),
        Commands::Selftest {
            plan,
            kem_trials,
            sig_trials,
            algorithms,
        } => {
            let mut plan = match plan {
                Some(path) => SelftestPlan::load(&path)?,
                None => SelftestPlan::default(),
            };
            plan.apply_overrides(kem_trials, sig_trials, &algorithms);
            run_selftest(&plan)
        }
    }
}

fn list(json: bool) -> Result<()> {
    if json {
        let summaries: Vec<AlgorithmSummary> = registry::all().map(|alg| alg.summary()).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("{:<24}{:>12}{:>12}{:>12}", "Algorithm", "Public key", "Secret key", "Output")
            .bold()
    );
    for alg in registry::all() {
        println!("{}", size_row(&alg));
    }
    Ok(())
}

/// One table row: name, key sizes, then ciphertext or max signature size.
fn size_row(alg: &AlgorithmRef) -> String {
    let output = match alg {
        AlgorithmRef::Kem(kem) => kem.ciphertext_size(),
        AlgorithmRef::Signature(sig) => sig.max_signature_size(),
    };
    format!(
        "{:<24}{:>12}{:>12}{:>12}",
        alg.name(),
        alg.public_key_size(),
        alg.private_key_size(),
        output
    )
}

fn inspect(name: &str) -> Result<()> {
    let alg = registry::lookup_name(name)?;
    let summary = alg.summary();

    println!("{} ({}, id {})", summary.name.green().bold(), summary.family, summary.id);
    println!("  public key       {:>6} bytes", summary.public_key_size);
    println!("  private key      {:>6} bytes", summary.private_key_size);
    if let Some(n) = summary.ciphertext_size {
        println!("  ciphertext       {:>6} bytes", n);
    }
    if let Some(n) = summary.shared_secret_size {
        println!("  shared secret    {:>6} bytes", n);
    }
    if let Some(n) = summary.max_signature_size {
        println!("  max signature    {:>6} bytes", n);
    }
    Ok(())
}

fn run_selftest(plan: &SelftestPlan) -> Result<()> {
    info!(
        "Self-test: {} KEM trial(s), {} signature trial(s), {} byte messages",
        plan.kem_trials, plan.sig_trials, plan.message_len
    );
    // Classic McEliece keeps its matrices on the stack.
    let owned = plan.clone();
    let outcomes = thread::Builder::new()
        .name("selftest".into())
        .stack_size(SELFTEST_STACK_BYTES)
        .spawn(move || selftest::run(&owned))?
        .join()
        .map_err(|_| anyhow!("self-test thread panicked"))??;

    for outcome in &outcomes {
        match &outcome.error {
            None => println!("{} {}", "PASS".green().bold(), outcome.name),
            Some(e) => println!("{} {}: {:#}", "FAIL".red().bold(), outcome.name, e),
        }
    }

    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    if failed > 0 {
        bail!("{} of {} algorithms failed", failed, outcomes.len());
    }
    info!("All {} algorithms passed", outcomes.len());
    Ok(())
}

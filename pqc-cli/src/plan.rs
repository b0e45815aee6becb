//! Self-test plan: which algorithms to exercise and how hard.

use anyhow::{Context, Result};
use pqc_common::{Algorithm, AlgorithmRef, Family};
use pqc_dispatch::registry;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelftestPlan {
    pub kem_trials: usize,
    pub sig_trials: usize,
    pub message_len: usize,
    pub families: Vec<Family>,
    /// Empty means every registered algorithm.
    pub algorithms: Vec<String>,
}

impl Default for SelftestPlan {
    fn default() -> Self {
        Self {
            kem_trials: 1,
            sig_trials: 1,
            message_len: 1234,
            families: vec![Family::Kem, Family::Signature],
            algorithms: Vec::new(),
        }
    }
}

impl SelftestPlan {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid plan {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Command-line values win over the plan file.
    pub fn apply_overrides(
        &mut self,
        kem_trials: Option<usize>,
        sig_trials: Option<usize>,
        algorithms: &[String],
    ) {
        if let Some(n) = kem_trials {
            self.kem_trials = n;
        }
        if let Some(n) = sig_trials {
            self.sig_trials = n;
        }
        if !algorithms.is_empty() {
            self.algorithms = algorithms.to_vec();
        }
    }

    /// Resolves the plan against the registry. Unknown names are an error.
    pub fn selected(&self) -> Result<Vec<AlgorithmRef>> {
        let candidates: Vec<AlgorithmRef> = if self.algorithms.is_empty() {
            registry::all().collect()
        } else {
            self.algorithms
                .iter()
                .map(|name| registry::lookup_name(name).map_err(anyhow::Error::from))
                .collect::<Result<_>>()?
        };

        Ok(candidates
            .into_iter()
            .filter(|alg| self.families.contains(&alg.family()))
            .collect())
    }
}

//! Software shadow memory for test builds.
//!
//! Tracks taint per byte address. It cannot see the branches a backend
//! takes on its own, so backends (or tests) call
//! [`crate::observe_secret_use`] at the points a real engine would
//! intercept.

use crate::{CtError, TaintTracker};
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

/// A secret-dependent use seen outside an expect bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    pub address: usize,
    pub len: usize,
}

#[derive(Debug, Default)]
struct ShadowState {
    tainted: BTreeSet<usize>,
    expecting: bool,
    expected_hits: usize,
    violations: Vec<Violation>,
}

#[derive(Debug, Default)]
pub struct ShadowTracker {
    state: Mutex<ShadowState>,
}

impl ShadowTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leaks a tracker so it can be passed to [`crate::install`].
    pub fn leaked() -> &'static ShadowTracker {
        Box::leak(Box::new(Self::new()))
    }

    pub fn is_tainted(&self, region: &[u8]) -> bool {
        let state = self.lock();
        addresses(region).any(|addr| state.tainted.contains(&addr))
    }

    pub fn tainted_bytes(&self) -> usize {
        self.lock().tainted.len()
    }

    pub fn violations(&self) -> Vec<Violation> {
        self.lock().violations.clone()
    }

    /// Drains the violation log; the first entry becomes the error.
    pub fn check_clean(&self) -> Result<(), CtError> {
        let mut state = self.lock();
        let first = state.violations.first().copied();
        state.violations.clear();
        match first {
            Some(v) => Err(CtError::UnexpectedSecretUse {
                address: v.address,
                len: v.len,
            }),
            None => Ok(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ShadowState> {
        // A panicking test must not wedge every other test sharing the tracker.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn addresses(region: &[u8]) -> std::ops::Range<usize> {
    let start = region.as_ptr() as usize;
    start..start + region.len()
}

impl TaintTracker for ShadowTracker {
    fn name(&self) -> &'static str {
        "shadow"
    }

    fn mark_tainted(&self, region: &[u8]) {
        let mut state = self.lock();
        state.tainted.extend(addresses(region));
    }

    fn mark_verified(&self, region: &[u8]) {
        let mut state = self.lock();
        for addr in addresses(region) {
            state.tainted.remove(&addr);
        }
    }

    fn expect_secret_dependent_use(&self) {
        let mut state = self.lock();
        state.expecting = true;
        state.expected_hits = 0;
    }

    fn assert_secret_dependent_use_occurred(&self) -> Result<(), CtError> {
        let mut state = self.lock();
        state.expecting = false;
        if state.expected_hits == 0 {
            return Err(CtError::ExpectedUseMissing);
        }
        state.expected_hits = 0;
        Ok(())
    }

    fn dump_taint_state(&self, region: &[u8]) -> String {
        let state = self.lock();
        addresses(region)
            .map(|addr| {
                if state.tainted.contains(&addr) {
                    "FF"
                } else {
                    "00"
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn observe_secret_use(&self, region: &[u8]) {
        let mut state = self.lock();
        if !addresses(region).any(|addr| state.tainted.contains(&addr)) {
            return;
        }
        if state.expecting {
            state.expected_hits += 1;
        } else {
            let violation = Violation {
                address: region.as_ptr() as usize,
                len: region.len(),
            };
            warn!(
                "secret-dependent use of {} bytes at {:#x}",
                violation.len, violation.address
            );
            state.violations.push(violation);
        }
    }
}

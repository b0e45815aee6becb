//! Instrumentation hooks for constant-time testing.
//!
//! Backends call these around secret-dependent code: taint a secret before
//! it is processed, mark it verified once it is safe to branch on, and
//! bracket code that is *meant* to touch secrets so an analysis engine only
//! reports the unexpected cases.
//!
//! Until a [`TaintTracker`] is installed every hook is a no-op, and that is
//! the contract for production builds. Test builds install a tracker once
//! per process (see [`shadow::ShadowTracker`] behind the `shadow` feature).

#[cfg(any(test, feature = "shadow"))]
pub mod shadow;
#[cfg(test)]
mod tests;

use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CtError {
    #[error("Constant-time tracker already installed: {0}")]
    AlreadyInstalled(&'static str),

    #[error("Expected a secret-dependent use, but none occurred")]
    ExpectedUseMissing,

    #[error("Unexpected secret-dependent use of {len} bytes at {address:#x}")]
    UnexpectedSecretUse { address: usize, len: usize },
}

/// The capability a dynamic analysis engine plugs in.
pub trait TaintTracker: Send + Sync {
    fn name(&self) -> &'static str;

    /// Treat the bytes of `region` as secret from now on.
    fn mark_tainted(&self, region: &[u8]);

    /// Clear the taint: `region` is safe to branch on again.
    fn mark_verified(&self, region: &[u8]);

    /// Open a bracket around code that is supposed to use secret data.
    fn expect_secret_dependent_use(&self);

    /// Close the bracket; fails if nothing secret-dependent happened inside.
    fn assert_secret_dependent_use_occurred(&self) -> Result<(), CtError>;

    /// Debug rendering of the taint state, one hex byte per input byte
    /// (`FF` tainted, `00` clean).
    fn dump_taint_state(&self, region: &[u8]) -> String;

    /// Probe called where code branches on, or indexes with, `region`.
    fn observe_secret_use(&self, region: &[u8]);
}

/// Does nothing. Active whenever no engine is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracker;

impl TaintTracker for NoopTracker {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn mark_tainted(&self, _region: &[u8]) {}

    fn mark_verified(&self, _region: &[u8]) {}

    fn expect_secret_dependent_use(&self) {}

    fn assert_secret_dependent_use_occurred(&self) -> Result<(), CtError> {
        Ok(())
    }

    fn dump_taint_state(&self, _region: &[u8]) -> String {
        String::new()
    }

    fn observe_secret_use(&self, _region: &[u8]) {}
}

static NOOP: NoopTracker = NoopTracker;
static TRACKER: OnceLock<&'static dyn TaintTracker> = OnceLock::new();

/// Installs the process-wide tracker. Only the first call wins.
pub fn install(tracker: &'static dyn TaintTracker) -> Result<(), CtError> {
    TRACKER
        .set(tracker)
        .map_err(|_| CtError::AlreadyInstalled(active().name()))?;
    debug!("constant-time tracker installed: {}", tracker.name());
    Ok(())
}

/// The installed tracker, or the no-op one.
pub fn active() -> &'static dyn TaintTracker {
    match TRACKER.get() {
        Some(tracker) => *tracker,
        None => &NOOP,
    }
}

pub fn is_instrumented() -> bool {
    TRACKER.get().is_some()
}

#[inline]
pub fn mark_tainted(region: &[u8]) {
    active().mark_tainted(region)
}

#[inline]
pub fn mark_verified(region: &[u8]) {
    active().mark_verified(region)
}

#[inline]
pub fn expect_secret_dependent_use() {
    active().expect_secret_dependent_use()
}

#[inline]
pub fn assert_secret_dependent_use_occurred() -> Result<(), CtError> {
    active().assert_secret_dependent_use_occurred()
}

pub fn dump_taint_state(region: &[u8]) -> String {
    active().dump_taint_state(region)
}

#[inline]
pub fn observe_secret_use(region: &[u8]) {
    active().observe_secret_use(region)
}

use crate::shadow::{ShadowTracker, Violation};
use crate::{CtError, NoopTracker, TaintTracker};

#[test]
fn test_noop_tracker_does_nothing() {
    let tracker = NoopTracker;
    let secret = [7u8; 16];

    tracker.mark_tainted(&secret);
    tracker.observe_secret_use(&secret);
    tracker.expect_secret_dependent_use();
    // No engine, nothing to assert against: the bracket always closes cleanly.
    assert_eq!(tracker.assert_secret_dependent_use_occurred(), Ok(()));
    assert_eq!(tracker.dump_taint_state(&secret), "");
    tracker.mark_verified(&secret);

    println!("✅ No-op tracker is inert");
}

#[test]
fn test_free_functions_are_noops_without_install() {
    // The unit-test binary never installs a tracker.
    assert!(!crate::is_instrumented());
    assert_eq!(crate::active().name(), "noop");

    let secret = [1u8; 4];
    crate::mark_tainted(&secret);
    crate::observe_secret_use(&secret);
    assert!(crate::assert_secret_dependent_use_occurred().is_ok());
    assert!(crate::dump_taint_state(&secret).is_empty());
    crate::mark_verified(&secret);
}

#[test]
fn test_taint_and_verify_render_shadow() {
    let tracker = ShadowTracker::new();
    let buf = [0u8; 8];

    tracker.mark_tainted(&buf[2..5]);
    assert_eq!(tracker.dump_taint_state(&buf), "00 00 FF FF FF 00 00 00");
    assert_eq!(tracker.tainted_bytes(), 3);
    assert!(tracker.is_tainted(&buf));
    assert!(!tracker.is_tainted(&buf[5..]));

    tracker.mark_verified(&buf[3..4]);
    assert_eq!(tracker.dump_taint_state(&buf), "00 00 FF 00 FF 00 00 00");

    tracker.mark_verified(&buf);
    assert_eq!(tracker.tainted_bytes(), 0);
    assert_eq!(tracker.dump_taint_state(&buf[..2]), "00 00");

    println!("✅ Shadow tracker renders taint per byte");
}

#[test]
fn test_empty_region_is_harmless() {
    let tracker = ShadowTracker::new();
    let buf: [u8; 0] = [];
    tracker.mark_tainted(&buf);
    tracker.observe_secret_use(&buf);
    assert_eq!(tracker.tainted_bytes(), 0);
    assert_eq!(tracker.dump_taint_state(&buf), "");
    assert!(tracker.violations().is_empty());
}

#[test]
fn test_expected_use_inside_bracket() {
    let tracker = ShadowTracker::new();
    let secret = [0xAAu8; 32];
    tracker.mark_tainted(&secret);

    tracker.expect_secret_dependent_use();
    tracker.observe_secret_use(&secret[..1]);
    assert_eq!(tracker.assert_secret_dependent_use_occurred(), Ok(()));

    // Expected uses are not violations.
    assert!(tracker.violations().is_empty());
    assert_eq!(tracker.check_clean(), Ok(()));

    println!("✅ Expected secret use is accepted inside the bracket");
}

#[test]
fn test_missing_expected_use_is_reported() {
    let tracker = ShadowTracker::new();
    let public = [0u8; 8];

    tracker.expect_secret_dependent_use();
    // Clean data never counts as a secret-dependent use.
    tracker.observe_secret_use(&public);
    assert_eq!(
        tracker.assert_secret_dependent_use_occurred(),
        Err(CtError::ExpectedUseMissing)
    );
}

#[test]
fn test_unexpected_use_is_logged_as_violation() {
    let tracker = ShadowTracker::new();
    let secret = [3u8; 12];
    tracker.mark_tainted(&secret);

    tracker.observe_secret_use(&secret[4..8]);

    let expected = Violation {
        address: secret[4..8].as_ptr() as usize,
        len: 4,
    };
    assert_eq!(tracker.violations(), vec![expected]);
    assert_eq!(
        tracker.check_clean(),
        Err(CtError::UnexpectedSecretUse {
            address: expected.address,
            len: 4
        })
    );
    // check_clean drains the log
    assert_eq!(tracker.check_clean(), Ok(()));

    // After verification the same access is fine.
    tracker.mark_verified(&secret);
    tracker.observe_secret_use(&secret);
    assert!(tracker.violations().is_empty());

    println!("✅ Unexpected secret use recorded");
}

#[test]
fn test_bracket_resets_between_uses() {
    let tracker = ShadowTracker::new();
    let secret = [9u8; 4];
    tracker.mark_tainted(&secret);

    tracker.expect_secret_dependent_use();
    tracker.observe_secret_use(&secret);
    assert!(tracker.assert_secret_dependent_use_occurred().is_ok());

    // A second bracket must see its own use, not inherit the first one.
    tracker.expect_secret_dependent_use();
    assert_eq!(
        tracker.assert_secret_dependent_use_occurred(),
        Err(CtError::ExpectedUseMissing)
    );
}

#[test]
fn test_error_display() {
    let err = CtError::UnexpectedSecretUse {
        address: 0x1000,
        len: 16,
    };
    assert_eq!(
        err.to_string(),
        "Unexpected secret-dependent use of 16 bytes at 0x1000"
    );
    assert!(CtError::AlreadyInstalled("shadow")
        .to_string()
        .contains("shadow"));
}

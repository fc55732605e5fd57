// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Unit tests for the wrap-safe deadline comparison.

use grebe_common::timing::deadline_passed;

#[test]
fn test_not_passed_before_deadline() {
    assert!(!deadline_passed(100, 150));
}

#[test]
fn test_not_passed_at_deadline() {
    assert!(!deadline_passed(150, 150));
}

#[test]
fn test_passed_after_deadline() {
    assert!(deadline_passed(151, 150));
}

#[test]
fn test_wrapped_expiry_pending_while_counter_high() {
    // The expiry wrapped past zero but the counter has not; plain comparison
    // would report the deadline as passed
    assert!(!deadline_passed(0xFFFF_FFF0, 0x0000_0010));
}

#[test]
fn test_wrapped_expiry_passes_after_counter_wraps() {
    assert!(!deadline_passed(0x0000_0005, 0x0000_0010));
    assert!(deadline_passed(0x0000_0011, 0x0000_0010));
}

#[test]
fn test_exact_window_across_wrap() {
    let start = 0xFFFF_FFFEu32;
    let duration = 10u32;
    let expiry = start.wrapping_add(duration);

    for tick in 0..=duration {
        assert!(
            !deadline_passed(start.wrapping_add(tick), expiry),
            "tick {tick}"
        );
    }
    assert!(deadline_passed(start.wrapping_add(duration + 1), expiry));
}

#[test]
fn test_exact_window_without_wrap() {
    let start = 1000u32;
    let duration = 50u32;
    let expiry = start + duration;

    for tick in 0..=duration {
        assert!(!deadline_passed(start + tick, expiry), "tick {tick}");
    }
    assert!(deadline_passed(start + duration + 1, expiry));
}

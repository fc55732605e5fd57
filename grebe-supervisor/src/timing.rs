// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Millisecond time base.
//!
//! The tick interrupt fires once per millisecond and is the only writer of
//! the counter; everything else takes single-word reads.

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::asm;
use grebe_common::timing::deadline_passed;

static MS_ELAPSED: AtomicU32 = AtomicU32::new(0);

/// Milliseconds since boot. Wraps roughly every 49.7 days.
pub fn now() -> u32 {
    MS_ELAPSED.load(Ordering::Relaxed)
}

/// Advance the counter by one. Called from the tick interrupt only.
pub fn on_tick() {
    MS_ELAPSED.store(now().wrapping_add(1), Ordering::Relaxed);
}

/// A millisecond deadline measured against the free-running counter.
pub struct Timeout {
    expiry: u32,
}

impl Timeout {
    pub fn new(ms: u32) -> Self {
        Self {
            expiry: now().wrapping_add(ms),
        }
    }

    pub fn has_expired(&self) -> bool {
        deadline_passed(now(), self.expiry)
    }

    /// Sleep until the deadline passes.
    pub fn wait(&self) {
        while !self.has_expired() {
            asm::wfi();
        }
    }
}

/// Block for `ms` milliseconds.
pub fn delay(ms: u32) {
    Timeout::new(ms).wait();
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Wrap-safe deadline arithmetic for the millisecond counter.

/// True once `now` has passed `expiry`.
///
/// The expiry may have wrapped past zero while the counter has not: when the
/// counter's high bit is set and the expiry's is clear, the deadline is
/// still ahead and the plain comparison would misfire for the first stretch
/// of the interval.
pub fn deadline_passed(now: u32, expiry: u32) -> bool {
    if now & 0x8000_0000 != 0 && expiry & 0x8000_0000 == 0 {
        return false;
    }
    now > expiry
}

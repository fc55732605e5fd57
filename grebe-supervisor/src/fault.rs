// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Global fault state and the status LED animation.
//!
//! Any subsystem that detects a failure records a code here and returns
//! `false` up its call chain; the tick handler blinks the latched code on
//! the red LED as four Morse hex digits. While no code is latched the green
//! LED carries a slow heartbeat instead.

use core::sync::atomic::{AtomicU16, Ordering};

use embedded_hal::digital::{OutputPin, StatefulOutputPin};
use grebe_common::FaultCode;
use grebe_common::blink::{BlinkState, DISPLAY_TICK_MS, Led};

use crate::peripherals::RawPin;
use crate::pins;

static ACTIVE_FAULT: AtomicU16 = AtomicU16::new(0);

/// Display ticks between heartbeat toggles, giving a 1 Hz blink.
const HEARTBEAT_TICKS: u8 = 5;

/// Record a fault. The code stays latched until a recovery path clears it.
pub fn raise(code: FaultCode) {
    defmt::println!("fault 0x{:04x}", code.code());
    ACTIVE_FAULT.store(code.code(), Ordering::Relaxed);
}

pub fn active() -> FaultCode {
    FaultCode::from_u16(ACTIVE_FAULT.load(Ordering::Relaxed)).unwrap_or(FaultCode::None)
}

pub fn clear() {
    ACTIVE_FAULT.store(FaultCode::None.code(), Ordering::Relaxed);
}

struct Display {
    blink: BlinkState,
    divider: u32,
    heartbeat: u8,
    red: RawPin,
    green: RawPin,
}

// Touched only from the tick interrupt.
static mut DISPLAY: Display = Display {
    blink: BlinkState::new(),
    divider: 0,
    heartbeat: 0,
    red: RawPin::new(pins::SU_LED_R),
    green: RawPin::new(pins::SU_LED_G),
};

/// One millisecond tick: advance the display every `DISPLAY_TICK_MS`.
pub fn on_ms_tick() {
    // SAFETY: single-context access, tick interrupt only.
    let display = unsafe { &mut *core::ptr::addr_of_mut!(DISPLAY) };

    display.divider += 1;
    if display.divider < DISPLAY_TICK_MS {
        return;
    }
    display.divider = 0;

    let code = ACTIVE_FAULT.load(Ordering::Relaxed);
    match display.blink.step(code) {
        Led::On => {
            display.red.set_low().ok();
        }
        Led::Off => {
            display.red.set_high().ok();
        }
    }

    if code == 0 && !display.blink.active() {
        display.heartbeat += 1;
        if display.heartbeat >= HEARTBEAT_TICKS {
            display.heartbeat = 0;
            display.green.toggle().ok();
        }
    }
}

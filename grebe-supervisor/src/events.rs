// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! External interrupt capture and the foreground dispatch loop.
//!
//! The edge handler only latches which lines fired; all bus work happens in
//! the foreground after the pending mask is drained.

use core::sync::atomic::{AtomicU8, Ordering};

use cortex_m::asm;
use grebe_common::slot::BOOTLOADER_SLOT;

use crate::peripherals::{EIC, Sense};
use crate::{fpga, loader, pins};

/// Event bits, one per EXTINT line.
pub const EVT_SU_ATTN: u8 = 1 << pins::EXTINT_SU_ATTN;
pub const EVT_DFU_BTN: u8 = 1 << pins::EXTINT_DFU_BTN;

/// Lines that have fired since the foreground last drained the mask.
static PENDING: AtomicU8 = AtomicU8::new(0);

/// Configure rising-edge capture on the attention and button lines.
pub fn setup_eic() {
    EIC.enable_extint(pins::EXTINT_SU_ATTN, true, Sense::Rise);
    EIC.enable_extint(pins::EXTINT_DFU_BTN, true, Sense::Rise);
    EIC.enable_extint_irq(pins::EXTINT_SU_ATTN);
    EIC.enable_extint_irq(pins::EXTINT_DFU_BTN);
    EIC.enable();
}

/// Edge-capture handler body. Folds the latched lines into the pending mask
/// so an undrained event is never lost, then acks the hardware.
pub fn on_eic_irq() {
    let fired = EIC.pending();

    critical_section::with(|_| {
        PENDING.store(PENDING.load(Ordering::Relaxed) | fired, Ordering::Relaxed);
    });

    EIC.ack(fired);
}

/// Take the pending set, leaving it empty.
fn drain() -> u8 {
    critical_section::with(|_| {
        let pending = PENDING.load(Ordering::Relaxed);
        PENDING.store(0, Ordering::Relaxed);
        pending
    })
}

/// One foreground iteration: service pending events, then sleep until the
/// next interrupt. Returns `false` when a service path failed and the
/// supervisor should terminate.
pub fn poll() -> bool {
    let pending = drain();

    if pending & EVT_DFU_BTN != 0 {
        defmt::println!("dfu button");
        fpga::enter_cfg();
        if !loader::load_from_flash(BOOTLOADER_SLOT) {
            return false;
        }
    }

    if pending & EVT_SU_ATTN != 0 && !fpga::handle_attention() {
        return false;
    }

    asm::wfi();
    true
}

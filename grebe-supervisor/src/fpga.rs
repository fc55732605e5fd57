// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! ECP5 configuration port driver and the in-system control interface.
//!
//! Configuration commands are framed as one opcode byte plus three dummy
//! bytes. The sideband signals do the rest: PROG forces the device into
//! configuration state, INIT reports readiness, DONE reports a running user
//! design, and HOLD parks the shared bus between bitstream segments.

use embedded_hal::digital::InputPin;
use grebe_common::FaultCode;
use grebe_common::protocol::{
    self, Attention, CTRL_IRQ_ACK, CTRL_WRITE_DONE, ConfigStatus, FpgaCmd, IRQ_INVALID,
    decode_attention, reg,
};
use grebe_common::slot::{BOOTLOADER_SLOT, EPHEMERAL_SLOT, HEADER_LEN};

use crate::peripherals::{PORTA, PinFunc, RawPin};
use crate::spi::fpga_xfr;
use crate::timing::delay;
use crate::{fault, loader, pins};

/// Configure the sideband signals: PROG and HOLD driven high, INIT and DONE
/// as inputs.
pub fn setup_ctrl_pins() {
    PORTA.set_high(pins::FPGA_HOLD);
    PORTA.set_high(pins::FPGA_PROG);

    PORTA.setup_pin(pins::FPGA_INIT, false, true, false, false, PinFunc::A);
    PORTA.set_input(pins::FPGA_INIT);

    PORTA.set_output(pins::FPGA_HOLD);
    PORTA.set_output(pins::FPGA_PROG);

    PORTA.setup_pin(pins::FPGA_DONE, false, true, false, false, PinFunc::A);
    PORTA.set_input(pins::FPGA_DONE);
}

/// Pulse PROG to force the device into configuration state.
pub fn enter_cfg() {
    PORTA.set_low(pins::FPGA_PROG);
    delay(1);
    PORTA.set_high(pins::FPGA_PROG);
    delay(50);
}

pub fn init_high() -> bool {
    PORTA.pin_state(pins::FPGA_INIT)
}

pub fn done_high() -> bool {
    PORTA.pin_state(pins::FPGA_DONE)
}

/// True while the device is ready to take a bitstream: INIT released, DONE
/// still low.
pub fn in_configuration_state() -> bool {
    init_high() && !done_high()
}

/// Send a command and read back the response bytes.
fn cmd_read(cmd: FpgaCmd, data: &mut [u8]) {
    PORTA.set_low(pins::FPGA_CS);

    let _ = fpga_xfr(cmd as u8);
    for _ in 0..3 {
        let _ = fpga_xfr(0);
    }

    for byte in data {
        *byte = fpga_xfr(0);
    }

    PORTA.set_high(pins::FPGA_CS);
}

/// Send a command with no data phase.
fn cmd_run(cmd: FpgaCmd) {
    PORTA.set_low(pins::FPGA_CS);

    let _ = fpga_xfr(cmd as u8);
    for _ in 0..3 {
        let _ = fpga_xfr(0);
    }

    PORTA.set_high(pins::FPGA_CS);
}

/// Read the 32-bit device idcode.
pub fn read_id() -> u32 {
    let mut id = [0u8; 4];
    cmd_read(FpgaCmd::ReadId, &mut id);
    u32::from_be_bytes(id)
}

/// Read the configuration status word.
pub fn read_status() -> ConfigStatus {
    let mut raw = [0u8; 4];
    cmd_read(FpgaCmd::ReadStatus, &mut raw);
    ConfigStatus(u32::from_be_bytes(raw))
}

/// Open configuration access.
pub fn enable() {
    cmd_run(FpgaCmd::Enable);
}

/// Close configuration access. With a bitstream loaded this starts the
/// transition to user mode, observable on DONE.
pub fn disable() {
    cmd_run(FpgaCmd::Disable);
}

/// Start a bitstream burst. Chip select stays low until `end_bitstream`.
pub fn begin_bitstream() {
    PORTA.set_low(pins::FPGA_CS);

    let _ = fpga_xfr(FpgaCmd::WriteBitstream as u8);
    for _ in 0..3 {
        let _ = fpga_xfr(0);
    }
}

/// Shift one segment out. HOLD is raised for the duration and dropped at
/// the boundary so the device accepts the next segment.
pub fn write_segment(data: &[u8]) {
    PORTA.set_high(pins::FPGA_HOLD);
    for &byte in data {
        let _ = fpga_xfr(byte);
    }
    PORTA.set_low(pins::FPGA_HOLD);
}

pub fn end_bitstream() {
    PORTA.set_high(pins::FPGA_CS);
}

// --- In-system control interface ---

/// Read one register of the control interface: address byte out, data byte
/// back.
fn read_register(addr: u8) -> u8 {
    PORTA.set_low(pins::FPGA_CS);
    let _ = fpga_xfr(addr);
    let value = fpga_xfr(0);
    PORTA.set_high(pins::FPGA_CS);
    value
}

fn write_register(addr: u8, value: u8) {
    PORTA.set_low(pins::FPGA_CS);
    let _ = fpga_xfr(addr);
    let _ = fpga_xfr(value);
    PORTA.set_high(pins::FPGA_CS);
}

/// Service an attention request from the running gateware.
pub fn handle_attention() -> bool {
    let irq = read_register(reg::IRQ);

    if irq == IRQ_INVALID {
        // The attention line is held for the duration of a real request; if
        // it has already dropped we were wiggled by a glitch.
        let mut attn = RawPin::new(pins::SU_ATTN);
        if attn.is_low().unwrap_or(false) {
            return true;
        }
        fault::raise(FaultCode::AttnRespBad);
        return false;
    }

    match decode_attention(irq) {
        Some(Attention::WantDfu) => {
            defmt::println!("attention: dfu");
            enter_cfg();
            loader::load_from_flash(BOOTLOADER_SLOT)
        }
        Some(Attention::WriteSlot) => {
            let slot = read_register(reg::SLOT);
            let dest = protocol::slot_dest(slot);
            let txlen = protocol::assemble_txlen(
                read_register(reg::TXLEN_HIGH),
                read_register(reg::TXLEN_LOW),
            );
            defmt::println!("attention: write slot {}, {} bytes", dest, txlen);

            write_register(reg::CTRL, CTRL_IRQ_ACK);

            if dest != EPHEMERAL_SLOT {
                let payload = u32::from(txlen.saturating_sub(HEADER_LEN as u16));
                if !loader::move_to_slot(dest, payload) {
                    return false;
                }
            }

            write_register(reg::CTRL, CTRL_WRITE_DONE);

            // The boot request arrives in its own attention cycle
            true
        }
        Some(Attention::Boot) => {
            let slot = protocol::slot_boot(read_register(reg::SLOT));
            defmt::println!("attention: boot slot {}", slot);

            enter_cfg();
            if slot == EPHEMERAL_SLOT {
                loader::load_from_ram()
            } else {
                loader::load_from_flash(slot)
            }
        }
        None => true,
    }
}

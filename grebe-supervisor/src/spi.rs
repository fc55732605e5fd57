// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Byte transfer primitives for the two serial buses, and the bus bring-up
//! probe.
//!
//! The configuration flash hangs off SERCOM0. The FPGA configuration port
//! and the scratch RAM share a bit-banged bus. Both primitives move exactly
//! one byte; chip select and framing are the caller's responsibility.

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::asm;
use grebe_common::FaultCode;
use grebe_common::protocol::{FLASH_JEDEC_ID, psram_id_ok};
use grebe_common::slot::FpgaId;

use crate::peripherals::{PORTA, PinFunc, SERCOM0_SPI};
use crate::{fault, flash, fpga, pins, psram};

/// FPGA identities this board accepts.
const ACCEPTED_FPGAS: [FpgaId; 6] = [
    FpgaId::Lfe5um25,
    FpgaId::Lfe5um45,
    FpgaId::Lfe5um85,
    FpgaId::Lfe5um5g25,
    FpgaId::Lfe5um5g45,
    FpgaId::Lfe5um5g85,
];

/// Idcode of the FPGA found at probe time, the authority for all later slot
/// header validation. Written once by `setup_spi`.
static ACTIVE_FPGA_ID: AtomicU32 = AtomicU32::new(0);

pub fn active_fpga_id() -> u32 {
    ACTIVE_FPGA_ID.load(Ordering::Relaxed)
}

fn setup_flash_pins() {
    // Chip select is driven by hand
    PORTA.setup_pin(pins::FLASH_CS, false, false, false, false, PinFunc::C);
    PORTA.set_high(pins::FLASH_CS);
    PORTA.set_output(pins::FLASH_CS);

    PORTA.setup_pin(pins::FLASH_CLK, true, false, false, false, PinFunc::D);
    PORTA.set_output(pins::FLASH_CLK);

    PORTA.setup_pin(pins::FLASH_COPI, true, false, false, false, PinFunc::C);
    PORTA.set_output(pins::FLASH_COPI);

    PORTA.setup_pin(pins::FLASH_CIPO, true, true, false, false, PinFunc::D);
    PORTA.set_input(pins::FLASH_CIPO);
}

fn setup_fpga_pins() {
    // The RAM selects on high, so its select idles low
    PORTA.set_low(pins::PSRAM_CS);
    PORTA.set_output(pins::PSRAM_CS);

    PORTA.set_high(pins::FPGA_CS);
    PORTA.set_output(pins::FPGA_CS);

    PORTA.set_low(pins::FPGA_CLK);
    PORTA.set_output(pins::FPGA_CLK);

    PORTA.set_low(pins::FPGA_COPI);
    PORTA.set_output(pins::FPGA_COPI);

    PORTA.setup_pin(pins::FPGA_CIPO, false, true, false, false, PinFunc::A);
    PORTA.set_input(pins::FPGA_CIPO);

    fpga::setup_ctrl_pins();
}

fn setup_sercom() {
    if SERCOM0_SPI.enabled() {
        SERCOM0_SPI.disable();
    }

    setup_flash_pins();

    SERCOM0_SPI.configure();
    // baud = (32 MHz / (2 * 16 MHz)) - 1
    SERCOM0_SPI.set_baud(0);
    // Receiver on
    SERCOM0_SPI.set_ctrlb(1 << 17);
    while SERCOM0_SPI.sync_busy_ctrlb() {}

    SERCOM0_SPI.enable();
}

/// Bring up both buses and probe the devices on them, caching the FPGA
/// identity on success.
pub fn setup_spi() -> bool {
    setup_sercom();
    setup_fpga_pins();

    let flash_id = flash::jedec_id();
    if flash_id != FLASH_JEDEC_ID {
        fault::raise(FaultCode::FlashIdBad);
        return false;
    }

    let ram_id = psram::read_id();
    if !psram_id_ok(&ram_id) {
        fault::raise(FaultCode::PsramIdBad);
        return false;
    }

    fpga::enter_cfg();

    let raw_id = fpga::read_id();
    let known = FpgaId::from_u32(raw_id);
    if !known.is_some_and(|id| ACCEPTED_FPGAS.contains(&id)) {
        fault::raise(FaultCode::FpgaIdBad);
        return false;
    }
    ACTIVE_FPGA_ID.store(raw_id, Ordering::Relaxed);

    defmt::println!("buses up, fpga id 0x{:08x}", raw_id);
    true
}

/// Exchange one byte with the configuration flash over SERCOM0.
pub fn flash_xfr(data: u8) -> u8 {
    SERCOM0_SPI.write_data(data);

    while !SERCOM0_SPI.receive_complete() {}

    SERCOM0_SPI.read_data()
}

/// Exchange one byte on the bit-banged bus. Data changes on the falling
/// clock edge and is sampled on the rising edge, MSB first; the clock is
/// left low afterwards.
pub fn fpga_xfr(data: u8) -> u8 {
    let mut res = 0u8;

    for bit in (0..8).rev() {
        PORTA.set_low(pins::FPGA_CLK);
        PORTA.set_value((data >> bit) & 1 != 0, pins::FPGA_COPI);

        asm::nop();
        asm::nop();

        PORTA.set_high(pins::FPGA_CLK);
        res |= u8::from(PORTA.pin_state(pins::FPGA_CIPO)) << bit;
    }

    PORTA.set_low(pins::FPGA_CLK);

    res
}

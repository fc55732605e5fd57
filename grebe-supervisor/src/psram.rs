// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Scratch-RAM driver.
//!
//! The RAM sits on the bit-banged bus next to the FPGA with the opposite
//! chip-select polarity: it selects on high. Commands reuse the flash
//! framing; transfers run in 256-byte pages. The gateware fills the RAM,
//! so the supervisor side only ever reads it.

use grebe_common::protocol::{BusCmd, PSRAM_PAGE_SIZE, psram_cmd};

use crate::peripherals::PORTA;
use crate::pins;
use crate::spi::fpga_xfr;

fn begin(cmd: BusCmd, addr: u32) {
    PORTA.set_high(pins::PSRAM_CS);

    let _ = fpga_xfr(cmd.opcode());

    if cmd.has_addr() {
        let _ = fpga_xfr((addr >> 16) as u8);
        let _ = fpga_xfr((addr >> 8) as u8);
        let _ = fpga_xfr(addr as u8);
    }

    for _ in 0..cmd.dummy_bytes() {
        let _ = fpga_xfr(0);
    }
}

fn end() {
    PORTA.set_low(pins::PSRAM_CS);
}

/// Read the three identification bytes. The command carries three zeroed
/// address bytes before the response.
pub fn read_id() -> [u8; 3] {
    let mut id = [0u8; 3];

    begin(psram_cmd::READ_ID, 0);
    for byte in &mut id {
        *byte = fpga_xfr(0);
    }
    end();

    id
}

/// Read `buf.len()` bytes starting at `addr`, page by page.
pub fn read(addr: u32, buf: &mut [u8]) {
    for (i, page) in buf.chunks_mut(PSRAM_PAGE_SIZE).enumerate() {
        begin(psram_cmd::READ, addr + (i * PSRAM_PAGE_SIZE) as u32);
        for byte in page.iter_mut() {
            *byte = fpga_xfr(0);
        }
        end();
    }
}

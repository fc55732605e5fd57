// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Configuration flash driver.
//!
//! Every command is framed as opcode, optional 24-bit address, dummy bytes,
//! then the data phase, with chip select held low for the duration. All
//! operations are synchronous: erase and program spin on the status
//! register before returning.

use grebe_common::protocol::{
    BusCmd, FLASH_PAGE_SIZE, FLASH_SECTOR_SIZE, STATUS_BUSY_MASK, flash_cmd,
};

use crate::peripherals::PORTA;
use crate::pins;
use crate::spi::flash_xfr;

/// Select the device and shift out the command, address and dummy phases.
fn begin(cmd: BusCmd, addr: u32) {
    PORTA.set_low(pins::FLASH_CS);

    let _ = flash_xfr(cmd.opcode());

    if cmd.has_addr() {
        let _ = flash_xfr((addr >> 16) as u8);
        let _ = flash_xfr((addr >> 8) as u8);
        let _ = flash_xfr(addr as u8);
    }

    for _ in 0..cmd.dummy_bytes() {
        let _ = flash_xfr(0);
    }
}

fn end() {
    PORTA.set_high(pins::FLASH_CS);
}

/// Run a command with no data phase.
fn run(cmd: BusCmd, addr: u32) {
    begin(cmd, addr);
    end();
}

/// Spin until BSY and WEL have both cleared.
fn wait_ready() {
    begin(flash_cmd::READ_STATUS, 0);
    while flash_xfr(0) & STATUS_BUSY_MASK != 0 {}
    end();
}

/// Read the three JEDEC identification bytes.
pub fn jedec_id() -> [u8; 3] {
    let mut id = [0u8; 3];

    begin(flash_cmd::READ_ID, 0);
    for byte in &mut id {
        *byte = flash_xfr(0);
    }
    end();

    id
}

/// Stream `buf.len()` bytes starting at `addr`.
pub fn read(addr: u32, buf: &mut [u8]) {
    begin(flash_cmd::READ, addr);
    for byte in buf {
        *byte = flash_xfr(0);
    }
    end();
}

/// Erase every 4 KiB sector overlapping `addr..addr + length`.
pub fn erase(addr: u32, length: u32) {
    let aligned = addr & !(FLASH_SECTOR_SIZE - 1);
    let span = length + (addr & (FLASH_SECTOR_SIZE - 1));

    let mut off = 0;
    while off < span {
        run(flash_cmd::WRITE_ENABLE, 0);
        run(flash_cmd::SECTOR_ERASE, aligned + off);
        wait_ready();
        off += FLASH_SECTOR_SIZE;
    }
}

/// Program `buf` at `addr` in 256-byte pages. The range must already be
/// erased.
pub fn program(addr: u32, buf: &[u8]) {
    for (i, page) in buf.chunks(FLASH_PAGE_SIZE).enumerate() {
        run(flash_cmd::WRITE_ENABLE, 0);

        begin(flash_cmd::PAGE_PROGRAM, addr + (i * FLASH_PAGE_SIZE) as u32);
        for &byte in page {
            let _ = flash_xfr(byte);
        }
        end();

        wait_ready();
    }
}

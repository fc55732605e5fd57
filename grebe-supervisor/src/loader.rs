// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Bitstream loader and slot manager.
//!
//! Both loaders and the slot copy share one statically allocated staging
//! buffer. A single transfer is in flight at a time and everything here
//! runs in the foreground, so the buffer is handed out once per entry
//! point.

use grebe_common::FaultCode;
use grebe_common::protocol::XFER_BUF_SIZE;
use grebe_common::slot::{HEADER_LEN, HeaderError, SlotHeader, slot_offset};

use crate::{fault, flash, fpga, psram, spi};

static mut STAGING: [u8; XFER_BUF_SIZE] = [0; XFER_BUF_SIZE];

// Foreground only, one caller at a time.
fn staging() -> &'static mut [u8; XFER_BUF_SIZE] {
    unsafe { &mut *core::ptr::addr_of_mut!(STAGING) }
}

/// Validate a header against the cached FPGA identity, recording the
/// matching fault on failure.
fn check_header(header: &SlotHeader) -> bool {
    match header.validate(spi::active_fpga_id()) {
        Ok(()) => true,
        Err(HeaderError::Invalid) => {
            fault::raise(FaultCode::SlotHeaderBad);
            false
        }
        Err(HeaderError::IdMismatch) => {
            fault::raise(FaultCode::FpgaIdMismatch);
            false
        }
    }
}

/// Status verdict, leave configuration, then check the sideband pins.
fn finish_load() -> bool {
    let status = fpga::read_status();
    if status.id_mismatch() {
        fault::raise(FaultCode::FpgaBitMismatch);
        return false;
    }

    fpga::disable();

    if !fpga::init_high() || !fpga::done_high() {
        fault::raise(FaultCode::FpgaCfgFailed);
        return false;
    }

    defmt::println!("configuration done");
    true
}

/// Stream the bitstream in a flash slot into the FPGA.
pub fn load_from_flash(index: u8) -> bool {
    let Some(base) = slot_offset(index) else {
        fault::raise(FaultCode::SlotIndexBad);
        return false;
    };

    let mut raw = [0u8; HEADER_LEN];
    flash::read(base, &mut raw);
    let header = SlotHeader::from_bytes(&raw);
    if !check_header(&header) {
        return false;
    }

    if !fpga::in_configuration_state() {
        fault::raise(FaultCode::FpgaCfgInvalid);
        return false;
    }

    let len = header.bitstream_len();
    defmt::println!("loading slot {}, {} bytes", index, len);

    fpga::enable();
    fpga::begin_bitstream();

    let buf = staging();
    let mut sent = 0u32;
    while sent < len {
        let n = (len - sent).min(XFER_BUF_SIZE as u32) as usize;
        flash::read(base + HEADER_LEN as u32 + sent, &mut buf[..n]);
        fpga::write_segment(&buf[..n]);
        sent += n as u32;
    }

    fpga::end_bitstream();
    finish_load()
}

/// Stream a bitstream image sitting in scratch RAM into the FPGA without
/// persisting it.
pub fn load_from_ram() -> bool {
    let buf = staging();

    psram::read(0, buf);

    let mut raw = [0u8; HEADER_LEN];
    raw.copy_from_slice(&buf[..HEADER_LEN]);
    let header = SlotHeader::from_bytes(&raw);
    if !check_header(&header) {
        return false;
    }

    let len = header.bitstream_len();
    defmt::println!("loading ephemeral image, {} bytes", len);

    fpga::enter_cfg();
    fpga::enable();
    fpga::begin_bitstream();

    // The first segment is what followed the header in the opening page
    let first = len.min((XFER_BUF_SIZE - HEADER_LEN) as u32) as usize;
    fpga::write_segment(&buf[HEADER_LEN..HEADER_LEN + first]);

    let mut sent = first as u32;
    let mut addr = XFER_BUF_SIZE as u32;
    while sent < len {
        let n = (len - sent).min(XFER_BUF_SIZE as u32) as usize;
        psram::read(addr, &mut buf[..n]);
        fpga::write_segment(&buf[..n]);
        sent += n as u32;
        addr += n as u32;
    }

    fpga::end_bitstream();
    finish_load()
}

/// Copy a freshly received image from scratch RAM into a flash slot. The
/// header is part of the image; `expected_len` counts payload bytes only.
pub fn move_to_slot(index: u8, expected_len: u32) -> bool {
    let Some(base) = slot_offset(index) else {
        fault::raise(FaultCode::SlotIndexBad);
        return false;
    };

    let buf = staging();

    psram::read(0, &mut buf[..HEADER_LEN]);
    let mut raw = [0u8; HEADER_LEN];
    raw.copy_from_slice(&buf[..HEADER_LEN]);
    let header = SlotHeader::from_bytes(&raw);
    if !check_header(&header) {
        return false;
    }
    if header.bitstream_len() != expected_len {
        fault::raise(FaultCode::SlotSizeMismatch);
        return false;
    }

    let total = expected_len + HEADER_LEN as u32;
    defmt::println!("writing {} bytes into slot {}", total, index);

    flash::erase(base, total);

    let mut off = 0u32;
    while off < total {
        let n = (total - off).min(XFER_BUF_SIZE as u32) as usize;
        psram::read(off, &mut buf[..n]);
        flash::program(base + off, &buf[..n]);
        off += n as u32;
    }

    true
}

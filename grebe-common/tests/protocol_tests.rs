// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Unit tests for the bus command encoding, device identities, FPGA status
//! decode and the in-system control register protocol.

use grebe_common::protocol::{
    Attention, BSE_INVALID_ID, ConfigStatus, FLASH_JEDEC_ID, FpgaCmd, IRQ_BOOT, IRQ_WANT_DFU,
    IRQ_WRITE_SLOT, assemble_txlen, decode_attention, flash_cmd, psram_cmd, psram_id_ok, reg,
    slot_boot, slot_dest,
};

// --- Bus command encoding ---

#[test]
fn test_read_command_framing() {
    assert_eq!(flash_cmd::READ.opcode(), 0x03);
    assert!(flash_cmd::READ.has_addr());
    assert_eq!(flash_cmd::READ.dummy_bytes(), 0);
}

#[test]
fn test_addressed_commands() {
    for cmd in [
        flash_cmd::READ,
        flash_cmd::PAGE_PROGRAM,
        flash_cmd::SECTOR_ERASE,
        psram_cmd::READ,
        psram_cmd::WRITE,
    ] {
        assert!(cmd.has_addr());
        assert_eq!(cmd.dummy_bytes(), 0);
    }
}

#[test]
fn test_plain_commands_have_no_address_phase() {
    for cmd in [
        flash_cmd::WRITE_ENABLE,
        flash_cmd::WRITE_DISABLE,
        flash_cmd::READ_STATUS,
        flash_cmd::CHIP_ERASE,
        flash_cmd::READ_ID,
    ] {
        assert!(!cmd.has_addr());
        assert_eq!(cmd.dummy_bytes(), 0);
    }
}

#[test]
fn test_wire_opcodes() {
    assert_eq!(flash_cmd::WRITE_ENABLE.opcode(), 0x06);
    assert_eq!(flash_cmd::WRITE_DISABLE.opcode(), 0x04);
    assert_eq!(flash_cmd::READ_STATUS.opcode(), 0x05);
    assert_eq!(flash_cmd::PAGE_PROGRAM.opcode(), 0x02);
    assert_eq!(flash_cmd::SECTOR_ERASE.opcode(), 0x20);
    assert_eq!(flash_cmd::CHIP_ERASE.opcode(), 0x60);
    assert_eq!(flash_cmd::READ_ID.opcode(), 0x9F);
    assert_eq!(flash_cmd::READ_SFDP.opcode(), 0x5A);
}

#[test]
fn test_sfdp_read_has_one_dummy_byte() {
    assert!(flash_cmd::READ_SFDP.has_addr());
    assert_eq!(flash_cmd::READ_SFDP.dummy_bytes(), 1);
}

#[test]
fn test_psram_id_read_carries_address_padding() {
    assert_eq!(psram_cmd::READ_ID.opcode(), 0x9F);
    assert!(psram_cmd::READ_ID.has_addr());
    assert_eq!(psram_cmd::READ_ID.dummy_bytes(), 0);
}

// --- Device identities ---

#[test]
fn test_expected_flash_jedec_id() {
    assert_eq!(FLASH_JEDEC_ID, [0xC8, 0x40, 0x17]);
}

#[test]
fn test_psram_id_accepts_32mbit_issi() {
    assert!(psram_id_ok(&[0x9D, 0x00, 0x40]));
    assert!(psram_id_ok(&[0x9D, 0x5D, 0x5F]));
}

#[test]
fn test_psram_id_rejects_wrong_vendor() {
    assert!(!psram_id_ok(&[0x0D, 0x00, 0x40]));
    assert!(!psram_id_ok(&[0xFF, 0xFF, 0xFF]));
}

#[test]
fn test_psram_id_rejects_wrong_density() {
    assert!(!psram_id_ok(&[0x9D, 0x00, 0x20]));
    assert!(!psram_id_ok(&[0x9D, 0x00, 0x60]));
}

// --- FPGA configuration commands and status ---

#[test]
fn test_fpga_command_opcodes() {
    assert_eq!(FpgaCmd::Nop as u8, 0xFF);
    assert_eq!(FpgaCmd::ReadId as u8, 0xE0);
    assert_eq!(FpgaCmd::ReadStatus as u8, 0x3C);
    assert_eq!(FpgaCmd::Enable as u8, 0xC6);
    assert_eq!(FpgaCmd::Disable as u8, 0x26);
    assert_eq!(FpgaCmd::WriteBitstream as u8, 0x7A);
}

#[test]
fn test_status_done_bit() {
    assert!(ConfigStatus(1 << 8).done());
    assert!(!ConfigStatus(0).done());
}

#[test]
fn test_status_id_mismatch_from_id_error() {
    assert!(ConfigStatus(1 << 27).id_mismatch());
}

#[test]
fn test_status_id_mismatch_from_bse_code() {
    assert!(ConfigStatus(BSE_INVALID_ID << 23).id_mismatch());
}

#[test]
fn test_status_other_bse_codes_are_not_id_mismatch() {
    // CRC error code
    assert!(!ConfigStatus(0b011 << 23).id_mismatch());
    assert_eq!(ConfigStatus(0b011 << 23).bse_error_code(), 0b011);
}

#[test]
fn test_status_clean_after_configuration() {
    let status = ConfigStatus(1 << 8);
    assert!(!status.busy());
    assert!(!status.fail());
    assert!(!status.id_mismatch());
}

// --- Control register file ---

#[test]
fn test_register_addresses() {
    assert_eq!(reg::CTRL, 0);
    assert_eq!(reg::SLOT, 1);
    assert_eq!(reg::TXLEN_HIGH, 2);
    assert_eq!(reg::TXLEN_MID, 3);
    assert_eq!(reg::TXLEN_LOW, 4);
    assert_eq!(reg::IRQ, 5);
}

#[test]
fn test_slot_register_nibbles() {
    assert_eq!(slot_dest(0x20), 2);
    assert_eq!(slot_boot(0x20), 0);
    assert_eq!(slot_dest(0x3F), 3);
    assert_eq!(slot_boot(0x3F), 0xF);
}

#[test]
fn test_txlen_assembly() {
    assert_eq!(assemble_txlen(0x08, 0x00), 0x0800);
    assert_eq!(assemble_txlen(0x12, 0x34), 0x1234);
    assert_eq!(assemble_txlen(0x00, 0x00), 0);
}

// --- Attention decode ---

#[test]
fn test_attention_priority_dfu_first() {
    assert_eq!(decode_attention(0b111), Some(Attention::WantDfu));
    assert_eq!(decode_attention(0b011), Some(Attention::WantDfu));
    assert_eq!(decode_attention(0b101), Some(Attention::WantDfu));
}

#[test]
fn test_attention_write_slot_over_boot() {
    assert_eq!(decode_attention(0b110), Some(Attention::WriteSlot));
}

#[test]
fn test_attention_single_bits() {
    assert_eq!(decode_attention(IRQ_WANT_DFU), Some(Attention::WantDfu));
    assert_eq!(decode_attention(IRQ_WRITE_SLOT), Some(Attention::WriteSlot));
    assert_eq!(decode_attention(IRQ_BOOT), Some(Attention::Boot));
}

#[test]
fn test_attention_no_request() {
    assert_eq!(decode_attention(0), None);
    assert_eq!(decode_attention(0b1000), None);
}

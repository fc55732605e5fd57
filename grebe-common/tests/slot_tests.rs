// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Unit tests for the slot header layout and validation rules.

use grebe_common::slot::{
    APPLET_SLOT, BOOTLOADER_SLOT, EPHEMERAL_SLOT, FpgaId, HEADER_LEN, HeaderError, SLOT_SIZE,
    SlotHeader, slot_offset,
};

const LFE5UM45: u32 = FpgaId::Lfe5um45 as u32;

fn header_bytes(idcode: u32, flags: u8, len: u32) -> [u8; HEADER_LEN] {
    let id = idcode.to_be_bytes();
    [
        id[0],
        id[1],
        id[2],
        id[3],
        flags,
        len as u8,
        (len >> 8) as u8,
        (len >> 16) as u8,
    ]
}

// =============================================================================
// Header layout tests
// =============================================================================

#[test]
fn test_length_is_little_endian_24_bit() {
    let header = SlotHeader::from_bytes(&[0, 0, 0, 0, 0, 0x78, 0x56, 0x12]);
    assert_eq!(header.bitstream_len(), 0x0012_5678);
}

#[test]
fn test_idcode_is_big_endian() {
    let header = SlotHeader::from_bytes(&[0x01, 0x11, 0x20, 0x43, 0, 0, 0, 0]);
    assert_eq!(header.idcode, 0x0111_2043);
}

#[test]
fn test_header_fields() {
    let header = SlotHeader::from_bytes(&header_bytes(LFE5UM45, 0xA5, 0x1000));
    assert_eq!(header.idcode, LFE5UM45);
    assert_eq!(header.flags, 0xA5);
    assert_eq!(header.bitstream_len(), 0x1000);
}

// =============================================================================
// Validation tests
// =============================================================================

#[test]
fn test_valid_header_accepted() {
    let header = SlotHeader::from_bytes(&header_bytes(LFE5UM45, 0, 0x1000));
    assert_eq!(header.validate(LFE5UM45), Ok(()));
}

#[test]
fn test_erased_idcode_rejected() {
    let header = SlotHeader::from_bytes(&header_bytes(0xFFFF_FFFF, 0, 0x1000));
    assert_eq!(header.validate(LFE5UM45), Err(HeaderError::Invalid));
}

#[test]
fn test_all_ones_length_rejected() {
    let header = SlotHeader::from_bytes(&header_bytes(LFE5UM45, 0, 0x00FF_FFFF));
    assert_eq!(header.validate(LFE5UM45), Err(HeaderError::Invalid));
}

#[test]
fn test_fully_erased_header_rejected() {
    let header = SlotHeader::from_bytes(&[0xFF; HEADER_LEN]);
    assert_eq!(header.validate(LFE5UM45), Err(HeaderError::Invalid));
}

#[test]
fn test_id_mismatch_rejected() {
    let header = SlotHeader::from_bytes(&header_bytes(FpgaId::Lfe5um25 as u32, 0, 0x1000));
    assert_eq!(header.validate(LFE5UM45), Err(HeaderError::IdMismatch));
}

#[test]
fn test_zero_length_is_not_invalid() {
    // Only the all-ones length marks an erased slot
    let header = SlotHeader::from_bytes(&header_bytes(LFE5UM45, 0, 0));
    assert_eq!(header.validate(LFE5UM45), Ok(()));
}

// =============================================================================
// Slot offset tests
// =============================================================================

#[test]
fn test_slot_offsets() {
    assert_eq!(slot_offset(BOOTLOADER_SLOT), Some(0));
    assert_eq!(slot_offset(APPLET_SLOT), Some(SLOT_SIZE));
    assert_eq!(slot_offset(2), Some(2 * SLOT_SIZE));
}

#[test]
fn test_ephemeral_slot_has_no_flash_offset() {
    assert_eq!(slot_offset(EPHEMERAL_SLOT), None);
}

#[test]
fn test_out_of_range_slots_rejected() {
    assert_eq!(slot_offset(4), None);
    assert_eq!(slot_offset(255), None);
}

// =============================================================================
// FPGA idcode tests
// =============================================================================

#[test]
fn test_known_fpga_ids_roundtrip() {
    let ids = [
        FpgaId::Lfe5um25,
        FpgaId::Lfe5um45,
        FpgaId::Lfe5um85,
        FpgaId::Lfe5um5g25,
        FpgaId::Lfe5um5g45,
        FpgaId::Lfe5um5g85,
    ];
    for id in ids {
        assert_eq!(FpgaId::from_u32(id as u32), Some(id));
    }
}

#[test]
fn test_unknown_fpga_id() {
    assert_eq!(FpgaId::from_u32(0xDEAD_BEEF), None);
    assert_eq!(FpgaId::from_u32(0xFFFF_FFFF), None);
}

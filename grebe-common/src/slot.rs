// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Bitstream slot layout and header validation.
//!
//! The configuration flash holds three 2 MiB slots back to back, each a
//! bitstream image prefixed by an 8-byte header, followed by a 2 MiB data
//! region the supervisor never touches. Slot index 3 is the ephemeral slot:
//! its payload lives only in scratch RAM and is never written to flash.

/// Size of the header at the start of every slot image.
pub const HEADER_LEN: usize = 8;

/// Each flash-backed slot spans 2 MiB including its header.
pub const SLOT_SIZE: u32 = 2 * 1024 * 1024;

/// Number of flash-backed slots.
pub const SLOT_COUNT: u8 = 3;

pub const BOOTLOADER_SLOT: u8 = 0;
pub const APPLET_SLOT: u8 = 1;

/// The ephemeral slot index; no flash backing.
pub const EPHEMERAL_SLOT: u8 = 3;

/// Idcode of an erased header.
const IDCODE_ERASED: u32 = 0xFFFF_FFFF;

/// All-ones payload length of an erased header.
const LEN_ERASED: u32 = 0x00FF_FFFF;

/// ECP5 idcodes the supervisor knows about.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u32)]
pub enum FpgaId {
    Lfe5um25 = 0x0111_1043,
    Lfe5um45 = 0x0111_2043,
    Lfe5um85 = 0x0111_3043,
    Lfe5um5g25 = 0x8111_1043,
    Lfe5um5g45 = 0x8111_2043,
    Lfe5um5g85 = 0x8111_3043,
}

impl FpgaId {
    pub fn from_u32(raw: u32) -> Option<Self> {
        match raw {
            0x0111_1043 => Some(FpgaId::Lfe5um25),
            0x0111_2043 => Some(FpgaId::Lfe5um45),
            0x0111_3043 => Some(FpgaId::Lfe5um85),
            0x8111_1043 => Some(FpgaId::Lfe5um5g25),
            0x8111_2043 => Some(FpgaId::Lfe5um5g45),
            0x8111_3043 => Some(FpgaId::Lfe5um5g85),
            _ => None,
        }
    }
}

/// Why a slot header failed validation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HeaderError {
    /// Erased or corrupt: sentinel idcode or all-ones length.
    Invalid,
    /// Well-formed, but built for a different device.
    IdMismatch,
}

/// The 8-byte header at the start of every slot image: a big-endian idcode,
/// one byte of feature flags, and a little-endian 24-bit payload length.
#[derive(Clone, Copy, Debug)]
pub struct SlotHeader {
    pub idcode: u32,
    pub flags: u8,
    len: [u8; 3],
}

impl SlotHeader {
    pub fn from_bytes(raw: &[u8; HEADER_LEN]) -> Self {
        Self {
            idcode: u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]),
            flags: raw[4],
            len: [raw[5], raw[6], raw[7]],
        }
    }

    /// Payload length in bytes, not counting the header itself.
    pub fn bitstream_len(&self) -> u32 {
        u32::from(self.len[0]) | u32::from(self.len[1]) << 8 | u32::from(self.len[2]) << 16
    }

    /// Check the header against the live FPGA identity.
    pub fn validate(&self, fpga_id: u32) -> Result<(), HeaderError> {
        if self.idcode == IDCODE_ERASED || self.bitstream_len() == LEN_ERASED {
            return Err(HeaderError::Invalid);
        }
        if self.idcode != fpga_id {
            return Err(HeaderError::IdMismatch);
        }
        Ok(())
    }
}

/// Flash offset of a slot. `None` for the ephemeral slot and out-of-range
/// indices, which have no flash backing.
pub fn slot_offset(index: u8) -> Option<u32> {
    if index < SLOT_COUNT {
        Some(u32::from(index) * SLOT_SIZE)
    } else {
        None
    }
}

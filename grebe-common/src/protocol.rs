// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Wire protocols shared by the flash, scratch-RAM and FPGA drivers.

use bitfield::bitfield;

// --- Flash geometry ---

pub const FLASH_SECTOR_SIZE: u32 = 4096;
pub const FLASH_PAGE_SIZE: usize = 256;

/// Scratch-RAM transfers run in pages of this size.
pub const PSRAM_PAGE_SIZE: usize = 256;

/// The single staging buffer shared by the loader and the slot copy.
pub const XFER_BUF_SIZE: usize = 1024;

// --- Serial bus command encoding ---

/// Bit 11 marks a command that carries a 24-bit address phase.
pub const CMD_HAS_ADDR: u16 = 0x0800;

/// Bits 8..10 count dummy bytes between the address and data phases.
pub const CMD_DUMMY_MASK: u16 = 0x0700;

/// One serial command: the low byte is the wire opcode, the upper bits
/// describe the framing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BusCmd(pub u16);

impl BusCmd {
    pub const fn opcode(self) -> u8 {
        self.0 as u8
    }

    pub const fn has_addr(self) -> bool {
        self.0 & CMD_HAS_ADDR != 0
    }

    pub const fn dummy_bytes(self) -> usize {
        ((self.0 & CMD_DUMMY_MASK) >> 8) as usize
    }
}

/// Configuration flash command set.
pub mod flash_cmd {
    use super::{BusCmd, CMD_HAS_ADDR};

    pub const WRITE_ENABLE: BusCmd = BusCmd(0x0006);
    pub const WRITE_DISABLE: BusCmd = BusCmd(0x0004);
    pub const READ_STATUS: BusCmd = BusCmd(0x0005);
    pub const READ: BusCmd = BusCmd(0x0003 | CMD_HAS_ADDR);
    pub const PAGE_PROGRAM: BusCmd = BusCmd(0x0002 | CMD_HAS_ADDR);
    pub const SECTOR_ERASE: BusCmd = BusCmd(0x0020 | CMD_HAS_ADDR);
    pub const CHIP_ERASE: BusCmd = BusCmd(0x0060);
    pub const READ_ID: BusCmd = BusCmd(0x009F);
    pub const READ_SFDP: BusCmd = BusCmd(0x005A | CMD_HAS_ADDR | 0x0100);
}

/// Scratch-RAM command set. Same encoding as the flash; the ID read wants
/// three zeroed address bytes before the response.
pub mod psram_cmd {
    use super::{BusCmd, CMD_HAS_ADDR};

    pub const READ: BusCmd = BusCmd(0x0003 | CMD_HAS_ADDR);
    pub const WRITE: BusCmd = BusCmd(0x0002 | CMD_HAS_ADDR);
    pub const READ_ID: BusCmd = BusCmd(0x009F | CMD_HAS_ADDR);
    pub const READ_STATUS: BusCmd = BusCmd(0x0005);
}

/// BSY and WEL status bits, polled down after erase and program.
pub const STATUS_BUSY_MASK: u8 = 0x03;

/// Expected JEDEC identity of the configuration flash (GigaDevice, 8 MiB).
pub const FLASH_JEDEC_ID: [u8; 3] = [0xC8, 0x40, 0x17];

/// First scratch-RAM identification byte (ISSI).
pub const PSRAM_VENDOR_ID: u8 = 0x9D;

/// Check the scratch-RAM identification bytes: vendor plus the density
/// field, which must read as 32 Mbit.
pub fn psram_id_ok(id: &[u8; 3]) -> bool {
    id[0] == PSRAM_VENDOR_ID && (id[2] >> 5) & 0x7 == 2
}

// --- FPGA configuration port ---

/// Configuration port commands, each sent as one opcode byte followed by
/// three dummy bytes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum FpgaCmd {
    Nop = 0xFF,
    ReadId = 0xE0,
    ReadStatus = 0x3C,
    Enable = 0xC6,
    Disable = 0x26,
    WriteBitstream = 0x7A,
}

bitfield! {
    /// The configuration status word, read big-endian over the port.
    pub struct ConfigStatus(u32);
    impl Debug;
    pub done, _: 8;
    pub busy, _: 12;
    pub fail, _: 13;
    pub bse_error_code, _: 25, 23;
    pub id_error, _: 27;
}

/// BSE error value reporting a bitstream/device identity mismatch.
pub const BSE_INVALID_ID: u32 = 0b001;

impl ConfigStatus {
    /// True when the device rejected the bitstream over an identity problem.
    pub fn id_mismatch(&self) -> bool {
        self.id_error() || self.bse_error_code() == BSE_INVALID_ID
    }
}

// --- In-system control register file ---

/// Register addresses on the in-system control interface.
pub mod reg {
    pub const CTRL: u8 = 0;
    pub const SLOT: u8 = 1;
    pub const TXLEN_HIGH: u8 = 2;
    /// Reserved for a future 24-bit transfer length.
    pub const TXLEN_MID: u8 = 3;
    pub const TXLEN_LOW: u8 = 4;
    pub const IRQ: u8 = 5;
}

pub const CTRL_WRITE_DONE: u8 = 1 << 0;
pub const CTRL_IRQ_ACK: u8 = 1 << 1;

pub const IRQ_WANT_DFU: u8 = 1 << 0;
pub const IRQ_WRITE_SLOT: u8 = 1 << 1;
pub const IRQ_BOOT: u8 = 1 << 2;

/// An IRQ register read of all ones is reserved as "invalid response".
pub const IRQ_INVALID: u8 = 0xFF;

/// Destination slot index from the SLOT register (high nibble).
pub const fn slot_dest(slot: u8) -> u8 {
    (slot & 0xF0) >> 4
}

/// Boot slot index from the SLOT register (low nibble).
pub const fn slot_boot(slot: u8) -> u8 {
    slot & 0x0F
}

/// Assemble the 16-bit transfer length from its two live registers.
pub const fn assemble_txlen(high: u8, low: u8) -> u16 {
    ((high as u16) << 8) | low as u16
}

/// A decoded attention request. When several bits are set in one read, the
/// highest-priority request wins.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Attention {
    WantDfu,
    WriteSlot,
    Boot,
}

/// Decode an IRQ register value. Returns `None` when no request bit is set.
pub fn decode_attention(irq: u8) -> Option<Attention> {
    if irq & IRQ_WANT_DFU != 0 {
        Some(Attention::WantDfu)
    } else if irq & IRQ_WRITE_SLOT != 0 {
        Some(Attention::WriteSlot)
    } else if irq & IRQ_BOOT != 0 {
        Some(Attention::Boot)
    } else {
        None
    }
}

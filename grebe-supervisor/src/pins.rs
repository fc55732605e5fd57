// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Pin assignments. Everything lives on PORT group A.

/// 32 MHz input clock.
pub const CLKIN: u8 = 8;

/// Supervisor status LEDs, active low.
pub const SU_LED_G: u8 = 2;
pub const SU_LED_R: u8 = 3;

/// User-facing DFU trigger button.
pub const DFU_BTN: u8 = 9;

/// Configuration flash bus (SERCOM0).
pub const FLASH_CS: u8 = 4;
pub const FLASH_CLK: u8 = 5;
pub const FLASH_COPI: u8 = 6;
pub const FLASH_CIPO: u8 = 7;

/// Scratch RAM chip select on the FPGA bus, active high.
pub const PSRAM_CS: u8 = 14;

/// Bit-banged FPGA comm/programming bus.
pub const FPGA_CS: u8 = 16;
pub const FPGA_COPI: u8 = 17;
pub const FPGA_CIPO: u8 = 22;
pub const FPGA_CLK: u8 = 23;

/// FPGA configuration interface signals.
pub const FPGA_HOLD: u8 = 10;
pub const FPGA_INIT: u8 = 24;
pub const FPGA_PROG: u8 = 25;
pub const FPGA_DONE: u8 = 27;

/// FPGA-to-supervisor attention line.
pub const SU_ATTN: u8 = 15;

/// EXTINT lines the attention and button pins map onto.
pub const EXTINT_SU_ATTN: u8 = 1;
pub const EXTINT_DFU_BTN: u8 = 7;

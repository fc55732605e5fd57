// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Supervisor firmware for the grebe FPGA development board.
//!
//! The supervisor owns the serial configuration flash. It brings the ECP5 up
//! from one of the bitstream slots at reset and then services in-system
//! requests from the running gateware: writing a new image from the scratch
//! RAM into a slot, booting another slot, and the return-to-bootloader
//! button. Failures are recorded as numeric fault codes and blinked on the
//! red status LED.

#![no_std]
#![no_main]

mod events;
mod fault;
mod flash;
mod fpga;
mod loader;
mod peripherals;
mod pins;
mod psram;
mod spi;
mod timing;

use cortex_m::asm;
use cortex_m::peripheral::scb::SystemHandler;
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m_rt::{entry, exception};
use defmt_rtt as _;
use grebe_common::FaultCode;
use grebe_common::slot::{APPLET_SLOT, BOOTLOADER_SLOT};
use panic_probe as _;

use crate::peripherals::{DSU, EIC, EicInterrupt, PM, PORTA, SYSCTRL};

defmt::timestamp!("{=u32}", crate::timing::now());

/// Core clock, from the external oscillator.
const CLOCK_HZ: u32 = 32_000_000;

/// Brown-out threshold selection for 1.70 V.
const BOD33_LEVEL_1V70: u8 = 7;

/// Lowest NVIC priority on this core.
const PRIO_LOWEST: u8 = 0xC0;

#[entry]
fn main() -> ! {
    let mut cp = cortex_m::Peripherals::take().unwrap();

    SYSCTRL.enable_bod33(BOD33_LEVEL_1V70);
    if PM.was_brownout() {
        // Restart from a clean reset now that the detector is armed
        DSU.reset_core();
    }

    defmt::println!("supervisor init");

    peripherals::setup_io();
    peripherals::setup_clocking();
    events::setup_eic();

    unsafe {
        // The tick must keep running through the terminate path so the
        // fault blink stays visible
        cp.SCB.set_priority(SystemHandler::SysTick, 0);
        cp.NVIC.set_priority(EicInterrupt, PRIO_LOWEST);
        cortex_m::peripheral::NVIC::unmask(EicInterrupt);
    }

    setup_tick(&mut cp.SYST);

    if !spi::setup_spi() {
        terminate();
    }

    if !loader::load_from_flash(APPLET_SLOT) {
        defmt::println!("applet load failed, falling back to the bootloader");
        fault::clear();
        fpga::enter_cfg();
        if !loader::load_from_flash(BOOTLOADER_SLOT) {
            terminate();
        }
    }

    defmt::println!("entering event loop");
    loop {
        if !events::poll() {
            terminate();
        }
    }
}

/// Program SysTick for a 1 ms tick off the core clock.
fn setup_tick(syst: &mut cortex_m::peripheral::SYST) {
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(CLOCK_HZ / 1000 - 1);
    syst.clear_current();
    syst.enable_counter();
    syst.enable_interrupt();
}

/// Stop servicing events and park with the fault animation running.
fn terminate() -> ! {
    defmt::println!("terminating, fault 0x{:04x}", fault::active().code());

    EIC.disable();
    PORTA.set_high(pins::SU_LED_G);
    if fault::active() == FaultCode::None {
        // Nothing latched; go solid so the halt is still visible
        PORTA.set_low(pins::SU_LED_R);
    }

    loop {
        asm::wfi();
    }
}

#[exception]
fn SysTick() {
    timing::on_tick();
    fault::on_ms_tick();
}

// --- Device interrupt vectors ---

#[allow(dead_code)]
pub union Vector {
    handler: unsafe extern "C" fn(),
    reserved: usize,
}

unsafe extern "C" fn eic_vector() {
    events::on_eic_irq();
}

unsafe extern "C" fn default_vector() {
    loop {
        asm::nop();
    }
}

const DEFAULT_VECTOR: Vector = Vector {
    handler: default_vector,
};
const RESERVED_VECTOR: Vector = Vector { reserved: 0 };

/// The EIC is the only device interrupt the supervisor listens on.
#[unsafe(link_section = ".vector_table.interrupts")]
#[unsafe(no_mangle)]
static __INTERRUPTS: [Vector; 19] = [
    DEFAULT_VECTOR,                  // 0: power manager
    DEFAULT_VECTOR,                  // 1: system controller
    DEFAULT_VECTOR,                  // 2: watchdog
    DEFAULT_VECTOR,                  // 3: RTC
    Vector { handler: eic_vector },  // 4: external interrupt controller
    DEFAULT_VECTOR,                  // 5: flash controller
    DEFAULT_VECTOR,                  // 6: DMA controller
    RESERVED_VECTOR,                 // 7
    DEFAULT_VECTOR,                  // 8: event system
    DEFAULT_VECTOR,                  // 9: SERCOM0
    DEFAULT_VECTOR,                  // 10: SERCOM1
    RESERVED_VECTOR,                 // 11
    RESERVED_VECTOR,                 // 12
    DEFAULT_VECTOR,                  // 13: TC1
    DEFAULT_VECTOR,                  // 14: TC2
    DEFAULT_VECTOR,                  // 15: ADC
    RESERVED_VECTOR,                 // 16
    RESERVED_VECTOR,                 // 17
    RESERVED_VECTOR,                 // 18
];

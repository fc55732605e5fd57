// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Minimal register views over the microcontroller peripherals the
//! supervisor drives.
//!
//! No peripheral-access crate is published for this part, so each block is a
//! hand-written `#[repr(C)]` layout behind a zero-sized handle performing
//! volatile accesses at the block's fixed physical address. The PORT
//! strobe registers (DIRSET/DIRCLR/OUTSET/OUTCLR/OUTTGL) are write-one
//! strobes, which is what makes the pin operations safe to call from any
//! context; the configuration registers are only touched during startup.

use core::convert::Infallible;
use core::ptr::addr_of_mut;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, StatefulOutputPin};

use crate::pins;

// --- Power Manager ---

const PM_BASE: usize = 0x4000_0400;

#[repr(C)]
#[allow(dead_code)]
struct PmRegs {
    ctrl: u8,
    sleep: u8,
    extctrl: u8,
    _reserved0: [u8; 5],
    cpusel: u8,
    apbasel: u8,
    apbbsel: u8,
    apbcsel: u8,
    _reserved1: [u8; 8],
    ahbmask: u32,
    apbamask: u32,
    apbbmask: u32,
    apbcmask: u32,
    _reserved2: [u8; 16],
    intenclr: u8,
    intenset: u8,
    intflag: u8,
    _reserved3: u8,
    rcause: u8,
}

#[derive(Clone, Copy)]
pub struct Pm;

pub const PM: Pm = Pm;

impl Pm {
    const fn regs() -> *mut PmRegs {
        PM_BASE as *mut PmRegs
    }

    /// Unmask the SERCOM0 bus clock (APBC bit 2).
    pub fn unmask_sercom0(self) {
        unsafe {
            let mask = addr_of_mut!((*Self::regs()).apbcmask);
            mask.write_volatile(mask.read_volatile() | 1 << 2);
        }
    }

    /// Unmask the external interrupt controller bus clock (APBA bit 6).
    pub fn unmask_eic(self) {
        unsafe {
            let mask = addr_of_mut!((*Self::regs()).apbamask);
            mask.write_volatile(mask.read_volatile() | 1 << 6);
        }
    }

    /// True when this boot was caused by a brown-out reset (either detector).
    pub fn was_brownout(self) -> bool {
        unsafe { addr_of_mut!((*Self::regs()).rcause).read_volatile() & 0x06 != 0 }
    }
}

// --- System Controller ---

const SYSCTRL_BASE: usize = 0x4000_0800;

#[repr(C)]
#[allow(dead_code)]
struct SysctrlRegs {
    intenclr: u32,
    intenset: u32,
    intflag: u32,
    pclksr: u32,
    xosc: u16,
    _reserved0: u16,
    xosc32k: u16,
    _reserved1: u16,
    osc32k: u32,
    osculp32k: u8,
    _reserved2: [u8; 3],
    osc8m: u32,
    dfllctrl: u16,
    _reserved3: u16,
    dfllval: u32,
    dfllmul: u32,
    dfllsync: u8,
    _reserved4: [u8; 3],
    bod33: u32,
}

#[derive(Clone, Copy)]
pub struct Sysctrl;

pub const SYSCTRL: Sysctrl = Sysctrl;

impl Sysctrl {
    const fn regs() -> *mut SysctrlRegs {
        SYSCTRL_BASE as *mut SysctrlRegs
    }

    /// Enable the 3.3 V brown-out detector in reset mode at the given
    /// threshold level, continuous in standby.
    pub fn enable_bod33(self, level: u8) {
        let value = (1 << 1) | (1 << 3) | (1 << 6) | (u32::from(level & 0x3F) << 16);
        unsafe { addr_of_mut!((*Self::regs()).bod33).write_volatile(value) }
    }
}

// --- Generic Clock Controller ---

const GCLK_BASE: usize = 0x4000_0C00;

#[repr(C)]
#[allow(dead_code)]
struct GclkRegs {
    ctrl: u8,
    status: u8,
    clkctrl: u16,
    genctrl: u32,
    gendiv: u32,
}

/// Clock consumers the supervisor routes.
#[derive(Clone, Copy)]
#[repr(u8)]
pub enum ClockId {
    Eic = 0x05,
    SercomSlow = 0x0D,
    Sercom0Core = 0x0E,
}

#[derive(Clone, Copy)]
pub struct Gclk;

pub const GCLK: Gclk = Gclk;

impl Gclk {
    const fn regs() -> *mut GclkRegs {
        GCLK_BASE as *mut GclkRegs
    }

    /// Source generator 0 from the external clock input pin, enabled.
    pub fn gen0_from_external(self) {
        unsafe { addr_of_mut!((*Self::regs()).genctrl).write_volatile(1 << 8 | 1 << 16) }
    }

    /// Feed a peripheral clock from generator 0.
    pub fn route_to_gen0(self, id: ClockId) {
        unsafe { addr_of_mut!((*Self::regs()).clkctrl).write_volatile(u16::from(id as u8) | 1 << 14) }
    }
}

// --- External Interrupt Controller ---

const EIC_BASE: usize = 0x4000_1800;

#[repr(C)]
#[allow(dead_code)]
struct EicRegs {
    ctrl: u8,
    status: u8,
    nmictrl: u8,
    nmiflag: u8,
    evctrl: u32,
    intenclr: u32,
    intenset: u32,
    intflag: u32,
    wakeup: u32,
    config: u32,
}

/// Edge/level sense selections for an EXTINT line.
#[derive(Clone, Copy)]
#[repr(u8)]
#[allow(dead_code)]
pub enum Sense {
    NoDetect = 0,
    Rise = 1,
    Fall = 2,
    Both = 3,
    High = 4,
    Low = 5,
}

#[derive(Clone, Copy)]
pub struct Eic;

pub const EIC: Eic = Eic;

impl Eic {
    const fn regs() -> *mut EicRegs {
        EIC_BASE as *mut EicRegs
    }

    fn sync_busy(self) -> bool {
        unsafe { addr_of_mut!((*Self::regs()).status).read_volatile() & 0x80 != 0 }
    }

    pub fn enable(self) {
        unsafe {
            let ctrl = addr_of_mut!((*Self::regs()).ctrl);
            ctrl.write_volatile(ctrl.read_volatile() | 1 << 1);
        }
        while self.sync_busy() {}
    }

    pub fn disable(self) {
        unsafe {
            let ctrl = addr_of_mut!((*Self::regs()).ctrl);
            ctrl.write_volatile(ctrl.read_volatile() & !(1 << 1));
        }
        while self.sync_busy() {}
    }

    /// Configure sense and filtering for one EXTINT line.
    pub fn enable_extint(self, line: u8, filter: bool, sense: Sense) {
        let field = (u32::from(filter) << 3 | sense as u32) << (line * 4);
        unsafe {
            let config = addr_of_mut!((*Self::regs()).config);
            config.write_volatile(config.read_volatile() | field);
        }
    }

    pub fn enable_extint_irq(self, line: u8) {
        unsafe { addr_of_mut!((*Self::regs()).intenset).write_volatile(1 << line) }
    }

    /// Latched EXTINT flags.
    pub fn pending(self) -> u8 {
        unsafe { addr_of_mut!((*Self::regs()).intflag).read_volatile() as u8 }
    }

    /// Acknowledge a set of latched flags (write-one-to-clear).
    pub fn ack(self, mask: u8) {
        unsafe { addr_of_mut!((*Self::regs()).intflag).write_volatile(u32::from(mask)) }
    }
}

/// NVIC position of the external interrupt controller.
#[derive(Clone, Copy)]
pub struct EicInterrupt;

unsafe impl cortex_m::interrupt::InterruptNumber for EicInterrupt {
    fn number(self) -> u16 {
        4
    }
}

// --- Debug Service Unit ---

const DSU_BASE: usize = 0x4100_2000;

#[repr(C)]
#[allow(dead_code)]
struct DsuRegs {
    ctrl: u8,
    statusa: u8,
    statusb: u8,
    _reserved0: u8,
}

#[derive(Clone, Copy)]
pub struct Dsu;

pub const DSU: Dsu = Dsu;

impl Dsu {
    /// Trigger a core reset and wait for it to take effect.
    pub fn reset_core(self) -> ! {
        unsafe { addr_of_mut!((*(DSU_BASE as *mut DsuRegs)).ctrl).write_volatile(0x01) }
        loop {
            cortex_m::asm::nop();
        }
    }
}

// --- Port ---

const PORTA_BASE: usize = 0x4100_4400;

#[repr(C)]
#[allow(dead_code)]
struct PortRegs {
    dir: u32,
    dirclr: u32,
    dirset: u32,
    dirtgl: u32,
    out: u32,
    outclr: u32,
    outset: u32,
    outtgl: u32,
    input: u32,
    ctrl: u32,
    wrconfig: u32,
    _reserved0: u32,
    pmux: [u8; 16],
    pincfg: [u8; 32],
}

/// Pin multiplexer functions.
#[derive(Clone, Copy)]
#[repr(u8)]
#[allow(dead_code)]
pub enum PinFunc {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

/// Handle over PORT group A.
#[derive(Clone, Copy)]
pub struct Port;

pub const PORTA: Port = Port;

impl Port {
    const fn regs() -> *mut PortRegs {
        PORTA_BASE as *mut PortRegs
    }

    pub fn set_input(self, pin: u8) {
        unsafe { addr_of_mut!((*Self::regs()).dirclr).write_volatile(1 << pin) }
    }

    pub fn set_output(self, pin: u8) {
        unsafe { addr_of_mut!((*Self::regs()).dirset).write_volatile(1 << pin) }
    }

    pub fn set_low(self, pin: u8) {
        unsafe { addr_of_mut!((*Self::regs()).outclr).write_volatile(1 << pin) }
    }

    pub fn set_high(self, pin: u8) {
        unsafe { addr_of_mut!((*Self::regs()).outset).write_volatile(1 << pin) }
    }

    pub fn set_value(self, level: bool, pin: u8) {
        if level {
            self.set_high(pin);
        } else {
            self.set_low(pin);
        }
    }

    pub fn toggle(self, pin: u8) {
        unsafe { addr_of_mut!((*Self::regs()).outtgl).write_volatile(1 << pin) }
    }

    /// Level on the pin's input buffer.
    pub fn pin_state(self, pin: u8) -> bool {
        unsafe { addr_of_mut!((*Self::regs()).input).read_volatile() & 1 << pin != 0 }
    }

    /// Level currently driven on the pin.
    pub fn out_state(self, pin: u8) -> bool {
        unsafe { addr_of_mut!((*Self::regs()).out).read_volatile() & 1 << pin != 0 }
    }

    fn pin_function(self, pin: u8, func: PinFunc) {
        let shift = (pin & 1) << 2;
        unsafe {
            let pmux = addr_of_mut!((*Self::regs()).pmux)
                .cast::<u8>()
                .add(usize::from(pin >> 1));
            let value = pmux.read_volatile() & !(0xF << shift);
            pmux.write_volatile(value | ((func as u8) & 0xF) << shift);
        }
    }

    fn pin_config(self, pin: u8, pmux_en: bool, in_en: bool, pull_en: bool, strong_drive: bool) {
        let value = u8::from(pmux_en)
            | u8::from(in_en) << 1
            | u8::from(pull_en) << 2
            | u8::from(strong_drive) << 6;
        unsafe {
            addr_of_mut!((*Self::regs()).pincfg)
                .cast::<u8>()
                .add(usize::from(pin))
                .write_volatile(value);
        }
    }

    pub fn setup_pin(
        self,
        pin: u8,
        pmux_en: bool,
        in_en: bool,
        pull_en: bool,
        strong_drive: bool,
        func: PinFunc,
    ) {
        self.pin_function(pin, func);
        self.pin_config(pin, pmux_en, in_en, pull_en, strong_drive);
    }
}

/// A single PORT pin behind the `embedded-hal` digital traits.
#[derive(Clone, Copy)]
pub struct RawPin {
    pin: u8,
}

impl RawPin {
    pub const fn new(pin: u8) -> Self {
        Self { pin }
    }
}

impl ErrorType for RawPin {
    type Error = Infallible;
}

impl OutputPin for RawPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        PORTA.set_low(self.pin);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        PORTA.set_high(self.pin);
        Ok(())
    }
}

impl StatefulOutputPin for RawPin {
    fn is_set_high(&mut self) -> Result<bool, Infallible> {
        Ok(PORTA.out_state(self.pin))
    }

    fn is_set_low(&mut self) -> Result<bool, Infallible> {
        Ok(!PORTA.out_state(self.pin))
    }

    fn toggle(&mut self) -> Result<(), Infallible> {
        PORTA.toggle(self.pin);
        Ok(())
    }
}

impl InputPin for RawPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(PORTA.pin_state(self.pin))
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!PORTA.pin_state(self.pin))
    }
}

// --- SERCOM0 in SPI mode ---

const SERCOM0_BASE: usize = 0x4200_0800;

#[repr(C)]
#[allow(dead_code)]
struct SercomSpiRegs {
    ctrla: u32,
    ctrlb: u32,
    _reserved0: [u8; 4],
    baud: u8,
    _reserved1: [u8; 7],
    intenclr: u8,
    _reserved2: u8,
    intenset: u8,
    _reserved3: u8,
    intflag: u8,
    _reserved4: u8,
    status: u16,
    syncbusy: u32,
    _reserved5: [u8; 4],
    addr: u32,
    data: u16,
    _reserved6: [u8; 6],
    dbgctrl: u8,
}

#[derive(Clone, Copy)]
pub struct SercomSpi;

pub const SERCOM0_SPI: SercomSpi = SercomSpi;

impl SercomSpi {
    const fn regs() -> *mut SercomSpiRegs {
        SERCOM0_BASE as *mut SercomSpiRegs
    }

    fn sync_busy_enable(self) -> bool {
        unsafe { addr_of_mut!((*Self::regs()).syncbusy).read_volatile() & 1 << 1 != 0 }
    }

    pub fn sync_busy_ctrlb(self) -> bool {
        unsafe { addr_of_mut!((*Self::regs()).syncbusy).read_volatile() & 1 << 2 != 0 }
    }

    pub fn enabled(self) -> bool {
        unsafe { addr_of_mut!((*Self::regs()).ctrla).read_volatile() & 1 << 1 != 0 }
    }

    pub fn enable(self) {
        unsafe {
            let ctrla = addr_of_mut!((*Self::regs()).ctrla);
            ctrla.write_volatile(ctrla.read_volatile() | 1 << 1);
        }
        while self.sync_busy_enable() {}
    }

    pub fn disable(self) {
        unsafe {
            let ctrla = addr_of_mut!((*Self::regs()).ctrla);
            ctrla.write_volatile(ctrla.read_volatile() & !(1 << 1));
        }
        while self.sync_busy_enable() {}
    }

    /// Controller mode, PAD0 data out / PAD1 clock / PAD3 data in, sample on
    /// the trailing edge, idle-low clock, MSB first.
    pub fn configure(self) {
        let ctrla = (0x3 << 2) | (0x3 << 20) | (1 << 28);
        unsafe { addr_of_mut!((*Self::regs()).ctrla).write_volatile(ctrla) }
    }

    pub fn set_baud(self, baud: u8) {
        unsafe { addr_of_mut!((*Self::regs()).baud).write_volatile(baud) }
    }

    /// Raw CTRLB write, used to switch the receiver on.
    pub fn set_ctrlb(self, value: u32) {
        unsafe { addr_of_mut!((*Self::regs()).ctrlb).write_volatile(value) }
    }

    pub fn receive_complete(self) -> bool {
        unsafe { addr_of_mut!((*Self::regs()).intflag).read_volatile() & 1 << 2 != 0 }
    }

    pub fn write_data(self, byte: u8) {
        unsafe { addr_of_mut!((*Self::regs()).data).write_volatile(u16::from(byte)) }
    }

    pub fn read_data(self) -> u8 {
        unsafe { addr_of_mut!((*Self::regs()).data).read_volatile() as u8 }
    }
}

// --- Startup configuration ---

/// Configure the clock input, the status LEDs and the interrupt inputs.
pub fn setup_io() {
    // External clock on PA08, peripheral function H
    PORTA.setup_pin(pins::CLKIN, true, false, false, false, PinFunc::H);
    PORTA.set_input(pins::CLKIN);

    // Status LEDs idle dark (active low)
    PORTA.set_high(pins::SU_LED_G);
    PORTA.set_high(pins::SU_LED_R);
    PORTA.set_output(pins::SU_LED_G);
    PORTA.set_output(pins::SU_LED_R);

    // DFU button and attention line feed the EIC (function A)
    PORTA.setup_pin(pins::DFU_BTN, true, true, false, false, PinFunc::A);
    PORTA.set_input(pins::DFU_BTN);
    PORTA.setup_pin(pins::SU_ATTN, true, true, false, false, PinFunc::A);
    PORTA.set_input(pins::SU_ATTN);
}

/// Route generator 0 from the external clock and feed the SERCOM and EIC.
pub fn setup_clocking() {
    GCLK.gen0_from_external();

    PM.unmask_sercom0();
    PM.unmask_eic();

    GCLK.route_to_gen0(ClockId::Sercom0Core);
    GCLK.route_to_gen0(ClockId::SercomSlow);
    GCLK.route_to_gen0(ClockId::Eic);
}

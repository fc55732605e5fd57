// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Unit tests for the fault blink pattern table and state machine.

use grebe_common::blink::{BlinkState, Led, PATTERNS, pattern_bits, pattern_len};

/// Standard Morse for hex digits 0..F.
const MORSE: [&str; 16] = [
    "-----", ".----", "..---", "...--", "....-", ".....", "-....", "--...", "---..", "----.",
    ".-", "-...", "-.-.", "-..", ".", "..-.",
];

/// Expand a descriptor into its dot/dash string, emission order.
fn expand(descriptor: u8) -> String {
    let mut out = String::new();
    let mut bits = pattern_bits(descriptor);
    for _ in 0..pattern_len(descriptor) {
        out.push(if bits & 1 != 0 { '-' } else { '.' });
        bits >>= 1;
    }
    out
}

/// Collect the LED levels for `n` display ticks.
fn run(state: &mut BlinkState, code: u16, n: usize) -> Vec<Led> {
    (0..n).map(|_| state.step(code)).collect()
}

/// Display ticks one full animation cycle of `code` takes.
fn cycle_ticks(code: u16) -> usize {
    (0..4)
        .map(|digit| {
            let descriptor = PATTERNS[usize::from((code >> (12 - 4 * digit)) as u8 & 0xF)];
            let mut ticks = 3usize; // digit gap
            let mut bits = pattern_bits(descriptor);
            for _ in 0..pattern_len(descriptor) {
                ticks += if bits & 1 != 0 { 3 + 1 } else { 1 + 1 };
                bits >>= 1;
            }
            ticks
        })
        .sum()
}

// =============================================================================
// Pattern table tests
// =============================================================================

#[test]
fn test_patterns_match_morse() {
    for (digit, expected) in MORSE.iter().enumerate() {
        assert_eq!(expand(PATTERNS[digit]), *expected, "digit {digit:x}");
    }
}

#[test]
fn test_pattern_lengths_match_symbol_counts() {
    for (digit, expected) in MORSE.iter().enumerate() {
        assert_eq!(
            pattern_len(PATTERNS[digit]) as usize,
            expected.len(),
            "digit {digit:x}"
        );
    }
}

// =============================================================================
// State machine tests
// =============================================================================

#[test]
fn test_idle_stays_off_with_no_fault() {
    let mut state = BlinkState::new();
    assert!(run(&mut state, 0, 16).iter().all(|&led| led == Led::Off));
    assert!(!state.active());
}

#[test]
fn test_first_digit_of_0x0001_renders_five_dashes() {
    let mut state = BlinkState::new();
    let ticks = run(&mut state, 0x0001, 23);

    let mut expected = Vec::new();
    for _ in 0..5 {
        expected.extend([Led::On, Led::On, Led::On, Led::Off]);
    }
    expected.extend([Led::Off, Led::Off, Led::Off]);
    assert_eq!(ticks, expected);
}

#[test]
fn test_dot_timing() {
    // 0x5... latches digit 5, five dots: on/off pairs
    let mut state = BlinkState::new();
    let ticks = run(&mut state, 0x5000, 10);
    let expected: Vec<Led> = (0..5).flat_map(|_| [Led::On, Led::Off]).collect();
    assert_eq!(ticks, expected);
}

#[test]
fn test_cycle_length_and_relatch() {
    let mut state = BlinkState::new();
    let ticks = cycle_ticks(0x0005);
    assert_eq!(ticks, 82);

    let _ = run(&mut state, 0x0005, ticks);
    assert!(!state.active());

    // A changed code is picked up when the next cycle begins
    assert_eq!(state.step(0x1000), Led::On);
    assert!(state.active());
}

#[test]
fn test_code_latched_for_full_cycle() {
    let mut state = BlinkState::new();

    // Digit 1 of 0x1000 opens with a dot
    assert_eq!(state.step(0x1000), Led::On);
    // Changing the code mid-cycle does not restart the animation: the rest
    // tick and the four dashes of the latched '1' follow
    assert_eq!(state.step(0x5000), Led::Off);
    assert_eq!(state.step(0x5000), Led::On);
    assert_eq!(state.step(0x5000), Led::On);
    assert_eq!(state.step(0x5000), Led::On);
    assert_eq!(state.step(0x5000), Led::Off);
}

#[test]
fn test_cleared_fault_finishes_cycle_then_stops() {
    let mut state = BlinkState::new();
    let _ = state.step(0x0005);
    let _ = run(&mut state, 0, cycle_ticks(0x0005) - 1);
    assert!(!state.active());
    assert_eq!(state.step(0), Led::Off);
    assert!(!state.active());
}

#[test]
fn test_all_digits_are_emitted() {
    // Count on-ticks over one cycle of 0xABCD and compare against the
    // expected dot/dash totals
    let code = 0xABCD;
    let expected_on: usize = format!(
        "{}{}{}{}",
        MORSE[0xA], MORSE[0xB], MORSE[0xC], MORSE[0xD]
    )
    .chars()
    .map(|symbol| if symbol == '-' { 3 } else { 1 })
    .sum();

    let mut state = BlinkState::new();
    let ticks = run(&mut state, code, cycle_ticks(code));
    let on_ticks = ticks.iter().filter(|&&led| led == Led::On).count();
    assert_eq!(on_ticks, expected_on);
    assert!(!state.active());
}

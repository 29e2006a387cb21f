//! Blocking drivers for a Pico board with a WS2812 LED matrix and a membrane keypad.
//!
//! - [`led_strip`]: pixel buffer plus a PIO-driven WS2812 transmitter, flushed synchronously.
//! - [`keypad`]: row-strobed key matrix scanner returning at most one key per poll.
//! - [`led2d`]: `(x, y)` addressing and `embedded-graphics` drawing on top of a strip.
//! - [`animation`]: plays fixed step and frame sequences through a strip.
//!
//! Every driver is an owned value with `&mut self` methods. Nothing runs in the
//! background; each call returns only after the hardware work is done.
//!
//! # Glossary
//!
//! - **PIO ([Programmable I/O](https://medium.com/data-science/nine-pico-pio-wats-with-rust-part-1-9d062067dc25)):** Pico 1 has 2. Pico 2 has 3.
//!   Each has 4 state machines; one state machine drives one LED data line.
//! - **Flush:** send the whole pixel buffer and wait out the WS2812 latch period.
//! - **Strobe:** drive one keypad row active at a time and read which columns follow it.
//! - **Settle delay:** wait after asserting a row, before sampling the columns.
#![cfg_attr(not(feature = "host"), no_std)]

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;

// Compile-time checks: exactly one board must be selected (unless testing with host feature)
#[cfg(all(not(any(feature = "pico1", feature = "pico2")), not(feature = "host")))]
compile_error!("Must enable exactly one board feature: 'pico1' or 'pico2'");

#[cfg(all(feature = "pico1", feature = "pico2"))]
compile_error!("Cannot enable both 'pico1' and 'pico2' features simultaneously");

pub mod animation;
mod error;
pub mod keypad;
pub mod led2d;
pub mod led_strip;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};

/// Image definition the RP2350 boot ROM looks for at the start of flash.
#[cfg(all(feature = "pico2", not(feature = "host")))]
#[expect(unsafe_code, reason = "the boot ROM finds the block by its link section")]
#[unsafe(link_section = ".start_block")]
#[used]
pub static IMAGE_DEF: embassy_rp::block::ImageDef = embassy_rp::block::ImageDef::secure_exe();

/// Block on `delay` for `duration`, saturating at `u32::MAX` microseconds.
pub(crate) fn delay_for(delay: &mut impl DelayNs, duration: Duration) {
    delay.delay_us(u32::try_from(duration.as_micros()).unwrap_or(u32::MAX));
}

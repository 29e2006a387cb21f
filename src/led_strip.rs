//! A blocking driver for NeoPixel-style (WS2812) LED strips and matrices.
//!
//! [`LedStrip`] owns a [`Frame1d`] pixel buffer and one [`Ws2812Tx`] transmitter.
//! Callers mutate pixels with [`LedStrip::set`] / [`LedStrip::clear`] and push
//! the whole buffer to the LEDs with [`LedStrip::flush`].
//!
//! On the wire every pixel is three bytes in **G, R, B** order, each byte
//! shifted out MSB first at 800 kHz. After the last byte the data line must stay
//! low for at least [`RESET_DELAY`] so the LEDs latch the frame. `flush` waits
//! that out before it returns.
//!
//! `flush` is non-yielding: it spins on the transmitter and the delay provider
//! for `N × 30 µs + 100 µs`. A 25-LED matrix costs about 0.85 ms per frame.
//!
//! # Example
//!
//! ```ignore
//! use pixel_keypad::Result;
//! use pixel_keypad::led_strip::{LedStrip, colors};
//! use pixel_keypad::led_strip::pio_tx::{PioWs2812Program, PioWs2812Tx};
//! use embassy_rp::{bind_interrupts, peripherals::PIO0, pio::{InterruptHandler, Pio}};
//!
//! bind_interrupts!(struct Irqs {
//!     PIO0_IRQ_0 => InterruptHandler<PIO0>;
//! });
//!
//! fn example(p: embassy_rp::Peripherals) -> Result<()> {
//!     let Pio { mut common, sm0, .. } = Pio::new(p.PIO0, Irqs);
//!     let program = PioWs2812Program::new(&mut common)?;
//!     let tx = PioWs2812Tx::new(&mut common, sm0, p.PIN_7, &program);
//!     let mut led_strip: LedStrip<_, _, 25> = LedStrip::new(tx, embassy_time::Delay);
//!
//!     led_strip.set(0, 10, 0, 0);
//!     led_strip.frame_mut()[1] = colors::BLUE;
//!     led_strip.flush();
//!     Ok(())
//! }
//! ```

/// Predefined RGB color constants from the `smart_leds` crate.
///
/// Common colors include `RED`, `GREEN`, `BLUE`, `YELLOW`, `WHITE`, `BLACK`, `CYAN`, `MAGENTA`, `ORANGE`, `PURPLE`.
#[doc(inline)]
pub use smart_leds::colors;

/// 8-bit-per-channel RGB color from `embedded_graphics`.
#[doc(inline)]
pub use embedded_graphics::pixelcolor::Rgb888;

/// RGB color type stored in the pixel buffer.
pub use smart_leds::RGB8;

use core::ops::{Deref, DerefMut};
use embassy_time::Duration;
use embedded_graphics::prelude::RgbColor;
use embedded_hal::delay::DelayNs;

use crate::delay_for;

#[cfg(not(feature = "host"))]
pub mod pio_tx;

// ============================================================================
// Protocol timing
// ============================================================================

/// WS2812 bit rate in kHz (1.25 µs per bit).
pub const BIT_RATE_KHZ: u32 = 800;

/// Minimum low time on the data line that makes the LEDs latch a frame.
pub const RESET_DELAY: Duration = Duration::from_micros(100);

/// Worst-case current drawn by one LED showing full white.
pub const MILLIAMPS_PER_LED: u32 = 60;

// ============================================================================
// Color conversions
// ============================================================================

/// Convert colors to [`RGB8`] for LED strip rendering.
///
/// ```rust
/// use pixel_keypad::led_strip::{Rgb888, ToRgb8, RGB8};
///
/// let rgb8 = RGB8::new(16, 32, 48).to_rgb8();
/// let converted = Rgb888::new(16, 32, 48).to_rgb8();
///
/// assert_eq!(rgb8, converted);
/// ```
pub trait ToRgb8 {
    /// Convert this color to [`RGB8`].
    #[must_use]
    fn to_rgb8(self) -> RGB8;
}

impl ToRgb8 for RGB8 {
    #[inline(always)]
    fn to_rgb8(self) -> RGB8 {
        self
    }
}

impl ToRgb8 for Rgb888 {
    #[inline(always)]
    fn to_rgb8(self) -> RGB8 {
        RGB8::new(self.r(), self.g(), self.b())
    }
}

/// Convert colors to [`Rgb888`] for embedded-graphics rendering.
pub trait ToRgb888 {
    /// Convert this color to [`Rgb888`].
    #[must_use]
    fn to_rgb888(self) -> Rgb888;
}

impl ToRgb888 for RGB8 {
    #[inline(always)]
    fn to_rgb888(self) -> Rgb888 {
        Rgb888::new(self.r, self.g, self.b)
    }
}

impl ToRgb888 for Rgb888 {
    #[inline(always)]
    fn to_rgb888(self) -> Rgb888 {
        self
    }
}

// ============================================================================
// Gamma Correction and Current Limiting
// ============================================================================

/// Gamma correction applied to every byte at flush time.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gamma {
    /// Linear gamma (no correction). Gamma = 1.0
    #[default]
    Linear,
    /// Standard gamma 2.2 correction for perceived brightness.
    Gamma2_2,
}

/// Gamma 2.2 lookup table for 8-bit values.
/// Pre-computed to avoid floating point math: corrected = (value/255)^2.2 * 255
const GAMMA_2_2_TABLE: [u8; 256] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2,
    3, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 6, 6, 6, 6, 7, 7, 7, 8, 8, 8, 9, 9, 9, 10, 10, 11, 11,
    11, 12, 12, 13, 13, 13, 14, 14, 15, 15, 16, 16, 17, 17, 18, 18, 19, 19, 20, 20, 21, 22, 22, 23,
    23, 24, 25, 25, 26, 26, 27, 28, 28, 29, 30, 30, 31, 32, 33, 33, 34, 35, 35, 36, 37, 38, 39, 39,
    40, 41, 42, 43, 43, 44, 45, 46, 47, 48, 49, 49, 50, 51, 52, 53, 54, 55, 56, 57, 58, 59, 60, 61,
    62, 63, 64, 65, 66, 67, 68, 69, 70, 71, 73, 74, 75, 76, 77, 78, 79, 81, 82, 83, 84, 85, 87, 88,
    89, 90, 91, 93, 94, 95, 97, 98, 99, 100, 102, 103, 105, 106, 107, 109, 110, 111, 113, 114, 116,
    117, 119, 120, 121, 123, 124, 126, 127, 129, 130, 132, 133, 135, 137, 138, 140, 141, 143, 145,
    146, 148, 149, 151, 153, 154, 156, 158, 159, 161, 163, 165, 166, 168, 170, 172, 173, 175, 177,
    179, 181, 182, 184, 186, 188, 190, 192, 194, 196, 197, 199, 201, 203, 205, 207, 209, 211, 213,
    215, 217, 219, 221, 223, 225, 227, 229, 231, 234, 236, 238, 240, 242, 244, 246, 248, 251, 253,
    255,
];

/// Generate a combined gamma correction and brightness scaling lookup table.
///
/// `combo_table[input_value]` is the byte actually sent to the LEDs.
/// With [`Gamma::Linear`] and `max_brightness == 255` the table is the identity.
#[must_use]
pub const fn generate_combo_table(gamma: Gamma, max_brightness: u8) -> [u8; 256] {
    let mut result = [0u8; 256];
    let mut index = 0;
    while index < 256 {
        let corrected = match gamma {
            Gamma::Linear => index as u8,
            Gamma::Gamma2_2 => GAMMA_2_2_TABLE[index],
        };
        // Apply brightness scaling: (value * brightness) / 255
        result[index] = ((corrected as u16 * max_brightness as u16) / 255) as u8;
        index += 1;
    }
    result
}

/// Current budget used to cap LED brightness.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Current {
    /// Limit brightness so that every LED at full white stays within this many milliamps.
    ///
    /// A 25-LED matrix draws 1500 mA at full white (60 mA per LED); a 500 mA
    /// budget caps brightness at 85 of 255.
    Milliamps(u16),
    /// No limit. Brightness stays at 100%.
    #[default]
    Unlimited,
}

impl Current {
    /// Maximum brightness that keeps `worst_case_ma` within this budget.
    #[must_use]
    pub const fn max_brightness(self, worst_case_ma: u32) -> u8 {
        assert!(worst_case_ma > 0, "worst_case_ma must be positive");
        match self {
            Self::Milliamps(ma) => {
                let scale = (ma as u32 * 255) / worst_case_ma;
                if scale > 255 { 255 } else { scale as u8 }
            }
            Self::Unlimited => 255,
        }
    }
}

// ============================================================================
// Pixel buffer
// ============================================================================

/// Fixed-size pixel buffer for an `N`-LED strip, in strip order.
///
/// Frames deref to `[RGB8; N]`, so pixels can also be assigned directly.
/// Indexing past `N` panics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame1d<const N: usize>(pub [RGB8; N]);

impl<const N: usize> Frame1d<N> {
    /// Number of LEDs in this frame.
    pub const LEN: usize = N;

    /// Create a new blank (all black) frame.
    #[must_use]
    pub const fn new() -> Self {
        Self([RGB8::new(0, 0, 0); N])
    }

    /// Create a frame filled with a single color.
    #[must_use]
    pub const fn filled(color: RGB8) -> Self {
        Self([color; N])
    }

    /// Store `(r, g, b)` at `index`. Values are stored as given.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    pub fn set(&mut self, index: usize, r: u8, g: u8, b: u8) {
        assert!(index < N, "pixel index must be within the strip length");
        self.0[index] = RGB8::new(r, g, b);
    }

    /// Set every pixel to black.
    pub fn clear(&mut self) {
        self.0 = [RGB8::new(0, 0, 0); N];
    }

    /// The pixel at `index`, or `None` past the end of the strip.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<RGB8> {
        self.0.get(index).copied()
    }
}

impl<const N: usize> Deref for Frame1d<N> {
    type Target = [RGB8; N];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const N: usize> DerefMut for Frame1d<N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<const N: usize> From<[RGB8; N]> for Frame1d<N> {
    fn from(array: [RGB8; N]) -> Self {
        Self(array)
    }
}

impl<const N: usize> From<Frame1d<N>> for [RGB8; N] {
    fn from(frame: Frame1d<N>) -> Self {
        frame.0
    }
}

impl<const N: usize> Default for Frame1d<N> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Transmitter
// ============================================================================

/// An exclusively owned serial channel that turns bytes into WS2812 pulses.
///
/// On the Pico this is a PIO state machine ([`pio_tx::PioWs2812Tx`]); tests
/// substitute a recorder.
pub trait Ws2812Tx {
    /// Hand one byte to the hardware, blocking until it is accepted.
    ///
    /// The byte is shifted out MSB first.
    fn push_byte(&mut self, byte: u8);

    /// Block until every accepted byte has been shifted onto the line and the
    /// line has returned low.
    fn wait_idle(&mut self) {}
}

// ============================================================================
// LedStrip
// ============================================================================

/// A WS2812 strip: one pixel buffer, one transmitter, one delay provider.
///
/// See the [module documentation](mod@crate::led_strip) for an example.
pub struct LedStrip<TX, D, const N: usize> {
    tx: TX,
    delay: D,
    frame: Frame1d<N>,
    combo_table: [u8; 256],
    gamma: Gamma,
    max_brightness: u8,
}

impl<TX: Ws2812Tx, D: DelayNs, const N: usize> LedStrip<TX, D, N> {
    /// Number of LEDs driven by this strip.
    pub const LEN: usize = N;

    /// Current drawn when every LED shows full white.
    pub const WORST_CASE_MA: u32 = N as u32 * MILLIAMPS_PER_LED;

    /// Take ownership of a bound transmitter. The pixel buffer starts black.
    ///
    /// Output correction defaults to [`Gamma::Linear`] at full brightness, so
    /// bytes go out exactly as stored.
    #[must_use]
    pub fn new(tx: TX, delay: D) -> Self {
        const { assert!(N > 0, "LedStrip needs at least one LED") };
        Self {
            tx,
            delay,
            frame: Frame1d::new(),
            combo_table: generate_combo_table(Gamma::Linear, u8::MAX),
            gamma: Gamma::Linear,
            max_brightness: u8::MAX,
        }
    }

    /// Apply `gamma` to every byte sent from now on.
    #[must_use]
    pub fn with_gamma(mut self, gamma: Gamma) -> Self {
        self.gamma = gamma;
        self.combo_table = generate_combo_table(self.gamma, self.max_brightness);
        self
    }

    /// Scale output so a full-white frame stays within `current`.
    #[must_use]
    pub fn with_max_current(mut self, current: Current) -> Self {
        self.max_brightness = current.max_brightness(Self::WORST_CASE_MA);
        self.combo_table = generate_combo_table(self.gamma, self.max_brightness);
        self
    }

    /// Brightness cap derived from the current budget (255 = none).
    #[must_use]
    pub const fn max_brightness(&self) -> u8 {
        self.max_brightness
    }

    /// Store `(r, g, b)` at `index` in the buffer. Nothing is sent until [`flush`](Self::flush).
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    pub fn set(&mut self, index: usize, r: u8, g: u8, b: u8) {
        self.frame.set(index, r, g, b);
    }

    /// Set every pixel in the buffer to black.
    pub fn clear(&mut self) {
        self.frame.clear();
    }

    /// The buffered color at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    #[must_use]
    pub fn pixel(&self, index: usize) -> RGB8 {
        assert!(index < N, "pixel index must be within the strip length");
        self.frame[index]
    }

    /// The pixel buffer.
    #[must_use]
    pub const fn frame(&self) -> &Frame1d<N> {
        &self.frame
    }

    /// The pixel buffer, for direct edits.
    pub const fn frame_mut(&mut self) -> &mut Frame1d<N> {
        &mut self.frame
    }

    /// Send the buffer to the LEDs and wait out the latch period.
    ///
    /// Pixels go out in index order, each as G, R, B. Every byte blocks until
    /// the transmitter accepts it. Returns no earlier than [`RESET_DELAY`] after
    /// the last byte was accepted.
    pub fn flush(&mut self) {
        for pixel in self.frame.iter() {
            for byte in [pixel.g, pixel.r, pixel.b] {
                self.tx.push_byte(self.combo_table[usize::from(byte)]);
            }
        }
        self.tx.wait_idle();
        delay_for(&mut self.delay, RESET_DELAY);
    }

    /// Replace the buffer with `frame` and [`flush`](Self::flush) it.
    pub fn write_frame(&mut self, frame: Frame1d<N>) {
        self.frame = frame;
        self.flush();
    }

    /// Block for `duration` using the strip's delay provider.
    ///
    /// Used to hold a frame on screen between flushes.
    pub fn hold(&mut self, duration: Duration) {
        delay_for(&mut self.delay, duration);
    }

    /// Give back the transmitter and delay provider.
    #[must_use]
    pub fn into_parts(self) -> (TX, D) {
        (self.tx, self.delay)
    }
}

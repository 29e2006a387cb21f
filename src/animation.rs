//! Play fixed pixel sequences through an [`LedStrip`].
//!
//! Animations are data, not code: a list of [`Step`]s (light one pixel, show
//! it, hold) or a list of whole frames with hold times. Both players block until
//! the last hold has elapsed.
//!
//! ```rust,ignore
//! use embassy_time::Duration;
//! use pixel_keypad::animation::{Step, play_steps};
//! use pixel_keypad::led_strip::RGB8;
//!
//! const RED: RGB8 = RGB8::new(10, 0, 0);
//! const HOLD: Duration = Duration::from_millis(100);
//! const BLINK: [Step; 2] = [Step::new(12, RED, HOLD), Step::new(12, RGB8::new(0, 0, 0), HOLD)];
//!
//! play_steps(&mut led_strip, BLINK);
//! ```

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;

use crate::led_strip::{Frame1d, LedStrip, RGB8, Ws2812Tx};

/// Set one pixel, flush, then hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// Strip index of the pixel to change.
    pub index: usize,
    /// New color for that pixel.
    pub color: RGB8,
    /// How long to keep the result on screen before the next step.
    pub hold: Duration,
}

impl Step {
    /// Create a step.
    #[must_use]
    pub const fn new(index: usize, color: RGB8, hold: Duration) -> Self {
        Self { index, color, hold }
    }
}

/// Play `steps` in order. Earlier pixels stay lit unless a later step changes them.
///
/// # Panics
///
/// Panics if a step's index is past the end of the strip.
pub fn play_steps<TX, D, const N: usize>(
    led_strip: &mut LedStrip<TX, D, N>,
    steps: impl IntoIterator<Item = Step>,
) where
    TX: Ws2812Tx,
    D: DelayNs,
{
    for Step { index, color, hold } in steps {
        led_strip.set(index, color.r, color.g, color.b);
        led_strip.flush();
        led_strip.hold(hold);
    }
}

/// Show each frame for its duration, once through.
pub fn play_frames<TX, D, const N: usize>(
    led_strip: &mut LedStrip<TX, D, N>,
    frames: impl IntoIterator<Item = (Frame1d<N>, Duration)>,
) where
    TX: Ws2812Tx,
    D: DelayNs,
{
    for (frame, duration) in frames {
        led_strip.write_frame(frame);
        led_strip.hold(duration);
    }
}

//! A device abstraction for rectangular NeoPixel-style (WS2812) LED panel displays.
//!
//! [`Led2d`] wraps an [`LedStrip`] with an [`LedLayout`] so pixels can be
//! addressed by `(x, y)` instead of wiring order. It also implements the
//! [`embedded-graphics`](https://docs.rs/embedded-graphics) `DrawTarget`
//! trait, so primitives and text draw straight into the pixel buffer.
//!
//! # Example: Draw a Border
//!
//! ```rust,ignore
//! use embedded_graphics::{pixelcolor::Rgb888, prelude::*, primitives::{PrimitiveStyle, Rectangle}};
//! use pixel_keypad::led2d::{Led2d, LedLayout};
//!
//! const MATRIX_5X5: LedLayout<25, 5, 5> = LedLayout::serpentine_row_major();
//!
//! let mut led2d = Led2d::new(led_strip, &MATRIX_5X5);
//! Rectangle::new(Point::zero(), led2d.size())
//!     .into_styled(PrimitiveStyle::with_stroke(Rgb888::RED, 1))
//!     .draw(&mut led2d)?;
//! led2d.flush();
//! ```

use core::convert::Infallible;

// Re-export geometric types from embedded-graphics for convenience
pub use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb888, prelude::*};
use embedded_hal::delay::DelayNs;

use crate::led_strip::{LedStrip, RGB8, ToRgb8, Ws2812Tx};

pub mod layout;

pub use layout::LedLayout;

/// An [`LedStrip`] addressed as a `W × H` grid.
pub struct Led2d<TX, D, const N: usize, const W: usize, const H: usize> {
    led_strip: LedStrip<TX, D, N>,
    xy_to_index: [u16; N],
}

impl<TX: Ws2812Tx, D: DelayNs, const N: usize, const W: usize, const H: usize>
    Led2d<TX, D, N, W, H>
{
    /// Panel width in pixels (columns).
    pub const WIDTH: usize = W;
    /// Panel height in pixels (rows).
    pub const HEIGHT: usize = H;

    /// Wrap `led_strip`, using `led_layout` to find each cell's strip index.
    #[must_use]
    pub const fn new(led_strip: LedStrip<TX, D, N>, led_layout: &LedLayout<N, W, H>) -> Self {
        Self {
            led_strip,
            xy_to_index: led_layout.xy_to_index(),
        }
    }

    /// Strip index of cell `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= W` or `y >= H`.
    #[must_use]
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        assert!(x < W, "x must be within width");
        assert!(y < H, "y must be within height");
        usize::from(self.xy_to_index[y * W + x])
    }

    /// Store `color` at cell `(x, y)`. Nothing is sent until [`flush`](Self::flush).
    ///
    /// # Panics
    ///
    /// Panics if `x >= W` or `y >= H`.
    pub fn set_xy(&mut self, x: usize, y: usize, color: RGB8) {
        let index = self.index_of(x, y);
        self.led_strip.frame_mut()[index] = color;
    }

    /// The buffered color at cell `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= W` or `y >= H`.
    #[must_use]
    pub fn get_xy(&self, x: usize, y: usize) -> RGB8 {
        self.led_strip.pixel(self.index_of(x, y))
    }

    /// Set every pixel to black.
    pub fn clear(&mut self) {
        self.led_strip.clear();
    }

    /// Send the buffer to the panel. See [`LedStrip::flush`].
    pub fn flush(&mut self) {
        self.led_strip.flush();
    }

    /// The underlying strip.
    pub const fn led_strip(&mut self) -> &mut LedStrip<TX, D, N> {
        &mut self.led_strip
    }

    /// Give back the underlying strip.
    #[must_use]
    pub fn into_led_strip(self) -> LedStrip<TX, D, N> {
        self.led_strip
    }
}

impl<TX: Ws2812Tx, D: DelayNs, const N: usize, const W: usize, const H: usize> OriginDimensions
    for Led2d<TX, D, N, W, H>
{
    fn size(&self) -> Size {
        Size::new(W as u32, H as u32)
    }
}

impl<TX: Ws2812Tx, D: DelayNs, const N: usize, const W: usize, const H: usize> DrawTarget
    for Led2d<TX, D, N, W, H>
{
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            // Off-panel pixels are clipped.
            if let (Ok(x_index), Ok(y_index)) = (usize::try_from(coord.x), usize::try_from(coord.y)) {
                if x_index < W && y_index < H {
                    self.set_xy(x_index, y_index, color.to_rgb8());
                }
            }
        }
        Ok(())
    }
}

//! Crate-wide error type.

use derive_more::{Debug, Display, Error};

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors that can occur while setting up devices.
///
/// Pixel and keypad operations have no error path: out-of-range indices are
/// contract violations (they panic), and "no key pressed" is `None`.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The PIO block has no free instruction memory for the WS2812 program.
    #[display("no PIO instruction memory left for the WS2812 program")]
    PioProgramSpace,
}

// Lets `?` pass through `Infallible` results, such as drawing on a `Led2d`.
impl From<core::convert::Infallible> for Error {
    fn from(never: core::convert::Infallible) -> Self {
        match never {}
    }
}

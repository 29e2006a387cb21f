//! A device abstraction for row/column key matrices (e.g. a 4×4 membrane keypad).
//!
//! See [`Keypad`] for the scan algorithm and an example, and [`KeyTracker`]
//! for turning raw polls into one event per press.

use core::convert::Infallible;

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::delay_for;

// ============================================================================
// Constants
// ============================================================================

/// Default wait between asserting a row and sampling the columns.
///
/// Long enough for the line to settle and for contact bounce to die down.
pub const SETTLE_DELAY_DEFAULT: Duration = Duration::from_millis(10);

/// Default number of identical reads [`KeyTracker`] needs before it trusts a change.
pub const STABLE_POLLS_DEFAULT: u8 = 2;

/// Symbols of the common 4×4 membrane keypad, row-major.
pub const KEYPAD_4X4: [[char; 4]; 4] = [
    ['1', '2', '3', 'A'],
    ['4', '5', '6', 'B'],
    ['7', '8', '9', 'C'],
    ['*', '0', '#', 'D'],
];

// ============================================================================
// PressedTo - How the matrix is wired
// ============================================================================

/// Describes which level a key connects through when it is pressed.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressedTo {
    /// Rows are asserted HIGH; a pressed key pulls its column HIGH.
    /// Columns use pull-down resistors.
    Voltage,

    /// Rows are asserted LOW; a pressed key pulls its column LOW.
    /// Columns use pull-up resistors.
    Ground,
}

impl PressedTo {
    const fn active_high(self) -> bool {
        match self {
            Self::Voltage => true,
            Self::Ground => false,
        }
    }
}

// ============================================================================
// Keypad
// ============================================================================

/// Scans a `ROWS × COLS` key matrix and reports which single key is down.
///
/// Rows are outputs, columns are inputs, and `key_map[row][column]` names each
/// key. Between polls every row is held at the active level, so a single read
/// of the columns tells whether *anything* is pressed.
///
/// [`poll_key`](Self::poll_key) works in five steps:
///
/// 1. Sample all columns. If none is active, return `None` without touching
///    any row.
/// 2. De-assert all rows.
/// 3. For each row in order: assert it, wait the settle delay, sample the
///    columns, de-assert it. Stop at the first row with an active column.
/// 4. Re-assert all rows.
/// 5. If exactly one column was active, return that key; otherwise `None`.
///
/// Only the first row with any active column is examined, so presses in two
/// different rows report the upper one. Two columns active in the same row are
/// ambiguous and report `None`. A poll takes at most `ROWS × settle delay`.
///
/// Each poll is independent; wrap the result in a [`KeyTracker`] to suppress
/// repeats while a key is held.
///
/// # Example
///
/// ```ignore
/// use pixel_keypad::keypad::{KEYPAD_4X4, Keypad, PressedTo};
///
/// let mut keypad = Keypad::new_rp(
///     [p.PIN_8.into(), p.PIN_9.into(), p.PIN_6.into(), p.PIN_5.into()],
///     [p.PIN_4.into(), p.PIN_3.into(), p.PIN_2.into(), p.PIN_1.into()],
///     KEYPAD_4X4,
///     PressedTo::Voltage,
/// );
///
/// loop {
///     if let Some(key) = keypad.poll_key() {
///         // react to `key`
///     }
/// }
/// ```
pub struct Keypad<R, C, D, K, const ROWS: usize, const COLS: usize> {
    rows: [R; ROWS],
    columns: [C; COLS],
    key_map: [[K; COLS]; ROWS],
    delay: D,
    pressed_to: PressedTo,
    settle_delay: Duration,
    column_masks: [u32; COLS],
}

impl<R, C, D, K, const ROWS: usize, const COLS: usize> Keypad<R, C, D, K, ROWS, COLS>
where
    R: OutputPin<Error = Infallible>,
    C: InputPin<Error = Infallible>,
    D: DelayNs,
    K: Copy,
{
    /// Take ownership of the row and column lines and drive every row active.
    ///
    /// All lines must be distinct; on the Pico this follows from pin ownership.
    #[must_use]
    pub fn new(
        rows: [R; ROWS],
        columns: [C; COLS],
        key_map: [[K; COLS]; ROWS],
        delay: D,
        pressed_to: PressedTo,
    ) -> Self {
        const {
            assert!(ROWS > 0 && COLS > 0, "keypad needs at least one row and one column");
            assert!(COLS <= 32, "column masks are 32 bits wide");
        };
        let mut keypad = Self {
            rows,
            columns,
            key_map,
            delay,
            pressed_to,
            settle_delay: SETTLE_DELAY_DEFAULT,
            column_masks: core::array::from_fn(|column_index| 1_u32 << column_index),
        };
        keypad.assert_all_rows();
        keypad
    }

    /// Use `settle_delay` instead of [`SETTLE_DELAY_DEFAULT`] after each row strobe.
    #[must_use]
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Wait used after each row strobe.
    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Return the key currently pressed, or `None` if no single key is.
    ///
    /// See [`Keypad`] for the exact algorithm.
    pub fn poll_key(&mut self) -> Option<K> {
        if self.sample_columns() == 0 {
            return None;
        }

        self.deassert_all_rows();

        let mut pressed_row = None;
        let mut columns = 0;
        for row_index in 0..ROWS {
            self.drive_row(row_index, true);
            delay_for(&mut self.delay, self.settle_delay);
            columns = self.sample_columns();
            self.drive_row(row_index, false);
            if columns != 0 {
                pressed_row = Some(row_index);
                break;
            }
        }

        self.assert_all_rows();

        let Some(row_index) = pressed_row else {
            // Released (or bounced) between the idle check and the strobe.
            return None;
        };
        let Some(column_index) = self.column_masks.iter().position(|&mask| mask == columns) else {
            #[cfg(feature = "defmt")]
            defmt::trace!("Keypad: row {} ambiguous columns {=u32:b}", row_index, columns);
            return None;
        };

        #[cfg(feature = "defmt")]
        defmt::debug!("Keypad: row {} column {} pressed", row_index, column_index);
        self.key_map
            .get(row_index)
            .and_then(|row| row.get(column_index))
            .copied()
    }

    /// Read every column into a mask, bit `c` set when column `c` is active.
    fn sample_columns(&mut self) -> u32 {
        let active_high = self.pressed_to.active_high();
        self.columns
            .iter_mut()
            .zip(self.column_masks)
            .fold(0, |columns, (column, mask)| {
                let Ok(is_high) = column.is_high();
                if is_high == active_high { columns | mask } else { columns }
            })
    }

    fn drive_row(&mut self, row_index: usize, active: bool) {
        if let Some(row) = self.rows.get_mut(row_index) {
            Self::drive(row, active, self.pressed_to);
        }
    }

    fn assert_all_rows(&mut self) {
        for row in &mut self.rows {
            Self::drive(row, true, self.pressed_to);
        }
    }

    fn deassert_all_rows(&mut self) {
        for row in &mut self.rows {
            Self::drive(row, false, self.pressed_to);
        }
    }

    fn drive(row: &mut R, active: bool, pressed_to: PressedTo) {
        let Ok(()) = if active == pressed_to.active_high() {
            row.set_high()
        } else {
            row.set_low()
        };
    }
}

#[cfg(not(feature = "host"))]
mod rp {
    use embassy_rp::Peri;
    use embassy_rp::gpio::{AnyPin, Input, Level, Output, Pull};
    use embassy_time::Delay;

    use super::{Keypad, PressedTo};

    impl<'d, K: Copy, const ROWS: usize, const COLS: usize>
        Keypad<Output<'d>, Input<'d>, Delay, K, ROWS, COLS>
    {
        /// Creates a keypad from Pico GPIO pins.
        ///
        /// Column pulls follow the wiring:
        /// - [`PressedTo::Voltage`]: pull-down (rows drive 3.3V through the key)
        /// - [`PressedTo::Ground`]: pull-up (rows drive GND through the key)
        #[must_use]
        pub fn new_rp(
            row_pins: [Peri<'d, AnyPin>; ROWS],
            column_pins: [Peri<'d, AnyPin>; COLS],
            key_map: [[K; COLS]; ROWS],
            pressed_to: PressedTo,
        ) -> Self {
            let pull = match pressed_to {
                PressedTo::Voltage => Pull::Down,
                PressedTo::Ground => Pull::Up,
            };
            let rows = row_pins.map(|pin| Output::new(pin, Level::Low));
            let columns = column_pins.map(|pin| Input::new(pin, pull));
            defmt::info!("Keypad: {}x{} matrix ready", ROWS, COLS);
            Self::new(rows, columns, key_map, Delay, pressed_to)
        }
    }
}

// ============================================================================
// KeyTracker
// ============================================================================

/// Turns raw [`Keypad::poll_key`] results into one report per press.
///
/// A reading must repeat `stable_polls` times in a row before it counts.
/// A stable key is reported once; it is reported again only after a stable
/// release (or after a different stable key).
///
/// ```rust
/// use pixel_keypad::keypad::KeyTracker;
///
/// let mut tracker = KeyTracker::new();
/// assert_eq!(tracker.update(Some('5')), None); // first sighting
/// assert_eq!(tracker.update(Some('5')), Some('5')); // stable: report
/// assert_eq!(tracker.update(Some('5')), None); // still held
/// ```
#[derive(Clone, Copy, Debug)]
pub struct KeyTracker<K> {
    stable_polls: u8,
    candidate: Option<K>,
    candidate_count: u8,
    reported: Option<K>,
}

impl<K: Copy + PartialEq> KeyTracker<K> {
    /// A tracker needing [`STABLE_POLLS_DEFAULT`] identical reads.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_stable_polls(STABLE_POLLS_DEFAULT)
    }

    /// A tracker needing `stable_polls` identical reads (at least 1).
    #[must_use]
    pub const fn with_stable_polls(stable_polls: u8) -> Self {
        assert!(stable_polls > 0, "stable_polls must be positive");
        Self {
            stable_polls,
            candidate: None,
            candidate_count: 0,
            reported: None,
        }
    }

    /// Feed one raw reading; returns `Some(key)` only when a new press becomes stable.
    pub fn update(&mut self, reading: Option<K>) -> Option<K> {
        if reading == self.candidate {
            self.candidate_count = self.candidate_count.saturating_add(1);
        } else {
            self.candidate = reading;
            self.candidate_count = 1;
        }

        if self.candidate_count < self.stable_polls || self.candidate == self.reported {
            return None;
        }
        self.reported = self.candidate;
        self.reported
    }

    /// The key currently considered held down, if any.
    #[must_use]
    pub const fn held(&self) -> Option<K> {
        self.reported
    }
}

impl<K: Copy + PartialEq> Default for KeyTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

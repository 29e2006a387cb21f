//! Recording fakes for the hardware the drivers own.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use pixel_keypad::led_strip::Ws2812Tx;

/// Something a driver did to the hardware, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Byte(u8),
    Idle,
    DelayNs(u64),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn bytes(log: &Log) -> Vec<u8> {
    log.borrow()
        .iter()
        .filter_map(|event| match event {
            Event::Byte(byte) => Some(*byte),
            _ => None,
        })
        .collect()
}

pub fn delays_ns(log: &Log) -> Vec<u64> {
    log.borrow()
        .iter()
        .filter_map(|event| match event {
            Event::DelayNs(ns) => Some(*ns),
            _ => None,
        })
        .collect()
}

pub struct RecordingTx(pub Log);

impl Ws2812Tx for RecordingTx {
    fn push_byte(&mut self, byte: u8) {
        self.0.borrow_mut().push(Event::Byte(byte));
    }

    fn wait_idle(&mut self) {
        self.0.borrow_mut().push(Event::Idle);
    }
}

pub struct RecordingDelay(pub Log);

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().push(Event::DelayNs(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().push(Event::DelayNs(u64::from(us) * 1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().push(Event::DelayNs(u64::from(ms) * 1_000_000));
    }
}

/// A key matrix: row pins drive levels, column pins read them back through pressed keys.
pub struct Matrix {
    /// `true` when rows are asserted high and columns pulled down.
    pub active_high: bool,
    pub row_levels: Vec<bool>,
    pub pressed: Vec<(usize, usize)>,
    pub row_writes: usize,
    pub column_reads: usize,
    /// Release every key once this many column reads have happened.
    pub release_after_reads: Option<usize>,
}

pub type SharedMatrix = Rc<RefCell<Matrix>>;

pub fn new_matrix(rows: usize, active_high: bool) -> SharedMatrix {
    Rc::new(RefCell::new(Matrix {
        active_high,
        row_levels: vec![!active_high; rows],
        pressed: Vec::new(),
        row_writes: 0,
        column_reads: 0,
        release_after_reads: None,
    }))
}

pub struct RowPin {
    pub index: usize,
    pub matrix: SharedMatrix,
}

impl ErrorType for RowPin {
    type Error = Infallible;
}

impl OutputPin for RowPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut matrix = self.matrix.borrow_mut();
        matrix.row_levels[self.index] = false;
        matrix.row_writes += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut matrix = self.matrix.borrow_mut();
        matrix.row_levels[self.index] = true;
        matrix.row_writes += 1;
        Ok(())
    }
}

pub struct ColumnPin {
    pub index: usize,
    pub matrix: SharedMatrix,
}

impl ErrorType for ColumnPin {
    type Error = Infallible;
}

impl InputPin for ColumnPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let mut matrix = self.matrix.borrow_mut();
        if matrix
            .release_after_reads
            .is_some_and(|reads| matrix.column_reads >= reads)
        {
            matrix.pressed.clear();
        }
        matrix.column_reads += 1;
        let active_high = matrix.active_high;
        let connected_to_active_row = matrix
            .pressed
            .iter()
            .any(|&(row, column)| column == self.index && matrix.row_levels[row] == active_high);
        // A pressed key copies the active row level; otherwise the pull wins.
        Ok(if connected_to_active_row {
            active_high
        } else {
            !active_high
        })
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub fn row_pins<const ROWS: usize>(matrix: &SharedMatrix) -> [RowPin; ROWS] {
    std::array::from_fn(|index| RowPin {
        index,
        matrix: Rc::clone(matrix),
    })
}

pub fn column_pins<const COLS: usize>(matrix: &SharedMatrix) -> [ColumnPin; COLS] {
    std::array::from_fn(|index| ColumnPin {
        index,
        matrix: Rc::clone(matrix),
    })
}

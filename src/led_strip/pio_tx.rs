//! WS2812 transmitter on an RP2040/RP2350 PIO state machine.
//!
//! Each bit takes 10 PIO cycles: 2 cycles high (start), 5 cycles high or low
//! (data), 3 cycles low (stop). The state machine clock is divided so that
//! bits go out at [`BIT_RATE_KHZ`]. The TX FIFO is joined (8 entries) and
//! autopull fires every 8 bits, so one FIFO word carries one color byte.

use core::hint::spin_loop;

use embassy_rp::Peri;
use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pio::{
    Common, Config, FifoJoin, Instance, LoadedProgram, PioPin, ShiftConfig, ShiftDirection,
    StateMachine,
};
use fixed::types::U24F8;

use super::{BIT_RATE_KHZ, Ws2812Tx};
use crate::{Error, Result};

const T1: u8 = 2; // start bit
const T2: u8 = 5; // data bit
const T3: u8 = 3; // stop bit
const CYCLES_PER_BIT: u32 = (T1 + T2 + T3) as u32;

/// The WS2812 program, loaded once into a PIO block's instruction memory.
///
/// Several [`PioWs2812Tx`] on the same PIO block can share one program.
pub struct PioWs2812Program<'d, PIO: Instance> {
    program: LoadedProgram<'d, PIO>,
}

impl<'d, PIO: Instance> PioWs2812Program<'d, PIO> {
    /// Assemble the program and load it into `common`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PioProgramSpace`] when the PIO block has no room left.
    /// There is no recovery at runtime; treat it as a wiring/configuration bug.
    pub fn new(common: &mut Common<'d, PIO>) -> Result<Self> {
        let side_set = pio::SideSet::new(false, 1, false);
        let mut assembler: pio::Assembler<32> = pio::Assembler::new_with_side_set(side_set);

        let mut wrap_target = assembler.label();
        let mut wrap_source = assembler.label();
        let mut do_zero = assembler.label();
        assembler.set_with_side_set(pio::SetDestination::PINDIRS, 1, 0);
        assembler.bind(&mut wrap_target);
        // Stop bit
        assembler.out_with_delay_and_side_set(pio::OutDestination::X, 1, T3 - 1, 0);
        // Start bit
        assembler.jmp_with_delay_and_side_set(
            pio::JmpCondition::XIsZero,
            &mut do_zero,
            T1 - 1,
            1,
        );
        // Data bit = 1
        assembler.jmp_with_delay_and_side_set(
            pio::JmpCondition::Always,
            &mut wrap_target,
            T2 - 1,
            1,
        );
        assembler.bind(&mut do_zero);
        // Data bit = 0
        assembler.nop_with_delay_and_side_set(T2 - 1, 0);
        assembler.bind(&mut wrap_source);

        let assembled = assembler.assemble_with_wrap(wrap_source, wrap_target);
        let program = common.try_load_program(&assembled).map_err(|_| {
            defmt::error!("PioWs2812Program: no instruction memory left");
            Error::PioProgramSpace
        })?;
        Ok(Self { program })
    }
}

/// One PIO state machine bound to one data pin, sending WS2812 bytes.
///
/// Owning the state machine and the pin makes this the only writer on that
/// line. Pushes spin until the FIFO has room; nothing here yields.
pub struct PioWs2812Tx<'d, PIO: Instance, const SM: usize> {
    sm: StateMachine<'d, PIO, SM>,
}

impl<'d, PIO: Instance, const SM: usize> PioWs2812Tx<'d, PIO, SM> {
    /// Bind `sm` to `pin`, configure it for 800 kHz WS2812 timing, and start it.
    #[must_use]
    pub fn new(
        common: &mut Common<'d, PIO>,
        mut sm: StateMachine<'d, PIO, SM>,
        pin: Peri<'d, impl PioPin>,
        program: &PioWs2812Program<'d, PIO>,
    ) -> Self {
        let mut cfg = Config::default();

        let out_pin = common.make_pio_pin(pin);
        cfg.set_out_pins(&[&out_pin]);
        cfg.set_set_pins(&[&out_pin]);
        cfg.use_program(&program.program, &[&out_pin]);

        // Clock divider for the state machine.
        let clock_freq = U24F8::from_num(clk_sys_freq() / 1000);
        let bit_freq = U24F8::from_num(BIT_RATE_KHZ) * CYCLES_PER_BIT;
        cfg.clock_divider = clock_freq / bit_freq;

        cfg.fifo_join = FifoJoin::TxOnly;
        cfg.shift_out = ShiftConfig {
            auto_fill: true,
            threshold: 8,
            direction: ShiftDirection::Left,
        };

        sm.set_config(&cfg);
        sm.set_enable(true);
        defmt::info!("PioWs2812Tx: state machine {} running", SM);

        Self { sm }
    }
}

impl<PIO: Instance, const SM: usize> Ws2812Tx for PioWs2812Tx<'_, PIO, SM> {
    fn push_byte(&mut self, byte: u8) {
        // Left shift with an 8-bit threshold reads the top byte of the word.
        let word = u32::from(byte) << 24;
        while !self.sm.tx().try_push(word) {
            spin_loop();
        }
        // Clear the sticky stall flag. It is raised again only once this
        // byte (and anything queued before it) has been shifted out.
        let _ = self.sm.tx().stalled();
    }

    fn wait_idle(&mut self) {
        while !self.sm.tx().empty() {
            spin_loop();
        }
        // An empty FIFO still leaves the last byte in the shift register.
        // The program stalls on the next autopull, with the line low.
        while !self.sm.tx().stalled() {
            spin_loop();
        }
    }
}

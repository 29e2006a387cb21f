#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::{convert::Infallible, panic};

use embassy_executor::Spawner;
use embassy_rp::{
    bind_interrupts,
    peripherals::PIO0,
    pio::{InterruptHandler, Pio},
};
use embassy_time::{Delay, Duration, Timer};
use pixel_keypad::{
    Result,
    animation::{Step, play_steps},
    keypad::{KEYPAD_4X4, KeyTracker, Keypad, PressedTo},
    led2d::LedLayout,
    led_strip::{LedStrip, RGB8},
    led_strip::pio_tx::{PioWs2812Program, PioWs2812Tx},
};
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
});

// The BitDogLab 5x5 matrix snakes across rows, starting at the bottom.
const MATRIX_5X5: LedLayout<25, 5, 5> = LedLayout::serpentine_row_major().flip_v();
const XY_TO_INDEX: [u16; 25] = MATRIX_5X5.xy_to_index();

const BLACK: RGB8 = RGB8::new(0, 0, 0);
const RED: RGB8 = RGB8::new(10, 0, 0);
const BLUE: RGB8 = RGB8::new(0, 0, 255);

// Heart outline, bottom point first, as (x, y).
const HEART: [(usize, usize); 10] = [
    (2, 4),
    (1, 3),
    (3, 3),
    (0, 2),
    (4, 2),
    (0, 1),
    (2, 1),
    (4, 1),
    (1, 0),
    (3, 0),
];
const HEART_STEP: Duration = Duration::from_millis(100);
const HEART_HOLD: Duration = Duration::from_millis(500);
const FILL_STEP: Duration = Duration::from_micros(200);
const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(_spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    // One PIO state machine drives the matrix data line on GPIO 7.
    let Pio { mut common, sm0, .. } = Pio::new(p.PIO0, Irqs);
    let program = PioWs2812Program::new(&mut common)?;
    let tx = PioWs2812Tx::new(&mut common, sm0, p.PIN_7, &program);
    let mut led_strip: LedStrip<_, _, 25> = LedStrip::new(tx, Delay);
    led_strip.flush();

    // Rows on GPIO 8, 9, 6, 5 (GPIO 7 is the matrix), columns on GPIO 4..1.
    // Keys connect rows to 3.3V.
    let mut keypad = Keypad::new_rp(
        [p.PIN_8.into(), p.PIN_9.into(), p.PIN_6.into(), p.PIN_5.into()],
        [p.PIN_4.into(), p.PIN_3.into(), p.PIN_2.into(), p.PIN_1.into()],
        KEYPAD_4X4,
        PressedTo::Voltage,
    );
    let mut key_tracker = KeyTracker::new();

    loop {
        if let Some(key) = key_tracker.update(keypad.poll_key()) {
            defmt::info!("Key pressed: {}", key);
            match key {
                'A' => {
                    led_strip.clear();
                    led_strip.flush();
                }
                'B' => play_steps(
                    &mut led_strip,
                    (0..25).map(|index| Step::new(index, BLUE, FILL_STEP)),
                ),
                '2' => {
                    play_steps(&mut led_strip, heart_steps(RED, HEART_STEP));
                    led_strip.hold(HEART_HOLD);
                    play_steps(&mut led_strip, heart_steps(BLACK, HEART_STEP).rev());
                }
                _ => {}
            }
        }
        Timer::after(POLL_INTERVAL).await;
    }
}

fn heart_steps(color: RGB8, hold: Duration) -> impl DoubleEndedIterator<Item = Step> {
    HEART
        .into_iter()
        .map(move |(x, y)| Step::new(usize::from(XY_TO_INDEX[y * 5 + x]), color, hold))
}

#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::{convert::Infallible, future, panic};

use embassy_executor::Spawner;
use embassy_rp::{
    bind_interrupts,
    peripherals::PIO0,
    pio::{InterruptHandler, Pio},
};
use embassy_time::{Delay, Duration};
use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
};
use pixel_keypad::{
    Result,
    led_strip::pio_tx::{PioWs2812Program, PioWs2812Tx},
    led_strip::{Current, Gamma, LedStrip, ToRgb888, colors},
    led2d::{Led2d, LedLayout},
};
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
});

const MATRIX_5X5: LedLayout<25, 5, 5> = LedLayout::serpentine_row_major().flip_v();
const FRAME_HOLD: Duration = Duration::from_millis(700);

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(_spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    let Pio { mut common, sm0, .. } = Pio::new(p.PIO0, Irqs);
    let program = PioWs2812Program::new(&mut common)?;
    let tx = PioWs2812Tx::new(&mut common, sm0, p.PIN_7, &program);

    // Full-scale colors are blinding on a 5x5 board; cap the current and
    // correct for perceived brightness.
    let led_strip: LedStrip<_, _, 25> = LedStrip::new(tx, Delay)
        .with_gamma(Gamma::Gamma2_2)
        .with_max_current(Current::Milliamps(250));
    let mut led2d = Led2d::new(led_strip, &MATRIX_5X5);

    // - smart-leds colors are web/X11 colors (GREEN = 0,128,0).
    // - embedded-graphics colors are full channels (GREEN = 0,255,0).
    let border = PrimitiveStyle::with_stroke(colors::ORANGE.to_rgb888(), 1);
    let cross = PrimitiveStyle::with_stroke(Rgb888::CYAN, 1);
    let bounds = Rectangle::new(Point::zero(), led2d.size());

    for _ in 0..3 {
        led2d.clear();
        bounds.into_styled(border).draw(&mut led2d)?;
        led2d.flush();
        led2d.led_strip().hold(FRAME_HOLD);

        led2d.clear();
        Line::new(Point::new(0, 0), Point::new(4, 4))
            .into_styled(cross)
            .draw(&mut led2d)?;
        Line::new(Point::new(4, 0), Point::new(0, 4))
            .into_styled(cross)
            .draw(&mut led2d)?;
        led2d.flush();
        led2d.led_strip().hold(FRAME_HOLD);
    }

    // Single pixels by coordinate; (0, 0) is top-left.
    led2d.clear();
    led2d.set_xy(2, 2, colors::HOT_PINK);
    led2d.flush();

    future::pending().await // run forever
}

#![cfg(feature = "host")]
#![allow(missing_docs)]
//! Host-level tests for the pixel buffer and the flush byte stream.

mod support;

use pixel_keypad::led_strip::{
    Current, Frame1d, Gamma, LedStrip, RESET_DELAY, RGB8, colors, generate_combo_table,
};
use support::{Event, RecordingDelay, RecordingTx, bytes, delays_ns, new_log};

type Strip25 = LedStrip<RecordingTx, RecordingDelay, 25>;

fn strip25() -> (Strip25, support::Log) {
    let log = new_log();
    let led_strip = LedStrip::new(RecordingTx(log.clone()), RecordingDelay(log.clone()));
    (led_strip, log)
}

#[test]
fn set_then_read_returns_stored_color() {
    let (mut led_strip, _log) = strip25();
    led_strip.set(3, 1, 2, 3);
    led_strip.set(24, 255, 128, 0);

    assert_eq!(led_strip.pixel(3), RGB8::new(1, 2, 3));
    assert_eq!(led_strip.pixel(24), RGB8::new(255, 128, 0));
    assert_eq!(led_strip.pixel(4), RGB8::new(0, 0, 0));
}

#[test]
fn clear_blacks_out_every_pixel() {
    let (mut led_strip, _log) = strip25();
    *led_strip.frame_mut() = Frame1d::filled(colors::WHITE);
    led_strip.clear();
    led_strip.set(7, 9, 9, 9);

    for index in 0..Strip25::LEN {
        let expected = if index == 7 {
            RGB8::new(9, 9, 9)
        } else {
            RGB8::new(0, 0, 0)
        };
        assert_eq!(led_strip.pixel(index), expected, "pixel {index}");
    }
}

#[test]
fn new_strip_starts_black() {
    let (led_strip, _log) = strip25();
    assert_eq!(*led_strip.frame(), Frame1d::<25>::new());
}

#[test]
#[should_panic(expected = "pixel index must be within the strip length")]
fn set_past_end_panics() {
    let (mut led_strip, _log) = strip25();
    led_strip.set(25, 0, 0, 0);
}

#[test]
fn frame_get_is_none_past_end() {
    let frame = Frame1d::<4>::filled(colors::RED);
    assert_eq!(frame.get(3), Some(colors::RED));
    assert_eq!(frame.get(4), None);
}

#[test]
fn flush_sends_grb_for_every_pixel_in_order() {
    let (mut led_strip, log) = strip25();
    led_strip.set(0, 10, 0, 0);
    led_strip.flush();

    let mut expected = vec![0, 10, 0];
    expected.extend(std::iter::repeat_n(0, 24 * 3));
    assert_eq!(bytes(&log), expected);
}

#[test]
fn flush_orders_channels_green_red_blue() {
    let log = new_log();
    let mut led_strip: LedStrip<_, _, 3> =
        LedStrip::new(RecordingTx(log.clone()), RecordingDelay(log.clone()));
    led_strip.set(0, 1, 2, 3);
    led_strip.set(1, 4, 5, 6);
    led_strip.set(2, 7, 8, 9);
    led_strip.flush();

    assert_eq!(bytes(&log), [2, 1, 3, 5, 4, 6, 8, 7, 9]);
}

#[test]
fn flush_waits_for_latch_after_last_byte() {
    let (mut led_strip, log) = strip25();
    led_strip.flush();

    let events = log.borrow();
    assert_eq!(events.len(), 25 * 3 + 2);
    assert_eq!(events[25 * 3], Event::Idle);
    let Event::DelayNs(latch_ns) = events[25 * 3 + 1] else {
        panic!("expected the latch delay last, got {:?}", events[25 * 3 + 1]);
    };
    assert!(latch_ns >= RESET_DELAY.as_micros() * 1_000);
}

#[test]
fn every_flush_sends_a_full_frame() {
    let (mut led_strip, log) = strip25();
    led_strip.flush();
    led_strip.set(1, 0, 0, 200);
    led_strip.flush();

    let sent = bytes(&log);
    assert_eq!(sent.len(), 2 * 25 * 3);
    assert_eq!(&sent[75 + 3..75 + 6], &[0, 0, 200]);
    assert_eq!(delays_ns(&log).len(), 2);
}

#[test]
fn write_frame_replaces_buffer_and_flushes() {
    let log = new_log();
    let mut led_strip: LedStrip<_, _, 2> =
        LedStrip::new(RecordingTx(log.clone()), RecordingDelay(log.clone()));
    led_strip.write_frame(Frame1d([colors::BLUE, RGB8::new(1, 2, 3)]));

    assert_eq!(led_strip.pixel(0), colors::BLUE);
    assert_eq!(bytes(&log), [0, 0, 255, 2, 1, 3]);
}

#[test]
fn gamma_and_current_limit_scale_output_not_buffer() {
    let log = new_log();
    let mut led_strip: LedStrip<_, _, 1> =
        LedStrip::new(RecordingTx(log.clone()), RecordingDelay(log.clone()))
            .with_gamma(Gamma::Gamma2_2);
    led_strip.set(0, 255, 128, 0);
    led_strip.flush();

    assert_eq!(bytes(&log), [56, 255, 0]);
    assert_eq!(led_strip.pixel(0), RGB8::new(255, 128, 0));
}

#[test]
fn current_budget_caps_brightness() {
    let log = new_log();
    let led_strip: Strip25 = LedStrip::new(RecordingTx(log.clone()), RecordingDelay(log))
        .with_max_current(Current::Milliamps(500));

    // 25 LEDs * 60 mA = 1500 mA worst case; 500 / 1500 of full scale.
    assert_eq!(led_strip.max_brightness(), 85);
    assert_eq!(Current::Unlimited.max_brightness(1500), 255);
    assert_eq!(Current::Milliamps(5000).max_brightness(1500), 255);
}

#[test]
fn default_combo_table_is_identity() {
    let table = generate_combo_table(Gamma::default(), u8::MAX);
    for (index, value) in table.iter().enumerate() {
        assert_eq!(usize::from(*value), index);
    }
}

#[test]
fn into_parts_returns_hardware() {
    let (led_strip, log) = strip25();
    let (mut tx, _delay) = led_strip.into_parts();
    pixel_keypad::led_strip::Ws2812Tx::push_byte(&mut tx, 42);
    assert_eq!(bytes(&log), [42]);
}

#![cfg(feature = "host")]
#![allow(missing_docs)]
//! Host-level tests for the step and frame players.

mod support;

use embassy_time::Duration;
use pixel_keypad::animation::{Step, play_frames, play_steps};
use pixel_keypad::led_strip::{Frame1d, LedStrip, RGB8};
use support::{Event, RecordingDelay, RecordingTx, bytes, delays_ns, new_log};

const RED: RGB8 = RGB8::new(10, 0, 0);
const BLACK: RGB8 = RGB8::new(0, 0, 0);
const LATCH_NS: u64 = 100_000;

fn strip4() -> (LedStrip<RecordingTx, RecordingDelay, 4>, support::Log) {
    let log = new_log();
    let led_strip = LedStrip::new(RecordingTx(log.clone()), RecordingDelay(log.clone()));
    (led_strip, log)
}

fn flush_count(log: &support::Log) -> usize {
    log.borrow()
        .iter()
        .filter(|event| **event == Event::Idle)
        .count()
}

#[test]
fn each_step_flushes_then_holds() {
    let (mut led_strip, log) = strip4();
    let hold = Duration::from_millis(100);

    play_steps(
        &mut led_strip,
        [Step::new(1, RED, hold), Step::new(3, RED, hold)],
    );

    assert_eq!(flush_count(&log), 2);
    assert_eq!(delays_ns(&log), [LATCH_NS, 100_000_000, LATCH_NS, 100_000_000]);
    // Earlier pixels stay lit.
    assert_eq!(
        bytes(&log)[12..],
        [0, 0, 0, 0, 10, 0, 0, 0, 0, 0, 10, 0]
    );
}

#[test]
fn steps_can_turn_pixels_back_off() {
    let (mut led_strip, log) = strip4();
    let hold = Duration::from_millis(50);

    play_steps(
        &mut led_strip,
        [Step::new(2, RED, hold), Step::new(2, BLACK, hold)],
    );

    assert_eq!(bytes(&log)[12..], [0; 12]);
    assert_eq!(led_strip.pixel(2), BLACK);
}

#[test]
fn empty_step_list_does_nothing() {
    let (mut led_strip, log) = strip4();
    play_steps(&mut led_strip, [] as [Step; 0]);
    assert!(log.borrow().is_empty());
}

#[test]
#[should_panic(expected = "pixel index must be within the strip length")]
fn step_past_the_end_panics() {
    let (mut led_strip, _log) = strip4();
    play_steps(&mut led_strip, [Step::new(4, RED, Duration::from_millis(1))]);
}

#[test]
fn frames_are_shown_for_their_durations() {
    let (mut led_strip, log) = strip4();
    let first = Frame1d::filled(RGB8::new(1, 2, 3));
    let mut second = Frame1d::new();
    second[0] = RGB8::new(4, 5, 6);

    play_frames(
        &mut led_strip,
        [
            (first, Duration::from_millis(150)),
            (second, Duration::from_millis(300)),
        ],
    );

    assert_eq!(flush_count(&log), 2);
    assert_eq!(
        delays_ns(&log),
        [LATCH_NS, 150_000_000, LATCH_NS, 300_000_000]
    );
    let sent = bytes(&log);
    assert_eq!(sent[..3], [2, 1, 3]);
    assert_eq!(sent[12..15], [5, 4, 6]);
    assert_eq!(*led_strip.frame(), second);
}

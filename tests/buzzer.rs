//! Host-level tests for the beep sequencer.

use fan_kit::{BUZZER_GAP_MS, BUZZER_LONG_MS, BUZZER_SHORT_MS, Buzzer, BuzzerPhase};

/// Level after updating at each time in `times`.
fn levels(buzzer: &mut Buzzer, times: &[u32]) -> Vec<bool> {
    times
        .iter()
        .map(|&now| {
            buzzer.update(now);
            buzzer.is_sounding()
        })
        .collect()
}

#[test]
fn three_beeps_follow_the_timeline() {
    let mut buzzer = Buzzer::new();
    buzzer.start(0, 3, 80, 120);
    assert_eq!(buzzer.phase(), BuzzerPhase::On);
    assert_eq!(
        levels(&mut buzzer, &[79, 80, 199, 200, 279, 280, 400, 480]),
        [true, false, false, true, true, false, true, false]
    );
    assert!(buzzer.is_idle());
}

#[test]
fn update_before_deadline_is_a_no_op() {
    let mut buzzer = Buzzer::new();
    buzzer.start(1_000, 1, 80, 120);
    let before = buzzer;
    buzzer.update(1_050);
    assert_eq!(buzzer, before);
}

#[test]
fn zero_beeps_leaves_buzzer_idle() {
    let mut buzzer = Buzzer::new();
    buzzer.start(0, 0, 80, 120);
    assert!(buzzer.is_idle());
    assert!(!buzzer.is_sounding());
}

#[test]
fn long_beep_then_short_beeps() {
    let mut buzzer = Buzzer::new();
    buzzer.start_with_follow_up(0, 2);
    assert_eq!(buzzer.follow_up_shorts(), 2);

    let long_end = BUZZER_LONG_MS;
    let first_short = long_end + BUZZER_GAP_MS;
    let second_short = first_short + BUZZER_SHORT_MS + BUZZER_GAP_MS;
    assert_eq!(
        levels(
            &mut buzzer,
            &[
                long_end - 1,
                long_end,
                first_short,
                first_short + BUZZER_SHORT_MS,
                second_short,
                second_short + BUZZER_SHORT_MS,
            ]
        ),
        [true, false, true, false, true, false]
    );
    assert!(buzzer.is_idle());
    assert_eq!(buzzer.follow_up_shorts(), 0);
}

#[test]
fn new_pattern_drops_pending_follow_up() {
    let mut buzzer = Buzzer::new();
    buzzer.start_with_follow_up(0, 4);
    buzzer.short_beep(100);
    assert_eq!(buzzer.follow_up_shorts(), 0);
    buzzer.update(100 + BUZZER_SHORT_MS);
    assert!(buzzer.is_idle());
}

#[test]
fn stop_silences_immediately() {
    let mut buzzer = Buzzer::new();
    buzzer.start(0, 5, 80, 120);
    buzzer.stop();
    assert!(buzzer.is_idle());
    assert_eq!(buzzer.beeps_remaining(), 0);
}

#[test]
fn pattern_survives_counter_wrap() {
    let mut buzzer = Buzzer::new();
    let start = u32::MAX - 40;
    buzzer.start(start, 2, 80, 120);
    buzzer.update(start.wrapping_add(79));
    assert!(buzzer.is_sounding());
    buzzer.update(start.wrapping_add(80));
    assert_eq!(buzzer.phase(), BuzzerPhase::Off);
    buzzer.update(start.wrapping_add(200));
    assert!(buzzer.is_sounding());
    assert_eq!(buzzer.beeps_remaining(), 1);
}

//! Host-level tests for the shared timebase and the command mailbox.

use fan_kit::{CommandMailbox, Period, Timebase, deadline_reached};

#[test]
fn timebase_counts_ticks() {
    let timebase = Timebase::new();
    assert_eq!(timebase.now_ms(), 0);
    for _ in 0..1_000 {
        timebase.tick();
    }
    assert_eq!(timebase.now_ms(), 1_000);
}

#[test]
fn deadline_comparison_survives_wrap() {
    assert!(deadline_reached(100, 100));
    assert!(!deadline_reached(99, 100));
    assert!(deadline_reached(5, u32::MAX - 5));
    assert!(!deadline_reached(u32::MAX - 5, 5));
}

#[test]
fn period_fires_once_per_deadline() {
    let mut period = Period::new(0, 10);
    assert!(!period.due(9));
    assert!(period.due(10));
    assert!(!period.due(10));
    assert_eq!(period.next_ms(), 20);
}

#[test]
fn late_period_catches_up_without_drift() {
    let mut period = Period::new(0, 1_000);
    // Loop stalled for 3.5 s: three deadlines are owed, one per call.
    assert!(period.due(3_500));
    assert!(period.due(3_500));
    assert!(period.due(3_500));
    assert!(!period.due(3_500));
    assert_eq!(period.next_ms(), 4_000);
}

#[test]
fn period_across_counter_wrap() {
    let mut period = Period::new(u32::MAX - 4, 10);
    assert_eq!(period.next_ms(), 5);
    assert!(!period.due(u32::MAX));
    assert!(period.due(5));
}

#[test]
fn mailbox_take_clears_slot() {
    let mailbox = CommandMailbox::new();
    assert!(!mailbox.is_ready());
    mailbox.publish(0x30);
    assert!(mailbox.is_ready());
    assert_eq!(mailbox.take(), Some(0x30));
    assert!(!mailbox.is_ready());
    assert_eq!(mailbox.take(), None);
}

#[test]
fn mailbox_latest_publish_wins() {
    let mailbox = CommandMailbox::new();
    mailbox.publish(0xA0);
    mailbox.publish(0x90);
    assert_eq!(mailbox.take(), Some(0x90));
}

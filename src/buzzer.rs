//! Non-blocking beep pattern player.
//!
//! See [`Buzzer`] for usage.
use crate::shared_constants::{BUZZER_GAP_MS, BUZZER_LONG_MS, BUZZER_SHORT_MS};
use crate::timebase::deadline_reached;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BuzzerPhase {
    #[default]
    Idle,
    /// Sounding.
    On,
    /// Silent gap after a beep.
    Off,
}

/// Beep pattern sequencer, advanced once per control-loop iteration.
///
/// [`Buzzer::start`] arms `beeps` on/off cycles. [`Buzzer::update`] only acts
/// when the current deadline has passed and is otherwise a no-op, so the loop
/// never waits on it. The output level is [`Buzzer::is_sounding`]: high during
/// each "on" phase, low otherwise.
///
/// A pattern ends right after its last "on" phase unless a follow-up is
/// pending, in which case one gap separates it from the follow-up beeps.
///
/// # Examples
/// ```
/// use fan_kit::Buzzer;
///
/// let mut buzzer = Buzzer::new();
/// buzzer.start(0, 2, 80, 120);
/// assert!(buzzer.is_sounding());
/// buzzer.update(80);
/// assert!(!buzzer.is_sounding()); // gap
/// buzzer.update(200);
/// assert!(buzzer.is_sounding()); // second beep
/// buzzer.update(280);
/// assert!(buzzer.is_idle());
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Buzzer {
    phase: BuzzerPhase,
    beeps_remaining: u8,
    on_ms: u32,
    off_ms: u32,
    deadline_ms: u32,
    follow_up_shorts: u8,
}

impl Buzzer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: BuzzerPhase::Idle,
            beeps_remaining: 0,
            on_ms: 0,
            off_ms: 0,
            deadline_ms: 0,
            follow_up_shorts: 0,
        }
    }

    /// Arm `beeps` cycles of `on_ms` sound and `off_ms` silence, replacing
    /// whatever was playing. `beeps == 0` is a no-op.
    pub const fn start(&mut self, now_ms: u32, beeps: u8, on_ms: u32, off_ms: u32) {
        if beeps == 0 {
            return;
        }
        self.follow_up_shorts = 0;
        self.beeps_remaining = beeps;
        self.on_ms = on_ms;
        self.off_ms = off_ms;
        self.phase = BuzzerPhase::On;
        self.deadline_ms = now_ms.wrapping_add(on_ms);
    }

    /// One long beep, then `shorts` short beeps. `shorts == 0` is a no-op.
    pub const fn start_with_follow_up(&mut self, now_ms: u32, shorts: u8) {
        if shorts == 0 {
            return;
        }
        self.start(now_ms, 1, BUZZER_LONG_MS, BUZZER_GAP_MS);
        self.follow_up_shorts = shorts;
    }

    pub const fn short_beep(&mut self, now_ms: u32) {
        self.start(now_ms, 1, BUZZER_SHORT_MS, BUZZER_GAP_MS);
    }

    pub const fn long_beep(&mut self, now_ms: u32) {
        self.start(now_ms, 1, BUZZER_LONG_MS, BUZZER_GAP_MS);
    }

    /// Advance the pattern if its deadline has passed.
    pub const fn update(&mut self, now_ms: u32) {
        if matches!(self.phase, BuzzerPhase::Idle) || !deadline_reached(now_ms, self.deadline_ms)
        {
            return;
        }

        match self.phase {
            BuzzerPhase::On => {
                if self.beeps_remaining > 1 || self.follow_up_shorts > 0 {
                    self.phase = BuzzerPhase::Off;
                    self.deadline_ms = now_ms.wrapping_add(self.off_ms);
                } else {
                    self.stop();
                }
            }
            BuzzerPhase::Off => {
                if self.beeps_remaining > 1 {
                    self.beeps_remaining = self.beeps_remaining.saturating_sub(1);
                    self.phase = BuzzerPhase::On;
                    self.deadline_ms = now_ms.wrapping_add(self.on_ms);
                } else {
                    // Only reachable with a follow-up pending.
                    let shorts = self.follow_up_shorts;
                    self.stop();
                    self.start(now_ms, shorts, BUZZER_SHORT_MS, BUZZER_GAP_MS);
                }
            }
            BuzzerPhase::Idle => {}
        }
    }

    /// Silence immediately and drop any pending follow-up.
    pub const fn stop(&mut self) {
        self.phase = BuzzerPhase::Idle;
        self.beeps_remaining = 0;
        self.follow_up_shorts = 0;
    }

    /// Level the buzzer pin should have right now.
    #[must_use]
    pub const fn is_sounding(&self) -> bool {
        matches!(self.phase, BuzzerPhase::On)
    }

    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.phase, BuzzerPhase::Idle)
    }

    #[must_use]
    pub const fn phase(&self) -> BuzzerPhase {
        self.phase
    }

    #[must_use]
    pub const fn beeps_remaining(&self) -> u8 {
        self.beeps_remaining
    }

    #[must_use]
    pub const fn follow_up_shorts(&self) -> u8 {
        self.follow_up_shorts
    }
}

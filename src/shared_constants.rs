// Buzzer patterns (milliseconds)
pub const BUZZER_SHORT_MS: u32 = 80;
pub const BUZZER_LONG_MS: u32 = 400;
pub const BUZZER_GAP_MS: u32 = 120;

// Control-loop schedules (milliseconds)
pub const DEBOUNCE_PERIOD_MS: u32 = 10;
pub const SECOND_MS: u32 = 1_000;

pub const SECONDS_PER_HOUR: u32 = 60 * 60;

/// Consecutive pressed samples needed before a press counts.
pub const DEBOUNCE_THRESHOLD: u8 = 3;

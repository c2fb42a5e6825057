//! Fan speed and auto-off timer state, and the events that drive it.
//!
//! [`Device`] owns [`DeviceState`] and is only ever touched from the control
//! loop. It never drives pins or the buzzer itself: each event returns the
//! [`Beep`] to play, and [`Device::outputs`] projects the state onto the relay
//! and LED lines.
use crate::button::Button;
use crate::shared_constants::SECONDS_PER_HOUR;
use crate::{Error, Result};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    #[default]
    Off,
    Low,
    Mid,
    High,
}

impl Speed {
    /// Forward cycle: `Off → Low → Mid → High → Low → …`. Never back to `Off`.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Off | Self::High => Self::Low,
            Self::Low => Self::Mid,
            Self::Mid => Self::High,
        }
    }

    #[must_use]
    pub const fn is_running(self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// Auto-off timer selection.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerHours {
    #[default]
    None,
    One,
    Two,
    Four,
}

impl TimerHours {
    /// Rotation order: `0 → 1 → 2 → 4 → 0`.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::None => Self::One,
            Self::One => Self::Two,
            Self::Two => Self::Four,
            Self::Four => Self::None,
        }
    }

    #[must_use]
    pub const fn hours(self) -> u8 {
        match self {
            Self::None => 0,
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
        }
    }

    #[must_use]
    pub const fn seconds(self) -> u32 {
        match self {
            Self::None => 0,
            Self::One => SECONDS_PER_HOUR,
            Self::Two => 2 * SECONDS_PER_HOUR,
            Self::Four => 4 * SECONDS_PER_HOUR,
        }
    }
}

/// Remote-control command bytes this controller understands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Start, or step to the next speed.
    CycleSpeed = 0x30,
    PowerOff = 0x90,
    /// Rotate the auto-off timer selection.
    RotateTimer = 0xA0,
}

impl TryFrom<u8> for Command {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self> {
        match byte {
            0x30 => Ok(Self::CycleSpeed),
            0x90 => Ok(Self::PowerOff),
            0xA0 => Ok(Self::RotateTimer),
            other => Err(Error::UnknownCommand(other)),
        }
    }
}

impl From<Button> for Command {
    fn from(button: Button) -> Self {
        match button {
            Button::On => Self::CycleSpeed,
            Button::Off => Self::PowerOff,
        }
    }
}

/// Audible feedback requested by a state change.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Beep {
    Short,
    /// Also the auto-off expiry notice.
    Long,
    /// Timer selected: one long beep, then one short beep per hour.
    LongThenShorts(u8),
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceState {
    pub speed: Speed,
    pub timer: TimerHours,
    pub seconds_remaining: u32,
}

/// Levels for every relay and LED line, derived from a [`DeviceState`].
///
/// Index 0..3 of `relays` is Low, Mid, High; `timer_leds` is 1h, 2h, 4h;
/// `speed_leds` is High, Mid, Low (board wiring order).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputLevels {
    pub relays: [bool; 3],
    pub timer_leds: [bool; 3],
    pub speed_leds: [bool; 3],
}

/// The fan's control state machine.
///
/// # Examples
/// ```
/// use fan_kit::{Beep, Command, Device, Speed};
///
/// let mut device = Device::new();
/// assert_eq!(device.handle(Command::CycleSpeed), Some(Beep::Short));
/// assert_eq!(device.state().speed, Speed::Low);
/// assert_eq!(device.handle(Command::RotateTimer), Some(Beep::LongThenShorts(1)));
/// assert_eq!(device.state().seconds_remaining, 3600);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Device {
    state: DeviceState,
}

impl Device {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: DeviceState {
                speed: Speed::Off,
                timer: TimerHours::None,
                seconds_remaining: 0,
            },
        }
    }

    #[must_use]
    pub const fn state(&self) -> DeviceState {
        self.state
    }

    /// Dispatch a raw remote command byte.
    ///
    /// # Errors
    /// Returns [`Error::UnknownCommand`] (and changes nothing) for bytes that
    /// map to no [`Command`].
    pub fn handle_command(&mut self, byte: u8) -> Result<Option<Beep>> {
        let command = Command::try_from(byte)?;
        Ok(self.handle(command))
    }

    /// Dispatch a debounced button press.
    pub fn handle_button(&mut self, button: Button) -> Option<Beep> {
        self.handle(button.into())
    }

    pub fn handle(&mut self, command: Command) -> Option<Beep> {
        match command {
            Command::CycleSpeed => {
                self.state.speed = self.state.speed.next();
                #[cfg(feature = "defmt")]
                defmt::info!("speed -> {}", self.state.speed);
                Some(Beep::Short)
            }
            Command::PowerOff => {
                self.state = DeviceState::default();
                #[cfg(feature = "defmt")]
                defmt::info!("power off");
                Some(Beep::Short)
            }
            Command::RotateTimer => {
                let timer = self.state.timer.next();
                self.state.timer = timer;
                self.state.seconds_remaining = timer.seconds();
                #[cfg(feature = "defmt")]
                defmt::info!("auto-off timer -> {}h", timer.hours());
                match timer {
                    TimerHours::None => None,
                    TimerHours::One | TimerHours::Two | TimerHours::Four => {
                        Some(Beep::LongThenShorts(timer.hours()))
                    }
                }
            }
        }
    }

    /// Apply one elapsed second of the auto-off countdown.
    ///
    /// The countdown only runs while the fan is running. The tick that reaches
    /// zero also stops the fan, clears the selection and asks for a long beep.
    pub fn tick_second(&mut self) -> Option<Beep> {
        if self.state.seconds_remaining == 0 || !self.state.speed.is_running() {
            return None;
        }
        self.state.seconds_remaining = self.state.seconds_remaining.saturating_sub(1);
        if self.state.seconds_remaining > 0 {
            return None;
        }
        #[cfg(feature = "defmt")]
        defmt::info!("auto-off timer expired");
        self.state.speed = Speed::Off;
        self.state.timer = TimerHours::None;
        Some(Beep::Long)
    }

    /// Relay and LED levels for the current state.
    #[must_use]
    pub const fn outputs(&self) -> OutputLevels {
        let speed = self.state.speed;
        let timer = self.state.timer;
        OutputLevels {
            relays: [
                matches!(speed, Speed::Low),
                matches!(speed, Speed::Mid),
                matches!(speed, Speed::High),
            ],
            timer_leds: [
                matches!(timer, TimerHours::One),
                matches!(timer, TimerHours::Two),
                matches!(timer, TimerHours::Four),
            ],
            speed_leds: [
                matches!(speed, Speed::High),
                matches!(speed, Speed::Mid),
                matches!(speed, Speed::Low),
            ],
        }
    }
}

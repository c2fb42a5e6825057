use embedded_hal::digital::OutputPin;

use crate::state_machine::OutputLevels;
use crate::{Error, Result};

/// Logical output lines, in the order of the [`OutputArray`] table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OutputLine {
    RelayLow,
    RelayMid,
    RelayHigh,
    LedTimer1h,
    LedTimer2h,
    LedTimer4h,
    LedSpeedHigh,
    LedSpeedMid,
    LedSpeedLow,
    Buzzer,
}

impl OutputLine {
    pub const RELAYS: [Self; 3] = [Self::RelayLow, Self::RelayMid, Self::RelayHigh];
    pub const TIMER_LEDS: [Self; 3] = [Self::LedTimer1h, Self::LedTimer2h, Self::LedTimer4h];
    pub const SPEED_LEDS: [Self; 3] = [Self::LedSpeedHigh, Self::LedSpeedMid, Self::LedSpeedLow];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

pub const OUTPUT_LINE_COUNT: usize = 10;

/// Every output pin of the board, looked up by [`OutputLine`].
pub struct OutputArray<P: OutputPin, const N: usize = OUTPUT_LINE_COUNT>([P; N]);

impl<P: OutputPin, const N: usize> OutputArray<P, N> {
    /// Take ownership of the pins (in [`OutputLine`] order) and drive them all low.
    ///
    /// # Errors
    /// Returns [`Error::CannotSetOutputState`] if a pin rejects the write.
    pub fn new(outputs: [P; N]) -> Result<Self> {
        let mut output_array = Self(outputs);
        for output in &mut output_array.0 {
            output.set_low().map_err(|_| Error::CannotSetOutputState)?;
        }
        Ok(output_array)
    }

    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`] if the table has no pin for `line`,
    /// or [`Error::CannotSetOutputState`] if the pin rejects the write.
    #[inline]
    pub fn set(&mut self, line: OutputLine, on: bool) -> Result<()> {
        let output = self
            .0
            .get_mut(line.index())
            .ok_or(Error::IndexOutOfBounds)?;
        output
            .set_state(on.into())
            .map_err(|_| Error::CannotSetOutputState)
    }

    /// Write a full relay/LED projection.
    ///
    /// # Errors
    /// See [`OutputArray::set`].
    pub fn apply(&mut self, levels: &OutputLevels) -> Result<()> {
        self.set_relays(levels.relays)?;
        self.set_leds(levels)
    }

    /// Select a speed relay (Low, Mid, High order).
    ///
    /// All relays are released before the selected one is energized, so two
    /// relays are never on together, even between writes. Only call this when
    /// the selection changes: a relay that stays selected still drops briefly.
    ///
    /// # Errors
    /// See [`OutputArray::set`].
    pub fn set_relays(&mut self, relays: [bool; 3]) -> Result<()> {
        for line in OutputLine::RELAYS {
            self.set(line, false)?;
        }
        for (line, on) in OutputLine::RELAYS.into_iter().zip(relays) {
            if on {
                self.set(line, true)?;
            }
        }
        Ok(())
    }

    /// Write the timer and speed indicator LEDs. Relays are left alone.
    ///
    /// # Errors
    /// See [`OutputArray::set`].
    pub fn set_leds(&mut self, levels: &OutputLevels) -> Result<()> {
        for (line, on) in OutputLine::TIMER_LEDS.into_iter().zip(levels.timer_leds) {
            self.set(line, on)?;
        }
        for (line, on) in OutputLine::SPEED_LEDS.into_iter().zip(levels.speed_leds) {
            self.set(line, on)?;
        }
        Ok(())
    }
}

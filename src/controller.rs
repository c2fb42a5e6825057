//! The body of the cooperative control loop.
//!
//! Each call to [`Controller::poll`] runs one iteration in a fixed order:
//! advance the buzzer, sample and debounce the buttons (every
//! [`DEBOUNCE_PERIOD_MS`]), dispatch at most one pending remote command, apply
//! the one-second countdown tick (every [`SECOND_MS`]), then write the outputs.
//! Nothing in it waits.
use embedded_hal::digital::{InputPin, OutputPin};

use crate::button::{Button, Debouncer};
use crate::buzzer::Buzzer;
use crate::mailbox::CommandMailbox;
use crate::output_array::{OutputArray, OutputLine};
use crate::shared_constants::{DEBOUNCE_PERIOD_MS, SECOND_MS};
use crate::state_machine::{Beep, Device, DeviceState, OutputLevels};
use crate::timebase::Period;
use crate::{Error, Result};

/// The front panel: two active-low buttons and every output line.
pub struct Panel<I: InputPin, O: OutputPin> {
    pub on_button: I,
    pub off_button: I,
    pub outputs: OutputArray<O>,
}

impl<I: InputPin, O: OutputPin> Panel<I, O> {
    pub const fn new(on_button: I, off_button: I, outputs: OutputArray<O>) -> Self {
        Self {
            on_button,
            off_button,
            outputs,
        }
    }

    /// Raw (undebounced) pressed sample. Buttons pull the line low when pressed.
    ///
    /// # Errors
    /// Returns [`Error::CannotReadInput`] if the pin cannot be read.
    pub fn is_pressed(&mut self, button: Button) -> Result<bool> {
        let pin = match button {
            Button::On => &mut self.on_button,
            Button::Off => &mut self.off_button,
        };
        pin.is_low().map_err(|_| Error::CannotReadInput)
    }
}

/// Owns all loop-side state: the device, the buzzer, both debouncers and the
/// two periodic schedules.
pub struct Controller {
    device: Device,
    buzzer: Buzzer,
    on_debouncer: Debouncer,
    off_debouncer: Debouncer,
    debounce_period: Period,
    second_period: Period,
    // Last relay/LED projection written to the panel.
    applied: OutputLevels,
}

impl Controller {
    /// Start both schedules from `start_ms`.
    #[must_use]
    pub const fn new(start_ms: u32) -> Self {
        Self {
            device: Device::new(),
            buzzer: Buzzer::new(),
            on_debouncer: Debouncer::new(),
            off_debouncer: Debouncer::new(),
            debounce_period: Period::new(start_ms, DEBOUNCE_PERIOD_MS),
            second_period: Period::new(start_ms, SECOND_MS),
            applied: Device::new().outputs(),
        }
    }

    /// Drive the power-on output state: relays open, buzzer silent, LEDs
    /// showing the initial (off) state.
    ///
    /// # Errors
    /// Returns an error if an output pin rejects a write.
    pub fn init<I: InputPin, O: OutputPin>(&mut self, panel: &mut Panel<I, O>) -> Result<()> {
        panel.outputs.set(OutputLine::Buzzer, false)?;
        self.applied = self.device.outputs();
        panel.outputs.apply(&self.applied)
    }

    /// Run one loop iteration at time `now_ms`.
    ///
    /// # Errors
    /// Returns an error if a pin cannot be read or written. Unknown remote
    /// commands are not errors here: they are logged and dropped.
    pub fn poll<I: InputPin, O: OutputPin>(
        &mut self,
        now_ms: u32,
        panel: &mut Panel<I, O>,
        mailbox: &CommandMailbox,
    ) -> Result<()> {
        let before = self.device.state();

        self.buzzer.update(now_ms);

        if self.debounce_period.due(now_ms) {
            for button in Button::ALL {
                let raw_pressed = panel.is_pressed(button)?;
                let debouncer = match button {
                    Button::On => &mut self.on_debouncer,
                    Button::Off => &mut self.off_debouncer,
                };
                if debouncer.update(raw_pressed) {
                    #[cfg(feature = "defmt")]
                    defmt::info!("button {} pressed", button);
                    let beep = self.device.handle_button(button);
                    self.play(beep, now_ms);
                }
            }
        }

        if let Some(byte) = mailbox.take() {
            self.dispatch_command(byte, now_ms);
        }

        if self.second_period.due(now_ms) {
            let beep = self.device.tick_second();
            self.play(beep, now_ms);
        }

        if self.device.state() != before {
            let levels = self.device.outputs();
            // Countdown ticks and timer rotations keep the running relay closed.
            if levels.relays != self.applied.relays {
                panel.outputs.set_relays(levels.relays)?;
            }
            panel.outputs.set_leds(&levels)?;
            self.applied = levels;
        }
        panel
            .outputs
            .set(OutputLine::Buzzer, self.buzzer.is_sounding())
    }

    /// Dispatch one decoded remote command byte.
    pub fn dispatch_command(&mut self, byte: u8, now_ms: u32) {
        match self.device.handle_command(byte) {
            Ok(beep) => {
                #[cfg(feature = "defmt")]
                defmt::info!("remote command 0x{:02X}", byte);
                self.play(beep, now_ms);
            }
            Err(err) => {
                #[cfg(feature = "defmt")]
                defmt::info!("ignoring remote command: {}", defmt::Display2Format(&err));
                #[cfg(not(feature = "defmt"))]
                let _ = err;
            }
        }
    }

    const fn play(&mut self, beep: Option<Beep>, now_ms: u32) {
        match beep {
            Some(Beep::Short) => self.buzzer.short_beep(now_ms),
            Some(Beep::Long) => self.buzzer.long_beep(now_ms),
            Some(Beep::LongThenShorts(shorts)) => self.buzzer.start_with_follow_up(now_ms, shorts),
            None => {}
        }
    }

    #[must_use]
    pub const fn state(&self) -> DeviceState {
        self.device.state()
    }

    #[must_use]
    pub const fn buzzer(&self) -> &Buzzer {
        &self.buzzer
    }
}

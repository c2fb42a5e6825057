//! Firmware building blocks for a three-speed fan controller: an NEC infrared
//! remote decoder, button debouncing, a non-blocking buzzer sequencer, and the
//! speed / auto-off timer state machine that ties them together.
//!
//! Everything except [`board`] is target-independent and runs on the host.
//!
//! ## Structure
//!
//! | Module | Purpose |
//! | ------ | ------- |
//! | [`timebase`] | Millisecond counter shared with the tick interrupt; deadline arithmetic |
//! | [`mailbox`] | One-slot command handoff from the edge interrupt to the loop |
//! | [`ir_nec`] | NEC edge-timing decoder |
//! | [`button`] | Debounce filter |
//! | [`buzzer`] | Beep pattern sequencer |
//! | [`state_machine`] | Speed / timer state, command handling, output projection |
//! | [`output_array`] | Logical output lines over `embedded-hal` pins |
//! | [`controller`] | One iteration of the control loop |
//! | `board` | RP2040/RP2350 pin table and interrupt-side tasks (`pico1`/`pico2`) |
#![no_std]

pub mod button;
pub mod buzzer;
pub mod controller;
mod error;
pub mod ir_nec;
pub mod mailbox;
pub mod output_array;
mod shared_constants;
pub mod state_machine;
pub mod timebase;

#[cfg(any(feature = "pico1", feature = "pico2"))]
pub mod board;

// Re-export commonly used items
pub use button::{Button, Debouncer};
pub use buzzer::{Buzzer, BuzzerPhase};
pub use controller::{Controller, Panel};
pub use error::{Error, Never, Result};
pub use ir_nec::{Edge, IrNecEvent, NecDecoder, Phase};
pub use mailbox::CommandMailbox;
pub use output_array::{OUTPUT_LINE_COUNT, OutputArray, OutputLine};
pub use shared_constants::*;
pub use state_machine::{Beep, Command, Device, DeviceState, OutputLevels, Speed, TimerHours};
pub use timebase::{Period, Timebase, deadline_reached};

//! RP2040/RP2350 binding: the pin table and the two interrupt-side tasks.
//!
//! Both tasks are meant to run on an `InterruptExecutor` so they preempt the
//! thread-mode control loop the way the edge and tick interrupts do:
//! - `ir_edge_task` timestamps every receiver edge, feeds the [`NecDecoder`]
//!   (which it alone owns) and publishes accepted commands to the mailbox.
//! - `tick_task` advances the [`Timebase`] once per millisecond.
use defmt::{debug, info};
use embassy_executor::SendSpawner;
use embassy_rp::Peripherals;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::{Duration, Instant, Ticker};

use crate::controller::Panel;
use crate::ir_nec::{Edge, IrNecEvent, NecDecoder};
use crate::mailbox::CommandMailbox;
use crate::output_array::OutputArray;
use crate::timebase::Timebase;
use crate::{Error, Result};

pub type BoardPanel = Panel<Input<'static>, Output<'static>>;

/// Everything the firmware drives, claimed from the peripherals once at startup.
///
/// | Line | GPIO |
/// | ---- | ---- |
/// | LED timer 1h / 2h / 4h | 2 / 3 / 4 |
/// | LED speed High / Mid / Low | 5 / 6 / 7 |
/// | Buzzer | 8 |
/// | ON / OFF button (active-low) | 14 / 15 |
/// | Relay Low / Mid / High | 16 / 17 / 18 |
/// | IR receiver (active-low) | 28 |
pub struct Board {
    pub panel: BoardPanel,
    pub ir: Input<'static>,
}

impl Board {
    /// Claim and configure the pins. Every output starts low.
    ///
    /// # Errors
    /// Returns an error if an output cannot be driven low.
    pub fn new(peripherals: Peripherals) -> Result<Self> {
        // Order must match `OutputLine`.
        let outputs = OutputArray::new([
            Output::new(peripherals.PIN_16, Level::Low), // RelayLow
            Output::new(peripherals.PIN_17, Level::Low), // RelayMid
            Output::new(peripherals.PIN_18, Level::Low), // RelayHigh
            Output::new(peripherals.PIN_2, Level::Low),  // LedTimer1h
            Output::new(peripherals.PIN_3, Level::Low),  // LedTimer2h
            Output::new(peripherals.PIN_4, Level::Low),  // LedTimer4h
            Output::new(peripherals.PIN_5, Level::Low),  // LedSpeedHigh
            Output::new(peripherals.PIN_6, Level::Low),  // LedSpeedMid
            Output::new(peripherals.PIN_7, Level::Low),  // LedSpeedLow
            Output::new(peripherals.PIN_8, Level::Low),  // Buzzer
        ])?;

        let on_button = Input::new(peripherals.PIN_14, Pull::Up);
        let off_button = Input::new(peripherals.PIN_15, Pull::Up);

        // Typical IR receivers idle HIGH with an active-low output.
        let ir = Input::new(peripherals.PIN_28, Pull::Up);

        Ok(Self {
            panel: Panel::new(on_button, off_button, outputs),
            ir,
        })
    }
}

/// Start the edge and tick tasks on a (high-priority) interrupt executor.
///
/// # Errors
/// Returns [`Error::TaskSpawn`] if either task cannot be spawned.
pub fn spawn_interrupt_tasks(
    spawner: SendSpawner,
    ir: Input<'static>,
    timebase: &'static Timebase,
    mailbox: &'static CommandMailbox,
) -> Result<()> {
    let token = tick_task(timebase).map_err(Error::TaskSpawn)?;
    spawner.spawn(token);
    let token = ir_edge_task(ir, mailbox).map_err(Error::TaskSpawn)?;
    spawner.spawn(token);
    Ok(())
}

#[embassy_executor::task]
async fn tick_task(timebase: &'static Timebase) -> ! {
    let mut ticker = Ticker::every(Duration::from_millis(1));
    loop {
        ticker.next().await;
        timebase.tick();
    }
}

#[embassy_executor::task]
async fn ir_edge_task(mut pin: Input<'static>, mailbox: &'static CommandMailbox) -> ! {
    let mut decoder = NecDecoder::new();

    info!("IR edge task started");
    loop {
        pin.wait_for_any_edge().await;

        #[expect(
            clippy::cast_possible_truncation,
            reason = "Edge intervals are measured modulo 2^32 µs."
        )]
        let now_us = Instant::now().as_micros() as u32;
        let edge = Edge::from_level(pin.is_high());

        match decoder.edge(edge, now_us) {
            Some(IrNecEvent::Press { addr, cmd }) => {
                info!("IR: addr=0x{:02X}, cmd=0x{:02X}", addr, cmd);
                mailbox.publish(cmd);
            }
            Some(IrNecEvent::Repeat) => debug!("IR: repeat code dropped"),
            None => {}
        }
    }
}

//! Fan controller firmware.
//!
//! Thread mode runs the control loop without ever blocking. The IR edge and
//! 1 ms tick tasks run on a higher-priority interrupt executor and talk to the
//! loop only through `TIMEBASE` and `MAILBOX`.
#![no_std]
#![no_main]
#![expect(unsafe_code, reason = "Interrupt executor entry point.")]

#[cfg(not(any(feature = "pico1", feature = "pico2")))]
compile_error!("Select a board with feature `pico1` or `pico2`.");

use cortex_m_rt::entry;
use defmt::info;
use defmt_rtt as _;
use embassy_executor::InterruptExecutor;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use fan_kit::board::{self, Board};
use fan_kit::{CommandMailbox, Controller, Never, Result, Timebase};
use panic_probe as _;

static TIMEBASE: Timebase = Timebase::new();
static MAILBOX: CommandMailbox = CommandMailbox::new();
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    // SAFETY: this is the software interrupt the executor was started on.
    unsafe { EXECUTOR_HIGH.on_interrupt() }
}

#[entry]
fn main() -> ! {
    let err = inner_main().unwrap_err();
    panic!("{err}");
}

fn inner_main() -> Result<Never> {
    let peripherals = embassy_rp::init(embassy_rp::config::Config::default());
    let Board { mut panel, ir } = Board::new(peripherals)?;

    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    board::spawn_interrupt_tasks(spawner, ir, &TIMEBASE, &MAILBOX)?;

    let mut controller = Controller::new(TIMEBASE.now_ms());
    controller.init(&mut panel)?;
    info!("Fan controller running");

    loop {
        controller.poll(TIMEBASE.now_ms(), &mut panel, &MAILBOX)?;
    }
}

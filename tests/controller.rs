//! Host-level tests for the control loop, driven through fake pins.

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use fan_kit::{
    CommandMailbox, Controller, OUTPUT_LINE_COUNT, OutputArray, OutputLine, Panel, Speed,
    TimerHours,
};

/// A pin whose level (and count of high-to-low drops) is shared with the test.
#[derive(Clone)]
struct FakePin {
    level: Rc<Cell<bool>>,
    falls: Rc<Cell<u32>>,
}

impl FakePin {
    fn high() -> Self {
        Self {
            level: Rc::new(Cell::new(true)),
            falls: Rc::new(Cell::new(0)),
        }
    }

    fn level(&self) -> bool {
        self.level.get()
    }

    fn set_level(&self, high: bool) {
        self.level.set(high);
    }

    fn falls(&self) -> u32 {
        self.falls.get()
    }
}

impl ErrorType for FakePin {
    type Error = Infallible;
}

impl InputPin for FakePin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level.get())
    }
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.level.replace(false) {
            self.falls.set(self.falls.get() + 1);
        }
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level.set(true);
        Ok(())
    }
}

struct Rig {
    controller: Controller,
    panel: Panel<FakePin, FakePin>,
    mailbox: CommandMailbox,
    on_button: FakePin,
    off_button: FakePin,
    outputs: [FakePin; OUTPUT_LINE_COUNT],
}

impl Rig {
    fn new() -> Self {
        let outputs: [FakePin; OUTPUT_LINE_COUNT] = core::array::from_fn(|_| FakePin::high());
        let on_button = FakePin::high();
        let off_button = FakePin::high();
        let panel = Panel::new(
            on_button.clone(),
            off_button.clone(),
            OutputArray::new(outputs.clone()).unwrap(),
        );
        let controller = Controller::new(0);
        let mut rig = Self {
            controller,
            panel,
            mailbox: CommandMailbox::new(),
            on_button,
            off_button,
            outputs,
        };
        rig.controller.init(&mut rig.panel).unwrap();
        rig
    }

    fn poll(&mut self, now_ms: u32) {
        self.controller
            .poll(now_ms, &mut self.panel, &self.mailbox)
            .unwrap();
    }

    fn send(&mut self, now_ms: u32, command: u8) {
        self.mailbox.publish(command);
        self.poll(now_ms);
    }

    fn line(&self, line: OutputLine) -> bool {
        self.outputs[line.index()].level()
    }

    fn relays(&self) -> [bool; 3] {
        OutputLine::RELAYS.map(|line| self.line(line))
    }
}

#[test]
fn power_on_state_is_all_low() {
    let rig = Rig::new();
    assert!(rig.outputs.iter().all(|pin| !pin.level()));
    assert_eq!(rig.controller.state().speed, Speed::Off);
}

#[test]
fn remote_command_drives_relay_led_and_buzzer() {
    let mut rig = Rig::new();
    rig.send(1, 0x30);
    assert_eq!(rig.controller.state().speed, Speed::Low);
    assert_eq!(rig.relays(), [true, false, false]);
    assert!(rig.line(OutputLine::LedSpeedLow));
    assert!(rig.line(OutputLine::Buzzer));

    rig.poll(81);
    assert!(!rig.line(OutputLine::Buzzer));
    assert!(rig.controller.buzzer().is_idle());
}

#[test]
fn unknown_command_is_ignored_silently() {
    let mut rig = Rig::new();
    rig.send(1, 0x42);
    assert_eq!(rig.controller.state().speed, Speed::Off);
    assert!(!rig.line(OutputLine::Buzzer));
    assert!(!rig.mailbox.is_ready());
}

#[test]
fn on_button_press_is_debounced() {
    let mut rig = Rig::new();
    rig.on_button.set_level(false);
    rig.poll(10);
    rig.poll(20);
    assert_eq!(rig.controller.state().speed, Speed::Off);
    rig.poll(30);
    assert_eq!(rig.controller.state().speed, Speed::Low);

    // Held: no repeats.
    for now in (40..500).step_by(10) {
        rig.poll(now);
    }
    assert_eq!(rig.controller.state().speed, Speed::Low);
}

#[test]
fn bouncing_press_does_not_count() {
    let mut rig = Rig::new();
    for (now, pressed) in [(10, true), (20, true), (30, false), (40, false)] {
        rig.on_button.set_level(!pressed);
        rig.poll(now);
    }
    assert_eq!(rig.controller.state().speed, Speed::Off);
}

#[test]
fn off_button_stops_the_fan() {
    let mut rig = Rig::new();
    rig.send(1, 0x30);
    rig.send(2, 0xA0);
    rig.off_button.set_level(false);
    for now in [10, 20, 30] {
        rig.poll(now);
    }
    assert_eq!(rig.controller.state().speed, Speed::Off);
    assert_eq!(rig.controller.state().timer, TimerHours::None);
    assert_eq!(rig.relays(), [false; 3]);
    assert!(!rig.line(OutputLine::LedTimer1h));
}

#[test]
fn at_most_one_relay_while_cycling() {
    let mut rig = Rig::new();
    for step in 1..=8 {
        rig.send(step, 0x30);
        assert_eq!(rig.relays().iter().filter(|&&on| on).count(), 1);
        let speed_leds = OutputLine::SPEED_LEDS.map(|line| rig.line(line));
        assert_eq!(speed_leds.iter().filter(|&&on| on).count(), 1);
    }
}

#[test]
fn timer_expiry_stops_fan_with_long_beep() {
    let mut rig = Rig::new();
    rig.send(1, 0x30);
    rig.send(2, 0xA0);
    assert!(rig.line(OutputLine::LedTimer1h));
    assert_eq!(rig.controller.state().seconds_remaining, 3_600);

    for second in 1..3_600 {
        rig.poll(second * 1_000);
    }
    assert_eq!(rig.controller.state().speed, Speed::Low);
    assert_eq!(rig.controller.state().seconds_remaining, 1);

    rig.poll(3_600_000);
    assert_eq!(rig.controller.state().speed, Speed::Off);
    assert_eq!(rig.relays(), [false; 3]);
    assert!(!rig.line(OutputLine::LedTimer1h));
    assert!(rig.line(OutputLine::Buzzer));
    rig.poll(3_600_399);
    assert!(rig.line(OutputLine::Buzzer));
    rig.poll(3_600_400);
    assert!(!rig.line(OutputLine::Buzzer));
}

#[test]
fn latest_command_wins_between_polls() {
    let mut rig = Rig::new();
    rig.mailbox.publish(0xA0);
    rig.mailbox.publish(0x30);
    rig.poll(1);
    assert_eq!(rig.controller.state().speed, Speed::Low);
    assert_eq!(rig.controller.state().timer, TimerHours::None);
}

#[test]
fn running_relay_holds_through_countdown_and_timer_rotation() {
    let mut rig = Rig::new();
    rig.send(1, 0x30);
    let relay = rig.outputs[OutputLine::RelayLow.index()].clone();
    assert!(relay.level());
    let falls = relay.falls();

    rig.send(2, 0xA0);
    for second in 1..=5 {
        rig.poll(second * 1_000);
    }
    assert_eq!(rig.controller.state().seconds_remaining, 3_595);
    rig.send(5_001, 0xA0);
    assert!(rig.line(OutputLine::LedTimer2h));
    assert!(!rig.line(OutputLine::LedTimer1h));

    assert!(relay.level());
    assert_eq!(relay.falls(), falls);
}

#[test]
fn speed_change_drops_previous_relay_once() {
    let mut rig = Rig::new();
    rig.send(1, 0x30);
    let low = rig.outputs[OutputLine::RelayLow.index()].clone();
    let falls = low.falls();
    rig.send(2, 0x30);
    assert_eq!(low.falls(), falls + 1);
    assert_eq!(rig.relays(), [false, true, false]);
}

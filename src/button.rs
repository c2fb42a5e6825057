use crate::shared_constants::DEBOUNCE_THRESHOLD;

/// The two front-panel buttons.
///
/// Both are momentary, active-low, with the internal pull-up enabled.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Start the fan or step to the next speed.
    On,
    /// Stop the fan and cancel the auto-off timer.
    Off,
}

impl Button {
    pub const ALL: [Self; 2] = [Self::On, Self::Off];
}

/// Integrating debounce filter for one button.
///
/// Sometimes the start (and end) of a press can be "noisy": the contacts bounce
/// between "touching" and "not touching" for a few milliseconds. Sampled at a
/// fixed period, each pressed sample moves the integrator up and each released
/// sample moves it down, saturating at `0` and [`DEBOUNCE_THRESHOLD`]. The
/// debounced level is "pressed" only while the integrator is saturated high.
///
/// # Examples
/// ```
/// use fan_kit::Debouncer;
///
/// let mut debouncer = Debouncer::new();
/// assert!(!debouncer.update(true));
/// assert!(!debouncer.update(true));
/// assert!(debouncer.update(true)); // third consecutive pressed sample
/// assert!(!debouncer.update(true)); // held: no further events
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Debouncer {
    integrator: u8,
    pressed: bool,
}

impl Debouncer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            integrator: 0,
            pressed: false,
        }
    }

    /// Feed one raw sample; returns `true` exactly on the sample where the
    /// debounced level goes from released to pressed.
    #[must_use = "The press event fires only once"]
    pub const fn update(&mut self, raw_pressed: bool) -> bool {
        self.integrator = if raw_pressed {
            if self.integrator < DEBOUNCE_THRESHOLD {
                self.integrator.saturating_add(1)
            } else {
                DEBOUNCE_THRESHOLD
            }
        } else {
            self.integrator.saturating_sub(1)
        };

        let now_pressed = self.integrator >= DEBOUNCE_THRESHOLD;
        let pressed_event = !self.pressed && now_pressed;
        self.pressed = now_pressed;
        pressed_event
    }

    /// Current debounced level.
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.pressed
    }

    #[must_use]
    pub const fn integrator(&self) -> u8 {
        self.integrator
    }
}

//! Button input abstraction.
//!
//! Raw levels are sampled once per tick by an [`InputSource`] and folded by
//! [`InputTracker`] into an [`InputFrame`]. Every handler that runs during a
//! tick reads the same frame; nothing re-samples the pins mid-tick.

/// Physical device buttons (directly maps to hardware)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    // GPIO4 (digital, active LOW)
    Up,
    // GPIO5 (digital, active LOW)
    Down,
    // GPIO14 (digital, active LOW)
    Select,
    // GPIO13 (digital, active LOW)
    Back,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::Up, Button::Down, Button::Select, Button::Back];

    pub const fn index(self) -> usize {
        match self {
            Button::Up => 0,
            Button::Down => 1,
            Button::Select => 2,
            Button::Back => 3,
        }
    }
}

/// Level snapshot of all four buttons, `true` meaning held down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonLevels([bool; 4]);

impl ButtonLevels {
    pub const NONE: Self = Self([false; 4]);

    pub fn with(mut self, button: Button) -> Self {
        self.0[button.index()] = true;
        self
    }

    pub fn set(&mut self, button: Button, down: bool) {
        self.0[button.index()] = down;
    }

    pub fn is_down(&self, button: Button) -> bool {
        self.0[button.index()]
    }
}

/// Something that can report the current button levels.
pub trait InputSource {
    fn sample(&mut self) -> ButtonLevels;
}

/// Per-button view for a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// Level this tick.
    pub down: bool,
    /// Went down this tick.
    pub pressed: bool,
    /// Went up this tick.
    pub released: bool,
    /// How long the current hold has lasted (0 when up).
    pub held_ms: u64,
    /// Hold duration as of the previous tick.
    prev_held_ms: u64,
    /// Configured long-press threshold crossed this tick.
    pub long_held: bool,
}

impl ButtonState {
    /// A hold that starts this tick has crossed nothing yet, so a zero
    /// threshold is met on the press edge.
    fn crossed(&self, threshold_ms: u64) -> bool {
        self.down
            && self.held_ms >= threshold_ms
            && (self.pressed || self.prev_held_ms < threshold_ms)
    }
}

/// Ephemeral input snapshot handed to activities for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputFrame {
    buttons: [ButtonState; 4],
}

impl InputFrame {
    pub fn state(&self, button: Button) -> ButtonState {
        self.buttons[button.index()]
    }

    pub fn is_down(&self, button: Button) -> bool {
        self.buttons[button.index()].down
    }

    pub fn pressed(&self, button: Button) -> bool {
        self.buttons[button.index()].pressed
    }

    pub fn released(&self, button: Button) -> bool {
        self.buttons[button.index()].released
    }

    pub fn long_held(&self, button: Button) -> bool {
        self.buttons[button.index()].long_held
    }

    /// True on the single tick where the hold on `button` reaches `duration_ms`.
    pub fn held_for(&self, button: Button, duration_ms: u64) -> bool {
        self.buttons[button.index()].crossed(duration_ms)
    }

    /// Any button went down this tick.
    pub fn any_pressed(&self) -> bool {
        self.buttons.iter().any(|b| b.pressed)
    }

    /// Any button crossed `duration_ms` of hold this tick.
    pub fn any_held_for(&self, duration_ms: u64) -> bool {
        self.buttons.iter().any(|b| b.crossed(duration_ms))
    }

    /// All of `chord` are down and the shortest of their holds crossed
    /// `duration_ms` this tick. Fires once per chord.
    pub fn chord_held_for(&self, chord: &[Button], duration_ms: u64) -> bool {
        if chord.is_empty() || !chord.iter().all(|b| self.is_down(*b)) {
            return false;
        }
        let held = chord.iter().map(|b| self.state(*b).held_ms).min();
        let prev = chord.iter().map(|b| self.state(*b).prev_held_ms).min();
        let completed = chord.iter().any(|b| self.pressed(*b));
        matches!((held, prev), (Some(h), Some(p)) if h >= duration_ms && (completed || p < duration_ms))
    }
}

/// Edge and long-press detector fed with one level snapshot per tick.
#[derive(Debug, Clone)]
pub struct InputTracker {
    long_press_ms: u64,
    down_since: [Option<u64>; 4],
    last: InputFrame,
}

impl InputTracker {
    pub fn new(long_press_ms: u64) -> Self {
        Self {
            long_press_ms,
            down_since: [None; 4],
            last: InputFrame::default(),
        }
    }

    /// Fold a fresh level snapshot taken at `now_ms` into a new frame.
    pub fn sample(&mut self, levels: ButtonLevels, now_ms: u64) -> InputFrame {
        let mut frame = InputFrame::default();

        for button in Button::ALL {
            let i = button.index();
            let was_down = self.last.buttons[i].down;
            let down = levels.is_down(button);

            let held_ms = if down {
                let since = *self.down_since[i].get_or_insert(now_ms);
                now_ms.saturating_sub(since)
            } else {
                self.down_since[i] = None;
                0
            };

            let mut state = ButtonState {
                down,
                pressed: down && !was_down,
                released: !down && was_down,
                held_ms,
                prev_held_ms: if was_down { self.last.buttons[i].held_ms } else { 0 },
                long_held: false,
            };
            state.long_held = state.crossed(self.long_press_ms);
            frame.buttons[i] = state;
        }

        self.last = frame;
        frame
    }
}

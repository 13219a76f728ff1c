use glam::Vec2;

/// Keys and buttons the simulation reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Back,
    Left,
    Right,
    /// Interact with whatever the crosshair is on.
    Interact,
    /// Use the selected item.
    Use,
    Drop,
    NextItem,
    PrevItem,
}

impl Key {
    pub const COUNT: usize = 9;

    fn index(self) -> usize {
        self as usize
    }
}

/// Raw input events, pushed by the window layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown { key: Key },
    KeyUp { key: Key },
    /// Relative mouse motion in pixels.
    MouseMove { dx: f32, dy: f32 },
}

/// A queue of input events.
/// The window layer writes events; the runner drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Polled view of the input, rebuilt each simulation step from queued events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    down: [bool; Key::COUNT],
    pressed: [bool; Key::COUNT],
    mouse_delta: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new step: forget edge-triggered state, then apply `events`.
    /// Held keys stay held across steps until released.
    pub fn begin_step(&mut self, events: &[InputEvent]) {
        self.pressed = [false; Key::COUNT];
        self.mouse_delta = Vec2::ZERO;
        for event in events {
            match *event {
                InputEvent::KeyDown { key } => {
                    if !self.down[key.index()] {
                        self.pressed[key.index()] = true;
                    }
                    self.down[key.index()] = true;
                }
                InputEvent::KeyUp { key } => self.down[key.index()] = false,
                InputEvent::MouseMove { dx, dy } => self.mouse_delta += Vec2::new(dx, dy),
            }
        }
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.down[key.index()]
    }

    /// Went down during this step.
    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed[key.index()]
    }

    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// -1, 0 or 1 from a pair of opposing keys.
    pub fn axis(&self, negative: Key, positive: Key) -> f32 {
        (self.is_down(positive) as i32 - self.is_down(negative) as i32) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::KeyDown { key: Key::Forward });
        q.push(InputEvent::MouseMove { dx: 1.0, dy: 0.0 });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn press_is_edge_triggered() {
        let mut input = InputState::new();
        input.begin_step(&[InputEvent::KeyDown { key: Key::Interact }]);
        assert!(input.was_pressed(Key::Interact));
        assert!(input.is_down(Key::Interact));

        input.begin_step(&[]);
        assert!(!input.was_pressed(Key::Interact));
        assert!(input.is_down(Key::Interact));

        input.begin_step(&[InputEvent::KeyUp { key: Key::Interact }]);
        assert!(!input.is_down(Key::Interact));
    }

    #[test]
    fn mouse_motion_accumulates_per_step() {
        let mut input = InputState::new();
        input.begin_step(&[
            InputEvent::MouseMove { dx: 2.0, dy: -1.0 },
            InputEvent::MouseMove { dx: 3.0, dy: 0.5 },
        ]);
        assert_eq!(input.mouse_delta(), Vec2::new(5.0, -0.5));
        input.begin_step(&[]);
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn axis_combines_opposing_keys() {
        let mut input = InputState::new();
        input.begin_step(&[InputEvent::KeyDown { key: Key::Forward }]);
        assert_eq!(input.axis(Key::Back, Key::Forward), 1.0);
        input.begin_step(&[InputEvent::KeyDown { key: Key::Back }]);
        assert_eq!(input.axis(Key::Back, Key::Forward), 0.0);
    }
}

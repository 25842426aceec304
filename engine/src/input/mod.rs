//! Input Module
//!
//! Platform-agnostic key state for the rig. Decoupled from any windowing
//! system: the host translates its own key events into [`KeyCode`] values
//! and feeds them to [`MovementKeys::handle_key`].
//!
//! Movement and rotation are held-key states sampled every tick. Jump is
//! a press edge: one key-down queues exactly one jump, consumed by
//! [`MovementKeys::take_jump`].

/// Generic key codes for rig input, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Move forward
    W,
    /// Move backward
    S,
    /// Strafe left
    Q,
    /// Strafe right
    E,
    /// Rotate left
    A,
    /// Rotate right
    D,
    /// Jump
    Space,
    /// Catch-all for unhandled keys
    Unknown,
}

/// Tracks the current state of movement, rotation, and jump keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementKeys {
    /// W key - move forward
    pub forward: bool,
    /// S key - move backward
    pub backward: bool,
    /// Q key - strafe left
    pub strafe_left: bool,
    /// E key - strafe right
    pub strafe_right: bool,
    /// A key - rotate heading left
    pub turn_left: bool,
    /// D key - rotate heading right
    pub turn_right: bool,
    /// Space currently held (used for edge detection)
    jump_held: bool,
    /// A jump press happened and has not been consumed yet
    jump_queued: bool,
}

impl MovementKeys {
    /// Create a new key state with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update state based on a key press/release event.
    ///
    /// Returns `true` if the key was a rig key and was handled.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key {
            KeyCode::W => {
                self.forward = pressed;
                true
            }
            KeyCode::S => {
                self.backward = pressed;
                true
            }
            KeyCode::Q => {
                self.strafe_left = pressed;
                true
            }
            KeyCode::E => {
                self.strafe_right = pressed;
                true
            }
            KeyCode::A => {
                self.turn_left = pressed;
                true
            }
            KeyCode::D => {
                self.turn_right = pressed;
                true
            }
            KeyCode::Space => {
                // Queue a jump only on the down edge, not while held
                if pressed && !self.jump_held {
                    self.jump_queued = true;
                }
                self.jump_held = pressed;
                true
            }
            KeyCode::Unknown => false,
        }
    }

    /// Forward/backward axis (-1, 0, or 1).
    pub fn forward_axis(&self) -> i32 {
        (self.forward as i32) - (self.backward as i32)
    }

    /// Strafe axis (-1 left, 0, 1 right).
    pub fn strafe_axis(&self) -> i32 {
        (self.strafe_right as i32) - (self.strafe_left as i32)
    }

    /// Rotation axis (-1 left, 0, 1 right).
    pub fn turn_axis(&self) -> i32 {
        (self.turn_right as i32) - (self.turn_left as i32)
    }

    /// Whether any movement or rotation key is held.
    pub fn any_pressed(&self) -> bool {
        self.forward
            || self.backward
            || self.strafe_left
            || self.strafe_right
            || self.turn_left
            || self.turn_right
    }

    /// Consume a queued jump press, if any.
    ///
    /// Returns `true` at most once per key-down, no matter how long the
    /// key stays held or how many ticks elapse.
    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_queued)
    }

    /// Reset all keys to released and drop any queued jump.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_from_held_keys() {
        let mut keys = MovementKeys::new();
        keys.handle_key(KeyCode::W, true);
        keys.handle_key(KeyCode::E, true);
        keys.handle_key(KeyCode::A, true);
        assert_eq!(keys.forward_axis(), 1);
        assert_eq!(keys.strafe_axis(), 1);
        assert_eq!(keys.turn_axis(), -1);

        keys.handle_key(KeyCode::W, false);
        keys.handle_key(KeyCode::S, true);
        assert_eq!(keys.forward_axis(), -1);
    }

    #[test]
    fn test_opposed_keys_cancel() {
        let mut keys = MovementKeys::new();
        keys.handle_key(KeyCode::W, true);
        keys.handle_key(KeyCode::S, true);
        assert_eq!(keys.forward_axis(), 0);
    }

    #[test]
    fn test_jump_is_a_press_edge() {
        let mut keys = MovementKeys::new();
        keys.handle_key(KeyCode::Space, true);
        assert!(keys.take_jump());
        // Held across ticks: no second jump
        assert!(!keys.take_jump());
        keys.handle_key(KeyCode::Space, true); // key repeat while held
        assert!(!keys.take_jump());

        // Release and press again: new jump
        keys.handle_key(KeyCode::Space, false);
        keys.handle_key(KeyCode::Space, true);
        assert!(keys.take_jump());
    }

    #[test]
    fn test_unknown_key_unhandled() {
        let mut keys = MovementKeys::new();
        assert!(!keys.handle_key(KeyCode::Unknown, true));
        assert!(!keys.any_pressed());
    }

    #[test]
    fn test_reset_clears_queued_jump() {
        let mut keys = MovementKeys::new();
        keys.handle_key(KeyCode::Space, true);
        keys.reset();
        assert!(!keys.take_jump());
    }
}

use serde::{Deserialize, Serialize};

/// Logical actions a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
}

/// Pressed/released flags for the three actions, written by key events.
///
/// The jump flag is a latch: it stays set until a tick consumes it through
/// [`InputState::take_snapshot`] or the key is released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    left: bool,
    right: bool,
    jump: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the flag for `action`. Last writer wins.
    pub fn set_pressed(&mut self, action: Action, pressed: bool) {
        match action {
            Action::MoveLeft => self.left = pressed,
            Action::MoveRight => self.right = pressed,
            Action::Jump => self.jump = pressed,
        }
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.left,
            Action::MoveRight => self.right,
            Action::Jump => self.jump,
        }
    }

    /// Copy the current flags for one tick and clear the jump latch.
    pub fn take_snapshot(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            left: self.left,
            right: self.right,
            jump: self.jump,
        };
        self.jump = false;
        snapshot
    }
}

/// Input as seen by a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl InputSnapshot {
    /// Horizontal direction: -1 or +1 when exactly one of left/right is held,
    /// 0 when both or neither are.
    pub fn direction(&self) -> i8 {
        match (self.left, self.right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }
}

impl std::fmt::Display for InputSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}, {}, {}}}", self.left, self.right, self.jump)
    }
}

use crate::config::{HopperConfig, KeyBindings};
use crate::input::{Action, InputState};
use crate::motion::MotionIntegrator;
use crate::position::Position;
use crate::render::{Frame, RenderRect};

/// The controllable box: key bindings, input flags and motion.
#[derive(Debug, Clone)]
pub struct Player {
    motion: MotionIntegrator,
    input: InputState,
    keys: KeyBindings,
}

impl Player {
    pub fn new(config: &HopperConfig) -> Self {
        Self {
            motion: MotionIntegrator::new(&config.physics, config.borders()),
            input: InputState::new(),
            keys: config.keys,
        }
    }

    /// Record a key-down. Codes without a binding are ignored.
    pub fn handle_key_pressed(&mut self, code: u32) {
        if let Some(action) = self.keys.action_for(code) {
            self.input.set_pressed(action, true);
        }
    }

    /// Record a key-up. Codes without a binding are ignored.
    pub fn handle_key_released(&mut self, code: u32) {
        if let Some(action) = self.keys.action_for(code) {
            self.input.set_pressed(action, false);
        }
    }

    /// Advance one tick.
    ///
    /// Motion runs first with the direction and jump from the previous tick;
    /// the fresh input snapshot then sets the direction and requests at most
    /// one jump for the next.
    pub fn on_tick(&mut self) {
        let was_airborne = self.motion.is_airborne();
        self.motion.on_tick();
        if was_airborne && !self.motion.is_airborne() {
            tracing::trace!(position = %self.motion.position(), "Landed");
        }

        let snapshot = self.input.take_snapshot();
        self.motion.set_direction(snapshot.direction());

        if snapshot.jump {
            if self.motion.jump() {
                tracing::trace!(
                    input = %snapshot,
                    jumps_remaining = self.motion.jumps_remaining(),
                    "Jump"
                );
            } else {
                tracing::trace!(input = %snapshot, "Jump ignored, budget exhausted");
            }
        }
    }

    pub fn position(&self) -> Position {
        self.motion.position()
    }

    pub fn motion(&self) -> &MotionIntegrator {
        &self.motion
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.input.is_pressed(action)
    }

    /// Build the render frame for `tick` from the current state.
    pub fn frame(&self, tick: u64, config: &HopperConfig) -> Frame {
        let position = self.position();
        Frame {
            tick,
            position,
            rect: RenderRect::for_player(position, config.viewport, config.player),
            phase: self.motion.phase(),
            jumps_remaining: self.motion.jumps_remaining(),
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(&HopperConfig::default())
    }
}

use serde::{Deserialize, Serialize};

use crate::config::{Borders, PhysicsConfig};
use crate::position::Position;

/// Coarse vertical state, derived from the motion fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionPhase {
    Grounded,
    Rising,
    Falling,
}

/// Fixed-tick motion for a single box confined to screen borders.
///
/// Time is measured in ticks. While airborne the vertical position advances
/// each tick by the velocity sampled at the current tick count,
/// `v0 - g * t`, rather than by an integrated displacement. Trajectories
/// therefore overshoot the continuous parabola slightly; callers rely on the
/// exact recurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionIntegrator {
    x_position: f32,
    y_position: f32,
    x_direction: i8,
    x_speed: f32,
    /// v0 of the current arc. Zero while falling from a border or at rest.
    vertical_velocity_base: f32,
    jump_velocity: f32,
    gravity: f32,
    time_since_velocity_reset: f32,
    is_airborne: bool,
    jumps_allowed: u8,
    jumps_remaining: u8,
    borders: Borders,
}

impl MotionIntegrator {
    /// A grounded integrator at the bottom-left border with a full jump budget.
    pub fn new(physics: &PhysicsConfig, borders: Borders) -> Self {
        Self {
            x_position: borders.left,
            y_position: borders.bottom,
            x_direction: 0,
            x_speed: physics.move_speed,
            vertical_velocity_base: 0.0,
            jump_velocity: physics.jump_velocity,
            gravity: physics.gravity,
            time_since_velocity_reset: 0.0,
            is_airborne: false,
            jumps_allowed: physics.jumps_allowed,
            jumps_remaining: physics.jumps_allowed,
            borders,
        }
    }

    /// Advance the simulation by one tick.
    pub fn on_tick(&mut self) {
        if self.is_airborne {
            self.time_since_velocity_reset += 1.0;
            self.y_position += self.vertical_delta();
        }

        if self.y_position < self.borders.bottom {
            self.y_position = self.borders.bottom;
            self.stop_falling();
        } else if self.y_position > self.borders.top {
            self.y_position = self.borders.top;
            self.start_falling();
        }

        self.x_position += self.x_speed * f32::from(self.x_direction);
        self.x_position = self
            .x_position
            .max(self.borders.left)
            .min(self.borders.right);
    }

    /// Start a new arc if the jump budget allows it. Returns whether a jump
    /// happened; an exhausted budget leaves the state untouched.
    pub fn jump(&mut self) -> bool {
        if self.jumps_remaining == 0 {
            return false;
        }
        self.is_airborne = true;
        self.vertical_velocity_base = self.jump_velocity;
        self.time_since_velocity_reset = 0.0;
        self.jumps_remaining -= 1;
        true
    }

    /// Become airborne with no upward velocity, so only gravity acts.
    pub fn start_falling(&mut self) {
        self.is_airborne = true;
        self.vertical_velocity_base = 0.0;
        self.time_since_velocity_reset = 0.0;
    }

    /// Land: leave the airborne state and refill the jump budget.
    pub fn stop_falling(&mut self) {
        self.is_airborne = false;
        self.time_since_velocity_reset = 0.0;
        self.jumps_remaining = self.jumps_allowed;
    }

    pub fn set_direction(&mut self, direction: i8) {
        self.x_direction = direction;
    }

    pub fn position(&self) -> Position {
        Position::new(self.x_position, self.y_position)
    }

    pub fn phase(&self) -> MotionPhase {
        if !self.is_airborne {
            MotionPhase::Grounded
        } else if self.vertical_velocity_base
            - self.gravity * (self.time_since_velocity_reset + 1.0)
            > 0.0
        {
            MotionPhase::Rising
        } else {
            MotionPhase::Falling
        }
    }

    pub fn is_airborne(&self) -> bool {
        self.is_airborne
    }

    pub fn jumps_remaining(&self) -> u8 {
        self.jumps_remaining
    }

    pub fn jumps_allowed(&self) -> u8 {
        self.jumps_allowed
    }

    pub fn direction(&self) -> i8 {
        self.x_direction
    }

    pub fn vertical_velocity_base(&self) -> f32 {
        self.vertical_velocity_base
    }

    pub fn time_since_velocity_reset(&self) -> f32 {
        self.time_since_velocity_reset
    }

    pub fn borders(&self) -> Borders {
        self.borders
    }

    fn vertical_delta(&self) -> f32 {
        -(self.gravity * self.time_since_velocity_reset) + self.vertical_velocity_base
    }
}

impl Default for MotionIntegrator {
    fn default() -> Self {
        Self::new(&PhysicsConfig::default(), Borders::default())
    }
}

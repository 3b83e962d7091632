use serde::{Deserialize, Serialize};

use crate::config::{PlayerSize, Viewport};
use crate::motion::MotionPhase;
use crate::position::Position;

/// Screen-space rectangle in pixels, origin top-left, Y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl RenderRect {
    /// Convert the player's bottom-left, Y-up position into a surface
    /// rectangle. Coordinates truncate toward zero.
    pub fn for_player(position: Position, viewport: Viewport, player: PlayerSize) -> Self {
        Self {
            x: position.x() as i32,
            y: (viewport.height as f32 - position.y() - player.height as f32) as i32,
            width: player.width,
            height: player.height,
        }
    }
}

/// Everything a renderer needs for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub tick: u64,
    pub position: Position,
    pub rect: RenderRect,
    pub phase: MotionPhase,
    pub jumps_remaining: u8,
}

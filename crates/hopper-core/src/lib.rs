pub mod config;
pub mod input;
pub mod motion;
pub mod player;
pub mod position;
pub mod protocol;
pub mod render;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::config::HopperConfig;
    use crate::player::Player;
    use crate::position::Position;

    /// Default config with a 1 ms tick so session tests finish quickly.
    pub fn fast_config() -> HopperConfig {
        HopperConfig {
            tick_interval_ms: 1,
            ..HopperConfig::default()
        }
    }

    /// Run `n` ticks, returning the position after each one.
    pub fn run_ticks(player: &mut Player, n: usize) -> Vec<Position> {
        (0..n)
            .map(|_| {
                player.on_tick();
                player.position()
            })
            .collect()
    }

    /// Tick until the player is back on the floor, up to `max_ticks`.
    /// Returns the number of ticks taken, or `None` if still airborne.
    pub fn ticks_until_grounded(player: &mut Player, max_ticks: usize) -> Option<usize> {
        for tick in 1..=max_ticks {
            player.on_tick();
            if !player.motion().is_airborne() {
                return Some(tick);
            }
        }
        None
    }
}

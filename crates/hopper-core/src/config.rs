use serde::{Deserialize, Serialize};

use crate::input::Action;

/// Downward acceleration, in units per tick per tick.
pub const GRAVITY: f32 = 1.3;
/// Vertical velocity applied by a jump, in units per tick.
pub const STANDARD_INITIAL_VELOCITY: f32 = 20.0;
/// Horizontal distance covered per tick while a direction is held.
pub const MOVE_SPEED: f32 = 6.5;
/// Jumps available between two landings.
pub const JUMPS_ALLOWED: u8 = 2;
/// Nominal tick interval (~60 Hz).
pub const TICK_INTERVAL_MS: u64 = 17;

/// AWT virtual key codes, kept so that existing key maps carry over.
pub const VK_SPACE: u32 = 32;
pub const VK_LEFT: u32 = 37;
pub const VK_RIGHT: u32 = 39;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "HOPPER_CONFIG";
/// Config path used when [`CONFIG_ENV_VAR`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/hopper.toml";

#[derive(Debug)]
pub enum ConfigError {
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "parse error: {e}"),
            Self::Invalid(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Jump physics parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub jump_velocity: f32,
    pub move_speed: f32,
    pub jumps_allowed: u8,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_velocity: STANDARD_INITIAL_VELOCITY,
            move_speed: MOVE_SPEED,
            jumps_allowed: JUMPS_ALLOWED,
        }
    }
}

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
        }
    }
}

/// Player hitbox size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSize {
    pub width: u32,
    pub height: u32,
}

impl Default for PlayerSize {
    fn default() -> Self {
        Self {
            width: 110,
            height: 25,
        }
    }
}

/// Raw key codes bound to each action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: u32,
    pub right: u32,
    pub jump: u32,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: VK_LEFT,
            right: VK_RIGHT,
            jump: VK_SPACE,
        }
    }
}

impl KeyBindings {
    /// Look up the action bound to `code`. Unbound codes map to `None`.
    pub fn action_for(&self, code: u32) -> Option<Action> {
        if code == self.left {
            Some(Action::MoveLeft)
        } else if code == self.right {
            Some(Action::MoveRight)
        } else if code == self.jump {
            Some(Action::Jump)
        } else {
            None
        }
    }

    pub fn code_for(&self, action: Action) -> u32 {
        match action {
            Action::MoveLeft => self.left,
            Action::MoveRight => self.right,
            Action::Jump => self.jump,
        }
    }
}

/// Axis-aligned limits for the player's bottom-left corner, Y growing upward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Borders {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Borders {
    /// Borders that keep a `player`-sized box fully inside `viewport`.
    pub fn fit(viewport: Viewport, player: PlayerSize) -> Self {
        Self {
            left: 0.0,
            right: viewport.width.saturating_sub(player.width) as f32,
            bottom: 0.0,
            top: viewport.height.saturating_sub(player.height) as f32,
        }
    }
}

impl Default for Borders {
    fn default() -> Self {
        Self::fit(Viewport::default(), PlayerSize::default())
    }
}

/// Top-level game configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HopperConfig {
    pub tick_interval_ms: u64,
    pub physics: PhysicsConfig,
    pub viewport: Viewport,
    pub player: PlayerSize,
    pub keys: KeyBindings,
}

impl Default for HopperConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            physics: PhysicsConfig::default(),
            viewport: Viewport::default(),
            player: PlayerSize::default(),
            keys: KeyBindings::default(),
        }
    }
}

impl HopperConfig {
    /// Load config from the TOML file named by `HOPPER_CONFIG`. Falls back to
    /// defaults if the file is missing, unparseable or invalid.
    pub fn load() -> Self {
        let path =
            std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => {
                    tracing::debug!(path = %path, "Loaded config");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to load {path}: {e}, using defaults");
                    HopperConfig::default()
                },
            },
            Err(_) => HopperConfig::default(),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: HopperConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let physics = &self.physics;
        // Without a pull toward the floor a fall from the top border never ends.
        if !physics.gravity.is_finite() || physics.gravity <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "physics.gravity must be a finite positive number, got {}",
                physics.gravity
            )));
        }
        for (name, value) in [
            ("jump_velocity", physics.jump_velocity),
            ("move_speed", physics.move_speed),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "physics.{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        if self.player.width > self.viewport.width || self.player.height > self.viewport.height {
            return Err(ConfigError::Invalid(format!(
                "player {}x{} does not fit in viewport {}x{}",
                self.player.width, self.player.height, self.viewport.width, self.viewport.height
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick_interval_ms must be at least 1".to_string(),
            ));
        }
        let keys = &self.keys;
        if keys.left == keys.right || keys.left == keys.jump || keys.right == keys.jump {
            return Err(ConfigError::Invalid(format!(
                "key bindings must be distinct: left={} right={} jump={}",
                keys.left, keys.right, keys.jump
            )));
        }
        Ok(())
    }

    pub fn borders(&self) -> Borders {
        Borders::fit(self.viewport, self.player)
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_borders_fit_player_in_viewport() {
        let borders = HopperConfig::default().borders();
        assert_eq!(borders.left, 0.0);
        assert_eq!(borders.bottom, 0.0);
        assert_eq!(borders.right, 490.0);
        assert_eq!(borders.top, 575.0);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = HopperConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, HopperConfig::default());
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let cfg = HopperConfig::from_toml_str(include_str!("../../../config/hopper.toml")).unwrap();
        assert_eq!(cfg, HopperConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let cfg = HopperConfig::from_toml_str(
            r#"
            tick_interval_ms = 20

            [physics]
            jumps_allowed = 3

            [viewport]
            width = 800
            "#,
        )
        .unwrap();
        assert_eq!(cfg.tick_interval_ms, 20);
        assert_eq!(cfg.physics.jumps_allowed, 3);
        assert_eq!(cfg.physics.gravity, GRAVITY);
        assert_eq!(cfg.viewport.width, 800);
        assert_eq!(cfg.viewport.height, 600);
        assert_eq!(cfg.borders().right, 690.0);
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = HopperConfig::from_toml_str("[physics\ngravity = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err}");
    }

    #[test]
    fn negative_gravity_rejected() {
        let err = HopperConfig::from_toml_str("[physics]\ngravity = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("gravity"));
    }

    #[test]
    fn zero_gravity_rejected() {
        let err = HopperConfig::from_toml_str("[physics]\ngravity = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("gravity"), "got {err}");

        let err = HopperConfig::from_toml_str("[physics]\ngravity = 0.0\njump_velocity = 0.0")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn weakest_accepted_gravity_still_lands() {
        use crate::player::Player;
        use crate::test_helpers::ticks_until_grounded;

        for toml in [
            "[physics]\ngravity = 0.01",
            "[physics]\ngravity = 0.01\njump_velocity = 0.0",
        ] {
            let cfg = HopperConfig::from_toml_str(toml).unwrap();
            let mut player = Player::new(&cfg);
            player.handle_key_pressed(cfg.keys.jump);

            let landed = ticks_until_grounded(&mut player, 10_000);
            assert!(landed.is_some(), "{toml:?}: player never came down");
            assert_eq!(player.position().y(), 0.0);
            assert_eq!(player.motion().jumps_remaining(), cfg.physics.jumps_allowed);
        }
    }

    #[test]
    fn oversized_player_rejected() {
        let mut cfg = HopperConfig::default();
        cfg.player.width = 601;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_tick_interval_rejected() {
        let mut cfg = HopperConfig::default();
        cfg.tick_interval_ms = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn duplicate_key_binding_rejected() {
        let err = HopperConfig::from_toml_str("[keys]\njump = 37").unwrap_err();
        assert!(err.to_string().contains("distinct"), "got {err}");
    }

    #[test]
    fn key_bindings_map_default_codes() {
        let keys = KeyBindings::default();
        assert_eq!(keys.action_for(VK_LEFT), Some(Action::MoveLeft));
        assert_eq!(keys.action_for(VK_RIGHT), Some(Action::MoveRight));
        assert_eq!(keys.action_for(VK_SPACE), Some(Action::Jump));
        assert_eq!(keys.action_for(65), None);
        assert_eq!(keys.code_for(Action::Jump), VK_SPACE);
    }
}

use serde::{Deserialize, Serialize};

use skyhop_core::error::SkyhopError;
use skyhop_core::geometry::ScreenBounds;

use crate::reach::ReachMode;

/// Screen size the simulation is built for. No resize support.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl ScreenConfig {
    pub fn bounds(&self) -> ScreenBounds {
        ScreenBounds::new(self.width, self.height)
    }
}

/// Per-step physics constants (pixels per step, pixels per step squared).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub move_speed: f32,
    /// Vertical velocity set by a jump (negative is up).
    pub jump_power: f32,
    /// Terminal fall speed. `None` leaves falls unclamped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fall_speed: Option<f32>,
    /// Horizontal nudge applied on jump in the facing direction.
    pub jump_nudge: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            move_speed: 5.0,
            jump_power: -10.0,
            max_fall_speed: Some(15.0),
            jump_nudge: 10.0,
        }
    }
}

/// Actor size, spawn point and hit recovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    pub width: f32,
    pub height: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    /// How long the impaired state lasts after a hit (seconds).
    pub impaired_secs: f32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            width: 60.0,
            height: 60.0,
            spawn_x: 100.0,
            spawn_y: 500.0,
            impaired_secs: 2.0,
        }
    }
}

/// Falling hazard size, speed and spawn cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardConfig {
    pub width: f32,
    pub height: f32,
    pub fall_speed: f32,
    pub base_interval_ms: u32,
    /// Interval reduction per level index.
    pub interval_step_ms: u32,
    pub min_interval_ms: u32,
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            width: 30.0,
            height: 30.0,
            fall_speed: 5.0,
            base_interval_ms: 5000,
            interval_step_ms: 500,
            min_interval_ms: 1000,
        }
    }
}

/// Level generator tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Height of the full-width ground platform at the bottom of the screen.
    pub ground_height: f32,
    pub base_slots: u32,
    pub slots_per_level: u32,
    /// Candidate attempts per platform slot before the slot is skipped.
    pub retry_budget: u32,
    pub min_platform_width: f32,
    pub max_platform_width: f32,
    pub platform_height: f32,
    /// Smallest rise sampled between a platform and its chain anchor.
    pub min_rise: f32,
    pub max_jump_height: f32,
    pub max_horizontal_distance: f32,
    /// Platforms may not be placed with their top above this line.
    pub min_platform_top: f32,
    pub moving_chance: f64,
    pub min_moving_speed: f32,
    pub max_moving_speed: f32,
    pub one_way_chance: f64,
    pub collectible_size: f32,
    /// Distance from the platform top up to the collectible centre.
    pub collectible_offset: f32,
    pub collectible_min_y: f32,
    pub reach: ReachMode,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            ground_height: 40.0,
            base_slots: 3,
            slots_per_level: 2,
            retry_budget: 10,
            min_platform_width: 80.0,
            max_platform_width: 150.0,
            platform_height: 20.0,
            min_rise: 30.0,
            max_jump_height: 90.0,
            max_horizontal_distance: 200.0,
            min_platform_top: 60.0,
            moving_chance: 0.3,
            min_moving_speed: 1.0,
            max_moving_speed: 3.0,
            one_way_chance: 0.2,
            collectible_size: 20.0,
            collectible_offset: 30.0,
            collectible_min_y: 30.0,
            reach: ReachMode::Envelope,
        }
    }
}

impl GeneratorConfig {
    /// Number of platform slots attempted for `level_index`.
    pub fn slots_for(&self, level_index: usize) -> u32 {
        let level = u32::try_from(level_index).unwrap_or(u32::MAX);
        self.base_slots
            .saturating_add(self.slots_per_level.saturating_mul(level))
    }
}

/// One designed level given as ASCII rows (see [`crate::level::parse_ascii_layout`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsciiLayout {
    pub rows: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hazard_interval_ms: Option<u32>,
}

/// Where the session's levels come from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LevelSource {
    /// Procedurally generated, `session.level_count` levels.
    #[default]
    Generated,
    /// The built-in three-level table.
    Classic,
    /// ASCII layouts from the config file, in order.
    Custom { layouts: Vec<AsciiLayout> },
}

/// Score, lives and level sequencing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub lives: u32,
    pub points_per_collectible: u32,
    /// Number of generated levels (ignored for classic/custom sources).
    pub level_count: usize,
    pub tick_rate_hz: f32,
    /// Seed for level generation and hazard placement. `None` seeds from the OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub levels: LevelSource,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lives: 3,
            points_per_collectible: 10,
            level_count: 5,
            tick_rate_hz: 60.0,
            seed: None,
            levels: LevelSource::Generated,
        }
    }
}

impl SessionConfig {
    /// Total number of levels in the session.
    pub fn total_levels(&self) -> usize {
        match &self.levels {
            LevelSource::Generated => self.level_count,
            LevelSource::Classic => crate::level::CLASSIC_LEVEL_COUNT,
            LevelSource::Custom { layouts } => layouts.len(),
        }
    }
}

/// Top-level platformer configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerConfig {
    pub screen: ScreenConfig,
    pub physics: PhysicsConfig,
    pub actor: ActorConfig,
    pub hazard: HazardConfig,
    pub generator: GeneratorConfig,
    pub session: SessionConfig,
}

impl PlatformerConfig {
    /// Load config from `SKYHOP_CONFIG` or `config/skyhop.toml`, falling back to
    /// defaults if the file is missing or unparseable.
    pub fn load() -> Self {
        let path =
            std::env::var("SKYHOP_CONFIG").unwrap_or_else(|_| "config/skyhop.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from {path}");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    Self::default()
                },
            },
            Err(_) => Self::default(),
        }
    }

    /// Load config from an explicit path. Missing or malformed files are errors.
    pub fn load_from(path: &str) -> Result<Self, SkyhopError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SkyhopError::InvalidConfig(format!("{path}: {e}")))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SkyhopError> {
        toml::from_str::<Self>(content).map_err(|e| SkyhopError::InvalidConfig(e.to_string()))
    }

    /// Check invariants the simulation relies on.
    pub fn validate(&self) -> Result<(), SkyhopError> {
        fn positive(name: &str, v: f32) -> Result<(), SkyhopError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(SkyhopError::InvalidConfig(format!("{name} must be > 0")))
            }
        }
        fn finite(name: &str, v: f32) -> Result<(), SkyhopError> {
            if v.is_finite() {
                Ok(())
            } else {
                Err(SkyhopError::InvalidConfig(format!("{name} must be finite")))
            }
        }
        fn probability(name: &str, p: f64) -> Result<(), SkyhopError> {
            if (0.0..=1.0).contains(&p) {
                Ok(())
            } else {
                Err(SkyhopError::InvalidConfig(format!(
                    "{name} must be within [0, 1]"
                )))
            }
        }
        fn bad(m: &str) -> Result<(), SkyhopError> {
            Err(SkyhopError::InvalidConfig(m.to_string()))
        }

        positive("screen.width", self.screen.width)?;
        positive("screen.height", self.screen.height)?;

        let p = &self.physics;
        positive("physics.gravity", p.gravity)?;
        positive("physics.move_speed", p.move_speed)?;
        if !(p.jump_power.is_finite() && p.jump_power < 0.0) {
            return bad("physics.jump_power must be < 0 (upward)");
        }
        if let Some(max_fall) = p.max_fall_speed {
            positive("physics.max_fall_speed", max_fall)?;
        }

        let a = &self.actor;
        positive("actor.width", a.width)?;
        positive("actor.height", a.height)?;
        positive("actor.impaired_secs", a.impaired_secs)?;
        finite("actor.spawn_x", a.spawn_x)?;
        finite("actor.spawn_y", a.spawn_y)?;
        if a.width > self.screen.width || a.height > self.screen.height {
            return bad("actor must fit on screen");
        }
        if a.spawn_x < 0.0
            || a.spawn_y < 0.0
            || a.spawn_x + a.width > self.screen.width
            || a.spawn_y + a.height > self.screen.height
        {
            return bad("actor spawn point must lie on screen");
        }

        let h = &self.hazard;
        positive("hazard.width", h.width)?;
        positive("hazard.height", h.height)?;
        positive("hazard.fall_speed", h.fall_speed)?;
        if h.width > self.screen.width {
            return bad("hazard.width must not exceed screen.width");
        }
        if h.min_interval_ms == 0 {
            return bad("hazard.min_interval_ms must be > 0");
        }
        if h.min_interval_ms > h.base_interval_ms {
            return bad("hazard.min_interval_ms must not exceed base_interval_ms");
        }

        let g = &self.generator;
        positive("generator.ground_height", g.ground_height)?;
        positive("generator.min_platform_width", g.min_platform_width)?;
        positive("generator.max_platform_width", g.max_platform_width)?;
        positive("generator.platform_height", g.platform_height)?;
        positive("generator.min_rise", g.min_rise)?;
        positive("generator.max_jump_height", g.max_jump_height)?;
        positive("generator.max_horizontal_distance", g.max_horizontal_distance)?;
        positive("generator.collectible_size", g.collectible_size)?;
        positive("generator.min_moving_speed", g.min_moving_speed)?;
        positive("generator.max_moving_speed", g.max_moving_speed)?;
        finite("generator.min_platform_top", g.min_platform_top)?;
        finite("generator.collectible_offset", g.collectible_offset)?;
        finite("generator.collectible_min_y", g.collectible_min_y)?;
        if g.retry_budget == 0 {
            return bad("generator.retry_budget must be > 0");
        }
        if g.min_platform_width > g.max_platform_width {
            return bad("generator.min_platform_width must not exceed max_platform_width");
        }
        if g.max_platform_width > self.screen.width {
            return bad("generator.max_platform_width must not exceed screen.width");
        }
        if g.min_rise > g.max_jump_height {
            return bad("generator.min_rise must not exceed max_jump_height");
        }
        if g.min_moving_speed > g.max_moving_speed {
            return bad("generator.min_moving_speed must not exceed max_moving_speed");
        }
        if g.ground_height >= self.screen.height {
            return bad("generator.ground_height must be less than screen.height");
        }
        probability("generator.moving_chance", g.moving_chance)?;
        probability("generator.one_way_chance", g.one_way_chance)?;

        let s = &self.session;
        if s.lives == 0 {
            return bad("session.lives must be > 0");
        }
        positive("session.tick_rate_hz", s.tick_rate_hz)?;
        if s.total_levels() == 0 {
            return bad("session must contain at least one level");
        }

        Ok(())
    }
}

use rand::Rng;
use serde::{Deserialize, Serialize};

use skyhop_core::geometry::{Rect, ScreenBounds};
use skyhop_core::visual::{Body, VisualTag};

use crate::config::HazardConfig;

/// A falling hazard. Passive data: contact handling lives in the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub rect: Rect,
}

impl Hazard {
    /// New hazard at column `x`, entering from the top edge (bottom at `y = 0`).
    pub fn spawn_at(x: f32, cfg: &HazardConfig) -> Self {
        Self {
            rect: Rect::new(x, -cfg.height, cfg.width, cfg.height),
        }
    }

    /// New hazard at a uniformly random column that keeps it on screen.
    pub fn spawn_random(rng: &mut impl Rng, cfg: &HazardConfig, bounds: &ScreenBounds) -> Self {
        let max_x = bounds.width - cfg.width;
        let x = if max_x > 0.0 {
            rng.random_range(0.0..=max_x)
        } else {
            0.0
        };
        Self::spawn_at(x, cfg)
    }

    pub fn fall(&mut self, cfg: &HazardConfig) {
        self.rect.y += cfg.fall_speed;
    }

    /// Once the top edge passes the bottom of the screen the hazard is gone.
    pub fn is_off_screen(&self, bounds: &ScreenBounds) -> bool {
        self.rect.top() > bounds.height
    }
}

impl Body for Hazard {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn visual_tag(&self) -> VisualTag {
        VisualTag::Hazard
    }
}

/// Advance every hazard one step and drop those that left the screen.
pub fn update_hazards(hazards: &mut Vec<Hazard>, cfg: &HazardConfig, bounds: &ScreenBounds) {
    for hazard in hazards.iter_mut() {
        hazard.fall(cfg);
    }
    hazards.retain(|h| !h.is_off_screen(bounds));
}

/// Spawn cadence for a level: shrinks by `interval_step_ms` per level down to
/// `min_interval_ms`.
pub fn hazard_interval_ms(level_index: usize, cfg: &HazardConfig) -> u32 {
    let level = u32::try_from(level_index).unwrap_or(u32::MAX);
    cfg.base_interval_ms
        .saturating_sub(cfg.interval_step_ms.saturating_mul(level))
        .max(cfg.min_interval_ms)
}

/// Accumulates frame time and signals when the next hazard is due.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardTimer {
    pub interval_ms: u32,
    pub elapsed_ms: f32,
}

impl HazardTimer {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            elapsed_ms: 0.0,
        }
    }

    /// Add `dt` seconds. Returns true (and restarts the count) once more than
    /// the interval has elapsed. At most one spawn per call.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !dt.is_finite() || dt <= 0.0 {
            return false;
        }
        self.elapsed_ms += dt * 1000.0;
        if self.elapsed_ms > self.interval_ms as f32 {
            self.elapsed_ms = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self, interval_ms: u32) {
        *self = Self::new(interval_ms);
    }
}

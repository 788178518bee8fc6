use serde::{Deserialize, Serialize};

use skyhop_core::geometry::{Rect, ScreenBounds};
use skyhop_core::status::{ActiveStatus, StatusKind};
use skyhop_core::visual::{Body, Facing, VisualTag};

use crate::config::PhysicsConfig;
use crate::platform::Platform;

/// Tolerance when deciding that the actor's head was below a ceiling.
const CEILING_TOLERANCE: f32 = 0.01;
/// Default length of the impaired state (seconds).
pub const IMPAIRED_SECS: f32 = 2.0;

/// Timed actor statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorStatus {
    /// Set on hazard contact. Visual only, no physics effect.
    Impaired,
}

impl StatusKind for ActorStatus {
    fn duration(&self) -> f32 {
        match self {
            ActorStatus::Impaired => IMPAIRED_SECS,
        }
    }
}

/// The player-controlled actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub rect: Rect,
    /// Vertical velocity in px/step (positive is down).
    pub vel_y: f32,
    pub facing: Facing,
    pub on_ground: bool,
    pub impaired: Option<ActiveStatus<ActorStatus>>,
}

/// Result of resolving one step of vertical motion against the platform set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalResolution {
    /// Vertical displacement to commit this step.
    pub dy: f32,
    /// Vertical velocity after contact.
    pub vel_y: f32,
    /// Index of the platform the actor lands on, if any.
    pub support: Option<usize>,
    /// Whether a solid platform stopped upward motion.
    pub hit_ceiling: bool,
}

impl Actor {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
            vel_y: 0.0,
            facing: Facing::None,
            on_ground: false,
            impaired: None,
        }
    }

    pub fn is_impaired(&self) -> bool {
        self.impaired.is_some()
    }

    /// Move to `(x, y)` and drop vertical velocity. Used after a hit or a level change.
    pub fn reposition(&mut self, x: f32, y: f32) {
        self.rect.x = x;
        self.rect.y = y;
        self.vel_y = 0.0;
        self.on_ground = false;
    }

    /// Start a jump if grounded. Returns whether the jump happened; airborne
    /// calls are silently ignored.
    pub fn jump(&mut self, physics: &PhysicsConfig, bounds: &ScreenBounds) -> bool {
        if !self.on_ground {
            return false;
        }
        self.vel_y = physics.jump_power;
        self.on_ground = false;
        if self.facing != Facing::None {
            self.rect.x += self.facing.sign() * physics.jump_nudge;
            self.clamp_x(bounds);
        }
        true
    }

    /// Enter the impaired state for `duration` seconds. No-op (returns false)
    /// while already impaired, so one hazard pass cannot stack hits.
    pub fn take_hit(&mut self, duration: f32) -> bool {
        if self.is_impaired() {
            return false;
        }
        self.impaired = Some(ActiveStatus::with_duration(ActorStatus::Impaired, duration));
        true
    }

    /// Count down the impaired state by `dt` seconds, clearing it when it lapses.
    pub fn tick_status(&mut self, dt: f32) {
        if let Some(status) = &mut self.impaired {
            status.tick(dt);
            if status.is_expired() {
                self.impaired = None;
            }
        }
    }

    /// Advance one simulation step.
    ///
    /// `move_dir` is the horizontal intent in `{-1, 0, 1}`. Gravity is applied
    /// every step, grounding is re-derived from contact rather than latched,
    /// and a grounded actor rides the drift of a moving support.
    pub fn step(
        &mut self,
        move_dir: i8,
        platforms: &[Platform],
        physics: &PhysicsConfig,
        bounds: &ScreenBounds,
    ) -> VerticalResolution {
        let dir = move_dir.signum();
        let dx = f32::from(dir) * physics.move_speed;
        self.facing = Facing::from_dir(dir);

        self.vel_y += physics.gravity;
        if let Some(max_fall) = physics.max_fall_speed {
            self.vel_y = self.vel_y.min(max_fall);
        }

        let resolution = resolve_vertical(&self.rect, self.vel_y, platforms);
        self.vel_y = resolution.vel_y;
        self.on_ground = resolution.support.is_some();

        let ride = resolution
            .support
            .map_or(0.0, |idx| platforms[idx].drift());

        self.rect.x += dx + ride;
        self.clamp_x(bounds);
        self.rect.y += resolution.dy;
        self.rect.y = self.rect.y.min(bounds.height - self.rect.height);

        resolution
    }

    fn clamp_x(&mut self, bounds: &ScreenBounds) {
        self.rect.x = self.rect.x.clamp(0.0, bounds.width - self.rect.width);
    }
}

/// Resolve vertical motion of `rect` moving by `vel_y` against `platforms`.
///
/// Contact is sampled at `rect` shifted by `vel_y` (not swept). While falling,
/// every overlapped platform is a landing candidate and the highest top wins.
/// While rising, solid platforms the actor was below act as ceilings and the
/// lowest bottom wins; one-way platforms are passed through.
pub fn resolve_vertical(rect: &Rect, vel_y: f32, platforms: &[Platform]) -> VerticalResolution {
    let probe = rect.translated(0.0, vel_y);
    let mut out = VerticalResolution {
        dy: vel_y,
        vel_y,
        support: None,
        hit_ceiling: false,
    };

    if vel_y > 0.0 {
        let mut best: Option<(usize, f32)> = None;
        for (idx, platform) in platforms.iter().enumerate() {
            if !probe.intersects(&platform.rect) {
                continue;
            }
            let snap = platform.rect.top() - rect.bottom();
            if best.is_none_or(|(_, d)| snap < d) {
                best = Some((idx, snap));
            }
        }
        if let Some((idx, snap)) = best {
            out.dy = snap;
            out.vel_y = 0.0;
            out.support = Some(idx);
        }
    } else if vel_y < 0.0 {
        let mut best: Option<f32> = None;
        for platform in platforms {
            if platform.passable_from_below
                || !probe.intersects(&platform.rect)
                || rect.top() < platform.rect.bottom() - CEILING_TOLERANCE
            {
                continue;
            }
            let snap = platform.rect.bottom() - rect.top();
            if best.is_none_or(|d| snap > d) {
                best = Some(snap);
            }
        }
        if let Some(snap) = best {
            out.dy = snap;
            out.vel_y = 0.0;
            out.hit_ceiling = true;
        }
    }

    out
}

impl Body for Actor {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn visual_tag(&self) -> VisualTag {
        VisualTag::Actor {
            impaired: self.is_impaired(),
            facing: self.facing,
        }
    }
}

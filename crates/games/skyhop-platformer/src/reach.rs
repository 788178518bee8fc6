//! Jump reachability predicates used by the level generator.
//!
//! The envelope form is a geometric proxy: center distance and rise bounds,
//! nothing about gravity or jump power. The ballistic form steps the actual
//! jump arc with the physics constants and is strictly narrower, since it is
//! only consulted after the envelope accepts.

use serde::{Deserialize, Serialize};

use skyhop_core::geometry::Rect;

use crate::config::{GeneratorConfig, PlatformerConfig};

/// Upper bound on simulated steps for one arc.
const MAX_ARC_STEPS: u32 = 600;

/// Which reachability model the generator validates candidates with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReachMode {
    /// Horizontal distance and rise bounds only.
    #[default]
    Envelope,
    /// Envelope, then a stepped jump arc that must land on the target.
    Ballistic,
}

impl ReachMode {
    /// Whether an actor standing on `anchor` can land on `candidate`.
    pub fn platform_reachable(
        &self,
        anchor: &Rect,
        candidate: &Rect,
        cfg: &PlatformerConfig,
    ) -> bool {
        if !can_reach(anchor, candidate, &cfg.generator) {
            return false;
        }
        match self {
            ReachMode::Envelope => true,
            ReachMode::Ballistic => {
                ballistic_lands_on(anchor, candidate, &JumpProfile::from_config(cfg))
            },
        }
    }

    /// Whether an actor standing on `host` can touch `item`.
    pub fn collectible_reachable(
        &self,
        host: &Rect,
        item: &Rect,
        cfg: &PlatformerConfig,
    ) -> bool {
        if !can_reach_collectible(host, item, &cfg.generator) {
            return false;
        }
        match self {
            ReachMode::Envelope => true,
            ReachMode::Ballistic => ballistic_touches(host, item, &JumpProfile::from_config(cfg)),
        }
    }
}

/// Envelope test between two platforms: center-to-center horizontal distance
/// within `max_horizontal_distance` and a strictly positive rise of at most
/// `max_jump_height`.
pub fn can_reach(anchor: &Rect, candidate: &Rect, g: &GeneratorConfig) -> bool {
    let dx = (candidate.center_x() - anchor.center_x()).abs();
    let rise = anchor.top() - candidate.top();
    dx <= g.max_horizontal_distance && rise > 0.0 && rise <= g.max_jump_height
}

/// Envelope test from a host platform to a collectible. A collectible level
/// with the host's top (rise of zero) counts as reachable.
pub fn can_reach_collectible(host: &Rect, item: &Rect, g: &GeneratorConfig) -> bool {
    let dx = (item.center_x() - host.center_x()).abs();
    let rise = host.top() - item.top();
    dx <= g.max_horizontal_distance && (0.0..=g.max_jump_height).contains(&rise)
}

/// Physics constants a simulated jump is stepped with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpProfile {
    pub gravity: f32,
    pub jump_power: f32,
    pub move_speed: f32,
    pub max_fall_speed: Option<f32>,
    pub actor_width: f32,
    pub actor_height: f32,
    pub screen_width: f32,
}

impl JumpProfile {
    pub fn from_config(cfg: &PlatformerConfig) -> Self {
        Self {
            gravity: cfg.physics.gravity,
            jump_power: cfg.physics.jump_power,
            move_speed: cfg.physics.move_speed,
            max_fall_speed: cfg.physics.max_fall_speed,
            actor_width: cfg.actor.width,
            actor_height: cfg.actor.height,
            screen_width: cfg.screen.width,
        }
    }

    /// Highest the actor's feet rise above the take-off surface.
    pub fn apex_height(&self) -> f32 {
        let mut vel = self.jump_power;
        let mut height = 0.0f32;
        let mut best = 0.0f32;
        for _ in 0..MAX_ARC_STEPS {
            vel += self.gravity;
            if vel >= 0.0 {
                break;
            }
            height -= vel;
            best = best.max(height);
        }
        best
    }

    /// Actor standing on `surface` with its centre as close to `target_cx` as
    /// the surface allows.
    fn take_off(&self, surface: &Rect, target_cx: f32) -> Rect {
        let cx = target_cx.clamp(surface.left(), surface.right());
        let max_x = (self.screen_width - self.actor_width).max(0.0);
        let x = (cx - self.actor_width / 2.0).clamp(0.0, max_x);
        Rect::new(
            x,
            surface.top() - self.actor_height,
            self.actor_width,
            self.actor_height,
        )
    }

    /// Step one frame of a jump steering toward `target_cx`.
    fn advance(&self, actor: &mut Rect, vel_y: &mut f32, target_cx: f32) {
        *vel_y += self.gravity;
        if let Some(max_fall) = self.max_fall_speed {
            *vel_y = vel_y.min(max_fall);
        }
        let gap = target_cx - actor.center_x();
        let dx = gap.clamp(-self.move_speed, self.move_speed);
        actor.x = (actor.x + dx).clamp(0.0, (self.screen_width - actor.width).max(0.0));
        actor.y += *vel_y;
    }
}

/// Simulate a jump from `anchor` steering toward `candidate` and report
/// whether the actor comes down onto its top edge. Ceilings are ignored.
pub fn ballistic_lands_on(anchor: &Rect, candidate: &Rect, profile: &JumpProfile) -> bool {
    let target_cx = candidate.center_x();
    let mut actor = profile.take_off(anchor, target_cx);
    let mut vel_y = profile.jump_power;

    for _ in 0..MAX_ARC_STEPS {
        let feet_before = actor.bottom();
        profile.advance(&mut actor, &mut vel_y, target_cx);
        if vel_y > 0.0 {
            let crossed = feet_before <= candidate.top() && actor.bottom() > candidate.top();
            if crossed && actor.overlaps_x(candidate) {
                return true;
            }
            if feet_before > candidate.top() {
                return false;
            }
        }
    }
    false
}

/// Simulate a jump from `host` toward `item` and report whether the actor's
/// rectangle overlaps it at any step, standing position included.
pub fn ballistic_touches(host: &Rect, item: &Rect, profile: &JumpProfile) -> bool {
    let target_cx = item.center_x();
    let mut actor = profile.take_off(host, target_cx);
    if actor.intersects(item) {
        return true;
    }
    let mut vel_y = profile.jump_power;

    for _ in 0..MAX_ARC_STEPS {
        profile.advance(&mut actor, &mut vel_y, target_cx);
        if actor.intersects(item) {
            return true;
        }
        if vel_y > 0.0 && actor.bottom() > host.top() {
            return false;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> PlatformerConfig {
        PlatformerConfig::default()
    }

    fn ground() -> Rect {
        Rect::new(0.0, 560.0, 800.0, 40.0)
    }

    /// A 100 px ledge whose centre sits `dx` right of `anchor`'s and whose
    /// top is `rise` above it.
    fn ledge_from(anchor: &Rect, dx: f32, rise: f32) -> Rect {
        Rect::new(anchor.center_x() + dx - 50.0, anchor.top() - rise, 100.0, 20.0)
    }

    #[test]
    fn envelope_accepts_within_bounds() {
        let g = cfg().generator;
        let anchor = Rect::new(300.0, 400.0, 100.0, 20.0);
        assert!(can_reach(&anchor, &ledge_from(&anchor, 150.0, 60.0), &g));
        assert!(
            can_reach(&anchor, &ledge_from(&anchor, -200.0, 90.0), &g),
            "bounds are inclusive"
        );
    }

    #[test]
    fn envelope_rejects_outside_bounds() {
        let g = cfg().generator;
        let anchor = Rect::new(300.0, 400.0, 100.0, 20.0);
        assert!(!can_reach(&anchor, &ledge_from(&anchor, 0.0, 91.0), &g), "too high");
        assert!(!can_reach(&anchor, &ledge_from(&anchor, 201.0, 40.0), &g), "too far");
        assert!(!can_reach(&anchor, &ledge_from(&anchor, 50.0, 0.0), &g), "no rise");
        assert!(!can_reach(&anchor, &ledge_from(&anchor, 50.0, -30.0), &g), "below anchor");
    }

    #[test]
    fn collectible_envelope_allows_zero_rise() {
        let g = cfg().generator;
        let host = Rect::new(300.0, 400.0, 100.0, 20.0);
        let level_with_top = Rect::centered(350.0, 390.0, 20.0, 20.0);
        assert_eq!(host.top() - level_with_top.top(), 20.0);
        assert!(can_reach_collectible(&host, &level_with_top, &g));

        let flush = Rect::new(340.0, 400.0, 20.0, 20.0);
        assert!(can_reach_collectible(&host, &flush, &g));

        let sky = Rect::centered(350.0, 200.0, 20.0, 20.0);
        assert!(!can_reach_collectible(&host, &sky, &g));
    }

    #[test]
    fn apex_matches_default_physics() {
        let profile = JumpProfile::from_config(&cfg());
        assert_eq!(profile.apex_height(), 95.0);
    }

    #[test]
    fn ballistic_lands_on_nearby_ledge() {
        let profile = JumpProfile::from_config(&cfg());
        let anchor = ground();
        let target = Rect::new(350.0, 500.0, 100.0, 20.0);
        assert!(ballistic_lands_on(&anchor, &target, &profile));
    }

    #[test]
    fn ballistic_lands_at_edge_of_envelope() {
        let profile = JumpProfile::from_config(&cfg());
        let anchor = Rect::new(300.0, 400.0, 80.0, 20.0);
        let target = Rect::new(anchor.center_x() + 200.0 - 40.0, 310.0, 80.0, 20.0);
        assert!(can_reach(&anchor, &target, &cfg().generator));
        assert!(ballistic_lands_on(&anchor, &target, &profile));
    }

    #[test]
    fn ballistic_rejects_above_apex() {
        let profile = JumpProfile::from_config(&cfg());
        let anchor = ground();
        let target = Rect::new(350.0, 460.0, 100.0, 20.0);
        assert!(!ballistic_lands_on(&anchor, &target, &profile));
    }

    #[test]
    fn ballistic_rejects_too_far() {
        let profile = JumpProfile::from_config(&cfg());
        let anchor = Rect::new(100.0, 400.0, 80.0, 20.0);
        let target = Rect::new(540.0, 330.0, 80.0, 20.0);
        assert!(!ballistic_lands_on(&anchor, &target, &profile));
    }

    #[test]
    fn ballistic_touches_collectible_above_host() {
        let profile = JumpProfile::from_config(&cfg());
        let host = Rect::new(300.0, 400.0, 100.0, 20.0);
        let item = Rect::centered(host.center_x(), host.top() - 30.0, 20.0, 20.0);
        assert!(ballistic_touches(&host, &item, &profile));

        let high = Rect::centered(host.center_x(), host.top() - 150.0, 20.0, 20.0);
        assert!(
            ballistic_touches(&host, &high, &profile),
            "the head clears the feet apex by the actor height"
        );

        let out_of_reach = Rect::centered(host.center_x(), host.top() - 200.0, 20.0, 20.0);
        assert!(!ballistic_touches(&host, &out_of_reach, &profile));
    }

    #[test]
    fn envelope_ignores_physics_constants() {
        // Envelope is a geometric proxy: doubling gravity halves the real jump
        // but the envelope keeps accepting. Ballistic mode catches it.
        let mut heavy = cfg();
        heavy.physics.gravity = 1.0;
        let anchor = Rect::new(300.0, 400.0, 100.0, 20.0);
        let target = ledge_from(&anchor, 60.0, 80.0);

        assert!(ReachMode::Envelope.platform_reachable(&anchor, &target, &heavy));
        assert!(!ReachMode::Ballistic.platform_reachable(&anchor, &target, &heavy));
        assert!(ReachMode::Ballistic.platform_reachable(&anchor, &target, &cfg()));
    }

    #[test]
    fn ballistic_never_widens_envelope() {
        let anchor = Rect::new(300.0, 400.0, 100.0, 20.0);
        let target = ledge_from(&anchor, 20.0, 91.0);
        assert!(!ReachMode::Ballistic.platform_reachable(&anchor, &target, &cfg()));
    }
}

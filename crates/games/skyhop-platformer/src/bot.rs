use skyhop_core::geometry::Rect;
use skyhop_core::input::InputSnapshot;

use crate::PlatformerState;
use crate::config::PlatformerConfig;

/// How far above the actor's head a hazard counts as a threat (pixels).
const HAZARD_WARNING_DISTANCE: f32 = 160.0;

/// Largest horizontal gap at which the bot will jump for a target above it.
const JUMP_REACH: f32 = 120.0;

/// Produce the next frame's input for a simple autopilot.
///
/// Steers toward the nearest remaining collectible, jumps when grounded and
/// the target is above its head, and sidesteps hazards falling toward it.
pub fn autopilot_input(state: &PlatformerState, config: &PlatformerConfig) -> InputSnapshot {
    if state.outcome.is_some() || state.session.paused {
        return InputSnapshot::default();
    }

    let actor = &state.actor.rect;
    let mut input = InputSnapshot::default();

    if let Some(threat) = incoming_hazard(state, actor) {
        // Step away from the hazard's centre, toward the roomier side near walls.
        let away_right = if actor.left() <= config.physics.move_speed {
            true
        } else if actor.right() >= config.screen.width - config.physics.move_speed {
            false
        } else {
            actor.center_x() >= threat.center_x()
        };
        input.right = away_right;
        input.left = !away_right;
        return input;
    }

    let Some(target) = nearest_collectible(state, actor) else {
        return input;
    };

    let dx = target.center_x() - actor.center_x();
    if dx > config.physics.move_speed {
        input.right = true;
    } else if dx < -config.physics.move_speed {
        input.left = true;
    }

    if state.actor.on_ground && target.bottom() <= actor.top() && dx.abs() <= JUMP_REACH {
        input.jump = true;
    }
    input
}

fn nearest_collectible(state: &PlatformerState, actor: &Rect) -> Option<Rect> {
    state
        .collectibles
        .iter()
        .map(|c| c.rect)
        .min_by(|a, b| distance_sq(a, actor).total_cmp(&distance_sq(b, actor)))
}

fn incoming_hazard(state: &PlatformerState, actor: &Rect) -> Option<Rect> {
    state
        .hazards
        .iter()
        .map(|h| h.rect)
        .filter(|h| {
            h.overlaps_x(actor)
                && h.bottom() <= actor.top()
                && actor.top() - h.bottom() <= HAZARD_WARNING_DISTANCE
        })
        .max_by(|a, b| a.bottom().total_cmp(&b.bottom()))
}

fn distance_sq(a: &Rect, b: &Rect) -> f32 {
    let dx = a.center_x() - b.center_x();
    let dy = a.center_y() - b.center_y();
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Platformer;
    use crate::hazards::Hazard;
    use crate::level::Collectible;
    use skyhop_core::events::Outcome;
    use skyhop_core::game_trait::Simulation;

    fn session() -> Platformer {
        let mut cfg = PlatformerConfig::default();
        cfg.session.seed = Some(11);
        Platformer::new(cfg).unwrap()
    }

    fn state_with_collectible(rect: Rect) -> PlatformerState {
        let mut state = session().state().clone();
        state.actor.on_ground = true;
        state.collectibles = vec![Collectible::new(rect, None)];
        state.hazards.clear();
        state
    }

    #[test]
    fn steers_toward_collectible() {
        let cfg = PlatformerConfig::default();
        let right = state_with_collectible(Rect::new(600.0, 520.0, 20.0, 20.0));
        let input = autopilot_input(&right, &cfg);
        assert!(input.right && !input.left);
        assert!(!input.jump, "target level with the actor needs no jump");

        let left = state_with_collectible(Rect::new(10.0, 520.0, 20.0, 20.0));
        let input = autopilot_input(&left, &cfg);
        assert!(input.left && !input.right);
    }

    #[test]
    fn jumps_for_target_overhead() {
        let cfg = PlatformerConfig::default();
        let state = state_with_collectible(Rect::new(150.0, 420.0, 20.0, 20.0));
        let input = autopilot_input(&state, &cfg);
        assert!(input.jump);

        let mut airborne = state.clone();
        airborne.actor.on_ground = false;
        assert!(!autopilot_input(&airborne, &cfg).jump);
    }

    #[test]
    fn picks_nearest_collectible() {
        let cfg = PlatformerConfig::default();
        let mut state = state_with_collectible(Rect::new(700.0, 520.0, 20.0, 20.0));
        state
            .collectibles
            .push(Collectible::new(Rect::new(20.0, 520.0, 20.0, 20.0), None));
        assert!(autopilot_input(&state, &cfg).left);
    }

    #[test]
    fn sidesteps_falling_hazard() {
        let cfg = PlatformerConfig::default();
        let mut state = state_with_collectible(Rect::new(600.0, 520.0, 20.0, 20.0));
        let a = state.actor.rect;
        state.hazards.push(Hazard {
            rect: Rect::new(a.center_x() + 5.0, a.top() - 100.0, 30.0, 30.0),
        });
        let input = autopilot_input(&state, &cfg);
        assert!(input.left, "hazard is right of centre, so step left");
        assert!(!input.jump);
    }

    #[test]
    fn idle_when_session_over() {
        let cfg = PlatformerConfig::default();
        let mut state = state_with_collectible(Rect::new(600.0, 520.0, 20.0, 20.0));
        state.outcome = Some(Outcome::Victory);
        assert_eq!(autopilot_input(&state, &cfg), InputSnapshot::default());
    }

    #[test]
    fn autopilot_session_stays_consistent() {
        let mut game = session();
        let cfg = game.config().clone();
        for _ in 0..3000 {
            let input = autopilot_input(game.state(), &cfg);
            game.update(1.0 / 60.0, &input);
            let a = &game.state().actor.rect;
            assert!(a.x >= 0.0 && a.right() <= cfg.screen.width);
            assert!(a.bottom() <= cfg.screen.height);
            if game.is_session_over() {
                break;
            }
        }
        assert!(game.state().session.level < game.total_levels());
    }
}

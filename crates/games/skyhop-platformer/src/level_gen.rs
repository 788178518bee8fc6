use rand::Rng;

use skyhop_core::geometry::Rect;

use crate::config::{GeneratorConfig, PlatformerConfig};
use crate::hazards::hazard_interval_ms;
use crate::level::{Collectible, GenerationStats, Level};
use crate::platform::Platform;

/// Why a sampled candidate was thrown away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    AboveCeiling,
    Overlaps,
    Unreachable,
    CollectibleUnreachable,
}

/// Uniform sample from `lo..=hi`, or `lo` when the range is empty.
fn sample(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..=hi) } else { lo }
}

/// Draw one candidate rectangle relative to `anchor`.
fn sample_candidate(
    anchor: &Rect,
    g: &GeneratorConfig,
    screen_width: f32,
    rng: &mut impl Rng,
) -> Rect {
    let width = sample(rng, g.min_platform_width, g.max_platform_width).round();
    let rise = sample(rng, g.min_rise, g.max_jump_height);
    let offset = sample(rng, -g.max_horizontal_distance, g.max_horizontal_distance);

    let max_x = (screen_width - width).max(0.0);
    let x = (anchor.center_x() + offset - width / 2.0).clamp(0.0, max_x);
    Rect::new(x.round(), (anchor.top() - rise).round(), width, g.platform_height)
}

/// Collectible slot above `platform`.
fn collectible_for(platform: &Rect, g: &GeneratorConfig) -> Rect {
    let cy = (platform.top() - g.collectible_offset).max(g.collectible_min_y);
    Rect::centered(platform.center_x(), cy, g.collectible_size, g.collectible_size)
}

fn check_candidate(
    candidate: &Rect,
    anchor: &Rect,
    platforms: &[Platform],
    cfg: &PlatformerConfig,
) -> Result<Rect, Rejection> {
    let g = &cfg.generator;
    if candidate.top() < g.min_platform_top {
        return Err(Rejection::AboveCeiling);
    }
    if platforms.iter().any(|p| p.rect.intersects(candidate)) {
        return Err(Rejection::Overlaps);
    }
    if !g.reach.platform_reachable(anchor, candidate, cfg) {
        return Err(Rejection::Unreachable);
    }
    let item = collectible_for(candidate, g);
    if !g.reach.collectible_reachable(candidate, &item, cfg) {
        return Err(Rejection::CollectibleUnreachable);
    }
    Ok(item)
}

/// Generate level `level_index`: a full-width ground followed by a chain of
/// platforms, each validated against the previously committed one, with a
/// collectible above each.
///
/// Each of the `slots_for(level_index)` slots gets at most `retry_budget`
/// candidates; a slot that exhausts its budget is skipped, so the level may
/// be shorter than requested. Moving and one-way flags are rolled after
/// validation and play no part in reachability.
pub fn generate_level(level_index: usize, cfg: &PlatformerConfig, rng: &mut impl Rng) -> Level {
    let g = &cfg.generator;
    let screen = cfg.screen.bounds();
    let ground_top = screen.height - g.ground_height;

    let mut platforms = vec![Platform::solid(0.0, ground_top, screen.width, g.ground_height)];
    let mut collectibles = Vec::new();
    let mut anchor = 0usize;
    let mut stats = GenerationStats {
        requested_slots: g.slots_for(level_index),
        ..GenerationStats::default()
    };

    for slot in 0..stats.requested_slots {
        for _ in 0..g.retry_budget {
            stats.attempts += 1;
            let anchor_rect = platforms[anchor].rect;
            let candidate = sample_candidate(&anchor_rect, g, screen.width, rng);

            let item = match check_candidate(&candidate, &anchor_rect, &platforms, cfg) {
                Ok(item) => item,
                Err(reason) => {
                    tracing::trace!(
                        level = level_index,
                        slot,
                        ?reason,
                        "Rejected platform candidate"
                    );
                    continue;
                },
            };

            let mut platform = Platform::solid(
                candidate.x,
                candidate.y,
                candidate.width,
                candidate.height,
            );
            if rng.random_bool(g.moving_chance) {
                let speed = sample(rng, g.min_moving_speed, g.max_moving_speed).round();
                platform = platform.moving(speed);
            }
            platform.passable_from_below = rng.random_bool(g.one_way_chance);

            platforms.push(platform);
            anchor = platforms.len() - 1;
            collectibles.push(Collectible::new(item, Some(anchor)));
            stats.committed += 1;
            break;
        }
    }

    tracing::debug!(
        level = level_index,
        requested = stats.requested_slots,
        committed = stats.committed,
        attempts = stats.attempts,
        "Generated level"
    );

    Level {
        index: level_index,
        platforms,
        collectibles,
        hazard_interval_ms: hazard_interval_ms(level_index, &cfg.hazard),
        stats: Some(stats),
    }
}

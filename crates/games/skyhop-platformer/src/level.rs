use rand::Rng;
use serde::{Deserialize, Serialize};

use skyhop_core::error::SkyhopError;
use skyhop_core::geometry::Rect;
use skyhop_core::visual::{Body, VisualTag};

use crate::config::{AsciiLayout, LevelSource, PlatformerConfig};
use crate::hazards::hazard_interval_ms;
use crate::level_gen::generate_level;
use crate::platform::Platform;

/// Tile edge length of ASCII layouts, in pixels.
pub const TILE_SIZE: f32 = 48.0;
/// Number of levels in the built-in classic table.
pub const CLASSIC_LEVEL_COUNT: usize = 3;

/// A pickup. Picking up every collectible completes the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub rect: Rect,
    /// Index of the platform this collectible was placed on.
    pub host: Option<usize>,
}

impl Collectible {
    pub fn new(rect: Rect, host: Option<usize>) -> Self {
        Self { rect, host }
    }
}

impl Body for Collectible {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn visual_tag(&self) -> VisualTag {
        VisualTag::Collectible
    }
}

/// Bookkeeping from one generator run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Platform slots the level asked for.
    pub requested_slots: u32,
    /// Slots that produced a platform.
    pub committed: u32,
    /// Candidates sampled across all slots.
    pub attempts: u32,
}

/// One level's contents. Index 0 of `platforms` is the ground for generated
/// and classic levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub index: usize,
    pub platforms: Vec<Platform>,
    pub collectibles: Vec<Collectible>,
    pub hazard_interval_ms: u32,
    pub stats: Option<GenerationStats>,
}

/// Classic coin centred on `(x, y)`, hovering just above its host ledge.
fn coin(x: f32, y: f32, host: usize) -> Collectible {
    Collectible::new(Rect::centered(x, y, 20.0, 20.0), Some(host))
}

/// The built-in three-level table. Ledges are passable from below.
///
/// Returns `None` past the last classic level.
pub fn classic_level(index: usize) -> Option<Level> {
    let ground = Platform::solid(0.0, 560.0, 800.0, 40.0);
    let ledge = |x: f32, y: f32| Platform::one_way(x, y, 120.0, 20.0);

    let (platforms, collectibles, interval) = match index {
        0 => (
            vec![
                ground,
                ledge(200.0, 450.0),
                ledge(400.0, 350.0).moving(2.0),
                ledge(600.0, 250.0),
            ],
            vec![coin(220.0, 430.0, 1), coin(620.0, 230.0, 3)],
            5000,
        ),
        1 => (
            vec![
                ground,
                ledge(150.0, 400.0).moving(3.0),
                ledge(300.0, 300.0),
                ledge(500.0, 200.0).moving(3.0),
            ],
            vec![coin(160.0, 380.0, 1), coin(520.0, 180.0, 3)],
            4000,
        ),
        2 => (
            vec![
                ground,
                ledge(100.0, 450.0).moving(4.0),
                ledge(300.0, 350.0),
                ledge(500.0, 250.0).moving(4.0),
                Platform::one_way(700.0, 150.0, 80.0, 20.0),
            ],
            vec![
                coin(120.0, 430.0, 1),
                coin(520.0, 230.0, 3),
                coin(710.0, 130.0, 4),
            ],
            3000,
        ),
        _ => return None,
    };

    Some(Level {
        index,
        platforms,
        collectibles,
        hazard_interval_ms: interval,
        stats: None,
    })
}

#[derive(Clone, Copy, PartialEq)]
enum Tile {
    Empty,
    Solid,
    OneWay,
    Pickup,
}

fn tile_for(c: char) -> Option<Tile> {
    match c {
        ' ' | '.' => Some(Tile::Empty),
        'P' => Some(Tile::Solid),
        '=' => Some(Tile::OneWay),
        'C' | 'F' => Some(Tile::Pickup),
        _ => None,
    }
}

/// Build a level from ASCII rows on a [`TILE_SIZE`] grid.
///
/// `P` is a solid tile, `=` a one-way tile, `C`/`F` a collectible centred in
/// its tile, space and `.` are empty. Horizontal runs of the same platform
/// kind merge into one platform. No ground is added.
pub fn parse_ascii_layout(
    index: usize,
    layout: &AsciiLayout,
    cfg: &PlatformerConfig,
) -> Result<Level, SkyhopError> {
    let mut platforms = Vec::new();
    let mut pickups = Vec::new();

    for (row, line) in layout.rows.iter().enumerate() {
        let y = row as f32 * TILE_SIZE;
        let mut run: Option<(Tile, usize)> = None;
        let tiles: Vec<Tile> = line
            .chars()
            .enumerate()
            .map(|(col, c)| {
                tile_for(c).ok_or_else(|| {
                    SkyhopError::InvalidLayout(format!(
                        "level {index}: unknown tile {c:?} at row {row}, column {col}"
                    ))
                })
            })
            .collect::<Result<_, _>>()?;

        // Sentinel empty tile closes a run that reaches the end of the row.
        for (col, tile) in tiles.iter().copied().chain([Tile::Empty]).enumerate() {
            if let Some((kind, start)) = run
                && kind != tile
            {
                let x = start as f32 * TILE_SIZE;
                let width = (col - start) as f32 * TILE_SIZE;
                platforms.push(if kind == Tile::OneWay {
                    Platform::one_way(x, y, width, TILE_SIZE)
                } else {
                    Platform::solid(x, y, width, TILE_SIZE)
                });
                run = None;
            }
            match tile {
                Tile::Solid | Tile::OneWay if run.is_none() => run = Some((tile, col)),
                Tile::Pickup => pickups.push((col, row)),
                _ => {},
            }
        }
    }

    if pickups.is_empty() {
        return Err(SkyhopError::InvalidLayout(format!(
            "level {index}: layout has no collectibles"
        )));
    }

    let size = cfg.generator.collectible_size;
    let collectibles = pickups
        .into_iter()
        .map(|(col, row)| {
            let rect = Rect::centered(
                (col as f32 + 0.5) * TILE_SIZE,
                (row as f32 + 0.5) * TILE_SIZE,
                size,
                size,
            );
            let tile_bottom = (row + 1) as f32 * TILE_SIZE;
            let host = platforms
                .iter()
                .position(|p| p.rect.top() == tile_bottom && p.rect.overlaps_x(&rect));
            Collectible::new(rect, host)
        })
        .collect();

    Ok(Level {
        index,
        platforms,
        collectibles,
        hazard_interval_ms: layout
            .hazard_interval_ms
            .unwrap_or_else(|| hazard_interval_ms(index, &cfg.hazard)),
        stats: None,
    })
}

/// Where the controller gets each level from.
#[derive(Debug, Clone)]
pub enum LevelCatalog {
    /// Generated on demand when the index is reached.
    Generated { count: usize },
    /// Built once up front (classic table or parsed ASCII layouts).
    Designed(Vec<Level>),
}

impl LevelCatalog {
    /// Resolve the configured level source. Custom layouts are parsed here so
    /// a bad layout is reported before the session starts.
    pub fn from_config(cfg: &PlatformerConfig) -> Result<Self, SkyhopError> {
        match &cfg.session.levels {
            LevelSource::Generated => Ok(Self::Generated {
                count: cfg.session.level_count,
            }),
            LevelSource::Classic => Ok(Self::Designed(
                (0..CLASSIC_LEVEL_COUNT).filter_map(classic_level).collect(),
            )),
            LevelSource::Custom { layouts } => layouts
                .iter()
                .enumerate()
                .map(|(i, layout)| parse_ascii_layout(i, layout, cfg))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Designed),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Generated { count } => *count,
            Self::Designed(levels) => levels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Contents of level `index`. Designed catalogs fall back to generation
    /// past their end.
    pub fn level(&self, index: usize, cfg: &PlatformerConfig, rng: &mut impl Rng) -> Level {
        match self {
            Self::Designed(levels) => match levels.get(index) {
                Some(level) => level.clone(),
                None => generate_level(index, cfg, rng),
            },
            Self::Generated { .. } => generate_level(index, cfg, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn layout(rows: &[&str]) -> AsciiLayout {
        AsciiLayout {
            rows: rows.iter().map(|r| r.to_string()).collect(),
            hazard_interval_ms: None,
        }
    }

    #[test]
    fn classic_table_has_three_levels() {
        for i in 0..CLASSIC_LEVEL_COUNT {
            let level = classic_level(i).unwrap();
            assert_eq!(level.index, i);
            assert_eq!(level.platforms[0].rect, Rect::new(0.0, 560.0, 800.0, 40.0));
            assert!(!level.platforms[0].passable_from_below);
            assert!(!level.collectibles.is_empty());
        }
        assert!(classic_level(CLASSIC_LEVEL_COUNT).is_none());
        assert_eq!(classic_level(0).unwrap().hazard_interval_ms, 5000);
        assert_eq!(classic_level(1).unwrap().hazard_interval_ms, 4000);
        assert_eq!(classic_level(2).unwrap().hazard_interval_ms, 3000);
        assert_eq!(classic_level(0).unwrap().collectibles[0].rect.center_x(), 220.0);
    }

    #[test]
    fn classic_coins_hover_over_their_hosts() {
        for i in 0..CLASSIC_LEVEL_COUNT {
            let level = classic_level(i).unwrap();
            for c in &level.collectibles {
                let host = &level.platforms[c.host.unwrap()];
                assert_eq!(c.rect.center_y(), host.rect.top() - 20.0);
                assert_eq!(c.rect.bottom(), host.rect.top() - 10.0);
                assert!(c.rect.overlaps_x(&host.rect));
            }
        }
    }

    #[test]
    fn ascii_runs_merge() {
        let cfg = PlatformerConfig::default();
        let level = parse_ascii_layout(
            0,
            &layout(&["   C  ", "  PP==", "PPPPPP"]),
            &cfg,
        )
        .unwrap();

        assert_eq!(level.platforms.len(), 3);
        assert_eq!(level.platforms[0].rect, Rect::new(96.0, 48.0, 96.0, 48.0));
        assert!(!level.platforms[0].passable_from_below);
        assert_eq!(level.platforms[1].rect, Rect::new(192.0, 48.0, 96.0, 48.0));
        assert!(level.platforms[1].passable_from_below);
        assert_eq!(level.platforms[2].rect, Rect::new(0.0, 96.0, 288.0, 48.0));

        assert_eq!(level.collectibles.len(), 1);
        let c = &level.collectibles[0];
        assert_eq!(c.rect.center_x(), 168.0);
        assert_eq!(c.rect.center_y(), 24.0);
        assert_eq!(c.host, Some(0));
        assert_eq!(level.hazard_interval_ms, 5000);
    }

    #[test]
    fn ascii_accepts_dots_and_finish_marker() {
        let cfg = PlatformerConfig::default();
        let mut l = layout(&["..F.", "PPPP"]);
        l.hazard_interval_ms = Some(2500);
        let level = parse_ascii_layout(2, &l, &cfg).unwrap();
        assert_eq!(level.platforms.len(), 1);
        assert_eq!(level.collectibles.len(), 1);
        assert_eq!(level.hazard_interval_ms, 2500);
        assert_eq!(level.index, 2);
    }

    #[test]
    fn ascii_floating_collectible_has_no_host() {
        let cfg = PlatformerConfig::default();
        let level = parse_ascii_layout(0, &layout(&["C   ", "    ", "PPPP"]), &cfg).unwrap();
        assert_eq!(level.collectibles[0].host, None);
    }

    #[test]
    fn ascii_rejects_unknown_tile() {
        let cfg = PlatformerConfig::default();
        let err = parse_ascii_layout(0, &layout(&["C X", "PPP"]), &cfg).unwrap_err();
        match err {
            SkyhopError::InvalidLayout(msg) => assert!(msg.contains("'X'"), "{msg}"),
            other => panic!("Expected InvalidLayout, got {other:?}"),
        }
    }

    #[test]
    fn ascii_rejects_layout_without_collectibles() {
        let cfg = PlatformerConfig::default();
        let err = parse_ascii_layout(0, &layout(&["    ", "PPPP"]), &cfg).unwrap_err();
        assert!(matches!(err, SkyhopError::InvalidLayout(_)));
        assert!(parse_ascii_layout(0, &layout(&[]), &cfg).is_err());
    }

    #[test]
    fn catalog_for_each_source() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut cfg = PlatformerConfig::default();

        let generated = LevelCatalog::from_config(&cfg).unwrap();
        assert_eq!(generated.len(), 5);
        let level = generated.level(2, &cfg, &mut rng);
        assert_eq!(level.index, 2);
        assert!(level.stats.is_some());

        cfg.session.levels = LevelSource::Classic;
        let classic = LevelCatalog::from_config(&cfg).unwrap();
        assert_eq!(classic.len(), CLASSIC_LEVEL_COUNT);
        assert_eq!(classic.level(1, &cfg, &mut rng), classic_level(1).unwrap());

        cfg.session.levels = LevelSource::Custom {
            layouts: vec![layout(&[" C ", "PPP"]), layout(&["C", "="])],
        };
        let custom = LevelCatalog::from_config(&cfg).unwrap();
        assert_eq!(custom.len(), 2);
        assert!(custom.level(1, &cfg, &mut rng).platforms[0].passable_from_below);
    }

    #[test]
    fn catalog_reports_bad_layout() {
        let mut cfg = PlatformerConfig::default();
        cfg.session.levels = LevelSource::Custom {
            layouts: vec![layout(&[" C ", "PPP"]), layout(&["?"])],
        };
        assert!(matches!(
            LevelCatalog::from_config(&cfg),
            Err(SkyhopError::InvalidLayout(_))
        ));
    }
}

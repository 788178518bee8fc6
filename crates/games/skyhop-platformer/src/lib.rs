pub mod bot;
pub mod config;
pub mod hazards;
pub mod level;
pub mod level_gen;
pub mod physics;
pub mod platform;
pub mod reach;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use skyhop_core::error::SkyhopError;
use skyhop_core::events::{Cue, GameEvent, Outcome};
use skyhop_core::game_trait::Simulation;
use skyhop_core::input::InputSnapshot;
use skyhop_core::simulation_boilerplate;
use skyhop_core::visual::{Body, Drawable};

use config::PlatformerConfig;
use hazards::{Hazard, HazardTimer, update_hazards};
use level::{Collectible, GenerationStats, LevelCatalog};
use physics::Actor;
use platform::Platform;

/// Score, lives and level index of the running session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub level: usize,
    pub score: u32,
    pub lives: u32,
    pub paused: bool,
}

/// Full simulation state, snapshotted by `serialize_state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformerState {
    pub actor: Actor,
    pub platforms: Vec<Platform>,
    pub collectibles: Vec<Collectible>,
    pub hazards: Vec<Hazard>,
    pub hazard_timer: HazardTimer,
    pub session: Session,
    pub outcome: Option<Outcome>,
    /// Generator bookkeeping for the current level, if it was generated.
    pub level_stats: Option<GenerationStats>,
}

/// Single-actor platformer session: physics, hazards, pickups and level
/// progression.
pub struct Platformer {
    config: PlatformerConfig,
    catalog: LevelCatalog,
    rng: StdRng,
    state: PlatformerState,
}

impl Platformer {
    /// Validate `config`, resolve its level source and load the first level.
    pub fn new(config: PlatformerConfig) -> Result<Self, SkyhopError> {
        config.validate()?;
        let catalog = LevelCatalog::from_config(&config)?;
        let rng = match config.session.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let a = &config.actor;
        let state = PlatformerState {
            actor: Actor::new(a.spawn_x, a.spawn_y, a.width, a.height),
            platforms: Vec::new(),
            collectibles: Vec::new(),
            hazards: Vec::new(),
            hazard_timer: HazardTimer::new(config.hazard.base_interval_ms),
            session: Session {
                level: 0,
                score: 0,
                lives: config.session.lives,
                paused: false,
            },
            outcome: None,
            level_stats: None,
        };

        let mut game = Self {
            config,
            catalog,
            rng,
            state,
        };
        game.load_level(0);
        Ok(game)
    }

    pub fn state(&self) -> &PlatformerState {
        &self.state
    }

    pub fn config(&self) -> &PlatformerConfig {
        &self.config
    }

    /// Number of levels in this session.
    pub fn total_levels(&self) -> usize {
        self.catalog.len()
    }

    /// The frame's drawables in paint order: platforms, collectibles,
    /// hazards, actor.
    pub fn drawables(&self) -> Vec<Drawable> {
        let s = &self.state;
        s.platforms
            .iter()
            .map(Body::drawable)
            .chain(s.collectibles.iter().map(Body::drawable))
            .chain(s.hazards.iter().map(Body::drawable))
            .chain(std::iter::once(s.actor.drawable()))
            .collect()
    }

    /// Reset score, lives and level index and reload the first level.
    pub fn restart(&mut self) -> Vec<GameEvent> {
        self.state.session = Session {
            level: 0,
            score: 0,
            lives: self.config.session.lives,
            paused: false,
        };
        self.state.outcome = None;
        self.state.actor.impaired = None;
        self.load_level(0);
        tracing::info!("Session restarted");
        vec![GameEvent::LevelStarted { level: 0 }]
    }

    /// Replace platforms, collectibles and hazards with level `index` and put
    /// the actor back at the spawn point.
    fn load_level(&mut self, index: usize) {
        let level = self.catalog.level(index, &self.config, &mut self.rng);
        self.state.session.level = index;
        self.state.platforms = level.platforms;
        self.state.collectibles = level.collectibles;
        self.state.hazards.clear();
        self.state.hazard_timer.reset(level.hazard_interval_ms);
        self.state.level_stats = level.stats;
        self.respawn_actor();
        tracing::debug!(
            level = index,
            platforms = self.state.platforms.len(),
            collectibles = self.state.collectibles.len(),
            hazard_interval_ms = level.hazard_interval_ms,
            "Loaded level"
        );
    }

    fn respawn_actor(&mut self) {
        let a = &self.config.actor;
        self.state.actor.reposition(a.spawn_x, a.spawn_y);
    }

    fn collect_pickups(&mut self, events: &mut Vec<GameEvent>) {
        let actor = self.state.actor.rect;
        let before = self.state.collectibles.len();
        self.state.collectibles.retain(|c| !c.rect.intersects(&actor));
        let picked = before - self.state.collectibles.len();
        if picked == 0 {
            return;
        }

        let points = self.config.session.points_per_collectible;
        for _ in 0..picked {
            self.state.session.score = self.state.session.score.saturating_add(points);
            events.push(GameEvent::Cue(Cue::Collect));
        }
        events.push(GameEvent::ScoreChanged {
            score: self.state.session.score,
        });
    }

    /// Every touching hazard is removed, but one frame costs at most one life.
    fn check_hazard_contact(&mut self, events: &mut Vec<GameEvent>) {
        let actor = self.state.actor.rect;
        let before = self.state.hazards.len();
        self.state.hazards.retain(|h| !h.rect.intersects(&actor));
        if self.state.hazards.len() == before {
            return;
        }

        let session = &mut self.state.session;
        session.lives = session.lives.saturating_sub(1);
        let lives = session.lives;
        events.push(GameEvent::Cue(Cue::Hit));
        events.push(GameEvent::LifeLost { lives });
        self.respawn_actor();
        self.state.actor.take_hit(self.config.actor.impaired_secs);
        tracing::info!(lives, level = self.state.session.level, "Actor hit by hazard");

        if lives == 0 {
            self.finish(Outcome::Defeat, events);
        }
    }

    fn check_level_complete(&mut self, events: &mut Vec<GameEvent>) {
        if self.state.outcome.is_some() || !self.state.collectibles.is_empty() {
            return;
        }
        let next = self.state.session.level + 1;
        if next >= self.catalog.len() {
            self.finish(Outcome::Victory, events);
            return;
        }
        self.load_level(next);
        tracing::info!(level = next, score = self.state.session.score, "Advanced to next level");
        events.push(GameEvent::LevelStarted { level: next });
    }

    fn finish(&mut self, outcome: Outcome, events: &mut Vec<GameEvent>) {
        self.state.outcome = Some(outcome);
        events.push(GameEvent::Cue(match outcome {
            Outcome::Defeat => Cue::GameOver,
            Outcome::Victory => Cue::Victory,
        }));
        events.push(GameEvent::SessionOver { outcome });
        tracing::info!(
            ?outcome,
            score = self.state.session.score,
            level = self.state.session.level,
            "Session over"
        );
    }
}

impl Simulation for Platformer {
    fn tick_rate(&self) -> f32 {
        self.config.session.tick_rate_hz
    }

    fn update(&mut self, dt: f32, input: &InputSnapshot) -> Vec<GameEvent> {
        if input.restart {
            return self.restart();
        }
        if input.pause {
            self.state.session.paused = !self.state.session.paused;
        }
        if self.state.session.paused || self.state.outcome.is_some() {
            return Vec::new();
        }

        let mut events = Vec::new();
        let physics = &self.config.physics;
        let bounds = self.config.screen.bounds();

        if input.jump && self.state.actor.jump(physics, &bounds) {
            events.push(GameEvent::Cue(Cue::Jump));
        }
        self.state
            .actor
            .step(input.move_dir(), &self.state.platforms, physics, &bounds);
        self.state.actor.tick_status(dt);

        for platform in &mut self.state.platforms {
            platform.update(&bounds);
        }

        update_hazards(&mut self.state.hazards, &self.config.hazard, &bounds);
        if self.state.hazard_timer.tick(dt) {
            let hazard = Hazard::spawn_random(&mut self.rng, &self.config.hazard, &bounds);
            tracing::trace!(x = hazard.rect.x, "Spawned hazard");
            self.state.hazards.push(hazard);
        }

        self.collect_pickups(&mut events);
        self.check_hazard_contact(&mut events);
        self.check_level_complete(&mut events);

        events
    }

    simulation_boilerplate!(state_type: PlatformerState);
}

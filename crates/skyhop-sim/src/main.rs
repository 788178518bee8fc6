use serde::Serialize;
use tracing_subscriber::EnvFilter;

use skyhop_core::events::{Cue, CueSink, GameEvent, Outcome, dispatch_cues};
use skyhop_core::game_trait::Simulation;
use skyhop_platformer::Platformer;
use skyhop_platformer::bot::autopilot_input;
use skyhop_platformer::config::PlatformerConfig;

/// Ticks run when `--ticks` is not given (one minute at 60 Hz).
const DEFAULT_TICKS: u64 = 3600;

#[derive(Debug, Default, PartialEq)]
struct SimArgs {
    seed: Option<u64>,
    ticks: Option<u64>,
    config: Option<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> SimArgs {
    let mut parsed = SimArgs::default();
    for arg in args {
        if let Some(v) = arg.strip_prefix("--seed=") {
            parsed.seed = v.parse().ok();
        } else if let Some(v) = arg.strip_prefix("--ticks=") {
            parsed.ticks = v.parse().ok();
        } else if let Some(v) = arg.strip_prefix("--config=") {
            parsed.config = Some(v.to_string());
        } else {
            tracing::warn!("Ignoring unknown argument {arg}");
        }
    }
    parsed
}

/// Logs cues instead of playing them.
struct LogSink;

impl CueSink for LogSink {
    fn play(&mut self, cue: Cue) {
        tracing::debug!(cue = cue.name(), "cue");
    }
}

#[derive(Debug, Serialize)]
struct RunSummary {
    level: usize,
    levels_total: usize,
    score: u32,
    lives: u32,
    outcome: Option<Outcome>,
    ticks: u64,
}

fn run(game: &mut Platformer, max_ticks: u64) -> RunSummary {
    let dt = 1.0 / game.tick_rate();
    let mut sink = LogSink;
    let mut ticks = 0;

    while ticks < max_ticks && !game.is_session_over() {
        let input = autopilot_input(game.state(), game.config());
        let events = game.update(dt, &input);
        dispatch_cues(&events, &mut sink);
        for event in &events {
            match event {
                GameEvent::Cue(_) => {},
                GameEvent::ScoreChanged { score } => tracing::debug!(score, tick = ticks, "score"),
                other => tracing::info!(tick = ticks, event = ?other, "event"),
            }
        }
        ticks += 1;
    }

    let s = game.state();
    RunSummary {
        level: s.session.level,
        levels_total: game.total_levels(),
        score: s.session.score,
        lives: s.session.lives,
        outcome: s.outcome,
        ticks,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = parse_args(std::env::args().skip(1));

    let mut config = match &args.config {
        Some(path) => match PlatformerConfig::load_from(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::error!("{e}");
                std::process::exit(1);
            },
        },
        None => PlatformerConfig::load(),
    };
    if args.seed.is_some() {
        config.session.seed = args.seed;
    }

    let mut game = match Platformer::new(config) {
        Ok(game) => game,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        },
    };

    let summary = run(&mut game, args.ticks.unwrap_or(DEFAULT_TICKS));
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!("Failed to encode summary: {e}");
            std::process::exit(1);
        },
    }
}

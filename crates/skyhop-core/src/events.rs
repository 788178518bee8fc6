use serde::{Deserialize, Serialize};

/// Named audio cues. Fire-and-forget: a player that lacks a cue just skips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Jump,
    Collect,
    Hit,
    GameOver,
    Victory,
}

impl Cue {
    /// Asset-style name of the cue (`"jump"`, `"game_over"`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            Cue::Jump => "jump",
            Cue::Collect => "collect",
            Cue::Hit => "hit",
            Cue::GameOver => "game_over",
            Cue::Victory => "victory",
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Lives ran out.
    Defeat,
    /// The final level was cleared.
    Victory,
}

/// Events emitted by a simulation update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Cue(Cue),
    ScoreChanged { score: u32 },
    LifeLost { lives: u32 },
    LevelStarted { level: usize },
    SessionOver { outcome: Outcome },
}

/// Receiver for audio cues. Implementations must not block or fail.
pub trait CueSink {
    fn play(&mut self, cue: Cue);
}

/// Forward every cue in `events` to `sink`, in order.
pub fn dispatch_cues(events: &[GameEvent], sink: &mut dyn CueSink) {
    for event in events {
        if let GameEvent::Cue(cue) = event {
            sink.play(*cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder(Vec<Cue>);

    impl CueSink for Recorder {
        fn play(&mut self, cue: Cue) {
            self.0.push(cue);
        }
    }

    #[test]
    fn dispatch_forwards_only_cues() {
        let events = vec![
            GameEvent::Cue(Cue::Collect),
            GameEvent::ScoreChanged { score: 10 },
            GameEvent::Cue(Cue::Hit),
            GameEvent::LifeLost { lives: 2 },
        ];
        let mut sink = Recorder(Vec::new());
        dispatch_cues(&events, &mut sink);
        assert_eq!(sink.0, vec![Cue::Collect, Cue::Hit]);
    }

    #[test]
    fn cue_names() {
        assert_eq!(Cue::Jump.name(), "jump");
        assert_eq!(Cue::GameOver.name(), "game_over");
    }
}

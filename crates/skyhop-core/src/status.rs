use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Trait for game-specific timed status kinds.
pub trait StatusKind: Clone + Copy + PartialEq + Serialize + DeserializeOwned {
    /// Duration in seconds. Use `f32::INFINITY` for effects that never lapse.
    fn duration(&self) -> f32;
}

/// A status effect counting down in simulation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ActiveStatus<K: StatusKind> {
    pub kind: K,
    pub remaining: f32,
}

impl<K: StatusKind> ActiveStatus<K> {
    pub fn new(kind: K) -> Self {
        Self {
            remaining: kind.duration(),
            kind,
        }
    }

    /// Start a status with an explicit duration instead of the kind's default.
    pub fn with_duration(kind: K, duration: f32) -> Self {
        Self {
            kind,
            remaining: duration,
        }
    }

    /// Advance by `dt` seconds. Non-finite or negative `dt` is ignored.
    pub fn tick(&mut self, dt: f32) {
        if self.remaining.is_finite() && dt.is_finite() && dt > 0.0 {
            self.remaining -= dt;
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

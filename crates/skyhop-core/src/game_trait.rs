use crate::events::GameEvent;
use crate::input::InputSnapshot;

/// A fixed-timestep, single-threaded game simulation.
///
/// The frame loop, window, input polling and audio playback live outside;
/// the simulation is a synchronous function of previous state, the frame's
/// input snapshot and elapsed time.
pub trait Simulation {
    /// Simulation tick rate in Hz.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Advance one frame. `dt` is elapsed seconds since the previous frame.
    fn update(&mut self, dt: f32, input: &InputSnapshot) -> Vec<GameEvent>;

    /// Serialize the full state as a versioned snapshot.
    fn serialize_state(&self) -> Vec<u8>;

    /// Replace the state with a snapshot. Malformed data is ignored.
    fn apply_state(&mut self, state: &[u8]);

    fn pause(&mut self);

    fn resume(&mut self);

    fn is_paused(&self) -> bool;

    /// Whether the session has ended (victory or defeat).
    fn is_session_over(&self) -> bool;
}

/// Generates the snapshot and pause methods of `Simulation`:
/// `serialize_state`, `apply_state`, `pause`, `resume`, `is_paused`, `is_session_over`.
///
/// Requires the implementing struct to have a `state: $StateType` field, and
/// `$StateType` to have `session.paused: bool` and `outcome: Option<_>` fields.
#[macro_export]
macro_rules! simulation_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            $crate::snapshot::encode_snapshot(&self.state)
                .expect("game state serialization must succeed")
        }

        fn apply_state(&mut self, state: &[u8]) {
            match $crate::snapshot::decode_snapshot::<$StateType>(state) {
                Ok(s) => self.state = s,
                Err(e) => tracing::debug!(error = %e, "Dropped malformed state snapshot"),
            }
        }

        fn pause(&mut self) {
            self.state.session.paused = true;
        }

        fn resume(&mut self) {
            self.state.session.paused = false;
        }

        fn is_paused(&self) -> bool {
            self.state.session.paused
        }

        fn is_session_over(&self) -> bool {
            self.state.outcome.is_some()
        }
    };
}

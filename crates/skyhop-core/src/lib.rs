pub mod error;
pub mod events;
pub mod game_trait;
pub mod geometry;
pub mod input;
pub mod snapshot;
pub mod status;
pub mod visual;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::events::GameEvent;
    use crate::game_trait::Simulation;
    use crate::input::InputSnapshot;

    /// Frame time used by the contract checks (60 Hz).
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Run N ticks with the same input, returning all accumulated events.
    pub fn run_ticks(
        sim: &mut dyn Simulation,
        n: usize,
        input: &InputSnapshot,
    ) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(sim.update(FRAME_DT, input));
        }
        all_events
    }

    /// Assert that the simulation's serialized state differs from `before`.
    pub fn assert_state_changed(sim: &dyn Simulation, before: &[u8]) {
        let after = sim.serialize_state();
        assert_ne!(
            before,
            &after[..],
            "Simulation state should have changed after operation"
        );
    }

    // ================================================================
    // Simulation Contract Tests
    // ================================================================
    // Generic checks every `Simulation` implementation must pass. Game
    // crates call them from their own #[cfg(test)] modules.

    /// update() with dt>0 and a held direction must change state.
    pub fn contract_update_advances_state(sim: &mut dyn Simulation) {
        let before = sim.serialize_state();
        let input = InputSnapshot {
            right: true,
            ..Default::default()
        };
        sim.update(FRAME_DT, &input);
        assert_state_changed(sim, &before);
    }

    /// serialize_state → apply_state roundtrip must be stable.
    pub fn contract_state_roundtrip_preserves(sim: &mut dyn Simulation) {
        let state_a = sim.serialize_state();
        sim.apply_state(&state_a);
        let state_b = sim.serialize_state();
        assert_eq!(
            state_a, state_b,
            "State must be stable after serialize→apply→serialize roundtrip"
        );
    }

    /// pause() must freeze state, resume() must unfreeze it.
    pub fn contract_pause_stops_updates(sim: &mut dyn Simulation) {
        sim.pause();
        assert!(sim.is_paused());
        let before = sim.serialize_state();
        let input = InputSnapshot {
            right: true,
            ..Default::default()
        };
        for _ in 0..10 {
            sim.update(FRAME_DT, &input);
        }
        let during_pause = sim.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");

        sim.resume();
        sim.update(FRAME_DT, &input);
        let after_resume = sim.serialize_state();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }

    /// Garbage snapshot bytes must be ignored without panicking.
    pub fn contract_garbage_state_ignored(sim: &mut dyn Simulation) {
        let before = sim.serialize_state();
        sim.apply_state(&[0xFF, 0xFE, 0x00, 0x01, 0xAB, 0xCD]);
        sim.apply_state(&[]);
        sim.apply_state(&before[..before.len() / 2]);
        assert_eq!(
            before,
            sim.serialize_state(),
            "Malformed snapshots must leave state untouched"
        );
    }
}

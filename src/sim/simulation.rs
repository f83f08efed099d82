//! Simulation context: one object owning arena, wall index, tuning and
//! game state, driven once per render callback.

use super::grid::TileGrid;
use super::snapshot::WorldSnapshot;
use super::state::{GameEvent, GameState, Player};
use super::tick::{TickInput, tick};
use super::visibility::{VisibilityPolygon, compute_visibility};
use super::walls::WallIndex;
use crate::arena::Arena;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct Simulation {
    arena: Arena,
    walls: WallIndex,
    settings: Settings,
    state: GameState,
    visibility: VisibilityPolygon,
    /// Unsimulated frame time carried into the next `step_frame`
    accumulator: f32,
    /// Triggers seen by `step_frame` that have not reached a tick yet
    queued: TickInput,
}

impl Simulation {
    pub fn new(arena: Arena, settings: Settings, seed: u64) -> Self {
        let walls = WallIndex::rebuild(&arena.grid);
        let state = GameState::new(&arena, &settings, seed);
        let mut sim = Self {
            arena,
            walls,
            settings,
            state,
            visibility: VisibilityPolygon::default(),
            accumulator: 0.0,
            queued: TickInput::default(),
        };
        sim.compute_visibility();
        sim
    }

    /// Reinitialise all state from the current arena, keeping the seed
    pub fn reset(&mut self) {
        let seed = self.state.seed;
        self.state = GameState::new(&self.arena, &self.settings, seed);
        self.accumulator = 0.0;
        self.queued = TickInput::default();
        self.compute_visibility();
        log::info!("Simulation reset");
    }

    /// Swap in a new arena; walls are rebuilt and play restarts
    pub fn load_arena(&mut self, arena: Arena) {
        self.walls = WallIndex::rebuild(&arena.grid);
        self.arena = arena;
        self.reset();
    }

    /// Advance one step. Returns that step's events; empty once inactive.
    ///
    /// A `dt` that is not a positive finite number is ignored.
    pub fn advance(&mut self, dt: f32, input: &TickInput) -> Vec<GameEvent> {
        if !(dt.is_finite() && dt > 0.0) {
            log::warn!("Ignoring step with invalid dt {dt}");
            return Vec::new();
        }
        tick(
            &mut self.state,
            &self.arena.grid,
            &self.settings,
            input,
            dt,
        )
    }

    /// Recompute the polygon visible from the player
    pub fn compute_visibility(&mut self) -> &VisibilityPolygon {
        self.visibility = compute_visibility(
            &self.walls,
            self.state.player.pos,
            self.settings.view_radius,
            self.settings.circle_probes,
        );
        &self.visibility
    }

    /// Run one render frame: fixed `SIM_DT` ticks for the elapsed time, then
    /// one visibility pass.
    ///
    /// Discrete triggers are delivered to exactly one tick, even when the
    /// frame was too short to run any.
    pub fn step_frame(&mut self, frame_dt: f32, input: &TickInput) -> Vec<GameEvent> {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt;
        }
        self.queued.merge_triggers(input);

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let mut step_input = input.without_triggers();
            step_input.merge_triggers(&self.queued);
            self.queued = TickInput::default();

            events.extend(self.advance(SIM_DT, &step_input));
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::warn!(
                "Dropping {:.3}s of simulation time after {MAX_SUBSTEPS} substeps",
                self.accumulator
            );
            self.accumulator %= SIM_DT;
        }

        self.compute_visibility();
        events
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn player(&self) -> &Player {
        &self.state.player
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for tools and tests
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Polygon from the last visibility pass
    pub fn visibility(&self) -> &VisibilityPolygon {
        &self.visibility
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(&self.state)
    }

    pub fn grid(&self) -> &TileGrid {
        &self.arena.grid
    }

    pub fn walls(&self) -> &WallIndex {
        &self.walls
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

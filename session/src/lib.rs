#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session facade that wires the world and the pure systems into a single
//! tick-driven defence run.
//!
//! Hosts drive a session through three surfaces: the tick loop, the
//! placement cursor, and the selection. Each call to [`Session::tick`]
//! advances the world once, runs the scheduler over the events it has not
//! yet seen, recomputes targets from fresh snapshots, folds queued player
//! input into commands, and applies everything back to the world. The full
//! event trace of the tick is returned so hosts can render or log it; the
//! same inputs always yield the same trace.

use std::time::Duration;

use grid_defence_core::{
    Cell, Command, EnemyId, EnemyKind, Event, PlacementPreview, StunAssignment, TargetAssignment,
    TowerId, TowerKind,
};
use grid_defence_system_combat::Combat;
use grid_defence_system_placement::{Placement, PlacementInput};
use grid_defence_system_targeting::{JammerTargeting, TowerTargeting};
use grid_defence_system_waves::WaveScheduler;
use grid_defence_world::{apply, query, BoardLayout, World, WorldConfig};

pub use grid_defence_system_waves::{AdvancePolicy, Config as WaveConfig, SchedulerState};

/// Terminal status of a defence run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The run is still in progress.
    Ongoing,
    /// Every wave was cleared with the base intact.
    Victory,
    /// The base was destroyed.
    Defeat,
}

/// A single tick-driven defence run.
#[derive(Debug)]
pub struct Session {
    world: World,
    scheduler: WaveScheduler,
    placement: Placement,
    targeting: TowerTargeting,
    jammers: JammerTargeting,
    combat: Combat,
    targets: Vec<TargetAssignment>,
    stuns: Vec<StunAssignment>,
    inbox: Vec<Event>,
    start_requested: bool,
    cursor: Option<TowerKind>,
    selection: Option<TowerId>,
    pending_confirm: Option<Cell>,
    pending_sell: Option<TowerId>,
    outcome: Outcome,
}

impl Session {
    /// Creates a new session over the given board, resources, and waves.
    #[must_use]
    pub fn new(layout: BoardLayout, world_config: WorldConfig, wave_config: WaveConfig) -> Self {
        Self {
            world: World::new(layout, world_config),
            scheduler: WaveScheduler::new(wave_config),
            placement: Placement::new(),
            targeting: TowerTargeting::new(),
            jammers: JammerTargeting::new(),
            combat: Combat::new(),
            targets: Vec::new(),
            stuns: Vec::new(),
            inbox: Vec::new(),
            start_requested: false,
            cursor: None,
            selection: None,
            pending_confirm: None,
            pending_sell: None,
            outcome: Outcome::Ongoing,
        }
    }

    /// Advances the run by `dt` and returns every event the tick produced.
    ///
    /// Once the run has ended the session stops simulating; further ticks
    /// return an empty trace.
    pub fn tick(&mut self, dt: Duration) -> Vec<Event> {
        let mut frame = Vec::new();
        if self.outcome != Outcome::Ongoing {
            return frame;
        }

        apply(&mut self.world, Command::Tick { dt }, &mut frame);
        self.inbox.extend(frame.iter().cloned());

        let mut commands = Vec::new();
        self.scheduler.handle(
            &self.inbox,
            std::mem::take(&mut self.start_requested),
            &mut commands,
            &mut frame,
        );
        self.inbox.clear();

        let towers = query::tower_view(&self.world);
        let enemies = query::enemy_view(&self.world);
        self.targeting.handle(&towers, &enemies, &mut self.targets);
        self.jammers.handle(&enemies, &towers, &mut self.stuns);
        self.combat
            .handle(&self.targets, &self.stuns, &towers, &mut commands);

        let preview = match (self.pending_confirm.take(), self.cursor) {
            (Some(cell), Some(kind)) => Some(query::placement_preview(&self.world, kind, cell)),
            _ => None,
        };
        let input = PlacementInput::new(preview.is_some(), self.pending_sell.take());
        self.placement.handle(preview.as_ref(), input, &mut commands);

        let mark = frame.len();
        for command in commands {
            apply(&mut self.world, command, &mut frame);
        }
        self.inbox.extend(frame[mark..].iter().cloned());

        for event in &frame {
            match event {
                Event::BaseDestroyed => self.outcome = Outcome::Defeat,
                Event::AllWavesCompleted if self.outcome == Outcome::Ongoing => {
                    self.outcome = Outcome::Victory;
                }
                Event::TowerSold { tower, .. } | Event::ShieldDestroyed { tower } => {
                    if self.selection == Some(*tower) {
                        self.selection = None;
                    }
                }
                _ => {}
            }
        }

        frame
    }

    /// Requests the next wave; consumed by the scheduler on the next tick.
    pub fn start_wave(&mut self) {
        self.start_requested = true;
    }

    /// Arms the placement cursor with a tower kind.
    pub fn begin_placement(&mut self, kind: TowerKind) {
        self.cursor = Some(kind);
        self.pending_confirm = None;
    }

    /// Disarms the placement cursor, discarding any queued confirm.
    pub fn cancel_placement(&mut self) {
        self.cursor = None;
        self.pending_confirm = None;
    }

    /// Evaluates the armed cursor against a cell without committing.
    #[must_use]
    pub fn preview(&self, cell: Cell) -> Option<PlacementPreview> {
        self.cursor
            .map(|kind| query::placement_preview(&self.world, kind, cell))
    }

    /// Queues a placement confirm at the given cell for the next tick.
    ///
    /// Returns `false` when no cursor is armed. The preview is re-evaluated
    /// at apply time, so a cell that becomes illegal before the tick lands
    /// degrades to a rejection rather than an invalid build.
    pub fn confirm_placement(&mut self, cell: Cell) -> bool {
        if self.cursor.is_some() {
            self.pending_confirm = Some(cell);
            return true;
        }
        false
    }

    /// Selects the tower occupying the given cell, if any.
    pub fn select_tower(&mut self, cell: Cell) -> Option<TowerId> {
        self.selection = query::tower_at(&self.world, cell);
        self.selection
    }

    /// Clears the current selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Currently selected tower.
    #[must_use]
    pub const fn selection(&self) -> Option<TowerId> {
        self.selection
    }

    /// Attack radius of the selected tower, for range indicators.
    ///
    /// `None` when nothing is selected or the selected kind does not
    /// attack.
    #[must_use]
    pub fn selected_range(&self) -> Option<f32> {
        let tower = self.selection?;
        let towers = query::tower_view(&self.world);
        let snapshot = towers.get(tower)?;
        snapshot.kind.is_attacker().then(|| snapshot.kind.range())
    }

    /// Queues a sale of the selected tower for the next tick.
    ///
    /// Returns `false` when nothing is selected.
    pub fn sell_selected(&mut self) -> bool {
        match self.selection.take() {
            Some(tower) => {
                self.pending_sell = Some(tower);
                true
            }
            None => false,
        }
    }

    /// Grants currency immediately, outside the tick loop.
    pub fn grant_currency(&mut self, amount: f32) {
        apply(
            &mut self.world,
            Command::GrantCurrency { amount },
            &mut self.inbox,
        );
    }

    /// Repairs the base immediately, outside the tick loop.
    pub fn grant_base_health(&mut self, amount: f32) {
        apply(
            &mut self.world,
            Command::RepairBase { amount },
            &mut self.inbox,
        );
    }

    /// Spawns an enemy immediately, bypassing the scheduler.
    ///
    /// Returns the spawned identifier, or `None` when the board has no
    /// track to spawn onto.
    pub fn force_spawn(&mut self, kind: EnemyKind) -> Option<EnemyId> {
        let mark = self.inbox.len();
        apply(&mut self.world, Command::SpawnEnemy { kind }, &mut self.inbox);
        self.inbox[mark..].iter().find_map(|event| match event {
            Event::EnemySpawned { enemy, .. } => Some(*enemy),
            _ => None,
        })
    }

    /// Terminal status of the run.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Lifecycle phase of the wave scheduler.
    #[must_use]
    pub const fn wave_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Currency currently available.
    #[must_use]
    pub fn currency(&self) -> f32 {
        query::currency(&self.world)
    }

    /// Base health remaining.
    #[must_use]
    pub fn base_health(&self) -> f32 {
        query::base_health(&self.world)
    }

    /// Read-only world access for rendering and inspection.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }
}

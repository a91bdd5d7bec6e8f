#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave scheduler that paces enemy spawns and tracks wave
//! completion.
//!
//! The scheduler never touches entity state. It emits `SpawnEnemy` commands
//! on a fixed cadence and watches the event stream to learn which enemies
//! belong to the running wave: every `EnemySpawned` acknowledging one of its
//! own commands is recorded as live, every `EnemyDied` retires one. A wave
//! is complete only when the spawn cursor is exhausted, no commanded spawn
//! is still unacknowledged, and no recorded enemy remains alive. Enemies
//! that reach the base keep attacking and still count as alive, so a wave
//! cannot complete while any of its enemies survives.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use grid_defence_core::{Command, EnemyId, Event, Wave, WaveIndex};

/// Policy deciding how the scheduler moves from one wave to the next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvancePolicy {
    /// Wait for an explicit start request before each wave.
    Manual,
    /// Start the next wave automatically after the given intermission.
    Automatic {
        /// Intermission between a wave completing and the next starting.
        delay: Duration,
    },
}

/// Configuration parameters required to construct the wave scheduler.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Ordered wave definitions to run.
    pub waves: Vec<Wave>,
    /// Delay between consecutive spawns within a wave.
    pub spawn_interval: Duration,
    /// Policy for advancing past a completed wave.
    pub advance: AdvancePolicy,
}

impl Config {
    /// Creates a configuration with the standard one-second spawn cadence.
    #[must_use]
    pub fn new(waves: Vec<Wave>, advance: AdvancePolicy) -> Self {
        Self {
            waves,
            spawn_interval: Duration::from_secs(1),
            advance,
        }
    }
}

/// Lifecycle phase the scheduler currently occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// No wave has started yet.
    PreGame,
    /// The given wave is spawning or its enemies are still alive.
    WaveInProgress(WaveIndex),
    /// The given wave finished; the next has not started.
    WaveComplete(WaveIndex),
    /// Every configured wave has finished.
    AllWavesComplete,
}

/// Pure system that paces spawns and detects wave completion from events.
#[derive(Debug)]
pub struct WaveScheduler {
    config: Config,
    state: SchedulerState,
    cursor: usize,
    spawn_accumulator: Duration,
    intermission: Duration,
    outstanding: u32,
    live: BTreeSet<EnemyId>,
    stalled: Duration,
    warned_empty: bool,
    warned_stalled: bool,
}

impl WaveScheduler {
    /// Creates a new scheduler from the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: SchedulerState::PreGame,
            cursor: 0,
            spawn_accumulator: Duration::ZERO,
            intermission: Duration::ZERO,
            outstanding: 0,
            live: BTreeSet::new(),
            stalled: Duration::ZERO,
            warned_empty: false,
            warned_stalled: false,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn state(&self) -> SchedulerState {
        self.state
    }

    /// Consumes events and the frame's start request to emit spawn commands
    /// and wave lifecycle events.
    pub fn handle(
        &mut self,
        events: &[Event],
        start_requested: bool,
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        let mut elapsed = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    elapsed = elapsed.saturating_add(*dt);
                }
                Event::EnemySpawned { enemy, .. } => {
                    if self.outstanding > 0 {
                        self.outstanding -= 1;
                        self.stalled = Duration::ZERO;
                        let _ = self.live.insert(*enemy);
                    }
                }
                Event::EnemyDied { enemy, .. } => {
                    let _ = self.live.remove(enemy);
                }
                _ => {}
            }
        }

        match self.state {
            // The opening wave always waits for an explicit start; the
            // advance policy only governs the gaps between waves.
            SchedulerState::PreGame => {
                if start_requested {
                    self.start_wave(0, out_events);
                }
            }
            SchedulerState::WaveInProgress(wave) => {
                self.run_wave(wave, elapsed, out_commands, out_events);
            }
            SchedulerState::WaveComplete(wave) => {
                let next = wave.get() as usize + 1;
                if start_requested {
                    self.start_wave(next, out_events);
                } else if let AdvancePolicy::Automatic { delay } = self.config.advance {
                    self.intermission = self.intermission.saturating_add(elapsed);
                    if self.intermission >= delay {
                        self.start_wave(next, out_events);
                    }
                }
            }
            SchedulerState::AllWavesComplete => {}
        }
    }

    fn start_wave(&mut self, index: usize, out_events: &mut Vec<Event>) {
        if index >= self.config.waves.len() {
            if !self.warned_empty {
                self.warned_empty = true;
                log::warn!("wave start requested but no wave is configured at index {index}");
            }
            return;
        }

        let wave = WaveIndex::new(index as u32);
        self.state = SchedulerState::WaveInProgress(wave);
        self.cursor = 0;
        // Prime the accumulator so the first spawn lands on the wave's
        // first tick rather than one interval in.
        self.spawn_accumulator = self.config.spawn_interval;
        self.intermission = Duration::ZERO;
        self.stalled = Duration::ZERO;
        out_events.push(Event::WaveStarted { wave });
    }

    fn run_wave(
        &mut self,
        wave: WaveIndex,
        elapsed: Duration,
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        let entries = self.config.waves[wave.get() as usize].entries();

        let mut emitted = false;
        if self.cursor < entries.len() && !elapsed.is_zero() {
            self.spawn_accumulator = self.spawn_accumulator.saturating_add(elapsed);
            while self.cursor < entries.len()
                && self.spawn_accumulator >= self.config.spawn_interval
            {
                self.spawn_accumulator -= self.config.spawn_interval;
                let kind = entries[self.cursor];
                self.cursor += 1;
                self.outstanding += 1;
                emitted = true;
                out_commands.push(Command::SpawnEnemy { kind });
            }
        }

        // A commanded spawn is acknowledged on the very next tick, so one
        // that stays unacknowledged for a full interval means the world is
        // dropping spawns and the wave will never complete.
        if self.outstanding == 0 || emitted {
            self.stalled = Duration::ZERO;
        } else {
            self.stalled = self.stalled.saturating_add(elapsed);
            if !self.warned_stalled && self.stalled > self.config.spawn_interval {
                self.warned_stalled = true;
                log::warn!(
                    "wave {} stalled with {} commanded spawns unacknowledged",
                    wave.get(),
                    self.outstanding
                );
            }
        }

        if self.cursor == entries.len() && self.outstanding == 0 && self.live.is_empty() {
            out_events.push(Event::WaveCompleted { wave });
            if wave.get() as usize + 1 == self.config.waves.len() {
                self.state = SchedulerState::AllWavesComplete;
                out_events.push(Event::AllWavesCompleted);
            } else {
                self.state = SchedulerState::WaveComplete(wave);
                self.intermission = Duration::ZERO;
            }
        }
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Grid Defence session.
//!
//! Drives the simulation at a fixed timestep, tallies the event trace, and
//! prints a run summary. A board layout can be supplied as JSON; without
//! one a built-in demo board and wave table are used.

use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use grid_defence_core::{Cell, EnemyKind, Event, TowerKind, Wave};
use grid_defence_session::{AdvancePolicy, Outcome, Session, WaveConfig};
use grid_defence_world::{BoardLayout, WorldConfig};

/// Headless Grid Defence simulation runner.
#[derive(Debug, Parser)]
#[command(name = "grid-defence", about = "Runs a headless Grid Defence session")]
struct Args {
    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = 3_000)]
    ticks: u64,

    /// Fixed timestep in milliseconds.
    #[arg(long, default_value_t = 100)]
    dt_ms: u64,

    /// Board layout as JSON; the built-in demo board is used when omitted.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Intermission in seconds between waves.
    #[arg(long, default_value_t = 5)]
    intermission_secs: u64,
}

#[derive(Debug, Default)]
struct RunStats {
    spawned: u64,
    killed: u64,
    leaked: u64,
    waves_completed: u64,
    towers_stunned: u64,
}

impl RunStats {
    fn record(&mut self, event: &Event) {
        match event {
            Event::EnemySpawned { .. } => self.spawned += 1,
            Event::EnemyDied { .. } => self.killed += 1,
            Event::EnemyReachedBase { .. } => self.leaked += 1,
            Event::WaveCompleted { .. } => self.waves_completed += 1,
            Event::TowerStunned { .. } => self.towers_stunned += 1,
            _ => {}
        }
    }
}

fn demo_layout() -> BoardLayout {
    let path: Vec<Cell> = (0..12).map(|column| Cell::new(column, 0)).collect();
    let buildable: Vec<Cell> = (0..12)
        .flat_map(|column| [Cell::new(column, 1), Cell::new(column, 2)])
        .collect();
    BoardLayout {
        buildable,
        path: path.clone(),
        facing_right: vec![Cell::new(9, 1), Cell::new(10, 1)],
        spawn: Cell::new(0, 0).center(),
        waypoints: path.iter().map(Cell::center).collect(),
    }
}

fn demo_waves() -> Vec<Wave> {
    vec![
        Wave::new(vec![EnemyKind::Scout, EnemyKind::Scout]),
        Wave::new(vec![EnemyKind::Scout, EnemyKind::Sprinter, EnemyKind::Scout]),
        Wave::new(vec![EnemyKind::Bruiser, EnemyKind::Jammer, EnemyKind::Flyer]),
    ]
}

fn build_defences(session: &mut Session, dt: Duration) {
    for (kind, cell) in [
        (TowerKind::Launcher, Cell::new(3, 1)),
        (TowerKind::Launcher, Cell::new(8, 1)),
    ] {
        session.begin_placement(kind);
        let _ = session.confirm_placement(cell);
        let _ = session.tick(dt);
        session.cancel_placement();
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let layout = match &args.layout {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open layout {}", path.display()))?;
            serde_json::from_reader(file)
                .with_context(|| format!("failed to parse layout {}", path.display()))?
        }
        None => demo_layout(),
    };

    let wave_config = WaveConfig::new(
        demo_waves(),
        AdvancePolicy::Automatic {
            delay: Duration::from_secs(args.intermission_secs),
        },
    );
    let mut session = Session::new(layout, WorldConfig::default(), wave_config);
    let dt = Duration::from_millis(args.dt_ms);

    build_defences(&mut session, dt);
    session.start_wave();

    let mut stats = RunStats::default();
    let mut elapsed_ticks = 0;
    for _ in 0..args.ticks {
        let frame = session.tick(dt);
        elapsed_ticks += 1;
        for event in &frame {
            stats.record(event);
            log::debug!("{event:?}");
        }
        if session.outcome() != Outcome::Ongoing {
            break;
        }
    }

    let outcome = match session.outcome() {
        Outcome::Victory => "victory",
        Outcome::Defeat => "defeat",
        Outcome::Ongoing => "ongoing (tick limit reached)",
    };
    println!("outcome:          {outcome}");
    println!("ticks simulated:  {elapsed_ticks}");
    println!("waves completed:  {}", stats.waves_completed);
    println!(
        "enemies:          {} spawned, {} killed, {} reached the base",
        stats.spawned, stats.killed, stats.leaked
    );
    println!("towers stunned:   {}", stats.towers_stunned);
    println!("currency left:    {:.0}", session.currency());
    println!("base health left: {:.0}", session.base_health());

    Ok(())
}

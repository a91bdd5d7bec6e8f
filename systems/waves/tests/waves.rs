use std::time::Duration;

use grid_defence_core::{Cell, Command, EnemyKind, Event, TowerKind, Wave, WaveIndex};
use grid_defence_system_waves::{AdvancePolicy, Config, SchedulerState, WaveScheduler};
use grid_defence_world::{apply, query, BoardLayout, World, WorldConfig};

fn layout() -> BoardLayout {
    let path: Vec<Cell> = (0..6).map(|column| Cell::new(column, 0)).collect();
    BoardLayout {
        buildable: (0..6).map(|column| Cell::new(column, 1)).collect(),
        path: path.clone(),
        facing_right: Vec::new(),
        spawn: Cell::new(0, 0).center(),
        waypoints: path.iter().map(Cell::center).collect(),
    }
}

/// Drives a scheduler against a live world and kills every spawn with a
/// scratcher, checking that completion is detected from events alone.
#[test]
fn scheduler_tracks_a_wave_through_a_live_world() {
    let mut world = World::new(layout(), WorldConfig::default());
    let mut scheduler = WaveScheduler::new(Config::new(
        vec![Wave::new(vec![EnemyKind::Scout, EnemyKind::Scout])],
        AdvancePolicy::Manual,
    ));

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Scratcher,
            origin: Cell::new(0, 1),
        },
        &mut events,
    );
    let scratcher = match events[0] {
        Event::TowerPlaced { tower, .. } => tower,
        ref other => panic!("unexpected event: {other:?}"),
    };

    let mut inbox = Vec::new();
    let mut commands = Vec::new();
    let mut completed = false;
    let mut start_requested = true;

    for _ in 0..600 {
        let mut tick_events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(100),
            },
            &mut tick_events,
        );
        inbox.extend(tick_events);

        commands.clear();
        let mut scheduler_events = Vec::new();
        scheduler.handle(&inbox, start_requested, &mut commands, &mut scheduler_events);
        start_requested = false;
        inbox.clear();

        if scheduler_events
            .iter()
            .any(|event| matches!(event, Event::AllWavesCompleted))
        {
            completed = true;
            break;
        }

        for command in commands.drain(..) {
            apply(&mut world, command, &mut inbox);
        }

        // Strike every enemy in sight each tick; the scheduler must not
        // complete until the last one dies.
        let targets: Vec<_> = query::enemy_view(&world)
            .iter()
            .map(|enemy| enemy.id)
            .collect();
        for target in targets {
            apply(
                &mut world,
                Command::StrikeEnemy {
                    tower: scratcher,
                    target,
                },
                &mut inbox,
            );
        }
    }

    assert!(completed, "the wave never completed");
    assert_eq!(scheduler.state(), SchedulerState::AllWavesComplete);
    assert!(query::enemy_view(&world).is_empty());
}

/// The scheduler only ever announces each wave boundary once.
#[test]
fn wave_lifecycle_events_are_emitted_once() {
    let mut scheduler = WaveScheduler::new(Config::new(
        vec![Wave::new(vec![EnemyKind::Sprinter])],
        AdvancePolicy::Manual,
    ));

    let mut commands = Vec::new();
    let mut events = Vec::new();
    scheduler.handle(&[], true, &mut commands, &mut events);
    scheduler.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_secs(1),
        }],
        false,
        &mut commands,
        &mut events,
    );
    scheduler.handle(
        &[
            Event::EnemySpawned {
                enemy: grid_defence_core::EnemyId::new(0),
                kind: EnemyKind::Sprinter,
                position: Cell::new(0, 0).center(),
            },
            Event::EnemyDied {
                enemy: grid_defence_core::EnemyId::new(0),
                bounty: 12.0,
            },
        ],
        false,
        &mut commands,
        &mut events,
    );
    // Further idle frames add nothing.
    scheduler.handle(&[], false, &mut commands, &mut events);
    scheduler.handle(&[], true, &mut commands, &mut events);

    let starts = events
        .iter()
        .filter(|event| matches!(event, Event::WaveStarted { .. }))
        .count();
    let completions = events
        .iter()
        .filter(|event| matches!(event, Event::WaveCompleted { .. }))
        .count();
    assert_eq!(starts, 1);
    assert_eq!(completions, 1);
    assert!(events.contains(&Event::WaveCompleted {
        wave: WaveIndex::new(0),
    }));
}

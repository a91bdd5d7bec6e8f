#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure systems that compute deterministic target assignments from world
//! snapshots.
//!
//! Targets are recomputed from scratch every tick. A tower that damaged one
//! enemy last tick will happily switch to a closer one this tick; the world
//! holds no targeting state at all.

use grid_defence_core::{
    find_nearest, EnemyId, EnemyView, Position, StunAssignment, TargetAssignment, TowerId,
    TowerKind, TowerView,
};

#[derive(Clone, Copy, Debug)]
struct EnemyCandidate {
    id: EnemyId,
    position: Position,
    flies: bool,
}

/// Tower targeting system that reuses scratch buffers to avoid repeated
/// allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes target assignments for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments. Stunned towers and kinds without an attack are skipped;
    /// towers that only strike grounded enemies never receive a flyer.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TargetAssignment>) {
        out.clear();

        if enemies.is_empty() {
            return;
        }

        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());
        for snapshot in enemies.iter() {
            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
                flies: snapshot.kind.flies(),
            });
        }

        for tower in towers.iter() {
            if !tower.kind.is_attacker() || tower.stunned {
                continue;
            }

            let reaches_flyers = tower.kind.targets_flyers();
            let nearest = find_nearest(
                tower.position,
                tower.kind.range(),
                &self.enemy_workspace,
                |candidate| candidate.position,
                |candidate| reaches_flyers || !candidate.flies,
            );

            if let Some(candidate) = nearest {
                out.push(TargetAssignment {
                    tower: tower.id,
                    kind: tower.kind,
                    enemy: candidate.id,
                });
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct TowerCandidate {
    id: TowerId,
    position: Position,
    shield: bool,
}

/// Jammer targeting system pairing open stun windows with nearby towers.
#[derive(Debug, Default)]
pub struct JammerTargeting {
    tower_workspace: Vec<TowerCandidate>,
}

impl JammerTargeting {
    /// Creates a new jammer targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes stun assignments for every enemy whose stun window opened
    /// this tick.
    ///
    /// The window is consumed whether or not a tower is in range; a jammer
    /// that pulses over empty ground wastes the pulse. Shields are not
    /// valid stun targets.
    pub fn handle(&mut self, enemies: &EnemyView, towers: &TowerView, out: &mut Vec<StunAssignment>) {
        out.clear();

        self.tower_workspace.clear();
        for snapshot in towers.iter() {
            self.tower_workspace.push(TowerCandidate {
                id: snapshot.id,
                position: snapshot.position,
                shield: snapshot.kind == TowerKind::Shield,
            });
        }
        if self.tower_workspace.is_empty() {
            return;
        }

        for enemy in enemies.iter() {
            if !enemy.stun_window_open {
                continue;
            }

            let nearest = find_nearest(
                enemy.position,
                enemy.kind.stun_range(),
                &self.tower_workspace,
                |candidate| candidate.position,
                |candidate| !candidate.shield,
            );

            if let Some(candidate) = nearest {
                out.push(StunAssignment {
                    enemy: enemy.id,
                    tower: candidate.id,
                });
            }
        }
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure combat system turning target assignments into attack commands.
//!
//! Cooldowns live in the world; this system only reads each tower's `ready`
//! flag from the snapshot and emits the attack command matching the tower's
//! kind. The world resets the cooldown when it executes the command, so a
//! tower whose target dies mid-flight simply holds its charge until the next
//! assignment.

use grid_defence_core::{Command, StunAssignment, TargetAssignment, TowerKind, TowerView};

/// Combat system that converts assignments into world commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct Combat;

impl Combat {
    /// Creates a new combat system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits attack and stun commands for the provided assignments.
    ///
    /// Launchers fire a homing projectile; scratchers strike instantly.
    /// Stun assignments always launch, since jammers carry no cooldown of
    /// their own beyond the pulse window that produced the assignment.
    pub fn handle(
        &self,
        targets: &[TargetAssignment],
        stuns: &[StunAssignment],
        towers: &TowerView,
        out: &mut Vec<Command>,
    ) {
        for assignment in targets {
            let Some(tower) = towers.get(assignment.tower) else {
                continue;
            };
            if !tower.ready {
                continue;
            }

            match assignment.kind {
                TowerKind::Launcher => out.push(Command::FireProjectile {
                    tower: assignment.tower,
                    target: assignment.enemy,
                }),
                TowerKind::Scratcher => out.push(Command::StrikeEnemy {
                    tower: assignment.tower,
                    target: assignment.enemy,
                }),
                TowerKind::Generator | TowerKind::Shield => {}
            }
        }

        for assignment in stuns {
            out.push(Command::LaunchStun {
                enemy: assignment.enemy,
                target: assignment.tower,
            });
        }
    }
}

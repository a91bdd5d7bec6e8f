#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Grid Defence.
//!
//! The world owns every live entity, the cell occupancy map, the terrain
//! classification, and the resource ledger. All mutation flows through
//! [`apply`]; read access flows through the [`query`] module. A single
//! `Command::Tick` advances every continuous process (enemy movement,
//! projectile flight, attack and stun timers) in one deterministic pass.

mod economy;
mod occupancy;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use grid_defence_core::{
    Cell, Command, EnemyId, EnemyKind, EnemyPhase, Event, Facing, PlacementError, Position,
    ProjectileId, SellError, Terrain, TowerId, TowerKind, ARRIVAL_EPSILON, CONTACT_DAMAGE,
    CONTACT_INTERVAL, SHIELD_ENGAGE_RANGE,
};

pub use economy::ShopCatalog;
use economy::EconomyLedger;
use occupancy::GridOccupancy;

/// Static board description consumed at world construction.
///
/// Cells listed under both `buildable` and `path` classify as path; the
/// facing overlay marks buildable ground that flips directional towers to
/// face right.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoardLayout {
    /// Cells that accept ground tower placement.
    pub buildable: Vec<Cell>,
    /// Cells forming the enemy route.
    pub path: Vec<Cell>,
    /// Overlay cells that flip directional towers to face right.
    pub facing_right: Vec<Cell>,
    /// Position enemies enter the board at.
    pub spawn: Position,
    /// Ordered waypoints enemies walk through before reaching the base.
    pub waypoints: Vec<Position>,
}

/// Starting resource pools for a session.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Currency available before any income or bounty.
    pub starting_currency: f32,
    /// Base health available before any enemy strikes.
    pub starting_base_health: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            starting_currency: 100.0,
            starting_base_health: 100.0,
        }
    }
}

#[derive(Debug, Default)]
struct TerrainMap {
    cells: HashMap<Cell, Terrain>,
    facing_right: HashSet<Cell>,
}

impl TerrainMap {
    fn from_layout(layout: &BoardLayout) -> Self {
        let mut cells = HashMap::new();
        for &cell in &layout.buildable {
            let _ = cells.insert(cell, Terrain::Buildable);
        }
        for &cell in &layout.path {
            let _ = cells.insert(cell, Terrain::Path);
        }
        Self {
            cells,
            facing_right: layout.facing_right.iter().copied().collect(),
        }
    }

    fn classify(&self, cell: Cell) -> Terrain {
        self.cells.get(&cell).copied().unwrap_or(Terrain::Unset)
    }

    fn is_facing_right(&self, cell: Cell) -> bool {
        self.facing_right.contains(&cell)
    }
}

#[derive(Debug)]
struct Track {
    spawn: Position,
    waypoints: Vec<Position>,
}

#[derive(Debug)]
struct TowerState {
    id: TowerId,
    kind: TowerKind,
    origin: Cell,
    facing: Facing,
    position: Position,
    attack_timer: f32,
    income_timer: f32,
    stunned: bool,
    stun_remaining: f32,
    health: Option<f32>,
}

#[derive(Debug)]
struct EnemyState {
    id: EnemyId,
    kind: EnemyKind,
    position: Position,
    health: f32,
    waypoint_index: usize,
    phase: EnemyPhase,
    shield_target: Option<TowerId>,
    contact_timer: f32,
    jam_timer: f32,
    stun_window_open: bool,
}

#[derive(Debug)]
struct ProjectileState {
    id: ProjectileId,
    position: Position,
    payload: Payload,
}

#[derive(Debug)]
enum Payload {
    Damage {
        target: EnemyId,
        damage: f32,
        speed: f32,
    },
    Stun {
        target: TowerId,
        duration: f32,
        speed: f32,
    },
}

/// Represents the authoritative Grid Defence world state.
#[derive(Debug)]
pub struct World {
    terrain: TerrainMap,
    track: Track,
    occupancy: GridOccupancy,
    economy: EconomyLedger,
    catalog: ShopCatalog,
    towers: Vec<TowerState>,
    enemies: Vec<EnemyState>,
    projectiles: Vec<ProjectileState>,
    next_tower_id: u32,
    next_enemy_id: u32,
    next_projectile_id: u32,
}

impl World {
    /// Creates a new world from a board layout and starting resources.
    #[must_use]
    pub fn new(layout: BoardLayout, config: WorldConfig) -> Self {
        if layout.waypoints.is_empty() {
            log::warn!("board layout has no waypoints; enemy spawns are disabled");
        }
        Self {
            terrain: TerrainMap::from_layout(&layout),
            track: Track {
                spawn: layout.spawn,
                waypoints: layout.waypoints,
            },
            occupancy: GridOccupancy::new(),
            economy: EconomyLedger::new(config.starting_currency, config.starting_base_health),
            catalog: ShopCatalog::standard(),
            towers: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            next_tower_id: 0,
            next_enemy_id: 0,
            next_projectile_id: 0,
        }
    }

    fn validate_placement(&self, kind: TowerKind, origin: Cell) -> Result<Facing, PlacementError> {
        let footprint = kind.footprint(origin);
        for cell in footprint.cells() {
            let terrain = self.terrain.classify(cell);
            if kind.is_path_bound() {
                if terrain != Terrain::Path {
                    return Err(PlacementError::UnsuitableTerrain);
                }
            } else {
                if terrain == Terrain::Path {
                    return Err(PlacementError::OnPath);
                }
                let on_overlay = kind.uses_facing_overlay() && self.terrain.is_facing_right(cell);
                if terrain != Terrain::Buildable && !on_overlay {
                    return Err(PlacementError::UnsuitableTerrain);
                }
            }
            if self.occupancy.is_occupied(cell) {
                return Err(PlacementError::Occupied);
            }
        }
        if !self.economy.has_funds(kind.cost()) {
            return Err(PlacementError::InsufficientFunds);
        }
        let facing = if kind.uses_facing_overlay() && self.terrain.is_facing_right(origin) {
            Facing::Right
        } else {
            Facing::Left
        };
        Ok(facing)
    }

    fn place_tower(&mut self, kind: TowerKind, origin: Cell, out_events: &mut Vec<Event>) {
        let facing = match self.validate_placement(kind, origin) {
            Ok(facing) => facing,
            Err(reason) => {
                out_events.push(Event::TowerPlacementRejected {
                    kind,
                    origin,
                    reason,
                });
                return;
            }
        };

        if !self.economy.try_spend(kind.cost()) {
            out_events.push(Event::TowerPlacementRejected {
                kind,
                origin,
                reason: PlacementError::InsufficientFunds,
            });
            return;
        }

        let id = TowerId::new(self.next_tower_id);
        self.next_tower_id += 1;

        let footprint = kind.footprint(origin);
        let cells: Vec<Cell> = footprint.cells().collect();
        if !self.occupancy.try_occupy(cells.iter().copied(), id) {
            self.economy.add_currency(kind.cost());
            out_events.push(Event::TowerPlacementRejected {
                kind,
                origin,
                reason: PlacementError::Occupied,
            });
            return;
        }

        self.towers.push(TowerState {
            id,
            kind,
            origin,
            facing,
            position: footprint.center(),
            attack_timer: 0.0,
            income_timer: 0.0,
            stunned: false,
            stun_remaining: 0.0,
            health: kind.max_health(),
        });
        out_events.push(Event::TowerPlaced {
            tower: id,
            kind,
            origin,
            facing,
        });
    }

    fn sell_tower(&mut self, tower: TowerId, out_events: &mut Vec<Event>) {
        let Some(index) = self.towers.iter().position(|state| state.id == tower) else {
            log::warn!("sale requested for unknown tower {tower:?}");
            out_events.push(Event::TowerSellRejected {
                tower,
                reason: SellError::UnknownTower,
            });
            return;
        };

        let state = self.towers.remove(index);
        let _ = self.occupancy.release(state.origin);
        let refund = self.catalog.refund_for_kind(state.kind);
        self.economy.add_currency(refund);
        out_events.push(Event::TowerSold {
            tower: state.id,
            refund,
        });
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, out_events: &mut Vec<Event>) {
        if self.track.waypoints.is_empty() {
            return;
        }

        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id += 1;
        self.enemies.push(EnemyState {
            id,
            kind,
            position: self.track.spawn,
            health: kind.max_health(),
            waypoint_index: 0,
            phase: EnemyPhase::Moving,
            shield_target: None,
            contact_timer: 0.0,
            jam_timer: 0.0,
            stun_window_open: false,
        });
        out_events.push(Event::EnemySpawned {
            enemy: id,
            kind,
            position: self.track.spawn,
        });
    }

    fn fire_projectile(&mut self, tower: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        let Some(state) = self
            .towers
            .iter_mut()
            .find(|state| state.id == tower && !state.stunned)
        else {
            return;
        };
        if !self.enemies.iter().any(|enemy| enemy.id == target) {
            return;
        }

        state.attack_timer = 0.0;
        let origin = state.position;
        let payload = Payload::Damage {
            target,
            damage: state.kind.damage(),
            speed: state.kind.projectile_speed(),
        };
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id += 1;
        self.projectiles.push(ProjectileState {
            id,
            position: origin,
            payload,
        });
        out_events.push(Event::ProjectileLaunched {
            projectile: id,
            origin,
        });
    }

    fn strike_enemy(&mut self, tower: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        let Some(state) = self
            .towers
            .iter_mut()
            .find(|state| state.id == tower && !state.stunned)
        else {
            return;
        };
        if !self.enemies.iter().any(|enemy| enemy.id == target) {
            return;
        }

        state.attack_timer = 0.0;
        let damage = state.kind.damage();
        self.damage_enemy(target, damage, out_events);
    }

    fn launch_stun(&mut self, enemy: EnemyId, target: TowerId, out_events: &mut Vec<Event>) {
        let Some(state) = self.enemies.iter().find(|state| state.id == enemy) else {
            return;
        };
        if !self.towers.iter().any(|tower| tower.id == target) {
            return;
        }

        let origin = state.position;
        let payload = Payload::Stun {
            target,
            duration: state.kind.stun_duration(),
            speed: state.kind.stun_projectile_speed(),
        };
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id += 1;
        self.projectiles.push(ProjectileState {
            id,
            position: origin,
            payload,
        });
        out_events.push(Event::ProjectileLaunched {
            projectile: id,
            origin,
        });
    }

    fn advance_towers(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        for tower in &mut self.towers {
            if tower.stunned {
                tower.stun_remaining -= dt;
                if tower.stun_remaining <= 0.0 {
                    tower.stunned = false;
                    tower.stun_remaining = 0.0;
                    out_events.push(Event::TowerStunEnded { tower: tower.id });
                }
                continue;
            }

            if tower.kind.is_attacker() {
                tower.attack_timer += dt;
            }

            let rate = tower.kind.income_rate();
            if rate > 0.0 {
                tower.income_timer += dt;
                if tower.income_timer >= 1.0 {
                    tower.income_timer = 0.0;
                    self.economy.add_currency(rate);
                    out_events.push(Event::CurrencyGenerated {
                        tower: tower.id,
                        amount: rate,
                    });
                }
            }
        }
    }

    fn advance_enemies(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        let mut enemies = std::mem::take(&mut self.enemies);
        for enemy in &mut enemies {
            self.advance_enemy(enemy, dt, out_events);
        }
        self.enemies = enemies;
    }

    fn advance_enemy(&mut self, enemy: &mut EnemyState, dt: f32, out_events: &mut Vec<Event>) {
        enemy.stun_window_open = false;
        let stun_interval = enemy.kind.stun_interval();
        if stun_interval > 0.0 {
            enemy.jam_timer += dt;
            if enemy.jam_timer >= stun_interval {
                enemy.jam_timer = 0.0;
                enemy.stun_window_open = true;
            }
        }

        if enemy.phase == EnemyPhase::AttackingBase {
            self.attack_base(enemy, dt, out_events);
            return;
        }

        if let Some(shield) = enemy.shield_target {
            if !self.towers.iter().any(|tower| tower.id == shield) {
                enemy.shield_target = None;
                enemy.phase = EnemyPhase::Moving;
            }
        }

        if let Some(shield) = enemy.shield_target {
            enemy.phase = EnemyPhase::AttackingShield;
            enemy.contact_timer += dt;
            if enemy.contact_timer >= CONTACT_INTERVAL {
                enemy.contact_timer = 0.0;
                self.damage_shield(shield, CONTACT_DAMAGE, out_events);
            }
            return;
        }

        if enemy.waypoint_index >= self.track.waypoints.len() {
            enemy.phase = EnemyPhase::AttackingBase;
            enemy.contact_timer = 0.0;
            out_events.push(Event::EnemyReachedBase { enemy: enemy.id });
            return;
        }

        let target = self.track.waypoints[enemy.waypoint_index];
        enemy.position = enemy.position.step_toward(target, enemy.kind.speed() * dt);
        if enemy.position.distance_to(target) < ARRIVAL_EPSILON {
            enemy.waypoint_index += 1;
        }

        if !enemy.kind.flies() {
            let engaged = self
                .towers
                .iter()
                .find(|tower| {
                    tower.kind == TowerKind::Shield
                        && tower.position.distance_to(enemy.position) < SHIELD_ENGAGE_RANGE
                })
                .map(|tower| tower.id);
            if engaged.is_some() {
                enemy.shield_target = engaged;
            }
        }
    }

    fn attack_base(&mut self, enemy: &mut EnemyState, dt: f32, out_events: &mut Vec<Event>) {
        if self.economy.is_defeated() {
            return;
        }
        enemy.contact_timer += dt;
        if enemy.contact_timer >= CONTACT_INTERVAL {
            enemy.contact_timer = 0.0;
            let destroyed = self.economy.damage_base(CONTACT_DAMAGE);
            out_events.push(Event::BaseDamaged {
                amount: CONTACT_DAMAGE,
                remaining: self.economy.base_health(),
            });
            if destroyed {
                out_events.push(Event::BaseDestroyed);
            }
        }
    }

    fn advance_projectiles(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        let mut projectiles = std::mem::take(&mut self.projectiles);
        projectiles.retain_mut(|projectile| self.advance_projectile(projectile, dt, out_events));
        self.projectiles = projectiles;
    }

    fn advance_projectile(
        &mut self,
        projectile: &mut ProjectileState,
        dt: f32,
        out_events: &mut Vec<Event>,
    ) -> bool {
        match projectile.payload {
            Payload::Damage {
                target,
                damage,
                speed,
            } => {
                let Some(enemy_position) = self
                    .enemies
                    .iter()
                    .find(|enemy| enemy.id == target)
                    .map(|enemy| enemy.position)
                else {
                    out_events.push(Event::ProjectileExpired {
                        projectile: projectile.id,
                    });
                    return false;
                };

                projectile.position = projectile.position.step_toward(enemy_position, speed * dt);
                if projectile.position.distance_to(enemy_position) < ARRIVAL_EPSILON {
                    out_events.push(Event::ProjectileHit {
                        projectile: projectile.id,
                        damage,
                    });
                    self.damage_enemy(target, damage, out_events);
                    return false;
                }
                true
            }
            Payload::Stun {
                target,
                duration,
                speed,
            } => {
                let Some(tower_position) = self
                    .towers
                    .iter()
                    .find(|tower| tower.id == target)
                    .map(|tower| tower.position)
                else {
                    out_events.push(Event::ProjectileExpired {
                        projectile: projectile.id,
                    });
                    return false;
                };

                projectile.position = projectile.position.step_toward(tower_position, speed * dt);
                if projectile.position.distance_to(tower_position) < ARRIVAL_EPSILON {
                    out_events.push(Event::ProjectileHit {
                        projectile: projectile.id,
                        damage: 0.0,
                    });
                    if let Some(tower) = self.towers.iter_mut().find(|tower| tower.id == target) {
                        tower.stunned = true;
                        tower.stun_remaining = duration;
                        out_events.push(Event::TowerStunned {
                            tower: target,
                            duration,
                        });
                    }
                    return false;
                }
                true
            }
        }
    }

    fn damage_enemy(&mut self, target: EnemyId, amount: f32, out_events: &mut Vec<Event>) {
        let Some(index) = self.enemies.iter().position(|enemy| enemy.id == target) else {
            return;
        };

        let enemy = &mut self.enemies[index];
        enemy.health -= amount;
        if enemy.health <= 0.0 {
            let state = self.enemies.remove(index);
            let bounty = state.kind.bounty();
            self.economy.add_currency(bounty);
            out_events.push(Event::EnemyDied {
                enemy: state.id,
                bounty,
            });
        }
    }

    fn damage_shield(&mut self, tower: TowerId, amount: f32, out_events: &mut Vec<Event>) {
        let Some(index) = self.towers.iter().position(|state| state.id == tower) else {
            return;
        };
        let Some(health) = self.towers[index].health.as_mut() else {
            return;
        };

        *health -= amount;
        if *health <= 0.0 {
            let state = self.towers.remove(index);
            self.occupancy.release_tower(state.id);
            out_events.push(Event::ShieldDestroyed { tower: state.id });
        } else {
            out_events.push(Event::ShieldDamaged {
                tower,
                remaining: *health,
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            let dt = dt.as_secs_f32();
            world.advance_towers(dt, out_events);
            world.advance_enemies(dt, out_events);
            world.advance_projectiles(dt, out_events);
        }
        // Consumed by the wave scheduler; the world itself has no wave state.
        Command::StartWave => {}
        Command::PlaceTower { kind, origin } => world.place_tower(kind, origin, out_events),
        Command::SellTower { tower } => world.sell_tower(tower, out_events),
        Command::SpawnEnemy { kind } => world.spawn_enemy(kind, out_events),
        Command::FireProjectile { tower, target } => {
            world.fire_projectile(tower, target, out_events);
        }
        Command::StrikeEnemy { tower, target } => world.strike_enemy(tower, target, out_events),
        Command::LaunchStun { enemy, target } => world.launch_stun(enemy, target, out_events),
        Command::GrantCurrency { amount } => world.economy.add_currency(amount),
        Command::RepairBase { amount } => world.economy.repair_base(amount),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use grid_defence_core::{
        Cell, EnemySnapshot, EnemyView, PlacementPreview, Position, ProjectileId, TowerId,
        TowerKind, TowerSnapshot, TowerView,
    };

    /// Captures a read-only view of all placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        let snapshots: Vec<TowerSnapshot> = world
            .towers
            .iter()
            .map(|tower| TowerSnapshot {
                id: tower.id,
                kind: tower.kind,
                origin: tower.origin,
                facing: tower.facing,
                position: tower.position,
                stunned: tower.stunned,
                stun_remaining: tower.stun_remaining,
                ready: tower.kind.is_attacker()
                    && !tower.stunned
                    && tower.attack_timer >= 1.0 / tower.kind.attack_speed(),
                health: tower.health,
            })
            .collect();
        TowerView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of all live enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots: Vec<EnemySnapshot> = world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                kind: enemy.kind,
                position: enemy.position,
                health: enemy.health,
                phase: enemy.phase,
                stun_window_open: enemy.stun_window_open,
            })
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Positions of all projectiles in flight, for presentation layers.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<(ProjectileId, Position)> {
        world
            .projectiles
            .iter()
            .map(|projectile| (projectile.id, projectile.position))
            .collect()
    }

    /// Currency currently available to the player.
    #[must_use]
    pub fn currency(world: &World) -> f32 {
        world.economy.currency()
    }

    /// Base health remaining.
    #[must_use]
    pub fn base_health(world: &World) -> f32 {
        world.economy.base_health()
    }

    /// Whether the base has been destroyed.
    #[must_use]
    pub fn base_destroyed(world: &World) -> bool {
        world.economy.is_defeated()
    }

    /// Tower currently holding the provided cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: Cell) -> Option<TowerId> {
        world.occupancy.occupant(cell)
    }

    /// Evaluates a placement candidate without side effects.
    ///
    /// Pure with respect to world state: identical inputs yield identical
    /// previews, so hosts may re-evaluate every frame while a cursor is
    /// active.
    #[must_use]
    pub fn placement_preview(world: &World, kind: TowerKind, origin: Cell) -> PlacementPreview {
        match world.validate_placement(kind, origin) {
            Ok(facing) => PlacementPreview {
                kind,
                origin,
                facing,
                verdict: Ok(()),
            },
            Err(reason) => PlacementPreview {
                kind,
                origin,
                facing: grid_defence_core::Facing::Left,
                verdict: Err(reason),
            },
        }
    }

    /// Ordered waypoints enemies walk through.
    #[must_use]
    pub fn waypoints(world: &World) -> &[Position] {
        &world.track.waypoints
    }

    /// Position enemies enter the board at.
    #[must_use]
    pub fn spawn_point(world: &World) -> Position {
        world.track.spawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_defence_core::{Cell, Command, EnemyKind, Event, Position, TowerKind};
    use std::time::Duration;

    fn straight_layout() -> BoardLayout {
        let path: Vec<Cell> = (0..10).map(|column| Cell::new(column, 0)).collect();
        let buildable: Vec<Cell> = (0..10)
            .flat_map(|column| {
                [
                    Cell::new(column, 1),
                    Cell::new(column, 2),
                    Cell::new(column, 5),
                ]
            })
            .collect();
        BoardLayout {
            buildable,
            path,
            facing_right: vec![Cell::new(7, 1)],
            spawn: Cell::new(0, 0).center(),
            waypoints: (0..10).map(|column| Cell::new(column, 0).center()).collect(),
        }
    }

    fn world_with_currency(currency: f32) -> World {
        World::new(
            straight_layout(),
            WorldConfig {
                starting_currency: currency,
                starting_base_health: 100.0,
            },
        )
    }

    fn tick(world: &mut World, dt: Duration, events: &mut Vec<Event>) {
        apply(world, Command::Tick { dt }, events);
    }

    #[test]
    fn placement_succeeds_then_cell_rejects_second_tower() {
        let mut world = world_with_currency(100.0);
        let cell = Cell::new(5, 5);

        let preview = query::placement_preview(&world, TowerKind::Launcher, cell);
        assert!(preview.placeable());

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Launcher,
                origin: cell,
            },
            &mut events,
        );
        assert!(matches!(events[0], Event::TowerPlaced { .. }));
        assert_eq!(query::currency(&world), 50.0);

        let preview = query::placement_preview(&world, TowerKind::Launcher, cell);
        assert_eq!(preview.verdict, Err(PlacementError::Occupied));
    }

    #[test]
    fn ground_tower_rejected_on_path_and_shield_rejected_on_ground() {
        let world = world_with_currency(500.0);

        let on_path = query::placement_preview(&world, TowerKind::Launcher, Cell::new(3, 0));
        assert_eq!(on_path.verdict, Err(PlacementError::OnPath));

        let off_path = query::placement_preview(&world, TowerKind::Shield, Cell::new(3, 1));
        assert_eq!(off_path.verdict, Err(PlacementError::UnsuitableTerrain));

        let on_path_shield = query::placement_preview(&world, TowerKind::Shield, Cell::new(3, 0));
        assert!(on_path_shield.placeable());
    }

    #[test]
    fn placement_rejected_when_unaffordable() {
        let world = world_with_currency(10.0);
        let preview = query::placement_preview(&world, TowerKind::Launcher, Cell::new(5, 1));
        assert_eq!(preview.verdict, Err(PlacementError::InsufficientFunds));
    }

    #[test]
    fn generator_requires_both_cells_and_releases_both_on_sale() {
        let mut world = world_with_currency(200.0);

        // West neighbor of column 0 is off the board.
        let edge = query::placement_preview(&world, TowerKind::Generator, Cell::new(0, 1));
        assert_eq!(edge.verdict, Err(PlacementError::UnsuitableTerrain));

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Generator,
                origin: Cell::new(5, 2),
            },
            &mut events,
        );
        let tower = match events[0] {
            Event::TowerPlaced { tower, .. } => tower,
            ref other => panic!("unexpected event: {other:?}"),
        };
        assert_eq!(query::tower_at(&world, Cell::new(4, 2)), Some(tower));
        assert_eq!(query::tower_at(&world, Cell::new(5, 2)), Some(tower));

        events.clear();
        apply(&mut world, Command::SellTower { tower }, &mut events);
        assert!(matches!(events[0], Event::TowerSold { refund, .. } if refund == 37.0));
        assert_eq!(query::tower_at(&world, Cell::new(4, 2)), None);
        assert_eq!(query::tower_at(&world, Cell::new(5, 2)), None);
    }

    #[test]
    fn scratcher_faces_right_only_on_overlay() {
        let world = world_with_currency(100.0);

        let overlay = query::placement_preview(&world, TowerKind::Scratcher, Cell::new(7, 1));
        assert!(overlay.placeable());
        assert_eq!(overlay.facing, Facing::Right);

        let plain = query::placement_preview(&world, TowerKind::Scratcher, Cell::new(2, 1));
        assert!(plain.placeable());
        assert_eq!(plain.facing, Facing::Left);
    }

    #[test]
    fn selling_unknown_tower_is_rejected_without_mutation() {
        let mut world = world_with_currency(80.0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SellTower {
                tower: TowerId::new(42),
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::TowerSellRejected {
                tower: TowerId::new(42),
                reason: SellError::UnknownTower,
            }]
        );
        assert_eq!(query::currency(&world), 80.0);
    }

    #[test]
    fn lethal_damage_kills_exactly_once_and_credits_bounty() {
        let mut world = world_with_currency(0.0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Scout,
            },
            &mut events,
        );
        let enemy = match events[0] {
            Event::EnemySpawned { enemy, .. } => enemy,
            ref other => panic!("unexpected event: {other:?}"),
        };

        world.damage_enemy(enemy, 40.0, &mut events);
        assert_eq!(query::enemy_view(&world).len(), 1);

        world.damage_enemy(enemy, 70.0, &mut events);
        let deaths = events
            .iter()
            .filter(|event| matches!(event, Event::EnemyDied { .. }))
            .count();
        assert_eq!(deaths, 1);
        assert_eq!(query::currency(&world), EnemyKind::Scout.bounty());

        // A further strike against the dead enemy is a silent no-op.
        world.damage_enemy(enemy, 10.0, &mut events);
        let deaths = events
            .iter()
            .filter(|event| matches!(event, Event::EnemyDied { .. }))
            .count();
        assert_eq!(deaths, 1);
    }

    #[test]
    fn enemy_walks_the_track_and_attacks_the_base_on_an_interval() {
        let mut world = world_with_currency(0.0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Scout,
            },
            &mut events,
        );

        // Track is ~9 units; a scout walks 2 units per second.
        for _ in 0..60 {
            tick(&mut world, Duration::from_millis(100), &mut events);
        }
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::EnemyReachedBase { .. })));

        events.clear();
        for _ in 0..10 {
            tick(&mut world, Duration::from_millis(100), &mut events);
        }
        let strikes = events
            .iter()
            .filter(|event| matches!(event, Event::BaseDamaged { .. }))
            .count();
        assert_eq!(strikes, 1);
        assert_eq!(query::base_health(&world), 80.0);
    }

    #[test]
    fn stun_countdown_ends_exactly_when_exhausted() {
        let mut world = world_with_currency(100.0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Launcher,
                origin: Cell::new(5, 1),
            },
            &mut events,
        );
        let tower = match events[0] {
            Event::TowerPlaced { tower, .. } => tower,
            ref other => panic!("unexpected event: {other:?}"),
        };

        world.towers[0].stunned = true;
        world.towers[0].stun_remaining = 2.0;

        events.clear();
        for step in 0..4 {
            tick(&mut world, Duration::from_millis(500), &mut events);
            let ended = events
                .iter()
                .any(|event| matches!(event, Event::TowerStunEnded { .. }));
            if step < 3 {
                assert!(!ended, "stun must persist through step {step}");
            } else {
                assert!(ended, "stun must end exactly on the fourth step");
            }
        }
        assert!(!query::tower_view(&world).get(tower).expect("tower").stunned);
    }

    #[test]
    fn stun_freezes_the_attack_cooldown_instead_of_resetting_it() {
        let mut world = world_with_currency(100.0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Launcher,
                origin: Cell::new(5, 1),
            },
            &mut events,
        );
        let tower = match events[0] {
            Event::TowerPlaced { tower, .. } => tower,
            ref other => panic!("unexpected event: {other:?}"),
        };

        // Half the one-second cooldown elapses, then a stun lands.
        tick(&mut world, Duration::from_millis(500), &mut events);
        assert!(!query::tower_view(&world).get(tower).expect("tower").ready);
        world.towers[0].stunned = true;
        world.towers[0].stun_remaining = 1.0;

        tick(&mut world, Duration::from_millis(500), &mut events);
        tick(&mut world, Duration::from_millis(500), &mut events);
        let snapshot = *query::tower_view(&world).get(tower).expect("tower");
        assert!(!snapshot.stunned);
        assert!(!snapshot.ready, "the stun must not grant free cooldown");

        // The remaining half second completes the original cooldown.
        tick(&mut world, Duration::from_millis(500), &mut events);
        assert!(query::tower_view(&world).get(tower).expect("tower").ready);
    }

    #[test]
    fn projectile_chases_and_damages_its_target() {
        let mut world = world_with_currency(100.0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Launcher,
                origin: Cell::new(1, 1),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Bruiser,
            },
            &mut events,
        );

        events.clear();
        apply(
            &mut world,
            Command::FireProjectile {
                tower: TowerId::new(0),
                target: EnemyId::new(0),
            },
            &mut events,
        );
        assert!(matches!(events[0], Event::ProjectileLaunched { .. }));

        events.clear();
        for _ in 0..20 {
            tick(&mut world, Duration::from_millis(100), &mut events);
        }
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::ProjectileHit { damage, .. } if *damage == 10.0)));
        let enemy = query::enemy_view(&world).into_vec()[0];
        assert_eq!(enemy.health, EnemyKind::Bruiser.max_health() - 10.0);
    }

    #[test]
    fn projectile_expires_silently_when_target_is_gone() {
        let mut world = world_with_currency(100.0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Launcher,
                origin: Cell::new(1, 1),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Sprinter,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::FireProjectile {
                tower: TowerId::new(0),
                target: EnemyId::new(0),
            },
            &mut events,
        );

        // Kill the target while the projectile is still in flight.
        world.damage_enemy(EnemyId::new(0), 1_000.0, &mut events);

        events.clear();
        tick(&mut world, Duration::from_millis(100), &mut events);
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::ProjectileExpired { .. })));
        assert!(query::projectiles(&world).is_empty());
    }

    #[test]
    fn grounded_enemy_engages_a_shield_and_destroys_it() {
        let mut world = world_with_currency(500.0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Shield,
                origin: Cell::new(2, 0),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Scout,
            },
            &mut events,
        );

        events.clear();
        // Walk into engage range, then strike every second: 500 health at
        // 10 damage per strike needs 50 strikes.
        for _ in 0..520 {
            tick(&mut world, Duration::from_millis(100), &mut events);
        }
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::ShieldDestroyed { .. })));
        assert_eq!(query::tower_at(&world, Cell::new(2, 0)), None);

        // With the shield gone the enemy resumes walking.
        events.clear();
        for _ in 0..80 {
            tick(&mut world, Duration::from_millis(100), &mut events);
        }
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::EnemyReachedBase { .. })));
    }

    #[test]
    fn flyer_ignores_shields() {
        let mut world = world_with_currency(500.0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Shield,
                origin: Cell::new(2, 0),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Flyer,
            },
            &mut events,
        );

        events.clear();
        for _ in 0..60 {
            tick(&mut world, Duration::from_millis(100), &mut events);
        }
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::EnemyReachedBase { .. })));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::ShieldDamaged { .. })));
    }

    #[test]
    fn spawns_are_ignored_without_a_track() {
        let mut layout = straight_layout();
        layout.waypoints.clear();
        let mut world = World::new(layout, WorldConfig::default());

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Scout,
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert!(query::enemy_view(&world).is_empty());
    }

    #[test]
    fn generator_income_accrues_only_while_unstunned() {
        let mut world = world_with_currency(100.0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Generator,
                origin: Cell::new(5, 2),
            },
            &mut events,
        );
        assert_eq!(query::currency(&world), 25.0);

        events.clear();
        for _ in 0..10 {
            tick(&mut world, Duration::from_millis(100), &mut events);
        }
        assert_eq!(query::currency(&world), 27.0);

        world.towers[0].stunned = true;
        world.towers[0].stun_remaining = 10.0;
        for _ in 0..10 {
            tick(&mut world, Duration::from_millis(100), &mut events);
        }
        assert_eq!(query::currency(&world), 27.0);
    }

    #[test]
    fn spawn_position_matches_layout() {
        let mut world = world_with_currency(0.0);
        assert_eq!(query::spawn_point(&world), Position::new(0.5, 0.5));
        assert_eq!(query::waypoints(&world).len(), 10);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Scout,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::EnemySpawned {
                enemy: EnemyId::new(0),
                kind: EnemyKind::Scout,
                position: Position::new(0.5, 0.5),
            }]
        );
    }
}

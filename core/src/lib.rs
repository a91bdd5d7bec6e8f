#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Defence simulation.
//!
//! This crate defines the message surface that connects the host adapter, the
//! authoritative world, and the pure systems. The host and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command
//! batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Distance at which a moving entity is considered to have arrived.
pub const ARRIVAL_EPSILON: f32 = 0.1;

/// Radius within which a grounded enemy locks onto a shield tower.
pub const SHIELD_ENGAGE_RANGE: f32 = 0.5;

/// Damage dealt per contact strike against shields and the base.
pub const CONTACT_DAMAGE: f32 = 10.0;

/// Seconds between contact strikes against shields and the base.
pub const CONTACT_INTERVAL: f32 = 1.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the wave scheduler leave the pre-game state or, under a
    /// manual advance policy, begin the next wave. Ignored by the world.
    StartWave,
    /// Requests placement of a tower anchored at the provided origin cell.
    PlaceTower {
        /// Kind of tower to construct.
        kind: TowerKind,
        /// Cell anchoring the tower footprint.
        origin: Cell,
    },
    /// Requests the sale of an existing tower, refunding part of its cost.
    SellTower {
        /// Identifier of the tower to sell.
        tower: TowerId,
    },
    /// Requests that a new enemy enter the board at the spawn point.
    SpawnEnemy {
        /// Kind of enemy to spawn.
        kind: EnemyKind,
    },
    /// Requests that a tower launch a homing projectile at an enemy.
    FireProjectile {
        /// Tower performing the attack.
        tower: TowerId,
        /// Enemy the projectile chases.
        target: EnemyId,
    },
    /// Requests that a tower apply instant damage to an enemy.
    StrikeEnemy {
        /// Tower performing the attack.
        tower: TowerId,
        /// Enemy receiving the damage.
        target: EnemyId,
    },
    /// Requests that an enemy launch a stun projectile at a tower.
    LaunchStun {
        /// Enemy performing the attack.
        enemy: EnemyId,
        /// Tower the projectile chases.
        target: TowerId,
    },
    /// Grants currency without a gameplay source. Debug tooling only.
    GrantCurrency {
        /// Amount of currency credited.
        amount: f32,
    },
    /// Restores base health. Debug tooling only.
    RepairBase {
        /// Amount of health restored.
        amount: f32,
    },
}

/// Events broadcast by the world and the wave scheduler after processing
/// commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a wave began emitting spawns.
    WaveStarted {
        /// Index of the wave that started.
        wave: WaveIndex,
    },
    /// Announces that a wave finished spawning and all its enemies are gone.
    WaveCompleted {
        /// Index of the wave that completed.
        wave: WaveIndex,
    },
    /// Announces that the final wave completed. Terminal scheduler state.
    AllWavesCompleted,
    /// Confirms that an enemy entered the board.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Kind of enemy that spawned.
        kind: EnemyKind,
        /// Position the enemy occupies after spawning.
        position: Position,
    },
    /// Confirms that an enemy was destroyed and its bounty credited.
    EnemyDied {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Currency credited for the kill.
        bounty: f32,
    },
    /// Announces that an enemy exhausted the waypoint track and began
    /// attacking the base.
    EnemyReachedBase {
        /// Identifier of the enemy.
        enemy: EnemyId,
    },
    /// Reports damage applied to the base.
    BaseDamaged {
        /// Damage applied by the strike.
        amount: f32,
        /// Base health remaining after the strike.
        remaining: f32,
    },
    /// Announces that base health reached zero. Terminal defeat signal.
    BaseDestroyed,
    /// Reports passive income credited by a generator tower.
    CurrencyGenerated {
        /// Tower that produced the income.
        tower: TowerId,
        /// Amount of currency credited.
        amount: f32,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Kind of tower that was placed.
        kind: TowerKind,
        /// Cell anchoring the tower footprint.
        origin: Cell,
        /// Facing applied to the tower.
        facing: Facing,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Kind of tower requested for placement.
        kind: TowerKind,
        /// Origin cell provided in the placement request.
        origin: Cell,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower was sold and its cells released.
    TowerSold {
        /// Identifier of the tower that was sold.
        tower: TowerId,
        /// Currency refunded by the sale.
        refund: f32,
    },
    /// Reports that a tower sale request was rejected.
    TowerSellRejected {
        /// Identifier of the tower targeted by the sale.
        tower: TowerId,
        /// Specific reason the sale failed.
        reason: SellError,
    },
    /// Announces that a tower was suppressed by a stun projectile.
    TowerStunned {
        /// Identifier of the stunned tower.
        tower: TowerId,
        /// Seconds the suppression lasts.
        duration: f32,
    },
    /// Announces that a tower recovered from suppression.
    TowerStunEnded {
        /// Identifier of the recovered tower.
        tower: TowerId,
    },
    /// Confirms that a projectile entered flight.
    ProjectileLaunched {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Position the projectile launched from.
        origin: Position,
    },
    /// Reports that a projectile arrived and applied its payload.
    ProjectileHit {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Damage applied on arrival. Zero for stun payloads.
        damage: f32,
    },
    /// Reports that a projectile lost its target and despawned.
    ProjectileExpired {
        /// Identifier of the projectile.
        projectile: ProjectileId,
    },
    /// Reports damage applied to a shield tower.
    ShieldDamaged {
        /// Identifier of the shield tower.
        tower: TowerId,
        /// Health remaining after the strike.
        remaining: f32,
    },
    /// Announces that a shield tower was destroyed and its cell released.
    ShieldDestroyed {
        /// Identifier of the destroyed shield tower.
        tower: TowerId,
    },
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Zero-based index into the configured wave table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaveIndex(u32);

impl WaveIndex {
    /// Creates a new wave index wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying wave index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed so that west-neighbor lookups remain well defined
/// at the board edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    column: i32,
    row: i32,
}

impl Cell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Cell immediately west of this one.
    #[must_use]
    pub const fn west(&self) -> Self {
        Self {
            column: self.column - 1,
            row: self.row,
        }
    }

    /// Continuous world position of the cell center. One cell spans one
    /// world unit.
    #[must_use]
    pub fn center(&self) -> Position {
        Position::new(self.column as f32 + 0.5, self.row as f32 + 0.5)
    }
}

/// Continuous world coordinate used by mobile entities and projectiles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new world position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component of the position.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component of the position.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance_to(&self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Moves toward `target` by at most `max_step`, stopping exactly on the
    /// target once it is within reach.
    #[must_use]
    pub fn step_toward(&self, target: Position, max_step: f32) -> Self {
        let distance = self.distance_to(target);
        if distance <= max_step || distance == 0.0 {
            return target;
        }
        let scale = max_step / distance;
        Self {
            x: self.x + (target.x - self.x) * scale,
            y: self.y + (target.y - self.y) * scale,
        }
    }
}

/// Terrain classification assigned to a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Open ground that accepts ground tower placement.
    Buildable,
    /// Enemy route; only path-bound towers may occupy it.
    Path,
    /// Cell outside the playable layout.
    Unset,
}

/// Horizontal facing applied to a directional tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Default orientation.
    Left,
    /// Orientation selected by the facing overlay.
    Right,
}

/// Kinds of towers available in the shop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Single-cell ground tower firing homing projectiles at any enemy.
    Launcher,
    /// Single-cell melee tower striking grounded enemies instantly. Placing
    /// it on the facing overlay flips it to face right.
    Scratcher,
    /// Dual-cell ground tower producing passive income instead of attacking.
    Generator,
    /// Path-bound barrier with health that blocks grounded enemies.
    Shield,
}

impl TowerKind {
    /// Purchase cost of the tower.
    #[must_use]
    pub const fn cost(self) -> f32 {
        match self {
            Self::Launcher => 50.0,
            Self::Scratcher => 40.0,
            Self::Generator => 75.0,
            Self::Shield => 60.0,
        }
    }

    /// Targeting radius in world units. Zero for kinds that never attack.
    #[must_use]
    pub const fn range(self) -> f32 {
        match self {
            Self::Launcher => 3.0,
            Self::Scratcher => 1.5,
            Self::Generator | Self::Shield => 0.0,
        }
    }

    /// Attacks per second.
    #[must_use]
    pub const fn attack_speed(self) -> f32 {
        match self {
            Self::Launcher => 1.0,
            Self::Scratcher => 1.5,
            Self::Generator | Self::Shield => 0.0,
        }
    }

    /// Damage applied per attack.
    #[must_use]
    pub const fn damage(self) -> f32 {
        match self {
            Self::Launcher => 10.0,
            Self::Scratcher => 15.0,
            Self::Generator | Self::Shield => 0.0,
        }
    }

    /// Travel speed of the tower's projectiles in world units per second.
    #[must_use]
    pub const fn projectile_speed(self) -> f32 {
        match self {
            Self::Launcher => 10.0,
            Self::Scratcher | Self::Generator | Self::Shield => 0.0,
        }
    }

    /// Currency produced per second of un-stunned operation.
    #[must_use]
    pub const fn income_rate(self) -> f32 {
        match self {
            Self::Generator => 2.0,
            Self::Launcher | Self::Scratcher | Self::Shield => 0.0,
        }
    }

    /// Starting health for kinds that can be destroyed by enemies.
    #[must_use]
    pub const fn max_health(self) -> Option<f32> {
        match self {
            Self::Shield => Some(500.0),
            Self::Launcher | Self::Scratcher | Self::Generator => None,
        }
    }

    /// Whether the tower acquires targets and performs attacks.
    #[must_use]
    pub const fn is_attacker(self) -> bool {
        matches!(self, Self::Launcher | Self::Scratcher)
    }

    /// Whether the tower must stand on path terrain instead of ground.
    #[must_use]
    pub const fn is_path_bound(self) -> bool {
        matches!(self, Self::Shield)
    }

    /// Whether the facing overlay counts as buildable ground for this kind.
    #[must_use]
    pub const fn uses_facing_overlay(self) -> bool {
        matches!(self, Self::Scratcher)
    }

    /// Whether flying enemies are valid targets.
    #[must_use]
    pub const fn targets_flyers(self) -> bool {
        matches!(self, Self::Launcher)
    }

    /// Stable name used by the shop catalog and refund table.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Launcher => "launcher",
            Self::Scratcher => "scratcher",
            Self::Generator => "generator",
            Self::Shield => "shield",
        }
    }

    /// Cells occupied by a tower of this kind anchored at `origin`.
    #[must_use]
    pub const fn footprint(self, origin: Cell) -> Footprint {
        match self {
            Self::Generator => Footprint {
                primary: origin,
                secondary: Some(origin.west()),
            },
            Self::Launcher | Self::Scratcher | Self::Shield => Footprint {
                primary: origin,
                secondary: None,
            },
        }
    }
}

/// Set of cells reserved together by a single tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Footprint {
    primary: Cell,
    secondary: Option<Cell>,
}

impl Footprint {
    /// Cell anchoring the footprint.
    #[must_use]
    pub const fn primary(&self) -> Cell {
        self.primary
    }

    /// Iterator over every cell in the footprint.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        [Some(self.primary), self.secondary].into_iter().flatten()
    }

    /// Combat position of the tower, at the centroid of its cells.
    #[must_use]
    pub fn center(&self) -> Position {
        match self.secondary {
            None => self.primary.center(),
            Some(other) => {
                let a = self.primary.center();
                let b = other.center();
                Position::new((a.x() + b.x()) / 2.0, (a.y() + b.y()) / 2.0)
            }
        }
    }
}

/// Kinds of enemies the wave table can spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Baseline walker.
    Scout,
    /// Fast but fragile walker.
    Sprinter,
    /// Slow, heavily armored walker.
    Bruiser,
    /// Flies over shields and never engages them.
    Flyer,
    /// Walker that periodically stuns the nearest attacking tower.
    Jammer,
}

impl EnemyKind {
    /// Starting health of the enemy.
    #[must_use]
    pub const fn max_health(self) -> f32 {
        match self {
            Self::Scout => 100.0,
            Self::Sprinter => 60.0,
            Self::Bruiser => 250.0,
            Self::Flyer => 80.0,
            Self::Jammer => 120.0,
        }
    }

    /// Movement speed in world units per second.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Scout => 2.0,
            Self::Sprinter => 3.5,
            Self::Bruiser => 1.0,
            Self::Flyer => 2.5,
            Self::Jammer => 1.5,
        }
    }

    /// Currency credited when the enemy dies.
    #[must_use]
    pub const fn bounty(self) -> f32 {
        match self {
            Self::Scout => 10.0,
            Self::Sprinter => 12.0,
            Self::Bruiser => 25.0,
            Self::Flyer => 15.0,
            Self::Jammer => 20.0,
        }
    }

    /// Whether the enemy flies over shields.
    #[must_use]
    pub const fn flies(self) -> bool {
        matches!(self, Self::Flyer)
    }

    /// Radius within which a jammer can stun towers. Zero for other kinds.
    #[must_use]
    pub const fn stun_range(self) -> f32 {
        match self {
            Self::Jammer => 2.0,
            _ => 0.0,
        }
    }

    /// Seconds a jammer's stun suppresses a tower.
    #[must_use]
    pub const fn stun_duration(self) -> f32 {
        match self {
            Self::Jammer => 5.0,
            _ => 0.0,
        }
    }

    /// Seconds between jammer stun attempts.
    #[must_use]
    pub const fn stun_interval(self) -> f32 {
        match self {
            Self::Jammer => 10.0,
            _ => 0.0,
        }
    }

    /// Travel speed of a jammer's stun projectile.
    #[must_use]
    pub const fn stun_projectile_speed(self) -> f32 {
        match self {
            Self::Jammer => 5.0,
            _ => 0.0,
        }
    }
}

/// Ordered batch of enemy spawns treated as one scheduling unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wave {
    entries: Vec<EnemyKind>,
}

impl Wave {
    /// Creates a wave from an ordered list of spawn entries.
    #[must_use]
    pub fn new(entries: Vec<EnemyKind>) -> Self {
        Self { entries }
    }

    /// Spawn entries in emission order.
    #[must_use]
    pub fn entries(&self) -> &[EnemyKind] {
        &self.entries
    }
}

/// Reasons a tower placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    /// A footprint cell lies on terrain the tower kind cannot occupy.
    #[error("terrain does not accept this tower kind")]
    UnsuitableTerrain,
    /// A footprint cell lies on the enemy path.
    #[error("cell lies on the enemy path")]
    OnPath,
    /// A footprint cell is already held by another tower.
    #[error("cell is already occupied")]
    Occupied,
    /// The purchase cost exceeds the available currency.
    #[error("insufficient funds")]
    InsufficientFunds,
}

/// Reasons a tower sale request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum SellError {
    /// No tower with the provided identifier exists.
    #[error("no such tower")]
    UnknownTower,
}

/// Behavioral phase of a mobile enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyPhase {
    /// Advancing along the waypoint track.
    Moving,
    /// Locked onto a shield tower and striking it on an interval.
    AttackingShield,
    /// Past the end of the track, striking the base on an interval.
    AttackingBase,
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell anchoring the tower footprint.
    pub origin: Cell,
    /// Facing applied at placement time.
    pub facing: Facing,
    /// Combat position at the centroid of the footprint.
    pub position: Position,
    /// Whether the tower is currently suppressed.
    pub stunned: bool,
    /// Seconds of suppression remaining. Zero when not stunned.
    pub stun_remaining: f32,
    /// Whether the attack cooldown has elapsed.
    pub ready: bool,
    /// Remaining health for destructible kinds.
    pub health: Option<f32>,
}

/// Read-only snapshot describing all placed towers.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a tower snapshot by identifier.
    #[must_use]
    pub fn get(&self, tower: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of enemy.
    pub kind: EnemyKind,
    /// Continuous position along the track.
    pub position: Position,
    /// Remaining health.
    pub health: f32,
    /// Behavioral phase the enemy occupies this tick.
    pub phase: EnemyPhase,
    /// Whether a jammer's stun window opened this tick.
    pub stun_window_open: bool,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of live enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the view captured no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Target assignment produced by the targeting system for one tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetAssignment {
    /// Tower that acquired a target.
    pub tower: TowerId,
    /// Kind of the acquiring tower.
    pub kind: TowerKind,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
}

/// Stun assignment produced by the targeting system for one jammer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StunAssignment {
    /// Jammer whose stun window opened this tick.
    pub enemy: EnemyId,
    /// Tower selected for suppression.
    pub tower: TowerId,
}

/// Declarative placement preview describing a potential tower construction.
///
/// Recomputed every frame while a placement cursor is active so the host can
/// drive its legality indicator; computing a preview never mutates state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementPreview {
    /// Kind of tower proposed for placement.
    pub kind: TowerKind,
    /// Origin cell anchoring the proposed footprint.
    pub origin: Cell,
    /// Facing the tower would adopt if placed.
    pub facing: Facing,
    /// Validation verdict for the proposed placement.
    pub verdict: Result<(), PlacementError>,
}

impl PlacementPreview {
    /// Whether the proposed placement would be accepted.
    #[must_use]
    pub fn placeable(&self) -> bool {
        self.verdict.is_ok()
    }
}

/// Linear nearest-entity scan shared by every targeting consumer.
///
/// Scans `candidates` in slice order, keeping the entry with the strictly
/// smallest Euclidean distance from `origin` that lies within `max_radius`
/// and satisfies `accepts`. Ties keep the first candidate encountered, so
/// iteration order decides and repeated scans over unchanged state return
/// the same entry. The scan is re-run every tick by callers; no target is
/// sticky across ticks.
pub fn find_nearest<T>(
    origin: Position,
    max_radius: f32,
    candidates: &[T],
    position: impl Fn(&T) -> Position,
    accepts: impl Fn(&T) -> bool,
) -> Option<&T> {
    let mut best: Option<(&T, f32)> = None;
    for candidate in candidates {
        let distance = origin.distance_to(position(candidate));
        if distance > max_radius || !accepts(candidate) {
            continue;
        }
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }
    best.map(|(candidate, _)| candidate)
}

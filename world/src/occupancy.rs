//! Cell occupancy bookkeeping for placed towers.

use std::collections::HashMap;

use grid_defence_core::{Cell, TowerId};

/// Sparse map from grid cells to the towers holding them.
///
/// A multi-cell tower registers every cell of its footprint under one
/// identifier; releasing any of those cells releases them all. The map never
/// stores entity state, only identifiers, so entity lifetime stays with the
/// registry inside the world.
#[derive(Debug, Default)]
pub(crate) struct GridOccupancy {
    cells: HashMap<Cell, TowerId>,
}

impl GridOccupancy {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Marks every provided cell as held by `tower`, all-or-nothing.
    ///
    /// Returns `false` without mutating anything when any cell is already
    /// held.
    pub(crate) fn try_occupy(
        &mut self,
        cells: impl Iterator<Item = Cell> + Clone,
        tower: TowerId,
    ) -> bool {
        if cells.clone().any(|cell| self.cells.contains_key(&cell)) {
            return false;
        }
        for cell in cells {
            let _ = self.cells.insert(cell, tower);
        }
        true
    }

    /// Releases the tower holding `cell`, including any other cells it
    /// jointly holds. Returns the released tower, if any.
    pub(crate) fn release(&mut self, cell: Cell) -> Option<TowerId> {
        let tower = self.cells.remove(&cell)?;
        self.release_tower(tower);
        Some(tower)
    }

    /// Releases every cell held by `tower`.
    pub(crate) fn release_tower(&mut self, tower: TowerId) {
        self.cells.retain(|_, occupant| *occupant != tower);
    }

    /// Tower currently holding `cell`, if any.
    pub(crate) fn occupant(&self, cell: Cell) -> Option<TowerId> {
        self.cells.get(&cell).copied()
    }

    /// Whether `cell` is currently held by a tower.
    pub(crate) fn is_occupied(&self, cell: Cell) -> bool {
        self.cells.contains_key(&cell)
    }
}

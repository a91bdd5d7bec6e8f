#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure placement system translating cursor previews and player input into
//! placement and sale commands.
//!
//! The system never mutates world state itself. It forwards a confirmed
//! preview as a `PlaceTower` command regardless of the preview's verdict,
//! and forwards sale requests for towers the host has resolved via
//! `query::tower_at`. The world re-validates both commands, so a confirm
//! on an illegal cell surfaces as a rejection event rather than being
//! dropped on the floor.

use grid_defence_core::{Command, PlacementPreview, TowerId};

/// Input snapshot distilled from host-provided frame input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementInput {
    /// Indicates whether the player confirmed the active preview this frame.
    pub confirm_action: bool,
    /// Tower the player requested to sell this frame, if any.
    pub sell_action: Option<TowerId>,
}

impl PlacementInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(confirm_action: bool, sell_action: Option<TowerId>) -> Self {
        Self {
            confirm_action,
            sell_action,
        }
    }
}

/// Placement system that turns previews and input into commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct Placement;

impl Placement {
    /// Creates a new placement system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Consumes the active preview and frame input to emit commands.
    ///
    /// A confirm action forwards the preview whether or not its verdict
    /// allows the build; the world re-validates and answers an illegal
    /// confirm with `TowerPlacementRejected`. A confirm without any active
    /// preview emits nothing.
    pub fn handle(
        &self,
        preview: Option<&PlacementPreview>,
        input: PlacementInput,
        out: &mut Vec<Command>,
    ) {
        if input.confirm_action {
            if let Some(preview) = preview {
                out.push(Command::PlaceTower {
                    kind: preview.kind,
                    origin: preview.origin,
                });
            }
        }

        if let Some(tower) = input.sell_action {
            out.push(Command::SellTower { tower });
        }
    }
}

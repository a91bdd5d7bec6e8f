//! Currency and base-health resource pools.

use grid_defence_core::TowerKind;

/// Resource ledger tracking currency and base health for one session.
///
/// Currency never drops below zero; a spend that would overdraw is rejected
/// without mutation. Base health clamps at zero and latches the defeat
/// signal exactly once.
#[derive(Debug)]
pub(crate) struct EconomyLedger {
    currency: f32,
    base_health: f32,
    defeated: bool,
}

impl EconomyLedger {
    pub(crate) fn new(starting_currency: f32, starting_base_health: f32) -> Self {
        Self {
            currency: starting_currency.max(0.0),
            base_health: starting_base_health.max(0.0),
            defeated: starting_base_health <= 0.0,
        }
    }

    pub(crate) fn currency(&self) -> f32 {
        self.currency
    }

    pub(crate) fn base_health(&self) -> f32 {
        self.base_health
    }

    pub(crate) fn is_defeated(&self) -> bool {
        self.defeated
    }

    pub(crate) fn add_currency(&mut self, amount: f32) {
        self.currency = (self.currency + amount).max(0.0);
    }

    /// Deducts `amount` if covered by the balance. Returns `false` and
    /// leaves the balance untouched otherwise.
    pub(crate) fn try_spend(&mut self, amount: f32) -> bool {
        if self.currency < amount {
            return false;
        }
        self.currency -= amount;
        true
    }

    pub(crate) fn has_funds(&self, amount: f32) -> bool {
        self.currency >= amount
    }

    /// Applies base damage, clamping at zero. Returns `true` on the strike
    /// that destroys the base; subsequent strikes return `false`.
    pub(crate) fn damage_base(&mut self, amount: f32) -> bool {
        if self.defeated {
            return false;
        }
        self.base_health = (self.base_health - amount).max(0.0);
        if self.base_health <= 0.0 {
            self.defeated = true;
            return true;
        }
        false
    }

    pub(crate) fn repair_base(&mut self, amount: f32) {
        if self.defeated {
            return;
        }
        self.base_health += amount.max(0.0);
    }
}

/// Shop catalog mapping entry names to tower kinds and refund values.
#[derive(Debug)]
pub struct ShopCatalog {
    entries: Vec<CatalogEntry>,
}

#[derive(Debug)]
struct CatalogEntry {
    name: &'static str,
    kind: TowerKind,
}

impl ShopCatalog {
    /// Builds the standard four-entry catalog.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            entries: vec![
                CatalogEntry {
                    name: TowerKind::Launcher.name(),
                    kind: TowerKind::Launcher,
                },
                CatalogEntry {
                    name: TowerKind::Scratcher.name(),
                    kind: TowerKind::Scratcher,
                },
                CatalogEntry {
                    name: TowerKind::Generator.name(),
                    kind: TowerKind::Generator,
                },
                CatalogEntry {
                    name: TowerKind::Shield.name(),
                    kind: TowerKind::Shield,
                },
            ],
        }
    }

    /// Refund credited when selling the named entry: half the purchase cost,
    /// floored. Unknown names refund nothing and log a diagnostic.
    #[must_use]
    pub fn refund_for_name(&self, name: &str) -> f32 {
        match self.entries.iter().find(|entry| entry.name == name) {
            Some(entry) => (entry.kind.cost() / 2.0).floor(),
            None => {
                log::warn!("refund requested for unknown shop entry {name:?}");
                0.0
            }
        }
    }

    /// Refund credited when selling a tower of the provided kind.
    #[must_use]
    pub fn refund_for_kind(&self, kind: TowerKind) -> f32 {
        self.refund_for_name(kind.name())
    }
}

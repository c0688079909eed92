//! Robot state: pose, energy, inventory, and pickup history.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Direction;

/// An integer cell coordinate on the mission grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GridPos {
    /// Column, increasing eastward.
    pub x: i32,
    /// Row, increasing southward.
    pub y: i32,
}

impl GridPos {
    /// Create a position from raw coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another cell.
    pub const fn manhattan_distance(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Chebyshev distance to another cell (8-neighborhood adjacency).
    pub fn chebyshev_distance(self, other: Self) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl core::fmt::Display for GridPos {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// One pickup event: what was taken and from which cell.
///
/// The cell matters for delivery checks: dropping an item back where it
/// was taken never counts as delivering it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PickupRecord {
    /// Inventory label of the item.
    pub item: String,
    /// Cell the item was taken from.
    pub position: GridPos,
}

/// The simulated robot's mutable state.
///
/// Owned exclusively by the executor during a run and replaced wholesale
/// on reset. `picked_up_items` is append-only within a run: it is the
/// only evidence some objective checks have that a since-undone pickup
/// ever happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RobotState {
    /// Current cell. Always within grid bounds while running.
    pub position: GridPos,
    /// Current facing direction.
    pub direction: Direction,
    /// Remaining energy. Monotonically non-increasing during a run;
    /// dropping below zero is a fatal battery-depleted condition.
    pub energy: f64,
    /// Items currently carried, in pickup order (top of stack last).
    pub inventory: Vec<String>,
    /// Every pickup this run, with the cell it happened on. Never
    /// cleared by movement or put-down; reset only with the whole state.
    pub picked_up_items: Vec<PickupRecord>,
}

impl RobotState {
    /// Create a robot at a start pose with full energy and nothing carried.
    pub const fn new(position: GridPos, direction: Direction, energy: f64) -> Self {
        Self {
            position,
            direction,
            energy,
            inventory: Vec::new(),
            picked_up_items: Vec::new(),
        }
    }

    /// The cell directly ahead in the current facing direction.
    pub const fn ahead(&self) -> GridPos {
        self.direction.step(self.position)
    }

    /// Record a pickup at the robot's current cell: the item goes into
    /// the inventory and the append-only history.
    pub fn record_pickup(&mut self, item: String) {
        self.picked_up_items.push(PickupRecord {
            item: item.clone(),
            position: self.position,
        });
        self.inventory.push(item);
    }

    /// The cell a carried item was most recently picked up from.
    pub fn pickup_cell_of(&self, item: &str) -> Option<GridPos> {
        self.picked_up_items
            .iter()
            .rev()
            .find(|rec| rec.item == item)
            .map(|rec| rec.position)
    }

    /// Pop the top inventory item, if any.
    pub fn pop_item(&mut self) -> Option<String> {
        self.inventory.pop()
    }

    /// Whether anything is currently carried.
    pub fn has_item(&self) -> bool {
        !self.inventory.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ahead_follows_facing() {
        let robot = RobotState::new(GridPos::new(2, 2), Direction::East, 100.0);
        assert_eq!(robot.ahead(), GridPos::new(3, 2));
    }

    #[test]
    fn pickup_appends_to_history_and_inventory() {
        let mut robot = RobotState::new(GridPos::new(0, 0), Direction::North, 100.0);
        robot.record_pickup("crystal".to_owned());
        robot.position = GridPos::new(3, 0);
        robot.record_pickup("ore".to_owned());
        assert_eq!(robot.inventory, vec!["crystal", "ore"]);
        let history: Vec<&str> = robot.picked_up_items.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(history, vec!["crystal", "ore"]);

        // Put-down pops the top item but history keeps both.
        assert_eq!(robot.pop_item().as_deref(), Some("ore"));
        assert_eq!(robot.inventory, vec!["crystal"]);
        assert_eq!(robot.picked_up_items.len(), 2);
    }

    #[test]
    fn pickup_cell_remembers_where_an_item_came_from() {
        let mut robot = RobotState::new(GridPos::new(5, 2), Direction::East, 100.0);
        robot.record_pickup("sample".to_owned());
        robot.position = GridPos::new(1, 6);
        assert_eq!(robot.pickup_cell_of("sample"), Some(GridPos::new(5, 2)));
        assert_eq!(robot.pickup_cell_of("ghost"), None);
    }

    #[test]
    fn manhattan_and_chebyshev() {
        let a = GridPos::new(2, 7);
        let b = GridPos::new(5, 2);
        assert_eq!(a.manhattan_distance(b), 8);
        assert_eq!(a.chebyshev_distance(b), 5);
    }
}

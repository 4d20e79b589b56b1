use glam::IVec2;

use crate::api::types::Direction;

/// Directional input state for a controllable entity.
/// `last_direction` is the mask seen on the previous tick; `grab` is whether
/// the grab key is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Input {
    pub direction: Direction,
    pub last_direction: Direction,
    pub grab: bool,
}

impl Input {
    /// Shift the current mask into `last_direction` and store `mask`.
    pub fn advance(&mut self, mask: Direction) {
        self.last_direction = self.direction;
        self.direction = mask;
    }

    /// Direction pressed this tick that was not held on the previous one.
    pub fn fresh_step(&self) -> IVec2 {
        self.intent(true)
    }

    /// Bits that count as intent this tick.
    /// Edge-triggered input only accepts bits that were not held last tick.
    pub fn active(&self, edge_triggered: bool) -> Direction {
        if edge_triggered {
            self.direction.pressed_since(self.last_direction)
        } else {
            self.direction
        }
    }

    /// Single-axis grid step for this tick's intent, or zero when idle.
    pub fn intent(&self, edge_triggered: bool) -> IVec2 {
        self.active(edge_triggered).primary_step()
    }
}

//! Player movement and wall collision

use glam::IVec2;

use super::map::MapData;
use super::state::{Direction, Player};
use crate::consts::MOVE_STAMINA_COST;
use crate::error::{GameError, Result};

/// A validated single-cell cardinal step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step(Direction);

impl Step {
    pub fn new(direction: Direction) -> Self {
        Self(direction)
    }

    /// Build a step from a raw delta. Exactly one axis must be +-1 and the other 0;
    /// `(0, 0)` is not a move.
    pub fn from_delta(dx: i32, dy: i32) -> Result<Self> {
        let direction = match (dx, dy) {
            (1, 0) => Direction::E,
            (-1, 0) => Direction::W,
            (0, 1) => Direction::S,
            (0, -1) => Direction::N,
            _ => return Err(GameError::InvalidStep { dx, dy }),
        };
        Ok(Self(direction))
    }

    pub fn direction(self) -> Direction {
        self.0
    }

    pub fn delta(self) -> IVec2 {
        self.0.delta()
    }
}

/// Result of a move attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Target cell is off the map or inside a wall; only facing changed
    Blocked,
    /// Player stepped onto the target cell
    Moved,
    /// Player stepped onto a terminal
    TerminalReached,
}

impl MoveOutcome {
    pub fn moved(self) -> bool {
        !matches!(self, MoveOutcome::Blocked)
    }
}

/// Try to step the player one cell.
///
/// Facing always turns toward the step, even when a wall stops it. Accepted moves
/// cost stamina while optical camo is equipped.
pub fn attempt_move(player: &mut Player, step: Step, map: &MapData) -> MoveOutcome {
    player.direction = step.direction();

    let target = player.pos + step.delta();
    if !map.is_walkable(target) {
        return MoveOutcome::Blocked;
    }

    player.pos = target;
    if player.suit.has_camo() {
        player.set_stamina(player.stamina() - MOVE_STAMINA_COST);
    }

    if map.terminal_at(target).is_some() {
        MoveOutcome::TerminalReached
    } else {
        MoveOutcome::Moved
    }
}

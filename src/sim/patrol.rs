//! Guard patrol stepping and player detection
//!
//! Guards ping-pong between two waypoints with no pathfinding: each tick they
//! take one cell toward the current endpoint, resolving x before y. A guard keeps
//! its endpoint until it stands on it, then turns for the other one.

use glam::IVec2;

use super::state::{Direction, Guard};
use crate::cell_distance;
use crate::consts::{DETECTION_RADIUS, DETECTION_RADIUS_LIT};

/// Waypoint the guard is walking toward, turning around if it has arrived
pub fn patrol_target(guard: &mut Guard) -> IVec2 {
    if guard.pos == guard.patrol_route[guard.heading] {
        guard.heading = 1 - guard.heading;
    }
    guard.patrol_route[guard.heading]
}

/// One-cell step from `pos` toward `target`, x axis first. `None` when already there.
pub fn step_toward(pos: IVec2, target: IVec2) -> Option<Direction> {
    if pos.x < target.x {
        Some(Direction::E)
    } else if pos.x > target.x {
        Some(Direction::W)
    } else if pos.y < target.y {
        Some(Direction::S)
    } else if pos.y > target.y {
        Some(Direction::N)
    } else {
        None
    }
}

/// Detection radius for the player's current visibility
pub fn detection_radius(cloak_active: bool) -> f32 {
    if cloak_active {
        DETECTION_RADIUS_LIT
    } else {
        DETECTION_RADIUS
    }
}

/// True if a guard at `guard_pos` spots the player
pub fn detects(guard_pos: IVec2, player_pos: IVec2, cloak_active: bool) -> bool {
    cell_distance(guard_pos, player_pos) < detection_radius(cloak_active)
}

/// Advance a guard one patrol step and report whether it sees the player from
/// its new cell. Guard state is left for the tick integrator to update.
pub fn advance_guard(guard: &mut Guard, player_pos: IVec2, cloak_active: bool) -> bool {
    if guard.state.moves() {
        let target = patrol_target(guard);
        if let Some(dir) = step_toward(guard.pos, target) {
            guard.pos += dir.delta();
            guard.direction = dir;
        }
    }

    guard.state.watches() && detects(guard.pos, player_pos, cloak_active)
}

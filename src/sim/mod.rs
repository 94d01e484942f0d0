//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only (the shell owns the timer)
//! - Stable iteration order (guards in spawn order)
//! - No rendering, audio, network or platform dependencies

pub mod map;
pub mod movement;
pub mod patrol;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use map::{FACILITY, Item, ItemKind, MapData, Terminal, Wall};
pub use movement::{MoveOutcome, Step, attempt_move};
pub use patrol::{advance_guard, detection_radius, patrol_target};
pub use session::{Command, Cue, Effect, Session};
pub use snapshot::Snapshot;
pub use state::{
    Direction, Guard, GuardState, Player, SUITS, SessionStatus, Suit, SuitId, WEAPONS, Weapon,
    WeaponKind,
};
pub use tick::{TickReport, tick};

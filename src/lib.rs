//! Silent Kapten - a top-down grid stealth game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, guard patrols, alert/stamina, session)
//! - `narrative`: Briefing and codec dialogue from a text generation service
//! - `renderer`: Text board drawn from a session snapshot
//! - `platform`: Key mapping shared by the browser and terminal shells
//! - `settings`: Persisted preferences and service configuration
//! - `audio`: Web Audio cue player (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod narrative;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{GameError, Result};
pub use settings::{NarrativeConfig, Settings};

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Map is a square grid of this many cells per side
    pub const GRID_SIZE: i32 = 20;

    /// Fixed simulation tick interval while a mission is running
    pub const TICK_INTERVAL_MS: u32 = 400;
    /// Delay between touching the terminal and the mission completing (lets the hack cue play)
    pub const SUCCESS_DELAY_MS: u32 = 800;

    /// Stamina and alert meters are clamped to [0, METER_MAX]
    pub const METER_MAX: f32 = 100.0;
    /// Stamina is kept to this many steps per point so repeated drains land on 0 exactly
    pub const STAMINA_STEPS_PER_POINT: f32 = 100.0;

    /// Stamina cost per accepted move while wearing optical camo
    pub const MOVE_STAMINA_COST: f32 = 0.2;
    /// Stamina drain per tick with the cloak running
    pub const CLOAK_DRAIN_PER_TICK: f32 = 1.5;
    /// Passive stamina drain per tick with optical camo equipped but cloak off
    pub const CAMO_UPKEEP_PER_TICK: f32 = 0.2;

    /// Alert gained on a tick where any guard sees the player
    pub const ALERT_RISE: f32 = 25.0;
    /// Alert lost on a tick where no guard sees the player
    pub const ALERT_DECAY: f32 = 5.0;

    /// Detection radius (cells) with the cloak/flashlight off
    pub const DETECTION_RADIUS: f32 = 4.0;
    /// Detection radius (cells) with the cloak/flashlight on - the beam gives the player away
    pub const DETECTION_RADIUS_LIT: f32 = 6.0;
}

/// True if the cell lies inside the map grid
#[inline]
pub fn in_bounds(cell: IVec2) -> bool {
    (0..consts::GRID_SIZE).contains(&cell.x) && (0..consts::GRID_SIZE).contains(&cell.y)
}

/// Euclidean distance between two grid cells
#[inline]
pub fn cell_distance(a: IVec2, b: IVec2) -> f32 {
    a.as_vec2().distance(b.as_vec2())
}

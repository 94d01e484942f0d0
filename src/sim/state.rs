//! Entity state: player, guards, equipment catalogs and session status
//!
//! Everything a session owns for the lifetime of one mission lives here.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{METER_MAX, STAMINA_STEPS_PER_POINT};

/// Top-level session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Title screen with the mission briefing
    Menu,
    /// Mission running; the tick loop is active
    Playing,
    /// Codec call open; simulation frozen
    Radio,
    /// Alert maxed out (terminal)
    Caught,
    /// Mainframe hacked (terminal)
    Success,
}

impl SessionStatus {
    /// True once the mission has ended one way or the other
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Caught | SessionStatus::Success)
    }
}

/// Cardinal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    N,
    S,
    E,
    W,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::N, Direction::S, Direction::E, Direction::W];

    /// Unit grid delta (y grows southward)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::N => IVec2::NEG_Y,
            Direction::S => IVec2::Y,
            Direction::E => IVec2::X,
            Direction::W => IVec2::NEG_X,
        }
    }
}

/// Suit catalog identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuitId {
    Tactical,
    Sneaking,
    Optical,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Suit {
    pub id: SuitId,
    pub name: &'static str,
    pub description: &'static str,
    pub stealth_mod: f32,
    pub armor_mod: f32,
}

impl Suit {
    /// Only optical camo powers the cloak (and pays stamina for it)
    pub fn has_camo(&self) -> bool {
        self.id == SuitId::Optical
    }
}

pub const SUITS: [Suit; 3] = [
    Suit {
        id: SuitId::Tactical,
        name: "Tactical Armor",
        description: "Standard high-durability gear.",
        stealth_mod: 1.0,
        armor_mod: 1.2,
    },
    Suit {
        id: SuitId::Sneaking,
        name: "Sneaking Suit",
        description: "Dampens footstep noise.",
        stealth_mod: 1.5,
        armor_mod: 0.8,
    },
    Suit {
        id: SuitId::Optical,
        name: "Optical Camo",
        description: "Bends light around the user.",
        stealth_mod: 2.5,
        armor_mod: 0.5,
    },
];

/// Look up a suit in the catalog
pub fn suit(id: SuitId) -> Suit {
    match id {
        SuitId::Tactical => SUITS[0],
        SuitId::Sneaking => SUITS[1],
        SuitId::Optical => SUITS[2],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeaponKind {
    Lethal,
    NonLethal,
}

/// Carried weapon (display only, there is no firing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Weapon {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: WeaponKind,
    pub ammo: u32,
}

pub const WEAPONS: [Weapon; 3] = [
    Weapon {
        id: "mk22",
        name: "Mk22 Hush Puppy",
        kind: WeaponKind::NonLethal,
        ammo: 8,
    },
    Weapon {
        id: "socom",
        name: "SOCOM .45",
        kind: WeaponKind::Lethal,
        ammo: 12,
    },
    Weapon {
        id: "m4",
        name: "M4 Carbine",
        kind: WeaponKind::Lethal,
        ammo: 30,
    },
];

/// Guard behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuardState {
    /// Standing post: holds position but still watches
    Idle,
    /// Walking the patrol route
    Patrol,
    /// Saw the player on the last tick; keeps walking the route
    Alert,
    /// Knocked out: neither moves nor sees until the countdown ends
    Stunned { ticks: u32 },
}

impl GuardState {
    /// Whether the guard takes a patrol step this tick
    pub fn moves(self) -> bool {
        matches!(self, GuardState::Patrol | GuardState::Alert)
    }

    /// Whether the guard can detect the player this tick
    pub fn watches(self) -> bool {
        !matches!(self, GuardState::Stunned { .. })
    }
}

/// A patrolling guard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guard {
    pub id: String,
    pub pos: IVec2,
    pub direction: Direction,
    /// Always exactly two waypoints; the guard walks back and forth between them
    pub patrol_route: [IVec2; 2],
    /// Index into `patrol_route` of the waypoint being walked to; flips on arrival
    pub heading: usize,
    pub state: GuardState,
}

impl Guard {
    /// A guard on its first waypoint sets off for the second; anywhere else it
    /// walks to the first.
    pub fn new(id: &str, pos: IVec2, direction: Direction, patrol_route: [IVec2; 2]) -> Self {
        let heading = if pos == patrol_route[0] { 1 } else { 0 };
        Self {
            id: id.to_string(),
            pos,
            direction,
            patrol_route,
            heading,
            state: GuardState::Patrol,
        }
    }

    /// Knock the guard out for a number of ticks
    pub fn stun(&mut self, ticks: u32) {
        if ticks > 0 {
            self.state = GuardState::Stunned { ticks };
        }
    }

    /// Advance the state machine after this tick's detection result
    pub fn update_state(&mut self, detected: bool) {
        self.state = match self.state {
            GuardState::Stunned { ticks } if ticks > 1 => GuardState::Stunned { ticks: ticks - 1 },
            GuardState::Stunned { .. } => GuardState::Patrol,
            GuardState::Idle => GuardState::Idle,
            GuardState::Patrol | GuardState::Alert if detected => GuardState::Alert,
            GuardState::Patrol | GuardState::Alert => GuardState::Patrol,
        };
    }
}

/// Guards present at mission start
pub fn initial_guards() -> Vec<Guard> {
    vec![
        Guard::new(
            "g1",
            IVec2::new(5, 3),
            Direction::E,
            [IVec2::new(5, 3), IVec2::new(15, 3)],
        ),
        Guard::new(
            "g2",
            IVec2::new(10, 8),
            Direction::S,
            [IVec2::new(10, 8), IVec2::new(10, 15)],
        ),
    ]
}

/// Player spawn cell
pub const PLAYER_START: IVec2 = IVec2::new(2, 17);

/// The player's operative
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub pos: IVec2,
    pub direction: Direction,
    pub health: f32,
    stamina: f32,
    pub suit: Suit,
    pub weapon: Weapon,
    /// Carried item names (display only)
    pub items: Vec<String>,
    alert_level: f32,
    cloak_active: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: PLAYER_START,
            direction: Direction::N,
            health: 100.0,
            stamina: METER_MAX,
            suit: suit(SuitId::Tactical),
            weapon: WEAPONS[0],
            items: Vec::new(),
            alert_level: 0.0,
            cloak_active: false,
        }
    }
}

impl Player {
    pub fn stamina(&self) -> f32 {
        self.stamina
    }

    pub fn alert_level(&self) -> f32 {
        self.alert_level
    }

    pub fn cloak_active(&self) -> bool {
        self.cloak_active
    }

    /// Set stamina, rounded to hundredths and clamped to [0, 100]; an empty tank
    /// shuts the cloak off
    pub fn set_stamina(&mut self, value: f32) {
        let rounded = (value * STAMINA_STEPS_PER_POINT).round() / STAMINA_STEPS_PER_POINT;
        self.stamina = rounded.clamp(0.0, METER_MAX);
        if self.stamina <= 0.0 {
            // Also folds -0.0 into 0.0
            self.stamina = 0.0;
            self.cloak_active = false;
        }
    }

    /// Set the alert meter, clamped to [0, 100]
    pub fn set_alert_level(&mut self, value: f32) {
        self.alert_level = value.clamp(0.0, METER_MAX);
    }

    /// Flip the cloak. Returns false (and changes nothing) without optical camo
    /// or with an empty stamina tank.
    pub fn toggle_cloak(&mut self) -> bool {
        if !self.suit.has_camo() {
            return false;
        }
        if !self.cloak_active && self.stamina <= 0.0 {
            return false;
        }
        self.cloak_active = !self.cloak_active;
        true
    }

    /// Swap suits; losing optical camo drops the cloak
    pub fn equip_suit(&mut self, id: SuitId) {
        self.suit = suit(id);
        if !self.suit.has_camo() {
            self.cloak_active = false;
        }
    }
}

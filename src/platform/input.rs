//! Key mapping
//!
//! Keys are discrete events, never polled state. Gating by session status is the
//! session's job; this layer only names what was pressed.

use crate::sim::{Command, Direction};

/// A recognised key press
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Command(Command),
    /// Throw the session away and return to the menu
    Restart,
    /// Mute or unmute cues and remember the choice
    ToggleMute,
    /// Leave the game (terminal shell only)
    Quit,
}

/// Map a browser `KeyboardEvent.key` value (or a single typed character)
pub fn input_for_key(key: &str) -> Option<Input> {
    let command = match key.to_lowercase().as_str() {
        "w" | "arrowup" => Command::Move(Direction::N),
        "s" | "arrowdown" => Command::Move(Direction::S),
        "a" | "arrowleft" => Command::Move(Direction::W),
        "d" | "arrowright" => Command::Move(Direction::E),
        "c" => Command::ToggleCodec,
        "f" => Command::ToggleCloak,
        "enter" | " " => Command::StartMission,
        "r" => return Some(Input::Restart),
        "m" => return Some(Input::ToggleMute),
        "q" | "escape" => return Some(Input::Quit),
        _ => return None,
    };
    Some(Input::Command(command))
}

/// Map a typed terminal line. Each character is one key press; an empty line is Enter.
pub fn inputs_for_line(line: &str) -> Vec<Input> {
    let line = line.trim();
    if line.is_empty() {
        return vec![Input::Command(Command::StartMission)];
    }
    line.chars()
        .filter_map(|c| input_for_key(c.encode_utf8(&mut [0; 4])))
        .collect()
}

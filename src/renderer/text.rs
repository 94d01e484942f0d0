//! Character-cell board and HUD

use glam::IVec2;

use crate::consts::GRID_SIZE;
use crate::sim::{Direction, GuardState, SessionStatus, Snapshot};

const FLOOR: char = '.';
const WALL: char = '#';
const TERMINAL: char = 'T';
const ITEM: char = 'k';
const PLAYER: char = '@';
const PLAYER_CLOAKED: char = '%';

/// Guard glyph shows facing; stunned guards are drawn flat
fn guard_glyph(direction: Direction, state: GuardState) -> char {
    if let GuardState::Stunned { .. } = state {
        return 'z';
    }
    match direction {
        Direction::N => '^',
        Direction::S => 'v',
        Direction::E => '>',
        Direction::W => '<',
    }
}

/// One string per grid row, top to bottom
pub fn board_lines(snap: &Snapshot) -> Vec<String> {
    let size = GRID_SIZE as usize;
    let mut cells = vec![vec![FLOOR; size]; size];

    let mut put = |pos: IVec2, glyph: char| {
        if crate::in_bounds(pos) {
            cells[pos.y as usize][pos.x as usize] = glyph;
        }
    };

    for wall in snap.map.walls {
        for y in wall.y..wall.y + wall.h {
            for x in wall.x..wall.x + wall.w {
                put(IVec2::new(x, y), WALL);
            }
        }
    }
    for item in snap.map.items {
        put(item.pos, ITEM);
    }
    for terminal in snap.map.terminals {
        put(terminal.pos, TERMINAL);
    }
    for guard in &snap.guards {
        put(guard.pos, guard_glyph(guard.direction, guard.state));
    }
    let player_glyph = if snap.cloak_active {
        PLAYER_CLOAKED
    } else {
        PLAYER
    };
    put(snap.player.pos, player_glyph);

    cells.into_iter().map(|row| row.into_iter().collect()).collect()
}

/// HUD lines drawn under the board
pub fn hud_lines(snap: &Snapshot, show_key_hints: bool) -> Vec<String> {
    let mut lines = Vec::new();
    match snap.status {
        SessionStatus::Menu => {
            lines.push("METAL GEAR - KAPTEN EDITION".to_string());
            lines.push(format!("Intelligence Briefing: {}", snap.briefing));
            if show_key_hints {
                lines.push("[Enter] start mission".to_string());
            }
            return lines;
        }
        SessionStatus::Radio => {
            lines.push(format!("CODEC {}  COMMANDER: {}", snap.codec_frequency, snap.dialogue));
        }
        SessionStatus::Caught => {
            lines.push("GAME OVER - KAPTEN? KAPTEN!! KAAAAAAPTEN!!!".to_string());
        }
        SessionStatus::Success => {
            lines.push("SUCCESS - MISSION COMPLETE. EXTRACTION TEAM EN ROUTE.".to_string());
        }
        SessionStatus::Playing => {}
    }

    lines.push(format!(
        "LIFE {:>3.0}  STAMINA {:>5.1}  {}{}",
        snap.player.health,
        snap.stamina,
        snap.alert_label(),
        if snap.alert_level > 0.0 {
            format!(" ENEMY AWARENESS: {:.0}%", snap.alert_level)
        } else {
            String::new()
        }
    ));
    lines.push(format!(
        "SUIT {}{}  WEAPON {} AMMO: {}",
        snap.player.suit.name,
        if snap.cloak_active { " [CLOAK]" } else { "" },
        snap.player.weapon.name,
        snap.player.weapon.ammo
    ));
    lines.push(format!("OBJECTIVE: {}", snap.objective));

    if show_key_hints {
        let hint = if snap.status.is_terminal() {
            "[R] restart"
        } else {
            "[WASD/arrows] move  [F] cloak  [C] codec  [M] mute"
        };
        lines.push(hint.to_string());
    }
    lines
}

/// Full frame: board then HUD
pub fn render(snap: &Snapshot, show_key_hints: bool) -> String {
    let mut lines = board_lines(snap);
    lines.extend(hud_lines(snap, show_key_hints));
    lines.join("\n")
}

//! Read-only session view handed to the render surface each frame

use serde::Serialize;

use super::map::MapData;
use super::session::Session;
use super::state::{Guard, Player, SessionStatus};

/// Mission objective shown on the HUD
pub const MISSION_OBJECTIVE: &str = "Infiltrate the Research Lab and hack the Mainframe.";

/// Codec frequency shown during radio calls
pub const CODEC_FREQUENCY: &str = "140.85";

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub status: SessionStatus,
    pub player: Player,
    pub guards: Vec<Guard>,
    pub map: MapData,
    pub alert_level: f32,
    pub stamina: f32,
    pub cloak_active: bool,
    pub briefing: String,
    pub dialogue: String,
    pub objective: &'static str,
    pub codec_frequency: &'static str,
    pub time_ticks: u64,
}

impl Snapshot {
    pub fn capture(session: &Session) -> Self {
        let player = session.player().clone();
        Self {
            status: session.status(),
            alert_level: player.alert_level(),
            stamina: player.stamina(),
            cloak_active: player.cloak_active(),
            player,
            guards: session.guards().to_vec(),
            map: *session.map(),
            briefing: session.briefing().to_string(),
            dialogue: session.dialogue().to_string(),
            objective: MISSION_OBJECTIVE,
            codec_frequency: CODEC_FREQUENCY,
            time_ticks: session.time_ticks(),
        }
    }

    /// HUD status word
    pub fn alert_label(&self) -> &'static str {
        if self.alert_level > 0.0 { "ALERT" } else { "NORMAL" }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

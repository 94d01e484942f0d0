//! Mission session state machine
//!
//! The platform shell never mutates the session directly. Key presses, timer
//! callbacks and finished fetches are all turned into [`Command`]s and fed through
//! [`Session::apply`] one at a time; the session answers with [`Effect`]s that the
//! shell carries out (play a sound, arm or clear the tick timer, start a fetch).

use super::map::{FACILITY, MapData};
use super::movement::{MoveOutcome, Step, attempt_move};
use super::snapshot::Snapshot;
use super::state::{Direction, Guard, Player, SessionStatus, SuitId, initial_guards};
use super::tick::tick;
use crate::consts::SUCCESS_DELAY_MS;
use crate::narrative::{BRIEFING_PLACEHOLDER, DIALOGUE_PLACEHOLDER};

/// Named audio cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Footstep,
    Alert,
    Hack,
    Codec,
}

impl Cue {
    pub fn name(self) -> &'static str {
        match self {
            Cue::Footstep => "footstep",
            Cue::Alert => "alert",
            Cue::Hack => "hack",
            Cue::Codec => "codec",
        }
    }

    /// Relative playback volume
    pub fn volume(self) -> f32 {
        match self {
            Cue::Alert => 0.6,
            _ => 0.3,
        }
    }
}

/// State transition requests
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Leave the menu and start the mission
    StartMission,
    /// Cardinal movement key
    Move(Direction),
    /// Open or close the codec
    ToggleCodec,
    /// Switch the optical camo cloak on or off
    ToggleCloak,
    /// Tick timer fired
    Tick,
    /// Hack delay after reaching the terminal elapsed
    CompleteMission,
    /// Mission briefing text resolved
    BriefingArrived(String),
    /// Codec dialogue resolved for the given radio call
    RadioDialogueArrived { generation: u64, text: String },
}

/// Work for the platform shell
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Cue(Cue),
    /// Arm the repeating tick timer
    StartTicker,
    /// Clear the tick timer; no further `Tick`s should be sent
    StopTicker,
    /// Send `CompleteMission` after the delay
    ScheduleSuccess { delay_ms: u32 },
    /// Fetch codec dialogue and answer with `RadioDialogueArrived`
    FetchRadioDialogue { generation: u64, situation: String },
}

/// One mission: owns the player and guards
#[derive(Debug, Clone)]
pub struct Session {
    status: SessionStatus,
    player: Player,
    guards: Vec<Guard>,
    map: &'static MapData,
    briefing: String,
    dialogue: String,
    /// Bumped on every codec call so late answers for closed calls are dropped
    radio_generation: u64,
    ticker_running: bool,
    success_pending: bool,
    time_ticks: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Menu,
            player: Player::default(),
            guards: initial_guards(),
            map: &FACILITY,
            briefing: BRIEFING_PLACEHOLDER.to_string(),
            dialogue: DIALOGUE_PLACEHOLDER.to_string(),
            radio_generation: 0,
            ticker_running: false,
            success_pending: false,
            time_ticks: 0,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    pub fn map(&self) -> &'static MapData {
        self.map
    }

    pub fn briefing(&self) -> &str {
        &self.briefing
    }

    pub fn dialogue(&self) -> &str {
        &self.dialogue
    }

    pub fn radio_generation(&self) -> u64 {
        self.radio_generation
    }

    pub fn ticker_running(&self) -> bool {
        self.ticker_running
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Situation line sent with codec calls, e.g. `Pos: 10,5. Alert: 25`
    pub fn situation(&self) -> String {
        format!(
            "Pos: {},{}. Alert: {}",
            self.player.pos.x,
            self.player.pos.y,
            self.player.alert_level().round() as i32
        )
    }

    /// Read-only view for the render surface
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Apply one command and return the effects the shell must carry out
    pub fn apply(&mut self, command: Command) -> Vec<Effect> {
        let mut effects = Vec::new();

        match command {
            Command::StartMission => {
                if self.status == SessionStatus::Menu {
                    // The mission always deploys in optical camo
                    self.player.equip_suit(SuitId::Optical);
                    self.set_status(SessionStatus::Playing, &mut effects);
                    log::info!("Mission started");
                }
            }

            Command::Move(direction) => {
                if self.status == SessionStatus::Playing {
                    self.move_player(Step::new(direction), &mut effects);
                }
            }

            Command::ToggleCodec => match self.status {
                SessionStatus::Playing => {
                    self.radio_generation += 1;
                    self.dialogue = DIALOGUE_PLACEHOLDER.to_string();
                    effects.push(Effect::Cue(Cue::Codec));
                    self.set_status(SessionStatus::Radio, &mut effects);
                    effects.push(Effect::FetchRadioDialogue {
                        generation: self.radio_generation,
                        situation: self.situation(),
                    });
                }
                SessionStatus::Radio => {
                    self.dialogue = DIALOGUE_PLACEHOLDER.to_string();
                    effects.push(Effect::Cue(Cue::Codec));
                    self.set_status(SessionStatus::Playing, &mut effects);
                }
                _ => {}
            },

            Command::ToggleCloak => {
                if self.status == SessionStatus::Playing && self.player.toggle_cloak() {
                    log::debug!("Cloak {}", if self.player.cloak_active() { "on" } else { "off" });
                }
            }

            Command::Tick => {
                if self.status == SessionStatus::Playing {
                    self.run_tick(&mut effects);
                } else {
                    log::debug!("Dropped stray tick in {:?}", self.status);
                }
            }

            Command::CompleteMission => {
                if self.success_pending
                    && matches!(self.status, SessionStatus::Playing | SessionStatus::Radio)
                {
                    self.set_status(SessionStatus::Success, &mut effects);
                    log::info!("Mission complete after {} ticks", self.time_ticks);
                }
            }

            Command::BriefingArrived(text) => {
                self.briefing = text;
            }

            Command::RadioDialogueArrived { generation, text } => {
                if self.status == SessionStatus::Radio && generation == self.radio_generation {
                    self.dialogue = text;
                } else {
                    log::debug!(
                        "Dropped codec reply for call {} (current {})",
                        generation,
                        self.radio_generation
                    );
                }
            }
        }

        effects
    }

    /// Stop all recurring work; the session is about to be dropped
    pub fn teardown(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.ticker_running {
            self.ticker_running = false;
            effects.push(Effect::StopTicker);
        }
        // Invalidate any codec reply still in flight
        self.radio_generation += 1;
        effects
    }

    /// Tear down and start over at the menu, keeping the briefing
    pub fn restart(&mut self) -> Vec<Effect> {
        let effects = self.teardown();
        let fresh = Self {
            briefing: std::mem::take(&mut self.briefing),
            radio_generation: self.radio_generation,
            ..Self::new()
        };
        *self = fresh;
        log::info!("Session restarted");
        effects
    }

    fn move_player(&mut self, step: Step, effects: &mut Vec<Effect>) {
        match attempt_move(&mut self.player, step, self.map) {
            MoveOutcome::Blocked => {}
            MoveOutcome::Moved => effects.push(Effect::Cue(Cue::Footstep)),
            MoveOutcome::TerminalReached => {
                effects.push(Effect::Cue(Cue::Hack));
                effects.push(Effect::Cue(Cue::Footstep));
                if !self.success_pending {
                    self.success_pending = true;
                    effects.push(Effect::ScheduleSuccess {
                        delay_ms: SUCCESS_DELAY_MS,
                    });
                    log::info!("Terminal reached at {}", self.player.pos);
                }
            }
        }
    }

    fn run_tick(&mut self, effects: &mut Vec<Effect>) {
        self.time_ticks += 1;
        let report = tick(&mut self.player, &mut self.guards);

        if report.alert_raised {
            effects.push(Effect::Cue(Cue::Alert));
        }
        if report.caught {
            log::info!("Caught at {} after {} ticks", self.player.pos, self.time_ticks);
            self.set_status(SessionStatus::Caught, effects);
        }
    }

    /// Change status, arming the ticker on entry to Playing and clearing it on exit
    fn set_status(&mut self, status: SessionStatus, effects: &mut Vec<Effect>) {
        let was_playing = self.status == SessionStatus::Playing;
        let now_playing = status == SessionStatus::Playing;
        self.status = status;

        if now_playing && !self.ticker_running {
            self.ticker_running = true;
            effects.push(Effect::StartTicker);
        } else if was_playing && !now_playing && self.ticker_running {
            self.ticker_running = false;
            effects.push(Effect::StopTicker);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    fn playing() -> Session {
        let mut session = Session::new();
        session.apply(Command::StartMission);
        session
    }

    #[test]
    fn test_start_mission_equips_camo_and_arms_ticker() {
        let mut session = Session::new();
        assert_eq!(session.status(), SessionStatus::Menu);

        let effects = session.apply(Command::StartMission);
        assert_eq!(effects, vec![Effect::StartTicker]);
        assert_eq!(session.status(), SessionStatus::Playing);
        assert_eq!(session.player().suit.id, SuitId::Optical);

        // Only from the menu
        assert!(session.apply(Command::StartMission).is_empty());
    }

    #[test]
    fn test_menu_ignores_gameplay_input() {
        let mut session = Session::new();
        assert!(session.apply(Command::Move(Direction::N)).is_empty());
        assert!(session.apply(Command::ToggleCodec).is_empty());
        assert!(session.apply(Command::ToggleCloak).is_empty());
        assert!(session.apply(Command::Tick).is_empty());
        assert_eq!(session.player().pos, IVec2::new(2, 17));
        assert_eq!(session.status(), SessionStatus::Menu);
        assert_eq!(session.time_ticks(), 0);
    }

    #[test]
    fn test_footstep_only_on_accepted_moves() {
        let mut session = playing();
        assert_eq!(
            session.apply(Command::Move(Direction::W)),
            vec![Effect::Cue(Cue::Footstep)]
        );
        // Border wall
        assert!(session.apply(Command::Move(Direction::W)).is_empty());
        assert_eq!(session.player().direction, Direction::W);
    }

    #[test]
    fn test_codec_round_trip_stops_and_restarts_ticker() {
        let mut session = playing();
        let effects = session.apply(Command::ToggleCodec);
        assert_eq!(
            effects,
            vec![
                Effect::Cue(Cue::Codec),
                Effect::StopTicker,
                Effect::FetchRadioDialogue {
                    generation: 1,
                    situation: "Pos: 2,17. Alert: 0".into(),
                },
            ]
        );
        assert_eq!(session.status(), SessionStatus::Radio);
        assert!(!session.ticker_running());

        // Frozen while on the codec
        assert!(session.apply(Command::Move(Direction::N)).is_empty());
        assert!(session.apply(Command::ToggleCloak).is_empty());
        assert!(session.apply(Command::Tick).is_empty());
        assert_eq!(session.time_ticks(), 0);

        let effects = session.apply(Command::ToggleCodec);
        assert_eq!(effects, vec![Effect::Cue(Cue::Codec), Effect::StartTicker]);
        assert_eq!(session.status(), SessionStatus::Playing);
    }

    #[test]
    fn test_stale_codec_reply_is_dropped() {
        let mut session = playing();
        session.apply(Command::ToggleCodec);
        session.apply(Command::ToggleCodec);
        session.apply(Command::ToggleCodec);
        assert_eq!(session.radio_generation(), 2);

        session.apply(Command::RadioDialogueArrived {
            generation: 1,
            text: "old news".into(),
        });
        assert_eq!(session.dialogue(), DIALOGUE_PLACEHOLDER);

        session.apply(Command::RadioDialogueArrived {
            generation: 2,
            text: "Snake, stay low.".into(),
        });
        assert_eq!(session.dialogue(), "Snake, stay low.");

        // Reply for the current call after it closed
        session.apply(Command::ToggleCodec);
        session.apply(Command::RadioDialogueArrived {
            generation: 2,
            text: "too late".into(),
        });
        assert_eq!(session.dialogue(), DIALOGUE_PLACEHOLDER);
    }

    #[test]
    fn test_briefing_applies_in_any_state() {
        let mut session = Session::new();
        assert_eq!(session.briefing(), BRIEFING_PLACEHOLDER);
        session.apply(Command::BriefingArrived("Operation Silent Kapten.".into()));
        assert_eq!(session.briefing(), "Operation Silent Kapten.");
    }

    #[test]
    fn test_cloak_toggle_only_while_playing() {
        let mut session = playing();
        session.apply(Command::ToggleCloak);
        assert!(session.player().cloak_active());
        session.apply(Command::ToggleCloak);
        assert!(!session.player().cloak_active());
    }

    #[test]
    fn test_terminal_schedules_success_once() {
        let mut session = playing();
        session.player.pos = IVec2::new(17, 2);
        let effects = session.apply(Command::Move(Direction::E));
        assert_eq!(
            effects,
            vec![
                Effect::Cue(Cue::Hack),
                Effect::Cue(Cue::Footstep),
                Effect::ScheduleSuccess {
                    delay_ms: SUCCESS_DELAY_MS
                },
            ]
        );
        // Still playing until the delay fires
        assert_eq!(session.status(), SessionStatus::Playing);

        session.apply(Command::Move(Direction::W));
        let effects = session.apply(Command::Move(Direction::E));
        assert!(!effects.iter().any(|e| matches!(e, Effect::ScheduleSuccess { .. })));

        let effects = session.apply(Command::CompleteMission);
        assert_eq!(effects, vec![Effect::StopTicker]);
        assert_eq!(session.status(), SessionStatus::Success);
    }

    #[test]
    fn test_complete_without_terminal_is_ignored() {
        let mut session = playing();
        assert!(session.apply(Command::CompleteMission).is_empty());
        assert_eq!(session.status(), SessionStatus::Playing);
    }

    #[test]
    fn test_caught_is_final() {
        let mut session = playing();
        session.player.pos = IVec2::new(6, 4);
        session.player.set_alert_level(100.0);

        let effects = session.apply(Command::Tick);
        assert_eq!(effects, vec![Effect::StopTicker]);
        assert_eq!(session.status(), SessionStatus::Caught);

        assert!(session.apply(Command::Tick).is_empty());
        assert!(session.apply(Command::ToggleCodec).is_empty());
        assert!(session.apply(Command::CompleteMission).is_empty());
        assert_eq!(session.status(), SessionStatus::Caught);
    }

    #[test]
    fn test_first_sighting_plays_alert_cue() {
        let mut session = playing();
        session.player.pos = IVec2::new(6, 4);
        let effects = session.apply(Command::Tick);
        assert_eq!(effects, vec![Effect::Cue(Cue::Alert)]);
        assert_eq!(session.player().alert_level(), 25.0);
    }

    #[test]
    fn test_teardown_clears_ticker() {
        let mut session = playing();
        assert_eq!(session.teardown(), vec![Effect::StopTicker]);
        assert!(session.teardown().is_empty());
    }

    #[test]
    fn test_restart_keeps_briefing() {
        let mut session = playing();
        session.apply(Command::BriefingArrived("Infiltrate.".into()));
        session.apply(Command::Move(Direction::N));

        let effects = session.restart();
        assert_eq!(effects, vec![Effect::StopTicker]);
        assert_eq!(session.status(), SessionStatus::Menu);
        assert_eq!(session.player().pos, IVec2::new(2, 17));
        assert_eq!(session.briefing(), "Infiltrate.");
        assert!(session.radio_generation() > 0);
    }
}

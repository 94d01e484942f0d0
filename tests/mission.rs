//! Whole missions driven through the public session API, with a fake shell
//! standing in for the browser timers.

use glam::IVec2;
use silent_kapten::narrative::DIALOGUE_PLACEHOLDER;
use silent_kapten::platform::{Input, inputs_for_line};
use silent_kapten::renderer;
use silent_kapten::sim::{Command, Cue, Direction, Effect, Session, SessionStatus};

/// Records effects and enforces the ticker contract a real shell relies on
#[derive(Default)]
struct FakeShell {
    session: Session,
    ticker_armed: bool,
    cues: Vec<Cue>,
    pending_success: Vec<u32>,
    fetches: Vec<(u64, String)>,
}

impl FakeShell {
    fn send(&mut self, command: Command) {
        let effects = self.session.apply(command);
        self.carry_out(effects);
    }

    fn carry_out(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Cue(cue) => self.cues.push(cue),
                Effect::StartTicker => {
                    assert!(!self.ticker_armed, "ticker started twice");
                    self.ticker_armed = true;
                }
                Effect::StopTicker => {
                    assert!(self.ticker_armed, "stopped a ticker that was not running");
                    self.ticker_armed = false;
                }
                Effect::ScheduleSuccess { delay_ms } => self.pending_success.push(delay_ms),
                Effect::FetchRadioDialogue {
                    generation,
                    situation,
                } => self.fetches.push((generation, situation)),
            }
        }
        assert_eq!(self.ticker_armed, self.session.ticker_running());
    }

    /// One timer firing; a real interval never fires while cleared
    fn tick(&mut self) {
        if self.ticker_armed {
            self.send(Command::Tick);
        }
    }

    fn walk(&mut self, direction: Direction, steps: usize) {
        for _ in 0..steps {
            self.send(Command::Move(direction));
        }
    }

    fn fire_success_timers(&mut self) {
        for _ in std::mem::take(&mut self.pending_success) {
            self.send(Command::CompleteMission);
        }
    }
}

#[test]
fn test_mission_to_terminal_succeeds() {
    let mut shell = FakeShell::default();
    shell.send(Command::BriefingArrived("Infiltrate the facility.".into()));
    shell.send(Command::StartMission);
    assert!(shell.ticker_armed);

    // Up the west corridor, then along the north wall to the mainframe
    shell.walk(Direction::N, 15);
    assert_eq!(shell.session.player().pos, IVec2::new(2, 2));
    shell.walk(Direction::E, 16);
    assert_eq!(shell.session.player().pos, IVec2::new(18, 2));

    assert_eq!(shell.cues.iter().filter(|c| **c == Cue::Hack).count(), 1);
    assert_eq!(shell.pending_success, vec![800]);
    assert_eq!(shell.session.status(), SessionStatus::Playing);

    shell.fire_success_timers();
    assert_eq!(shell.session.status(), SessionStatus::Success);
    assert!(!shell.ticker_armed);

    // Frozen once the mission is over
    shell.walk(Direction::W, 3);
    shell.tick();
    assert_eq!(shell.session.player().pos, IVec2::new(18, 2));
    assert_eq!(shell.session.time_ticks(), 0);

    let frame = renderer::render(&shell.session.snapshot(), true);
    assert!(frame.contains("MISSION COMPLETE"));
    assert!(frame.contains("[R] restart"));
}

#[test]
fn test_standing_in_a_patrol_lane_gets_caught() {
    let mut shell = FakeShell::default();
    shell.send(Command::StartMission);

    // Into the middle of the south guard's lane
    shell.walk(Direction::N, 10);
    shell.walk(Direction::E, 8);
    shell.walk(Direction::S, 5);
    assert_eq!(shell.session.player().pos, IVec2::new(10, 12));

    for _ in 0..4 {
        shell.tick();
    }
    assert_eq!(shell.session.player().alert_level(), 100.0);
    assert_eq!(shell.session.status(), SessionStatus::Playing);

    shell.tick();
    assert_eq!(shell.session.status(), SessionStatus::Caught);
    assert_eq!(shell.session.time_ticks(), 5);
    assert!(!shell.ticker_armed);

    // Only the first sighting sounds the alarm
    assert_eq!(shell.cues.iter().filter(|c| **c == Cue::Alert).count(), 1);

    // A late timer after capture cannot complete the mission
    shell.send(Command::CompleteMission);
    assert_eq!(shell.session.status(), SessionStatus::Caught);
}

#[test]
fn test_alert_decays_once_out_of_sight() {
    let mut shell = FakeShell::default();
    shell.send(Command::StartMission);
    shell.walk(Direction::N, 10);
    shell.walk(Direction::E, 8);
    shell.walk(Direction::S, 5);

    shell.tick();
    shell.tick();
    assert_eq!(shell.session.player().alert_level(), 50.0);

    // Back out past the wall and far from both lanes
    shell.walk(Direction::N, 5);
    shell.walk(Direction::W, 8);
    shell.walk(Direction::S, 10);
    assert_eq!(shell.session.player().pos, IVec2::new(2, 17));

    let before = shell.session.player().alert_level();
    shell.tick();
    assert_eq!(shell.session.player().alert_level(), before - 5.0);
}

#[test]
fn test_codec_call_pauses_the_mission() {
    let mut shell = FakeShell::default();
    shell.send(Command::StartMission);
    shell.tick();
    assert_eq!(shell.session.time_ticks(), 1);

    shell.send(Command::ToggleCodec);
    assert_eq!(shell.session.status(), SessionStatus::Radio);
    assert!(!shell.ticker_armed);
    assert_eq!(shell.fetches, vec![(1, "Pos: 2,17. Alert: 0".to_string())]);

    // Timer is cleared, the player is frozen
    shell.tick();
    shell.walk(Direction::N, 2);
    assert_eq!(shell.session.time_ticks(), 1);
    assert_eq!(shell.session.player().pos, IVec2::new(2, 17));

    shell.send(Command::RadioDialogueArrived {
        generation: 1,
        text: "Snake, the mainframe is north-east.".into(),
    });
    assert_eq!(
        shell.session.snapshot().dialogue,
        "Snake, the mainframe is north-east."
    );

    shell.send(Command::ToggleCodec);
    assert!(shell.ticker_armed);
    assert_eq!(shell.session.dialogue(), DIALOGUE_PLACEHOLDER);
    assert_eq!(
        shell.cues.iter().filter(|c| **c == Cue::Codec).count(),
        2
    );
}

#[test]
fn test_restart_after_capture_from_typed_input() {
    let mut shell = FakeShell::default();
    shell.send(Command::BriefingArrived("Recover the keycard.".into()));

    for input in inputs_for_line("") {
        if let Input::Command(command) = input {
            shell.send(command);
        }
    }
    assert_eq!(shell.session.status(), SessionStatus::Playing);

    for input in inputs_for_line("wwwwwwwwwwddddddddsssss") {
        if let Input::Command(command) = input {
            shell.send(command);
        }
    }
    for _ in 0..5 {
        shell.tick();
    }
    assert_eq!(shell.session.status(), SessionStatus::Caught);

    assert_eq!(inputs_for_line("r"), vec![Input::Restart]);
    let effects = shell.session.restart();
    shell.carry_out(effects);

    let snap = shell.session.snapshot();
    assert_eq!(snap.status, SessionStatus::Menu);
    assert_eq!(snap.briefing, "Recover the keycard.");
    assert_eq!(snap.player.pos, IVec2::new(2, 17));
    assert_eq!(snap.alert_level, 0.0);
    assert_eq!(snap.time_ticks, 0);

    // A fresh mission arms the ticker again
    shell.send(Command::StartMission);
    assert!(shell.ticker_armed);
}

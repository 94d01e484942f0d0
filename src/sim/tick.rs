//! Fixed interval simulation tick
//!
//! Order matters within a tick: stamina settles first (which may shut the cloak
//! off), then guards step and look with that tick's visibility, then the alert
//! meter folds every guard's result in one go.

use glam::IVec2;

use super::patrol::advance_guard;
use super::state::{Guard, Player};
use crate::consts::*;

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Per-guard detection flags, in guard order
    pub detections: Vec<bool>,
    /// Alert meter went up from zero (play the alert cue)
    pub alert_raised: bool,
    /// A guard spotted the player with the meter already full
    pub caught: bool,
}

impl TickReport {
    pub fn any_detection(&self) -> bool {
        self.detections.iter().any(|&d| d)
    }
}

/// Stamina upkeep for one tick: running cloak burns fast, idle camo trickles
pub fn drain_stamina(player: &mut Player) {
    if !player.suit.has_camo() {
        return;
    }
    let drain = if player.cloak_active() {
        CLOAK_DRAIN_PER_TICK
    } else {
        CAMO_UPKEEP_PER_TICK
    };
    player.set_stamina(player.stamina() - drain);
}

/// Fold a tick's detections into the alert meter.
///
/// Every guard is judged against the same pre-tick meter. Any sighting raises the
/// meter once by `ALERT_RISE`; no sighting at all lets it decay by `ALERT_DECAY`.
/// Returns `(alert_raised, caught)`.
pub fn fold_alert(player: &mut Player, detections: &[bool]) -> (bool, bool) {
    let before = player.alert_level();
    let spotted = detections.iter().any(|&d| d);

    if spotted {
        player.set_alert_level(before + ALERT_RISE);
        (before <= 0.0, before >= METER_MAX)
    } else {
        player.set_alert_level(before - ALERT_DECAY);
        (false, false)
    }
}

/// Advance the simulation by one tick
pub fn tick(player: &mut Player, guards: &mut [Guard]) -> TickReport {
    drain_stamina(player);

    let player_pos: IVec2 = player.pos;
    let cloak = player.cloak_active();
    let detections: Vec<bool> = guards
        .iter_mut()
        .map(|guard| {
            let detected = advance_guard(guard, player_pos, cloak);
            guard.update_state(detected);
            detected
        })
        .collect();

    let (alert_raised, caught) = fold_alert(player, &detections);

    if alert_raised {
        log::debug!("Player spotted at {},{}", player_pos.x, player_pos.y);
    }

    TickReport {
        detections,
        alert_raised,
        caught,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Direction, GuardState, SuitId, initial_guards};
    use proptest::prelude::*;

    fn camo_player() -> Player {
        let mut player = Player::default();
        player.equip_suit(SuitId::Optical);
        player
    }

    fn sentry(x: i32, y: i32) -> Guard {
        let mut guard = Guard::new("s", IVec2::new(x, y), Direction::S, [IVec2::new(x, y); 2]);
        guard.state = GuardState::Idle;
        guard
    }

    #[test]
    fn test_stamina_upkeep() {
        let mut player = Player::default();
        tick(&mut player, &mut []);
        assert_eq!(player.stamina(), 100.0);

        let mut player = camo_player();
        tick(&mut player, &mut []);
        assert!((player.stamina() - 99.8).abs() < 1e-4);

        player.toggle_cloak();
        tick(&mut player, &mut []);
        assert!((player.stamina() - 98.3).abs() < 1e-4);
    }

    #[test]
    fn test_cloak_cuts_out_when_stamina_runs_dry() {
        let mut player = camo_player();
        player.toggle_cloak();
        player.set_stamina(1.0);
        tick(&mut player, &mut []);
        assert_eq!(player.stamina(), 0.0);
        assert!(!player.cloak_active());
    }

    #[test]
    fn test_upkeep_empties_the_tank_on_the_exact_tick() {
        let mut player = camo_player();
        // 100 / 0.2 = 500 ticks of upkeep
        for _ in 0..499 {
            drain_stamina(&mut player);
        }
        assert!(player.stamina() > 0.0);
        assert!((player.stamina() - 0.2).abs() < 1e-6);

        let mut idle = player.clone();
        drain_stamina(&mut idle);
        assert_eq!(idle.stamina(), 0.0);

        assert!(player.toggle_cloak());

        // The last drain burns 1.5 with the cloak lit, so it must cut out now
        drain_stamina(&mut player);
        assert_eq!(player.stamina(), 0.0);
        assert!(!player.cloak_active());
        assert!(!player.toggle_cloak());
    }

    #[test]
    fn test_small_drains_reach_zero_exactly() {
        let mut player = camo_player();
        player.set_stamina(1.0);
        player.toggle_cloak();
        for _ in 0..4 {
            player.set_stamina(player.stamina() - 0.2);
            assert!(player.cloak_active());
        }
        player.set_stamina(player.stamina() - 0.2);
        assert_eq!(player.stamina(), 0.0);
        assert!(!player.cloak_active());
    }

    #[test]
    fn test_stamina_runs_before_detection() {
        // Player 5 cells from a sentry: seen only while the cloak is lit.
        // Stamina runs out this tick, so the sentry uses the narrow radius.
        let mut player = camo_player();
        player.pos = IVec2::new(10, 15);
        player.toggle_cloak();
        player.set_stamina(1.0);
        let mut guards = [sentry(10, 10)];

        let report = tick(&mut player, &mut guards);
        assert!(!report.any_detection());
        assert_eq!(player.alert_level(), 0.0);
    }

    #[test]
    fn test_detection_raises_alert_by_25() {
        // Post-step guard at (6,3), player 3 cells away
        let mut player = Player::default();
        player.pos = IVec2::new(6, 6);
        player.set_alert_level(10.0);
        let mut guards = initial_guards();
        guards.truncate(1);

        let report = tick(&mut player, &mut guards);
        assert_eq!(report.detections, vec![true]);
        assert_eq!(player.alert_level(), 35.0);
        assert!(!report.alert_raised);
        assert!(!report.caught);
        assert_eq!(guards[0].state, GuardState::Alert);
    }

    #[test]
    fn test_first_sighting_raises_cue() {
        let mut player = Player::default();
        player.pos = IVec2::new(10, 11);
        let report = tick(&mut player, &mut [sentry(10, 10)]);
        assert!(report.alert_raised);
        assert_eq!(player.alert_level(), 25.0);
    }

    #[test]
    fn test_alert_clamps_at_100() {
        let mut player = Player::default();
        player.pos = IVec2::new(10, 11);
        player.set_alert_level(90.0);
        let report = tick(&mut player, &mut [sentry(10, 10)]);
        assert_eq!(player.alert_level(), 100.0);
        // Meter was not full before the tick
        assert!(!report.caught);
    }

    #[test]
    fn test_full_meter_and_sighting_is_caught() {
        let mut player = Player::default();
        player.pos = IVec2::new(10, 11);
        player.set_alert_level(100.0);
        let report = tick(&mut player, &mut [sentry(10, 10)]);
        assert!(report.caught);
        assert_eq!(player.alert_level(), 100.0);
    }

    #[test]
    fn test_full_meter_without_sighting_decays() {
        let mut player = Player::default();
        player.set_alert_level(100.0);
        let report = tick(&mut player, &mut [sentry(17, 3)]);
        assert!(!report.caught);
        assert_eq!(player.alert_level(), 95.0);
    }

    #[test]
    fn test_several_guards_raise_once() {
        let mut player = Player::default();
        player.pos = IVec2::new(10, 11);
        let mut guards = [sentry(10, 10), sentry(11, 11), sentry(2, 2)];
        let report = tick(&mut player, &mut guards);
        assert_eq!(report.detections, vec![true, true, false]);
        assert_eq!(player.alert_level(), 25.0);
    }

    #[test]
    fn test_alert_decays_to_zero() {
        let mut player = Player::default();
        player.set_alert_level(12.0);
        tick(&mut player, &mut []);
        tick(&mut player, &mut []);
        assert_eq!(player.alert_level(), 2.0);
        tick(&mut player, &mut []);
        assert_eq!(player.alert_level(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_meters_stay_in_range(
            stamina in 0.0f32..=100.0,
            alert in 0.0f32..=100.0,
            cloak in any::<bool>(),
            px in 1..19i32, py in 1..19i32,
            ticks in 1..60usize,
        ) {
            let mut player = camo_player();
            player.pos = IVec2::new(px, py);
            player.set_stamina(stamina);
            player.set_alert_level(alert);
            if cloak {
                player.toggle_cloak();
            }
            let mut guards = initial_guards();
            for _ in 0..ticks {
                tick(&mut player, &mut guards);
                prop_assert!((0.0..=100.0).contains(&player.stamina()));
                prop_assert!((0.0..=100.0).contains(&player.alert_level()));
                if player.stamina() <= 0.0 {
                    prop_assert!(!player.cloak_active());
                }
            }
        }
    }
}

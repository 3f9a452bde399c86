use indexmap::map::Entry;
use thiserror::Error;
use tokio::time::Instant;

use crate::{
    config::GameSettings,
    state::game::{GameState, ParticipantId, PlayerShot, ShotData},
};

/// Phases a single game moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Created but not started yet.
    Intro,
    /// Counting down before aiming starts.
    Countdown {
        /// Seconds left on the countdown.
        remaining: u32,
    },
    /// Markers are moving and shots are accepted.
    Aiming,
    /// A single-player shot has been captured; the ticker is stopped.
    Shooting,
    /// Terminal phase.
    Result(FinishReason),
}

impl GamePhase {
    /// Whether shots are currently accepted.
    pub fn is_aiming(&self) -> bool {
        matches!(self, GamePhase::Aiming)
    }
}

/// Indicates why a game reached its terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// The mode's maximum duration elapsed.
    TimedOut,
    /// The single-player shot was taken.
    ShotTaken,
    /// The render sink failed and the game was abandoned.
    Aborted,
}

/// Events that can be applied to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Start the countdown with the given length.
    Start {
        /// Countdown length in ticks.
        countdown: u32,
    },
    /// One countdown tick elapsed.
    CountdownTick,
    /// A single-player shot was captured while aiming.
    ShotCaptured,
    /// The captured shot has been resolved.
    ShotResolved,
    /// The mode's duration elapsed while aiming.
    TimedOut,
    /// The render sink failed.
    Abort,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the state machine was in when the invalid event was received.
    pub from: GamePhase,
    /// The event that cannot be applied from this phase.
    pub event: GameEvent,
}

/// State machine implementing the countdown, aiming and result flow of a game.
#[derive(Debug, Clone)]
pub struct GameStateMachine {
    phase: GamePhase,
    version: usize,
}

impl Default for GameStateMachine {
    fn default() -> Self {
        Self {
            phase: GamePhase::Intro,
            version: 0,
        }
    }
}

impl GameStateMachine {
    /// Create a new state machine initialised in the intro phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Number of applied transitions.
    pub fn version(&self) -> usize {
        self.version
    }

    /// Apply an event, moving to the next phase or leaving the machine untouched on error.
    pub fn apply(&mut self, event: GameEvent) -> Result<GamePhase, InvalidTransition> {
        let next = self.compute_transition(event)?;
        self.phase = next;
        self.version += 1;
        Ok(next)
    }

    /// Compute a transition from an event if the transition is valid.
    fn compute_transition(&self, event: GameEvent) -> Result<GamePhase, InvalidTransition> {
        let next = match (self.phase, event) {
            (GamePhase::Intro, GameEvent::Start { countdown }) if countdown > 0 => {
                GamePhase::Countdown {
                    remaining: countdown,
                }
            }
            (GamePhase::Countdown { remaining }, GameEvent::CountdownTick) if remaining > 1 => {
                GamePhase::Countdown {
                    remaining: remaining - 1,
                }
            }
            (GamePhase::Countdown { .. }, GameEvent::CountdownTick) => GamePhase::Aiming,
            (GamePhase::Aiming, GameEvent::ShotCaptured) => GamePhase::Shooting,
            (GamePhase::Aiming, GameEvent::TimedOut) => GamePhase::Result(FinishReason::TimedOut),
            (GamePhase::Shooting, GameEvent::ShotResolved) => {
                GamePhase::Result(FinishReason::ShotTaken)
            }
            (
                GamePhase::Countdown { .. } | GamePhase::Aiming | GamePhase::Shooting,
                GameEvent::Abort,
            ) => GamePhase::Result(FinishReason::Aborted),
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}

/// Result of offering a shot to a game.
#[derive(Debug, Clone, PartialEq)]
pub enum ShotOutcome {
    /// The shot was scored and stored.
    Recorded(PlayerShot),
    /// The participant already has a recorded attempt; nothing changed.
    AlreadyShot,
    /// The game is not accepting shots.
    NotAiming,
}

impl GameState {
    /// Offer a shot from `participant`, recording it when the game is aiming and
    /// the participant has no attempt yet.
    pub fn accept_shot(&mut self, participant: ParticipantId, now: Instant) -> ShotOutcome {
        if !self.phase().is_aiming() {
            return ShotOutcome::NotAiming;
        }

        let shot = match self.players.entry(participant) {
            Entry::Occupied(_) => return ShotOutcome::AlreadyShot,
            Entry::Vacant(slot) => {
                let shot = PlayerShot::capture(slot.key().clone(), &self.hoop, &self.aim, now);
                slot.insert(shot.clone());
                shot
            }
        };

        if self.mode().ends_on_first_shot() {
            self.shot = Some(ShotData::from(&shot));
        }

        ShotOutcome::Recorded(shot)
    }

    /// Whether the mode's maximum aiming duration has elapsed at `now`.
    pub fn is_expired(&self, now: Instant, settings: &GameSettings) -> bool {
        self.phase().is_aiming() && self.elapsed(now) >= self.mode().max_duration(settings)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::state::{
        game::{ChannelId, GameMode, MessageId},
        leaderboard::Leaderboard,
    };

    fn apply(sm: &mut GameStateMachine, event: GameEvent) -> GamePhase {
        sm.apply(event).unwrap()
    }

    fn aiming_game(mode: GameMode) -> GameState {
        let now = Instant::now();
        let mut game = GameState::new(MessageId::new("msg"), ChannelId::new("chan"), mode, now);
        game.apply(GameEvent::Start { countdown: 1 }, now).unwrap();
        game.apply(GameEvent::CountdownTick, now).unwrap();
        game
    }

    #[test]
    fn initial_state_is_intro() {
        let sm = GameStateMachine::new();
        assert_eq!(sm.phase(), GamePhase::Intro);
        assert_eq!(sm.version(), 0);
    }

    #[test]
    fn countdown_reaches_aiming_after_each_second() {
        let mut sm = GameStateMachine::new();
        assert_eq!(
            apply(&mut sm, GameEvent::Start { countdown: 3 }),
            GamePhase::Countdown { remaining: 3 }
        );
        assert_eq!(
            apply(&mut sm, GameEvent::CountdownTick),
            GamePhase::Countdown { remaining: 2 }
        );
        assert_eq!(
            apply(&mut sm, GameEvent::CountdownTick),
            GamePhase::Countdown { remaining: 1 }
        );
        assert_eq!(apply(&mut sm, GameEvent::CountdownTick), GamePhase::Aiming);
        assert_eq!(sm.version(), 4);
    }

    #[test]
    fn single_shot_path_goes_through_shooting() {
        let mut sm = GameStateMachine::new();
        apply(&mut sm, GameEvent::Start { countdown: 1 });
        apply(&mut sm, GameEvent::CountdownTick);
        assert_eq!(apply(&mut sm, GameEvent::ShotCaptured), GamePhase::Shooting);
        assert_eq!(
            apply(&mut sm, GameEvent::ShotResolved),
            GamePhase::Result(FinishReason::ShotTaken)
        );
    }

    #[test]
    fn result_is_terminal() {
        let mut sm = GameStateMachine::new();
        apply(&mut sm, GameEvent::Start { countdown: 1 });
        apply(&mut sm, GameEvent::CountdownTick);
        apply(&mut sm, GameEvent::TimedOut);

        for event in [
            GameEvent::TimedOut,
            GameEvent::Abort,
            GameEvent::CountdownTick,
            GameEvent::ShotCaptured,
        ] {
            let err = sm.apply(event).unwrap_err();
            assert_eq!(err.from, GamePhase::Result(FinishReason::TimedOut));
            assert_eq!(err.event, event);
        }
    }

    #[test]
    fn abort_is_accepted_from_every_live_phase() {
        let mut sm = GameStateMachine::new();
        apply(&mut sm, GameEvent::Start { countdown: 2 });
        assert_eq!(
            apply(&mut sm, GameEvent::Abort),
            GamePhase::Result(FinishReason::Aborted)
        );

        let err = GameStateMachine::new().apply(GameEvent::Abort).unwrap_err();
        assert_eq!(err.from, GamePhase::Intro);
    }

    #[test]
    fn invalid_transition_leaves_phase_untouched() {
        let mut sm = GameStateMachine::new();
        let err = sm.apply(GameEvent::TimedOut).unwrap_err();
        assert_eq!(err.from, GamePhase::Intro);
        assert_eq!(sm.phase(), GamePhase::Intro);
        assert_eq!(sm.version(), 0);
        assert!(sm.apply(GameEvent::Start { countdown: 0 }).is_err());
    }

    #[test]
    fn entering_aiming_resets_clock_and_frames() {
        let start = Instant::now();
        let mut game =
            GameState::new(MessageId::new("m"), ChannelId::new("c"), GameMode::Single, start);
        game.frame_count = 7;
        game.apply(GameEvent::Start { countdown: 1 }, start).unwrap();
        let later = start + Duration::from_secs(3);
        game.apply(GameEvent::CountdownTick, later).unwrap();
        assert_eq!(game.started_at, later);
        assert_eq!(game.frame_count, 0);
    }

    #[test]
    fn duplicate_shot_is_rejected_without_changes() {
        let mut game = aiming_game(GameMode::Tournament);
        let now = Instant::now();
        let alice = ParticipantId::new("alice");

        let first = game.accept_shot(alice.clone(), now);
        assert!(matches!(first, ShotOutcome::Recorded(_)));
        let recorded = game.players.get(&alice).cloned();

        game.advance(&GameSettings::default());
        let second = game.accept_shot(alice.clone(), now + Duration::from_secs(1));
        assert_eq!(second, ShotOutcome::AlreadyShot);
        assert_eq!(game.players.len(), 1);
        assert_eq!(game.players.get(&alice).cloned(), recorded);
    }

    #[test]
    fn shot_outside_aiming_is_ignored() {
        let now = Instant::now();
        let mut game =
            GameState::new(MessageId::new("m"), ChannelId::new("c"), GameMode::Single, now);
        game.apply(GameEvent::Start { countdown: 3 }, now).unwrap();
        assert_eq!(
            game.accept_shot(ParticipantId::new("bob"), now),
            ShotOutcome::NotAiming
        );
        assert!(game.players.is_empty());
    }

    #[test]
    fn recorded_shot_captures_rounded_cells() {
        let mut game = aiming_game(GameMode::Single);
        game.hoop.position = 20.4;
        game.aim.position = 22.6;
        let ShotOutcome::Recorded(shot) = game.accept_shot(ParticipantId::new("c"), Instant::now())
        else {
            panic!("shot should be recorded");
        };
        assert_eq!((shot.hoop_cell, shot.aim_cell), (20, 23));
        assert_eq!(shot.distance, 3);
        assert_eq!(shot.score, 10);
        assert_eq!(game.shot.as_ref().map(|data| data.distance), Some(3));
    }

    #[test]
    fn expiry_depends_on_mode() {
        let settings = GameSettings::default();
        let single = aiming_game(GameMode::Single);
        let tournament = aiming_game(GameMode::Tournament);
        let at_20 = single.started_at + Duration::from_secs(20);

        assert!(!single.is_expired(single.started_at + Duration::from_millis(19_900), &settings));
        assert!(single.is_expired(at_20, &settings));
        assert!(!tournament.is_expired(tournament.started_at + Duration::from_secs(20), &settings));
        assert!(tournament.is_expired(tournament.started_at + Duration::from_secs(30), &settings));
    }

    #[test]
    fn simultaneous_ties_rank_in_recording_order() {
        let now = Instant::now();
        for names in [["zed", "amy", "kim"], ["kim", "zed", "amy"]] {
            let mut game = aiming_game(GameMode::Tournament);
            for name in names {
                game.accept_shot(ParticipantId::new(name), now);
            }

            let ranked = Leaderboard::rank(game.players.values())
                .entries()
                .iter()
                .map(|shot| shot.participant.as_str().to_string())
                .collect::<Vec<_>>();
            assert_eq!(ranked, names);
        }
    }
}

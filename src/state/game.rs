use std::{fmt, time::Duration};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use utoipa::ToSchema;

use crate::{
    config::GameSettings,
    state::{
        kinematics::{Direction, Marker, cell_distance},
        scoring,
        state_machine::{GameEvent, GamePhase, GameStateMachine, InvalidTransition},
    },
};

/// Starting coordinate of the hoop.
const HOOP_START: f64 = 25.0;
/// Starting coordinate of the aim marker.
const AIM_START: f64 = 15.0;

/// Identity of a rendered message; doubles as the correlation key of its game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct MessageId(String);

/// Destination surface (chat channel) a game is rendered into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ChannelId(String);

/// Identity of a participant taking shots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl MessageId {
    /// Wrap a raw message identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ChannelId {
    /// Wrap a raw channel identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ParticipantId {
    /// Wrap a raw participant identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Chat mention markup for this participant.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a game ends on its first shot or stays open for everyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// One participant; the first recorded shot ends the game.
    #[default]
    Single,
    /// Any number of participants, one shot each, until the duration elapses.
    Tournament,
}

impl GameMode {
    /// Maximum aiming time for this mode.
    pub fn max_duration(self, settings: &GameSettings) -> Duration {
        match self {
            GameMode::Single => settings.single_duration,
            GameMode::Tournament => settings.tournament_duration,
        }
    }

    /// Whether the first recorded shot terminates the game.
    pub fn ends_on_first_shot(self) -> bool {
        matches!(self, GameMode::Single)
    }
}

/// A recorded attempt. Each participant owns at most one per game.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerShot {
    /// Who took the shot.
    pub participant: ParticipantId,
    /// Hoop cell at the moment of the shot.
    pub hoop_cell: usize,
    /// Aim cell at the moment of the shot.
    pub aim_cell: usize,
    /// Absolute difference between both cells.
    pub distance: u32,
    /// Points derived from `distance`.
    pub score: u32,
    /// When the shot was taken; only used to break ranking ties.
    pub shot_at: Instant,
}

impl PlayerShot {
    /// Capture both markers' cells and derive distance and score.
    pub fn capture(participant: ParticipantId, hoop: &Marker, aim: &Marker, now: Instant) -> Self {
        let hoop_cell = hoop.cell();
        let aim_cell = aim.cell();
        let distance = cell_distance(hoop_cell, aim_cell);
        Self {
            participant,
            hoop_cell,
            aim_cell,
            distance,
            score: scoring::score(distance),
            shot_at: now,
        }
    }
}

/// Snapshot of the last single-player shot, kept for a replay animation.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotData {
    /// Hoop cell when the shot was taken.
    pub hoop_cell: usize,
    /// Aim cell when the shot was taken.
    pub aim_cell: usize,
    /// Alignment distance.
    pub distance: u32,
    /// Awarded points.
    pub score: u32,
    /// Progress of the (not yet rendered) shot animation.
    pub animation_frame: u32,
}

impl From<&PlayerShot> for ShotData {
    fn from(shot: &PlayerShot) -> Self {
        Self {
            hoop_cell: shot.hoop_cell,
            aim_cell: shot.aim_cell,
            distance: shot.distance,
            score: shot.score,
            animation_frame: 0,
        }
    }
}

/// Full mutable state of one game.
#[derive(Debug, Clone)]
pub struct GameState {
    key: MessageId,
    channel: ChannelId,
    mode: GameMode,
    machine: GameStateMachine,
    /// Start of the current timed phase; reset when aiming begins.
    pub started_at: Instant,
    /// Ticks processed since aiming began.
    pub frame_count: u64,
    /// The moving target.
    pub hoop: Marker,
    /// The moving aim marker.
    pub aim: Marker,
    /// Last single-player shot, if any.
    pub shot: Option<ShotData>,
    /// Recorded attempts keyed by participant.
    pub players: IndexMap<ParticipantId, PlayerShot>,
}

impl GameState {
    /// Build a fresh game in the intro phase with markers at their starting cells.
    pub fn new(key: MessageId, channel: ChannelId, mode: GameMode, now: Instant) -> Self {
        Self {
            key,
            channel,
            mode,
            machine: GameStateMachine::new(),
            started_at: now,
            frame_count: 0,
            hoop: Marker::new(HOOP_START, Direction::Forward),
            aim: Marker::new(AIM_START, Direction::Forward),
            shot: None,
            players: IndexMap::new(),
        }
    }

    /// Correlation key of the game.
    pub fn key(&self) -> &MessageId {
        &self.key
    }

    /// Channel the game is rendered into.
    pub fn channel(&self) -> &ChannelId {
        &self.channel
    }

    /// Mode chosen at creation.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Current phase.
    pub fn phase(&self) -> GamePhase {
        self.machine.phase()
    }

    /// Number of transitions applied so far.
    pub fn version(&self) -> usize {
        self.machine.version()
    }

    /// Apply a state machine event; entering aiming restarts the clock and frame counter.
    pub fn apply(&mut self, event: GameEvent, now: Instant) -> Result<GamePhase, InvalidTransition> {
        let next = self.machine.apply(event)?;
        if next == GamePhase::Aiming {
            self.started_at = now;
            self.frame_count = 0;
        }
        Ok(next)
    }

    /// Run one kinematics tick for both markers.
    pub fn advance(&mut self, settings: &GameSettings) {
        self.hoop = self.hoop.step(settings.hoop_speed);
        self.aim = self.aim.step(settings.aim_speed);
        self.frame_count += 1;
    }

    /// Current alignment distance between the rounded markers.
    pub fn alignment_distance(&self) -> u32 {
        cell_distance(self.hoop.cell(), self.aim.cell())
    }

    /// Time spent in the current timed phase.
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }
}

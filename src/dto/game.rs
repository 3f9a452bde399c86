use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    dto::validation::validate_identifier,
    services::game_service::ShotReply,
    state::{
        game::{ChannelId, GameMode, GameState, MessageId, ParticipantId, ShotData},
        leaderboard::Leaderboard,
        state_machine::{FinishReason, GamePhase},
    },
};

/// Payload used to start a new game on a channel.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StartGameRequest {
    /// Channel the game is rendered into.
    pub channel_id: ChannelId,
    /// Single-player or tournament; single-player when omitted.
    #[serde(default)]
    pub mode: GameMode,
}

impl Validate for StartGameRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_identifier(self.channel_id.as_str()) {
            errors.add("channel_id", e);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Identity of a freshly started game.
#[derive(Debug, Serialize, ToSchema)]
pub struct StartGameResponse {
    /// Rendered message identity, used as the game key by every other route.
    pub message_id: MessageId,
    /// Channel the game is rendered into.
    pub channel_id: ChannelId,
    /// Mode the game runs in.
    pub mode: GameMode,
}

/// A participant taking their shot.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ShotRequest {
    /// Who is shooting.
    pub participant_id: ParticipantId,
}

impl Validate for ShotRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_identifier(self.participant_id.as_str()) {
            errors.add("participant_id", e);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// A reaction added to a game message; only 🏀 counts as a shot.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ReactionRequest {
    /// Who reacted.
    #[validate(nested)]
    #[serde(flatten)]
    pub shooter: ShotRequest,
    /// The reaction emoji.
    #[validate(length(min = 1, max = 32))]
    pub reaction: String,
}

/// Outcome of a shot as reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ShotOutcomeKind {
    /// The shot was recorded.
    Recorded,
    /// The participant already shot in this game.
    AlreadyShot,
    /// No game is aiming under this key.
    Ignored,
}

/// Response returned by the shot and reaction routes.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShotResponse {
    /// What happened to the shot.
    pub outcome: ShotOutcomeKind,
    /// Alignment distance, for recorded shots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<u32>,
    /// Awarded points, for recorded shots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl From<ShotReply> for ShotResponse {
    fn from(reply: ShotReply) -> Self {
        match reply {
            ShotReply::Recorded { distance, score } => Self {
                outcome: ShotOutcomeKind::Recorded,
                distance: Some(distance),
                score: Some(score),
            },
            ShotReply::AlreadyShot => Self {
                outcome: ShotOutcomeKind::AlreadyShot,
                distance: None,
                score: None,
            },
            ShotReply::Ignored => Self {
                outcome: ShotOutcomeKind::Ignored,
                distance: None,
                score: None,
            },
        }
    }
}

/// Publicly visible phase of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VisiblePhase {
    /// Created, not started.
    Intro,
    /// Counting down.
    Countdown,
    /// Shots accepted.
    Aiming,
    /// Resolving a single-player shot.
    Shooting,
    /// Ended after the maximum duration.
    TimedOut,
    /// Ended on the single-player shot.
    ShotTaken,
    /// Abandoned after a surface failure.
    Aborted,
}

impl From<GamePhase> for VisiblePhase {
    fn from(value: GamePhase) -> Self {
        match value {
            GamePhase::Intro => VisiblePhase::Intro,
            GamePhase::Countdown { .. } => VisiblePhase::Countdown,
            GamePhase::Aiming => VisiblePhase::Aiming,
            GamePhase::Shooting => VisiblePhase::Shooting,
            GamePhase::Result(FinishReason::TimedOut) => VisiblePhase::TimedOut,
            GamePhase::Result(FinishReason::ShotTaken) => VisiblePhase::ShotTaken,
            GamePhase::Result(FinishReason::Aborted) => VisiblePhase::Aborted,
        }
    }
}

/// A recorded attempt, ranked.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShotView {
    /// Who shot.
    pub participant_id: ParticipantId,
    /// Hoop cell at the moment of the shot.
    pub hoop_cell: usize,
    /// Aim cell at the moment of the shot.
    pub aim_cell: usize,
    /// Alignment distance.
    pub distance: u32,
    /// Awarded points.
    pub score: u32,
}

/// Snapshot of the single-player shot, kept for a replay.
#[derive(Debug, Serialize, ToSchema)]
pub struct LastShotView {
    /// Hoop cell when the shot was taken.
    pub hoop_cell: usize,
    /// Aim cell when the shot was taken.
    pub aim_cell: usize,
    /// Alignment distance.
    pub distance: u32,
    /// Awarded points.
    pub score: u32,
    /// Replay progress.
    pub animation_frame: u32,
}

impl From<&ShotData> for LastShotView {
    fn from(shot: &ShotData) -> Self {
        Self {
            hoop_cell: shot.hoop_cell,
            aim_cell: shot.aim_cell,
            distance: shot.distance,
            score: shot.score,
            animation_frame: shot.animation_frame,
        }
    }
}

/// Snapshot of a live game.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameView {
    /// Game key.
    pub message_id: MessageId,
    /// Channel the game is rendered into.
    pub channel_id: ChannelId,
    /// Game mode.
    pub mode: GameMode,
    /// Current phase.
    pub phase: VisiblePhase,
    /// Number of phase transitions applied so far.
    pub version: usize,
    /// Seconds left while counting down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown_remaining: Option<u32>,
    /// Exact hoop coordinate.
    pub hoop_position: f64,
    /// Exact aim coordinate.
    pub aim_position: f64,
    /// Current alignment distance.
    pub alignment_distance: u32,
    /// Ticks processed since aiming began.
    pub frame_count: u64,
    /// Milliseconds spent in the current timed phase.
    pub elapsed_ms: u64,
    /// Recorded attempts, best first.
    pub shots: Vec<ShotView>,
    /// The single-player shot, once taken.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_shot: Option<LastShotView>,
}

impl GameView {
    /// Build a view of `game` as seen at `now`.
    pub fn from_state(game: &GameState, now: Instant) -> Self {
        let phase = game.phase();
        let shots = Leaderboard::rank(game.players.values())
            .entries()
            .iter()
            .map(|shot| ShotView {
                participant_id: shot.participant.clone(),
                hoop_cell: shot.hoop_cell,
                aim_cell: shot.aim_cell,
                distance: shot.distance,
                score: shot.score,
            })
            .collect();

        Self {
            message_id: game.key().clone(),
            channel_id: game.channel().clone(),
            mode: game.mode(),
            phase: phase.into(),
            version: game.version(),
            countdown_remaining: match phase {
                GamePhase::Countdown { remaining } => Some(remaining),
                _ => None,
            },
            hoop_position: game.hoop.position,
            aim_position: game.aim.position,
            alignment_distance: game.alignment_distance(),
            frame_count: game.frame_count,
            elapsed_ms: u64::try_from(game.elapsed(now).as_millis()).unwrap_or(u64::MAX),
            shots,
            last_shot: game.shot.as_ref().map(LastShotView::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::state::state_machine::GameEvent;

    #[test]
    fn start_request_defaults_to_single_player() {
        let request: StartGameRequest = serde_json::from_str(r#"{"channel_id":"court"}"#).unwrap();
        assert_eq!(request.mode, GameMode::Single);
        assert!(request.validate().is_ok());

        let blank: StartGameRequest =
            serde_json::from_str(r#"{"channel_id":"  ","mode":"tournament"}"#).unwrap();
        assert!(blank.validate().is_err());
    }

    #[test]
    fn reaction_request_flattens_the_shooter() {
        let request: ReactionRequest =
            serde_json::from_str(r#"{"participant_id":"alice","reaction":"🏀"}"#).unwrap();
        assert_eq!(request.shooter.participant_id.as_str(), "alice");
        assert!(request.validate().is_ok());

        let missing: ReactionRequest =
            serde_json::from_str(r#"{"participant_id":"","reaction":"🏀"}"#).unwrap();
        assert!(missing.validate().is_err());
    }

    #[test]
    fn shot_response_omits_stats_unless_recorded() {
        let recorded = serde_json::to_value(ShotResponse::from(ShotReply::Recorded {
            distance: 1,
            score: 50,
        }))
        .unwrap();
        assert_eq!(
            recorded,
            serde_json::json!({"outcome": "recorded", "distance": 1, "score": 50})
        );

        let ignored = serde_json::to_value(ShotResponse::from(ShotReply::Ignored)).unwrap();
        assert_eq!(ignored, serde_json::json!({"outcome": "ignored"}));
    }

    #[test]
    fn view_reports_countdown_and_elapsed_time() {
        let start = Instant::now();
        let mut game = GameState::new(
            MessageId::new("m"),
            ChannelId::new("c"),
            GameMode::Tournament,
            start,
        );
        game.apply(GameEvent::Start { countdown: 3 }, start).unwrap();

        let view = GameView::from_state(&game, start + Duration::from_millis(1_500));
        assert_eq!(view.phase, VisiblePhase::Countdown);
        assert_eq!(view.countdown_remaining, Some(3));
        assert_eq!(view.version, 1);
        assert!(view.last_shot.is_none());
        assert_eq!(view.elapsed_ms, 1_500);
        assert_eq!(view.alignment_distance, 10);
        assert!(view.shots.is_empty());

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["mode"], "tournament");
        assert_eq!(json["phase"], "countdown");
    }
}

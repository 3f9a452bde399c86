//! Game engine: starts games, drives their countdown and aiming tickers, resolves
//! shots and tears games down once they are over.
//!
//! Every mutation of a game happens while holding its state lock, so a tick
//! (kinematics, render and sink edit) and a shot are never interleaved.

use std::sync::Arc;

use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};
use tracing::{debug, info, warn};

use crate::{
    dto::game::GameView,
    error::ServiceError,
    render::{court, messages, summary},
    sink::{SinkError, SinkResult},
    state::{
        GameHandle, SharedState, TaskSlot,
        game::{ChannelId, GameMode, GameState, MessageId, ParticipantId},
        state_machine::{GameEvent, GamePhase, ShotOutcome},
    },
};

/// The only reaction that counts as a shot.
pub const BASKETBALL_REACTION: &str = "🏀";

/// What happened to a shot offered to a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotReply {
    /// The shot was recorded.
    Recorded {
        /// Alignment distance at the moment of the shot.
        distance: u32,
        /// Points awarded.
        score: u32,
    },
    /// The participant had already taken their shot.
    AlreadyShot,
    /// No live game is aiming under this key.
    Ignored,
}

/// Post the countdown message, register the game under the message identity and
/// start its countdown ticker.
pub async fn start_game(
    state: &SharedState,
    channel: ChannelId,
    mode: GameMode,
) -> Result<MessageId, ServiceError> {
    let countdown = state.config().game().countdown_seconds;
    let key = state
        .sink()
        .send(&channel, messages::countdown(countdown))
        .await?;

    let now = Instant::now();
    let mut game = GameState::new(key.clone(), channel, mode, now);
    game.apply(GameEvent::Start { countdown }, now)?;

    let handle = Arc::new(GameHandle::new(game));
    if let Err(err) = state.registry().register(key.clone(), handle.clone()) {
        warn!(key = %key, error = %err, "refusing to start game on a live key");
        return Err(err.into());
    }

    let task = tokio::spawn(run_countdown(state.clone(), handle.clone()));
    handle.attach(TaskSlot::Countdown, task.abort_handle());

    info!(key = %key, channel = %handle.channel(), mode = ?mode, "game started");
    Ok(key)
}

/// Offer a shot from `participant` to the game registered under `key`.
///
/// Unknown keys and games that are not aiming are ignored. A sink failure while
/// acknowledging the shot or rendering the single-player summary aborts the
/// game and is reported to the caller.
pub async fn on_shot(
    state: &SharedState,
    key: &MessageId,
    participant: ParticipantId,
) -> Result<ShotReply, ServiceError> {
    let Some(handle) = state.registry().lookup(key) else {
        debug!(key = %key, participant = %participant, "shot for unknown game ignored");
        return Ok(ShotReply::Ignored);
    };

    let mut game = handle.state().lock().await;
    if handle.is_closed() {
        return Ok(ShotReply::Ignored);
    }

    let now = Instant::now();
    match game.accept_shot(participant.clone(), now) {
        ShotOutcome::NotAiming => {
            debug!(key = %key, phase = ?game.phase(), "shot outside aiming ignored");
            Ok(ShotReply::Ignored)
        }
        ShotOutcome::AlreadyShot => {
            let notice = messages::already_shot(&participant);
            if let Err(err) = state.sink().notify(game.channel(), notice).await {
                abort_game(state, &handle, &mut game, &err).await;
                return Err(err.into());
            }
            Ok(ShotReply::AlreadyShot)
        }
        ShotOutcome::Recorded(shot) => {
            info!(
                key = %key,
                participant = %participant,
                distance = shot.distance,
                score = shot.score,
                "shot recorded"
            );

            let feedback = messages::shot_feedback(&participant, shot.distance);
            if let Err(err) = state.sink().notify(game.channel(), feedback).await {
                abort_game(state, &handle, &mut game, &err).await;
                return Err(err.into());
            }

            if game.mode().ends_on_first_shot() {
                handle.cancel(TaskSlot::Aiming);
                game.apply(GameEvent::ShotCaptured, now)?;
                game.apply(GameEvent::ShotResolved, now)?;
                finish_game(state, &handle, &mut game, now).await?;
            }

            Ok(ShotReply::Recorded {
                distance: shot.distance,
                score: shot.score,
            })
        }
    }
}

/// Forward a reaction as a shot when it is the basketball.
pub async fn on_reaction(
    state: &SharedState,
    key: &MessageId,
    participant: ParticipantId,
    reaction: &str,
) -> Result<ShotReply, ServiceError> {
    if reaction != BASKETBALL_REACTION {
        debug!(key = %key, reaction, "non-shot reaction ignored");
        return Ok(ShotReply::Ignored);
    }
    on_shot(state, key, participant).await
}

/// Snapshot of the game registered under `key`.
pub async fn game_view(state: &SharedState, key: &MessageId) -> Result<GameView, ServiceError> {
    let handle = state
        .registry()
        .lookup(key)
        .ok_or_else(|| ServiceError::NotFound(format!("game `{key}` not found")))?;
    let game = handle.state().lock().await;
    Ok(GameView::from_state(&game, Instant::now()))
}

/// Remove the game under `key` right away. Returns whether a game was removed;
/// calling it again for the same key is a no-op.
pub fn cleanup_game(state: &SharedState, key: &MessageId) -> bool {
    match state.registry().remove(key) {
        Some(_) => {
            state.sink().forget(key);
            info!(key = %key, "game cleaned up");
            true
        }
        None => false,
    }
}

/// Drop every live game and abort all of their tasks.
pub fn shutdown(state: &SharedState) -> usize {
    let drained = state.registry().shutdown();
    if drained > 0 {
        info!(games = drained, "live games dropped on shutdown");
    }
    drained
}

async fn run_countdown(state: SharedState, handle: Arc<GameHandle>) {
    let period = state.config().game().countdown_tick;
    let mut ticker = interval_at(Instant::now() + period, period);

    loop {
        ticker.tick().await;
        let mut game = handle.state().lock().await;
        let now = Instant::now();

        let phase = match game.apply(GameEvent::CountdownTick, now) {
            Ok(phase) => phase,
            Err(err) => {
                debug!(key = %handle.key(), error = %err, "countdown ticker superseded");
                handle.release(TaskSlot::Countdown);
                return;
            }
        };

        if let GamePhase::Countdown { remaining } = phase {
            let text = messages::countdown(remaining);
            if let Err(err) = state.sink().edit(game.channel(), game.key(), text).await {
                handle.release(TaskSlot::Countdown);
                abort_game(&state, &handle, &mut game, &err).await;
                return;
            }
            continue;
        }

        // The last countdown tick always lands in aiming.
        handle.release(TaskSlot::Countdown);
        if let Err(err) = push_frame(&state, &game).await {
            abort_game(&state, &handle, &mut game, &err).await;
            return;
        }
        let task = tokio::spawn(run_aiming(state.clone(), handle.clone()));
        handle.attach(TaskSlot::Aiming, task.abort_handle());
        info!(key = %handle.key(), mode = ?game.mode(), "aiming started");
        return;
    }
}

async fn run_aiming(state: SharedState, handle: Arc<GameHandle>) {
    let settings = *state.config().game();
    let mut ticker = interval_at(
        Instant::now() + settings.aiming_tick,
        settings.aiming_tick,
    );
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let mut game = handle.state().lock().await;
        if !game.phase().is_aiming() {
            debug!(key = %handle.key(), phase = ?game.phase(), "aiming ticker superseded");
            handle.release(TaskSlot::Aiming);
            return;
        }

        let now = Instant::now();
        if game.is_expired(now, &settings) {
            handle.release(TaskSlot::Aiming);
            if let Err(err) = game.apply(GameEvent::TimedOut, now) {
                debug!(key = %handle.key(), error = %err, "timeout raced another transition");
                return;
            }
            info!(
                key = %handle.key(),
                players = game.players.len(),
                frames = game.frame_count,
                "game timed out"
            );
            if let Err(err) = finish_game(&state, &handle, &mut game, now).await {
                debug!(key = %handle.key(), error = %err, "summary failed after timeout");
            }
            return;
        }

        game.advance(&settings);
        if let Err(err) = push_frame(&state, &game).await {
            handle.release(TaskSlot::Aiming);
            abort_game(&state, &handle, &mut game, &err).await;
            return;
        }
    }
}

async fn push_frame(state: &SharedState, game: &GameState) -> SinkResult<()> {
    state
        .sink()
        .edit(game.channel(), game.key(), court::frame(game))
        .await
}

/// Render the summary of a game that just reached its result phase, then
/// schedule its cleanup. A failed edit aborts the game before the error is
/// returned.
async fn finish_game(
    state: &SharedState,
    handle: &Arc<GameHandle>,
    game: &mut GameState,
    now: Instant,
) -> SinkResult<()> {
    let text = summary::summary(game, now);
    match state.sink().edit(game.channel(), game.key(), text).await {
        Ok(()) => {
            info!(key = %game.key(), phase = ?game.phase(), "summary rendered");
            schedule_cleanup(state, handle);
            Ok(())
        }
        Err(err) => {
            abort_game(state, handle, game, &err).await;
            Err(err)
        }
    }
}

fn schedule_cleanup(state: &SharedState, handle: &Arc<GameHandle>) {
    let delay = state.config().game().cleanup_delay;
    let task_state = state.clone();
    let task_handle = handle.clone();
    let task = tokio::spawn(async move {
        sleep(delay).await;
        task_handle.release(TaskSlot::Cleanup);
        cleanup_game(&task_state, task_handle.key());
    });
    handle.attach(TaskSlot::Cleanup, task.abort_handle());
}

/// Abandon a game after a sink failure: stop its tasks, drop it from the
/// registry and post a best-effort notice.
async fn abort_game(
    state: &SharedState,
    handle: &GameHandle,
    game: &mut GameState,
    cause: &SinkError,
) {
    warn!(key = %handle.key(), error = %cause, "render sink failed; aborting game");
    if let Err(err) = game.apply(GameEvent::Abort, Instant::now()) {
        debug!(key = %handle.key(), error = %err, "game already finished");
    }
    cleanup_game(state, handle.key());

    let notice = messages::technical_difficulties().to_string();
    if let Err(err) = state.sink().notify(game.channel(), notice).await {
        warn!(key = %handle.key(), error = %err, "failed to post abort notice");
    }
}

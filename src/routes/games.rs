use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::game::{
        GameView, ReactionRequest, ShotRequest, ShotResponse, StartGameRequest, StartGameResponse,
    },
    error::AppError,
    services::game_service,
    state::{SharedState, game::MessageId},
};

/// Routes starting games and feeding shots into them.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", post(start_game))
        .route("/games/{message_id}", get(get_game))
        .route("/games/{message_id}/shots", post(take_shot))
        .route("/games/{message_id}/reactions", post(add_reaction))
}

/// Post the countdown message on a channel and start a game behind it.
#[utoipa::path(
    post,
    path = "/games",
    tag = "games",
    request_body = StartGameRequest,
    responses(
        (status = 201, description = "Game started", body = StartGameResponse),
        (status = 400, description = "Invalid channel identifier"),
        (status = 502, description = "The surface refused the countdown message")
    )
)]
pub async fn start_game(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<StartGameRequest>>,
) -> Result<(StatusCode, Json<StartGameResponse>), AppError> {
    let StartGameRequest { channel_id, mode } = payload;
    let message_id = game_service::start_game(&state, channel_id.clone(), mode).await?;
    Ok((
        StatusCode::CREATED,
        Json(StartGameResponse {
            message_id,
            channel_id,
            mode,
        }),
    ))
}

/// Inspect a live game.
#[utoipa::path(
    get,
    path = "/games/{message_id}",
    tag = "games",
    params(("message_id" = String, Path, description = "Identity of the game message")),
    responses(
        (status = 200, description = "Current game state", body = GameView),
        (status = 404, description = "No live game under this key")
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Path(message_id): Path<MessageId>,
) -> Result<Json<GameView>, AppError> {
    Ok(Json(game_service::game_view(&state, &message_id).await?))
}

/// Take a shot. Shots for unknown or non-aiming games are reported as ignored.
#[utoipa::path(
    post,
    path = "/games/{message_id}/shots",
    tag = "games",
    params(("message_id" = String, Path, description = "Identity of the game message")),
    request_body = ShotRequest,
    responses(
        (status = 200, description = "Shot processed", body = ShotResponse),
        (status = 502, description = "The surface failed; the game was aborted")
    )
)]
pub async fn take_shot(
    State(state): State<SharedState>,
    Path(message_id): Path<MessageId>,
    Valid(Json(payload)): Valid<Json<ShotRequest>>,
) -> Result<Json<ShotResponse>, AppError> {
    let reply = game_service::on_shot(&state, &message_id, payload.participant_id).await?;
    Ok(Json(reply.into()))
}

/// Add a reaction to a game message; 🏀 takes a shot, anything else is ignored.
#[utoipa::path(
    post,
    path = "/games/{message_id}/reactions",
    tag = "games",
    params(("message_id" = String, Path, description = "Identity of the game message")),
    request_body = ReactionRequest,
    responses(
        (status = 200, description = "Reaction processed", body = ShotResponse),
        (status = 502, description = "The surface failed; the game was aborted")
    )
)]
pub async fn add_reaction(
    State(state): State<SharedState>,
    Path(message_id): Path<MessageId>,
    Valid(Json(payload)): Valid<Json<ReactionRequest>>,
) -> Result<Json<ShotResponse>, AppError> {
    let ReactionRequest { shooter, reaction } = payload;
    let reply =
        game_service::on_reaction(&state, &message_id, shooter.participant_id, &reaction).await?;
    Ok(Json(reply.into()))
}

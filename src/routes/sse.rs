use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{services::sse_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/sse/surface",
    tag = "sse",
    responses((status = 200, description = "Posts and edits of every game message", content_type = "text/event-stream", body = String))
)]
/// Stream every message posted or rewritten on the render surface.
pub async fn surface_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = sse_service::subscribe_surface(&state);
    info!(viewers = state.surface().viewers(), "New surface SSE connection");
    sse_service::to_sse_stream(receiver)
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/surface", get(surface_stream))
}

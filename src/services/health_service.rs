use tracing::debug;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report liveness together with the number of registered games.
pub fn health_status(state: &SharedState) -> HealthResponse {
    let active_games = state.registry().len();
    debug!(
        active_games,
        viewers = state.surface().viewers(),
        "health check"
    );
    HealthResponse::ok(active_games)
}

use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Moving Hoop Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::surface_stream,
        crate::routes::games::start_game,
        crate::routes::games::get_game,
        crate::routes::games::take_shot,
        crate::routes::games::add_reaction,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::sse::SurfaceMessageEvent,
            crate::dto::game::StartGameRequest,
            crate::dto::game::StartGameResponse,
            crate::dto::game::ShotRequest,
            crate::dto::game::ReactionRequest,
            crate::dto::game::ShotResponse,
            crate::dto::game::ShotOutcomeKind,
            crate::dto::game::GameView,
            crate::dto::game::ShotView,
            crate::dto::game::LastShotView,
            crate::dto::game::VisiblePhase,
            crate::state::game::GameMode,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "games", description = "Start games and take shots"),
    )
)]
pub struct ApiDoc;

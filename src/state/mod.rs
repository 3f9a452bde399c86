//! Shared application state and the game domain model.

/// Game state, identities and recorded shots.
pub mod game;
/// Marker motion along the track.
pub mod kinematics;
/// Tournament ranking.
pub mod leaderboard;
/// Live games and their scheduled tasks.
pub mod registry;
/// Distance bands and points.
pub mod scoring;
mod sse;
/// Phase transitions of a single game.
pub mod state_machine;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    sink::{RenderSink, sse::SseSurface},
};

pub use self::registry::{GameHandle, GameRegistry, RegistryError, TaskSlot};
pub use self::sse::SseHub;

/// Handle to the application state shared by routes and game tasks.
pub type SharedState = Arc<AppState>;

/// Central application state: configuration, the live games and the surface they render to.
pub struct AppState {
    config: AppConfig,
    registry: GameRegistry,
    surface: Arc<SseSurface>,
    sink: Arc<dyn RenderSink>,
}

impl AppState {
    /// Construct a new [`AppState`] rendering games onto the SSE surface.
    pub fn new(config: AppConfig) -> SharedState {
        let surface = Arc::new(SseSurface::new(config.surface_capacity()));
        let sink: Arc<dyn RenderSink> = surface.clone();
        Arc::new(Self {
            config,
            registry: GameRegistry::new(),
            surface,
            sink,
        })
    }

    /// Construct an [`AppState`] rendering games onto an arbitrary sink.
    ///
    /// The SSE surface still exists so the routes keep working, but no game writes to it.
    pub fn with_sink(config: AppConfig, sink: Arc<dyn RenderSink>) -> SharedState {
        let surface = Arc::new(SseSurface::new(config.surface_capacity()));
        Arc::new(Self {
            config,
            registry: GameRegistry::new(),
            surface,
            sink,
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Registry of live games keyed by their message identity.
    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    /// Sink every game renders into.
    pub fn sink(&self) -> &Arc<dyn RenderSink> {
        &self.sink
    }

    /// SSE surface exposed to remote viewers.
    pub fn surface(&self) -> &SseSurface {
        &self.surface
    }
}

/// OpenAPI documentation generation.
pub mod documentation;
/// Game engine: lifecycle, tickers, shots and cleanup.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Server-Sent Events streaming of the render surface.
pub mod sse_service;

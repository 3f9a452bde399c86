//! Request and response payloads exposed over HTTP and SSE.

/// Game start, shot and view payloads.
pub mod game;
/// Health check payload.
pub mod health;
/// Server-sent event payloads.
pub mod sse;
/// Validation helpers shared by the payloads.
pub mod validation;

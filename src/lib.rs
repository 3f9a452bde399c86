//! Library crate for moving-hoop-back: a moving-hoop reaction minigame engine
//! rendered as text onto a message surface, exposed over HTTP and SSE.

pub mod config;
pub mod dto;
pub mod error;
pub mod render;
pub mod routes;
pub mod services;
pub mod sink;
pub mod state;

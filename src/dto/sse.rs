use serde::Serialize;
use utoipa::ToSchema;

use crate::state::game::{ChannelId, MessageId};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    /// SSE event name, if any.
    pub event: Option<String>,
    /// Encoded payload.
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// A message posted or rewritten on the surface.
pub struct SurfaceMessageEvent {
    /// Channel the message belongs to.
    pub channel_id: ChannelId,
    /// Identity of the message; edits reuse the identity of the original post.
    pub message_id: MessageId,
    /// Full text of the message after the operation.
    pub text: String,
}

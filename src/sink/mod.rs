//! Capability used by the engine to post and rewrite text on a remote surface.

#[cfg(test)]
pub mod recording;
/// Sink publishing the surface as a server-sent event stream.
pub mod sse;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::state::game::{ChannelId, MessageId};

/// Result alias for render sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Failure to deliver a frame to the surface. Always fatal to the affected game.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The message to edit was never posted, or was already forgotten.
    #[error("message `{0}` is unknown to the surface")]
    UnknownMessage(MessageId),
    /// The payload could not be encoded for the surface.
    #[error("failed to encode surface payload")]
    Encode(#[from] serde_json::Error),
    /// The surface refused or could not take the message.
    #[error("surface unavailable: {0}")]
    Unavailable(String),
}

/// Abstraction over the surface games are rendered onto.
pub trait RenderSink: Send + Sync {
    /// Post a new message that will be edited later and return its identity.
    fn send(&self, channel: &ChannelId, text: String) -> BoxFuture<'static, SinkResult<MessageId>>;
    /// Post a one-off notice that is never edited.
    fn notify(&self, channel: &ChannelId, text: String) -> BoxFuture<'static, SinkResult<()>>;
    /// Replace the text of a previously posted message.
    fn edit(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        text: String,
    ) -> BoxFuture<'static, SinkResult<()>>;
    /// Drop any bookkeeping held for a message whose game was torn down.
    fn forget(&self, _message: &MessageId) {}
}

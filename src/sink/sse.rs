use dashmap::DashMap;
use futures::future::{self, BoxFuture};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::{
    dto::sse::{ServerEvent, SurfaceMessageEvent},
    sink::{RenderSink, SinkError, SinkResult},
    state::{
        SseHub,
        game::{ChannelId, MessageId},
    },
};

const EVENT_MESSAGE_CREATED: &str = "message.created";
const EVENT_MESSAGE_EDITED: &str = "message.edited";

/// Render sink publishing every post and edit on a broadcast SSE stream.
///
/// Message identities are fresh UUIDs. Edits are only accepted for messages
/// this surface issued through `send` on the same channel and has not
/// forgotten yet; notices are published but never tracked.
pub struct SseSurface {
    hub: SseHub,
    messages: DashMap<MessageId, ChannelId>,
}

impl SseSurface {
    /// Create a surface whose stream buffers up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        Self {
            hub: SseHub::new(capacity),
            messages: DashMap::new(),
        }
    }

    /// Register a new viewer of the surface.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.hub.subscribe()
    }

    /// Number of connected viewers.
    pub fn viewers(&self) -> usize {
        self.hub.subscribers()
    }

    /// Number of messages the surface still tracks.
    pub fn tracked_messages(&self) -> usize {
        self.messages.len()
    }

    fn publish(
        &self,
        event: &str,
        channel: &ChannelId,
        message: &MessageId,
        text: String,
    ) -> SinkResult<()> {
        let payload = SurfaceMessageEvent {
            channel_id: channel.clone(),
            message_id: message.clone(),
            text,
        };
        let event = ServerEvent::json(Some(event.to_string()), &payload)?;
        self.hub.broadcast(event);
        Ok(())
    }
}

impl RenderSink for SseSurface {
    fn send(&self, channel: &ChannelId, text: String) -> BoxFuture<'static, SinkResult<MessageId>> {
        let message = MessageId::new(Uuid::new_v4().simple().to_string());
        let result = self
            .publish(EVENT_MESSAGE_CREATED, channel, &message, text)
            .map(|()| {
                self.messages.insert(message.clone(), channel.clone());
                message
            });
        Box::pin(future::ready(result))
    }

    fn notify(&self, channel: &ChannelId, text: String) -> BoxFuture<'static, SinkResult<()>> {
        let message = MessageId::new(Uuid::new_v4().simple().to_string());
        Box::pin(future::ready(self.publish(
            EVENT_MESSAGE_CREATED,
            channel,
            &message,
            text,
        )))
    }

    fn edit(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        text: String,
    ) -> BoxFuture<'static, SinkResult<()>> {
        let known = self
            .messages
            .get(message)
            .is_some_and(|entry| entry.value() == channel);
        let result = if known {
            self.publish(EVENT_MESSAGE_EDITED, channel, message, text)
        } else {
            Err(SinkError::UnknownMessage(message.clone()))
        };
        Box::pin(future::ready(result))
    }

    fn forget(&self, message: &MessageId) {
        if self.messages.remove(message).is_some() {
            debug!(message = %message, "surface message forgotten");
        }
    }
}

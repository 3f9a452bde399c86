//! In-memory sink recording every call, with switchable failures.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use futures::future::{self, BoxFuture};

use crate::{
    sink::{RenderSink, SinkError, SinkResult},
    state::game::{ChannelId, MessageId},
};

/// One recorded sink operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Sent {
        channel: ChannelId,
        message: MessageId,
        text: String,
    },
    Edited {
        channel: ChannelId,
        message: MessageId,
        text: String,
    },
}

#[derive(Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<SurfaceCall>>,
    forgotten: Mutex<Vec<MessageId>>,
    next_id: AtomicU64,
    fail_sends: AtomicBool,
    fail_edits: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn fail_edits(&self, fail: bool) {
        self.fail_edits.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Texts posted as new messages, in order.
    pub fn sent(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Sent { text, .. } => Some(text),
                SurfaceCall::Edited { .. } => None,
            })
            .collect()
    }

    /// Texts written over `message`, in order.
    pub fn edits_of(&self, message: &MessageId) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Edited {
                    message: edited,
                    text,
                    ..
                } if &edited == message => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn forgotten(&self) -> Vec<MessageId> {
        self.forgotten.lock().unwrap().clone()
    }
}

impl RenderSink for RecordingSink {
    fn send(&self, channel: &ChannelId, text: String) -> BoxFuture<'static, SinkResult<MessageId>> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Box::pin(future::ready(Err(SinkError::Unavailable(
                "injected send failure".into(),
            ))));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let message = MessageId::new(format!("msg-{id}"));
        self.calls.lock().unwrap().push(SurfaceCall::Sent {
            channel: channel.clone(),
            message: message.clone(),
            text,
        });
        Box::pin(future::ready(Ok(message)))
    }

    fn notify(&self, channel: &ChannelId, text: String) -> BoxFuture<'static, SinkResult<()>> {
        let sent = self.send(channel, text);
        Box::pin(async move { sent.await.map(|_| ()) })
    }

    fn edit(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        text: String,
    ) -> BoxFuture<'static, SinkResult<()>> {
        if self.fail_edits.load(Ordering::SeqCst) {
            return Box::pin(future::ready(Err(SinkError::Unavailable(
                "injected edit failure".into(),
            ))));
        }
        self.calls.lock().unwrap().push(SurfaceCall::Edited {
            channel: channel.clone(),
            message: message.clone(),
            text,
        });
        Box::pin(future::ready(Ok(())))
    }

    fn forget(&self, message: &MessageId) {
        self.forgotten.lock().unwrap().push(message.clone());
    }
}

//! Registry of live games keyed by the identity of their rendered message.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::{DashMap, mapref::entry::Entry};
use thiserror::Error;
use tokio::task::AbortHandle;
use tracing::debug;

use crate::state::game::{ChannelId, GameState, MessageId};

/// Errors raised by [`GameRegistry`] operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Another live game already uses this correlation key.
    #[error("game `{0}` is already registered")]
    Duplicate(MessageId),
}

/// Scheduled tasks a game can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSlot {
    /// The 1 Hz countdown ticker.
    Countdown,
    /// The aiming ticker.
    Aiming,
    /// The deferred cleanup timer.
    Cleanup,
}

#[derive(Debug, Default)]
struct GameTasks {
    countdown: Option<AbortHandle>,
    aiming: Option<AbortHandle>,
    cleanup: Option<AbortHandle>,
    closed: bool,
}

impl GameTasks {
    fn slot(&mut self, slot: TaskSlot) -> &mut Option<AbortHandle> {
        match slot {
            TaskSlot::Countdown => &mut self.countdown,
            TaskSlot::Aiming => &mut self.aiming,
            TaskSlot::Cleanup => &mut self.cleanup,
        }
    }
}

/// A registered game: its serialized state plus the tasks scheduled on its behalf.
#[derive(Debug)]
pub struct GameHandle {
    key: MessageId,
    channel: ChannelId,
    state: tokio::sync::Mutex<GameState>,
    tasks: Mutex<GameTasks>,
}

impl GameHandle {
    /// Wrap a game state so it can be shared between its tickers and shot handlers.
    pub fn new(state: GameState) -> Self {
        Self {
            key: state.key().clone(),
            channel: state.channel().clone(),
            state: tokio::sync::Mutex::new(state),
            tasks: Mutex::new(GameTasks::default()),
        }
    }

    /// Correlation key of the game.
    pub fn key(&self) -> &MessageId {
        &self.key
    }

    /// Channel the game renders into.
    pub fn channel(&self) -> &ChannelId {
        &self.channel
    }

    /// The game's mutable state. Holding the lock makes the holder the single writer.
    pub fn state(&self) -> &tokio::sync::Mutex<GameState> {
        &self.state
    }

    /// Track a freshly spawned task. A task attached after the handle was
    /// released is aborted immediately, as is any task it replaces.
    pub fn attach(&self, slot: TaskSlot, task: AbortHandle) {
        let mut tasks = self.tasks();
        if tasks.closed {
            task.abort();
            return;
        }
        if let Some(previous) = tasks.slot(slot).replace(task) {
            previous.abort();
        }
    }

    /// Abort the task in `slot`, returning whether one was held.
    pub fn cancel(&self, slot: TaskSlot) -> bool {
        match self.tasks().slot(slot).take() {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }

    /// Forget the task in `slot` without aborting it. Called by a task that is
    /// about to finish on its own.
    pub fn release(&self, slot: TaskSlot) {
        self.tasks().slot(slot).take();
    }

    /// Whether a task is currently tracked in `slot`.
    pub fn has_task(&self, slot: TaskSlot) -> bool {
        self.tasks().slot(slot).is_some()
    }

    /// Whether the handle was released from the registry.
    pub fn is_closed(&self) -> bool {
        self.tasks().closed
    }

    /// Abort every tracked task and refuse new ones.
    fn close(&self) {
        let mut tasks = self.tasks();
        tasks.closed = true;
        for slot in [TaskSlot::Countdown, TaskSlot::Aiming, TaskSlot::Cleanup] {
            if let Some(task) = tasks.slot(slot).take() {
                task.abort();
            }
        }
    }

    fn tasks(&self) -> MutexGuard<'_, GameTasks> {
        // The guarded data is a set of handles; a poisoned lock leaves it usable.
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Process-wide mapping from correlation key to live game.
#[derive(Debug, Default)]
pub struct GameRegistry {
    games: DashMap<MessageId, Arc<GameHandle>>,
}

impl GameRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a game under `key`; never overwrites a live game.
    pub fn register(&self, key: MessageId, handle: Arc<GameHandle>) -> Result<(), RegistryError> {
        match self.games.entry(key) {
            Entry::Occupied(entry) => Err(RegistryError::Duplicate(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(handle);
                Ok(())
            }
        }
    }

    /// Find the game registered under `key`.
    pub fn lookup(&self, key: &MessageId) -> Option<Arc<GameHandle>> {
        self.games.get(key).map(|entry| entry.value().clone())
    }

    /// Remove the game under `key` and abort its tasks. Removing an absent key is a no-op.
    pub fn remove(&self, key: &MessageId) -> Option<Arc<GameHandle>> {
        let (_, handle) = self.games.remove(key)?;
        handle.close();
        debug!(key = %key, "game removed from registry");
        Some(handle)
    }

    /// Number of live games.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether no game is live.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Remove every game, aborting all of their tasks. Returns how many were removed.
    pub fn shutdown(&self) -> usize {
        let keys = self
            .games
            .iter()
            .map(|entry| entry.key().clone())
            .collect::<Vec<_>>();
        keys.iter().filter(|key| self.remove(key).is_some()).count()
    }
}

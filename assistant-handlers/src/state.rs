//! Per-conversation session state shared by the handlers and [`crate::ChatSession`]:
//! the sticky conversation language, the in-flight turn's cancellation token and the
//! outcome of the last completed turn.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use helvia_core::{HandlerError, Language};
use response_engine::TurnOutcome;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
struct InFlight {
    turn_id: u64,
    token: CancellationToken,
}

#[derive(Debug, Default)]
struct ConversationState {
    language: Option<Language>,
    in_flight: Option<InFlight>,
    last_outcome: Option<TurnOutcome>,
}

#[derive(Debug, Default)]
struct Inner {
    next_turn_id: u64,
    conversations: HashMap<String, ConversationState>,
}

/// Shared, cloneable state keyed by conversation id. Locks are never held across an await.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    inner: Arc<Mutex<Inner>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current language of the conversation, if a turn or a seed has set one.
    pub fn language(&self, conversation_id: &str) -> Option<Language> {
        self.lock()
            .conversations
            .get(conversation_id)
            .and_then(|c| c.language)
    }

    pub fn set_language(&self, conversation_id: &str, language: Language) {
        self.lock()
            .conversations
            .entry(conversation_id.to_string())
            .or_default()
            .language = Some(language);
    }

    /// Registers a new in-flight turn. Fails if the conversation already has one.
    ///
    /// The returned guard releases the slot when dropped, whatever way the turn ends.
    pub fn begin_turn(&self, conversation_id: &str) -> Result<TurnGuard, HandlerError> {
        let mut inner = self.lock();
        inner.next_turn_id += 1;
        let turn_id = inner.next_turn_id;

        let entry = inner
            .conversations
            .entry(conversation_id.to_string())
            .or_default();
        if entry.in_flight.is_some() {
            return Err(HandlerError::TurnInProgress(conversation_id.to_string()));
        }
        let token = CancellationToken::new();
        entry.in_flight = Some(InFlight {
            turn_id,
            token: token.clone(),
        });
        entry.last_outcome = None;

        Ok(TurnGuard {
            state: self.clone(),
            conversation_id: conversation_id.to_string(),
            turn_id,
            token,
        })
    }

    /// Token of the in-flight turn, if any.
    pub fn cancel_token(&self, conversation_id: &str) -> Option<CancellationToken> {
        self.lock()
            .conversations
            .get(conversation_id)
            .and_then(|c| c.in_flight.as_ref())
            .map(|f| f.token.clone())
    }

    pub fn is_in_flight(&self, conversation_id: &str) -> bool {
        self.cancel_token(conversation_id).is_some()
    }

    /// Cancels the conversation's pending turn. Returns false if nothing was in flight.
    pub fn cancel(&self, conversation_id: &str) -> bool {
        match self.cancel_token(conversation_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancels every pending turn; returns how many were cancelled.
    pub fn cancel_all(&self) -> usize {
        let inner = self.lock();
        let mut cancelled = 0;
        for in_flight in inner
            .conversations
            .values()
            .filter_map(|c| c.in_flight.as_ref())
        {
            in_flight.token.cancel();
            cancelled += 1;
        }
        cancelled
    }

    pub fn record_outcome(&self, conversation_id: &str, outcome: TurnOutcome) {
        self.lock()
            .conversations
            .entry(conversation_id.to_string())
            .or_default()
            .last_outcome = Some(outcome);
    }

    pub fn take_outcome(&self, conversation_id: &str) -> Option<TurnOutcome> {
        self.lock()
            .conversations
            .get_mut(conversation_id)
            .and_then(|c| c.last_outcome.take())
    }

    /// Drops everything known about the conversation, cancelling a pending turn first.
    pub fn forget(&self, conversation_id: &str) {
        if let Some(state) = self.lock().conversations.remove(conversation_id) {
            if let Some(in_flight) = state.in_flight {
                in_flight.token.cancel();
            }
        }
    }

    fn finish_turn(&self, conversation_id: &str, turn_id: u64) {
        let mut inner = self.lock();
        if let Some(entry) = inner.conversations.get_mut(conversation_id) {
            // The slot may already belong to a newer turn after a forget.
            if entry.in_flight.as_ref().map(|f| f.turn_id) == Some(turn_id) {
                entry.in_flight = None;
            }
        }
    }
}

/// Marks one conversation turn as in flight until dropped.
#[derive(Debug)]
pub struct TurnGuard {
    state: SessionState,
    conversation_id: String,
    turn_id: u64,
    token: CancellationToken,
}

impl TurnGuard {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for TurnGuard {
    fn drop(&mut self) {
        self.state.finish_turn(&self.conversation_id, self.turn_id);
    }
}

//! Handler that produces the assistant reply through the [`ResponseEngine`] and paces it with
//! the simulated latency.

use std::sync::Arc;

use async_trait::async_trait;
use helvia_core::{ChatMessage, Handler, HandlerResponse, Language, Result};
use response_engine::{DelayGenerator, ResponseEngine};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::state::SessionState;

/// Runs one engine turn per message and returns `Reply(text)` once the latency has elapsed.
///
/// The wait races the turn's cancellation token: a cancelled turn returns `Stop`, so nothing is
/// appended and no tone plays. The conversation language is committed only for delivered replies.
#[derive(Clone)]
pub struct AssistantHandler {
    engine: Arc<ResponseEngine<Box<dyn DelayGenerator>>>,
    state: SessionState,
    default_language: Language,
}

impl AssistantHandler {
    pub fn new(
        engine: ResponseEngine<Box<dyn DelayGenerator>>,
        state: SessionState,
        default_language: Language,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            state,
            default_language,
        }
    }
}

#[async_trait]
impl Handler for AssistantHandler {
    #[instrument(skip(self, message), fields(conversation_id = %message.conversation_id))]
    async fn handle(&self, message: &ChatMessage) -> Result<HandlerResponse> {
        let current = self
            .state
            .language(&message.conversation_id)
            .unwrap_or(self.default_language);
        let outcome = self.engine.take_turn(
            std::slice::from_ref(message),
            &message.content,
            current,
        );

        // Outside a ChatSession there is no registered turn; such a turn cannot be cancelled.
        let token = self
            .state
            .cancel_token(&message.conversation_id)
            .unwrap_or_else(CancellationToken::new);

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                info!(
                    latency_ms = outcome.latency.as_millis() as u64,
                    "step: turn cancelled, reply discarded"
                );
                return Ok(HandlerResponse::Stop);
            }
            _ = tokio::time::sleep(outcome.latency) => {}
        }

        self.state
            .set_language(&message.conversation_id, outcome.language);
        let reply = outcome.reply.clone();
        self.state
            .record_outcome(&message.conversation_id, outcome);

        Ok(HandlerResponse::Reply(reply))
    }
}

//! One conversation turn: detect → classify → reply → latency.
//!
//! The engine keeps no per-conversation state. The caller threads the conversation language
//! between turns; a detected language that differs from it becomes the new (sticky) language.

use std::time::Duration;

use helvia_core::{ChatMessage, Language};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::delay::{DelayGenerator, RandomDelay};
use crate::intent::{classify, Intent};
use crate::language::detect_with_scores;
use crate::reply::reply;

/// Result of [`ResponseEngine::take_turn`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnOutcome {
    pub reply: String,
    pub intent: Intent,
    /// Conversation language after this turn.
    pub language: Language,
    pub previous_language: Language,
    /// Cosmetic delay before the reply is shown.
    pub latency: Duration,
}

impl TurnOutcome {
    pub fn switched(&self) -> bool {
        self.language != self.previous_language
    }
}

/// Stateless reply engine parameterized over its delay source.
#[derive(Debug, Clone, Default)]
pub struct ResponseEngine<D = RandomDelay> {
    delay: D,
}

impl<D: DelayGenerator> ResponseEngine<D> {
    pub fn new(delay: D) -> Self {
        Self { delay }
    }

    /// Produces the assistant reply for `utterance`.
    ///
    /// `history` is the visible transcript owned by the storage collaborator; it is not used for
    /// matching.
    #[instrument(skip(self, history, utterance), fields(history_len = history.len()))]
    pub fn take_turn(
        &self,
        history: &[ChatMessage],
        utterance: &str,
        current_language: Language,
    ) -> TurnOutcome {
        let (language, scores) = detect_with_scores(utterance, current_language);
        debug!(scores = ?scores, detected = %language, "step: language scored");

        let intent = classify(utterance);
        let text = reply(intent, language, utterance);
        let latency = self.delay.next_delay();

        if language != current_language {
            info!(
                from = %current_language,
                to = %language,
                "step: conversation language switched"
            );
        }
        info!(
            intent = %intent,
            language = %language,
            latency_ms = latency.as_millis() as u64,
            "step: turn computed"
        );

        TurnOutcome {
            reply: text,
            intent,
            language,
            previous_language: current_language,
            latency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::FixedDelay;
    use crate::reply::template;

    fn engine() -> ResponseEngine<FixedDelay> {
        ResponseEngine::new(FixedDelay(Duration::from_millis(1500)))
    }

    #[test]
    fn test_turn_switches_language() {
        let outcome = engine().take_turn(&[], "Hola, necesito ayuda con mi pedido", Language::En);
        assert_eq!(outcome.language, Language::Es);
        assert_eq!(outcome.previous_language, Language::En);
        assert!(outcome.switched());
        assert_eq!(outcome.intent, Intent::Order);
        assert_eq!(outcome.reply, template(Intent::Order, Language::Es));
        assert_eq!(outcome.latency, Duration::from_millis(1500));
    }

    #[test]
    fn test_turn_keeps_language_without_signal() {
        let outcome = engine().take_turn(&[], "xyz123", Language::Fr);
        assert_eq!(outcome.language, Language::Fr);
        assert!(!outcome.switched());
        assert_eq!(outcome.intent, Intent::Default);
        assert!(outcome.reply.contains("\"xyz123\""));
        assert!(outcome.reply.starts_with("Merci pour votre message!"));
    }
}

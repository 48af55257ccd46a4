//! # response-engine
//!
//! Deterministic support-assistant replies.
//!
//! - [`language`] – lexical language detection with a fallback language
//! - [`intent`] – ordered keyword intent classification
//! - [`reply`] – intent × language reply templates and the welcome message
//! - [`delay`] – injectable simulated latency
//! - [`turn`] – [`ResponseEngine::take_turn`], tying the above together

pub mod delay;
pub mod intent;
pub mod language;
pub mod reply;
pub mod turn;

pub use delay::{DelayGenerator, FixedDelay, RandomDelay};
pub use intent::{classify, Intent};
pub use language::{detect, detect_with_scores, score, LanguageScores};
pub use reply::{reply, template, welcome};
pub use turn::{ResponseEngine, TurnOutcome};

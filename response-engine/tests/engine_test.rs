//! Integration tests for [`response_engine::ResponseEngine`] and the free functions behind it.
//!
//! Covers the end-to-end turn scenarios, sticky language across turns, intent precedence and template completeness.

use std::time::Duration;

use helvia_core::Language;
use response_engine::{
    classify, detect, reply, template, FixedDelay, Intent, RandomDelay, ResponseEngine,
};

fn engine() -> ResponseEngine<FixedDelay> {
    ResponseEngine::new(FixedDelay(Duration::from_millis(1200)))
}

/// **Test: Spanish order request while the conversation is English.**
///
/// **Setup:** current language `en`.
/// **Action:** take a turn for "Hola, necesito ayuda con mi pedido".
/// **Expected:** detected `es`, intent `order`, literal Spanish order template.
#[test]
fn test_spanish_order_scenario() {
    let text = "Hola, necesito ayuda con mi pedido";
    assert_eq!(detect(text, Language::En), Language::Es);
    assert_eq!(classify(text), Intent::Order);

    let outcome = engine().take_turn(&[], text, Language::En);
    assert_eq!(outcome.language, Language::Es);
    assert_eq!(outcome.intent, Intent::Order);
    assert_eq!(
        outcome.reply,
        "¡Estaré encantado de ayudarte con tu pedido! ¿Podrías proporcionarme tu número de pedido o la dirección de correo electrónico asociada con tu cuenta?"
    );
}

/// **Test: English pricing question flips a Spanish conversation, and the switch sticks.**
///
/// **Setup:** current language `es`.
/// **Action:** turn 1 "What's your pricing?", then turn 2 with no language cues using turn 1's language.
/// **Expected:** turn 1 is `en` + pricing template; turn 2 stays `en` with the English default reply.
#[test]
fn test_english_pricing_scenario_is_sticky() {
    let engine = engine();
    let first = engine.take_turn(&[], "What's your pricing?", Language::Es);
    assert_eq!(first.language, Language::En);
    assert_eq!(first.intent, Intent::Pricing);
    assert_eq!(first.reply, template(Intent::Pricing, Language::En));
    assert!(first.switched());

    let second = engine.take_turn(&[], "xyz123", first.language);
    assert_eq!(second.language, Language::En);
    assert!(!second.switched());
    assert_eq!(second.intent, Intent::Default);
    assert!(second.reply.starts_with("Thank you for your message!"));
}

/// **Test: Order is checked before pricing.**
#[test]
fn test_order_beats_pricing() {
    assert_eq!(classify("what is the price of my order"), Intent::Order);
}

/// **Test: Every (intent, language) pair has a non-empty reply with empty input.**
#[test]
fn test_template_completeness() {
    for intent in Intent::ORDERED {
        for language in Language::ALL {
            assert!(!reply(intent, language, "").is_empty());
        }
    }
}

/// **Test: Detection falls back when nothing matches, and whole words beat other lexicons.**
#[test]
fn test_detection_fallback_and_whole_words() {
    assert_eq!(detect("xyz123", Language::En), Language::En);
    assert_eq!(detect("hi there", Language::En), Language::En);
}

/// **Test: Reply text is identical across calls; only latency may vary.**
///
/// **Setup:** engine with the default random delay.
/// **Action:** two turns with identical inputs.
/// **Expected:** same reply, intent and language; both latencies in [1000ms, 2000ms).
#[test]
fn test_turn_reply_is_deterministic() {
    let engine = ResponseEngine::new(RandomDelay::default());
    let a = engine.take_turn(&[], "Do you have an API?", Language::En);
    let b = engine.take_turn(&[], "Do you have an API?", Language::En);
    assert_eq!(a.reply, b.reply);
    assert_eq!(a.intent, Intent::Integration);
    for latency in [a.latency, b.latency] {
        assert!(latency >= Duration::from_millis(1000) && latency < Duration::from_millis(2000));
    }
}

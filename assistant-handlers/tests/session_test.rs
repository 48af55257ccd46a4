//! Integration tests for [`assistant_handlers::ChatSession`].
//!
//! Covers: full turns with language switching and stickiness, settings seeding, one in-flight turn
//! per conversation, cancellation, storage failures and notifier failures.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use assistant_handlers::ChatSession;
use async_trait::async_trait;
use helvia_core::{HandlerError, HelviaError, Language, Notifier, Sender, ToneSpec};
use response_engine::{template, welcome, FixedDelay, Intent};
use storage::{MessageRecord, MessageStore, Storage, StorageError, UserSettings};

const USER: &str = "user-1";

async fn open_storage() -> Storage {
    Storage::open("sqlite::memory:")
        .await
        .expect("Failed to open storage")
}

async fn session_with_delay(delay: Duration) -> ChatSession {
    ChatSession::builder(USER, open_storage().await)
        .delay(FixedDelay(delay))
        .build()
        .await
        .expect("Failed to build session")
}

#[derive(Default)]
struct CountingNotifier {
    count: AtomicUsize,
}

#[async_trait]
impl Notifier for CountingNotifier {
    async fn notify(&self, tone: &ToneSpec) -> helvia_core::Result<()> {
        assert_eq!(tone.frequency_hz, 800.0);
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _tone: &ToneSpec) -> helvia_core::Result<()> {
        Err(HelviaError::Notification("no audio device".to_string()))
    }
}

struct FailingStore;

#[async_trait]
impl MessageStore for FailingStore {
    async fn append(
        &self,
        _conversation_id: &str,
        _content: &str,
        _sender: Sender,
    ) -> Result<MessageRecord, StorageError> {
        Err(StorageError::Database("disk I/O error".to_string()))
    }

    async fn list(&self, _conversation_id: &str) -> Result<Vec<MessageRecord>, StorageError> {
        Ok(Vec::new())
    }
}

/// **Test: A Spanish order question switches the conversation to Spanish and is persisted.**
///
/// **Setup:** Session with no saved settings (fallback en), new conversation.
/// **Action:** `send("Hola, necesito ayuda con mi pedido")`.
/// **Expected:** Spanish order reply, switched; transcript is welcome(en), user, reply; one analytics
/// row; preferred language saved as es.
#[tokio::test]
async fn test_spanish_order_turn() {
    let session = session_with_delay(Duration::ZERO).await;
    let conv = session.start_conversation(None).await.unwrap();

    let text = "Hola, necesito ayuda con mi pedido";
    let report = session.send(&conv.id, text).await.unwrap();

    assert_eq!(report.reply.as_deref(), Some(template(Intent::Order, Language::Es)));
    assert_eq!(report.intent, Some(Intent::Order));
    assert_eq!(report.language, Language::Es);
    assert!(report.switched);

    let history = session.history(&conv.id).await.unwrap();
    let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        contents,
        vec![
            welcome(Language::En),
            text,
            template(Intent::Order, Language::Es)
        ]
    );
    assert_eq!(history[1].sender(), Some(Sender::User));
    assert_eq!(history[2].sender(), Some(Sender::Assistant));

    let metrics = session.storage().analytics.metrics(USER).await.unwrap();
    assert_eq!(metrics.total_responses, 1);

    let settings = session.settings().await.unwrap();
    assert_eq!(settings.chat_language, "es");
}

/// **Test: The switched language sticks for turns without a language signal.**
#[tokio::test]
async fn test_language_is_sticky_across_turns() {
    let session = session_with_delay(Duration::ZERO).await;
    let conv = session.start_conversation(Some("Support")).await.unwrap();

    session.send(&conv.id, "¿Qué hacer?").await.unwrap();
    let report = session.send(&conv.id, "xyz123").await.unwrap();

    assert_eq!(report.language, Language::Es);
    assert!(!report.switched);
    assert_eq!(report.intent, Some(Intent::Default));
    assert!(report.reply.unwrap().contains("\"xyz123\""));
    assert_eq!(session.conversation_language(&conv.id), Some(Language::Es));
}

/// **Test: The preferred chat language seeds a new conversation.**
#[tokio::test]
async fn test_preferred_language_seeds_conversation() {
    let session = session_with_delay(Duration::ZERO).await;
    let mut settings = session.settings().await.unwrap();
    settings.chat_language = "fr".to_string();
    session.save_settings(&settings).await.unwrap();

    let conv = session.start_conversation(None).await.unwrap();
    let report = session.send(&conv.id, "xyz123").await.unwrap();

    assert_eq!(report.language, Language::Fr);
    assert!(report.reply.unwrap().starts_with("Merci pour votre message!"));
    let history = session.history(&conv.id).await.unwrap();
    assert_eq!(history[0].content, welcome(Language::Fr));
}

/// **Test: Blank text is rejected before anything is stored.**
#[tokio::test]
async fn test_empty_text_rejected() {
    let session = session_with_delay(Duration::ZERO).await;
    let conv = session.start_conversation(None).await.unwrap();

    let err = session.send(&conv.id, "   ").await.unwrap_err();

    assert!(matches!(err, HelviaError::Handler(HandlerError::EmptyContent)));
    assert_eq!(session.history(&conv.id).await.unwrap().len(), 1);
}

/// **Test: A second send on a busy conversation fails while another conversation proceeds.**
///
/// **Setup:** 200 ms latency; conversations A and B.
/// **Action:** send on A; 20 ms later, send on A again and send on B.
/// **Expected:** first A and B succeed; second A fails with TurnInProgress.
#[tokio::test]
async fn test_one_turn_in_flight_per_conversation() {
    let session = session_with_delay(Duration::from_millis(200)).await;
    let a = session.start_conversation(Some("A")).await.unwrap();
    let b = session.start_conversation(Some("B")).await.unwrap();

    let (first, second, other) = tokio::join!(
        session.send(&a.id, "hello"),
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            session.send(&a.id, "hello again").await
        },
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            session.send(&b.id, "hello").await
        },
    );

    assert!(first.unwrap().reply.is_some());
    assert!(other.unwrap().reply.is_some());
    assert!(matches!(
        second.unwrap_err(),
        HelviaError::Handler(HandlerError::TurnInProgress(id)) if id == a.id
    ));

    // The slot is free again once the first turn finished.
    assert!(session.send(&a.id, "third").await.is_ok());
}

/// **Test: Cancelling a pending turn discards the reply and plays no tone.**
///
/// **Setup:** 10 s latency, counting notifier with sound forced on.
/// **Action:** send, then cancel the conversation 50 ms later.
/// **Expected:** report has no reply; transcript holds only welcome + user message; tone count 0.
#[tokio::test]
async fn test_cancel_discards_pending_reply() {
    let notifier = Arc::new(CountingNotifier::default());
    let session = ChatSession::builder(USER, open_storage().await)
        .delay(FixedDelay(Duration::from_secs(10)))
        .notifier(notifier.clone())
        .sound(Some(true))
        .build()
        .await
        .unwrap();
    let conv = session.start_conversation(None).await.unwrap();

    let (report, cancelled) = tokio::join!(session.send(&conv.id, "hola"), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        session.cancel(&conv.id)
    });

    let report = report.unwrap();
    assert!(cancelled);
    assert!(report.cancelled());
    assert_eq!(report.intent, None);
    assert_eq!(notifier.count.load(Ordering::SeqCst), 0);

    let history = session.history(&conv.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].content, "hola");
    // Cancelled turns do not commit a language switch.
    assert_eq!(session.conversation_language(&conv.id), Some(Language::En));
    assert!(!session.cancel(&conv.id));
}

/// **Test: Storage write failures surface as Database errors and free the conversation.**
#[tokio::test]
async fn test_store_failure_propagates() {
    let storage = open_storage().await;
    let conv = storage.conversations.create(USER, None).await.unwrap();
    let session = ChatSession::builder(USER, storage)
        .delay(FixedDelay(Duration::ZERO))
        .message_store(Arc::new(FailingStore))
        .build()
        .await
        .unwrap();

    let err = session.send(&conv.id, "hello").await.unwrap_err();
    assert!(matches!(err, HelviaError::Database(_)));

    // Retrying is allowed: the failed turn released its slot.
    let err = session.send(&conv.id, "hello").await.unwrap_err();
    assert!(matches!(err, HelviaError::Database(_)));
}

/// **Test: A failing notifier never fails the turn.**
#[tokio::test]
async fn test_notifier_failure_is_swallowed() {
    let session = ChatSession::builder(USER, open_storage().await)
        .delay(FixedDelay(Duration::ZERO))
        .notifier(Arc::new(FailingNotifier))
        .sound(Some(true))
        .build()
        .await
        .unwrap();
    let conv = session.start_conversation(None).await.unwrap();

    let report = session.send(&conv.id, "What's your pricing?").await.unwrap();

    assert_eq!(report.intent, Some(Intent::Pricing));
    assert_eq!(report.reply.as_deref(), Some(template(Intent::Pricing, Language::En)));
}

/// **Test: The tone follows the saved sound setting.**
#[tokio::test]
async fn test_tone_respects_sound_setting() {
    let notifier = Arc::new(CountingNotifier::default());
    let session = ChatSession::builder(USER, open_storage().await)
        .delay(FixedDelay(Duration::ZERO))
        .notifier(notifier.clone())
        .build()
        .await
        .unwrap();
    let conv = session.start_conversation(None).await.unwrap();

    session.send(&conv.id, "hello").await.unwrap();
    assert_eq!(notifier.count.load(Ordering::SeqCst), 1);

    let mut settings = UserSettings::defaults(USER, Language::En);
    settings.sound_enabled = false;
    session.save_settings(&settings).await.unwrap();
    assert!(!session.sound_enabled());

    session.send(&conv.id, "hello").await.unwrap();
    assert_eq!(notifier.count.load(Ordering::SeqCst), 1);
}

/// **Test: Conversations of other users are invisible to the session.**
#[tokio::test]
async fn test_foreign_conversation_not_found() {
    let storage = open_storage().await;
    let foreign = storage.conversations.create("someone-else", None).await.unwrap();
    let session = ChatSession::builder(USER, storage)
        .delay(FixedDelay(Duration::ZERO))
        .build()
        .await
        .unwrap();

    let err = session.send(&foreign.id, "hello").await.unwrap_err();
    assert!(matches!(
        err,
        HelviaError::Handler(HandlerError::ConversationNotFound(_))
    ));
    assert!(session.history(&foreign.id).await.is_err());
}

/// **Test: Ratings are validated and feed the satisfaction average.**
#[tokio::test]
async fn test_rate_conversation() {
    let session = session_with_delay(Duration::ZERO).await;
    let conv = session.start_conversation(None).await.unwrap();

    session.rate(&conv.id, 4).await.unwrap();
    session.rate(&conv.id, 5).await.unwrap();
    assert!(matches!(
        session.rate(&conv.id, 9).await.unwrap_err(),
        HelviaError::Config(_)
    ));

    let metrics = session.storage().analytics.metrics(USER).await.unwrap();
    assert_eq!(metrics.average_satisfaction, 5);
    assert_eq!(metrics.total_responses, 2);
}

/// **Test: Deleting a conversation removes it and its transcript.**
#[tokio::test]
async fn test_delete_conversation() {
    let session = session_with_delay(Duration::ZERO).await;
    let conv = session.start_conversation(None).await.unwrap();
    session.send(&conv.id, "hello").await.unwrap();

    session.delete_conversation(&conv.id).await.unwrap();

    assert!(session.conversations().await.unwrap().is_empty());
    assert!(session.conversation_language(&conv.id).is_none());
}

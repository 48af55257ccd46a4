//! Handler that plays the reply tone in after().

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use helvia_core::{ChatMessage, Handler, HandlerResponse, Notifier, Result, ToneSpec};
use tracing::{debug, warn};

/// Emits [`ToneSpec`] through the notifier for each delivered reply while sound is enabled.
/// Notifier failures are logged and never fail the turn.
#[derive(Clone)]
pub struct NotificationHandler {
    notifier: Arc<dyn Notifier>,
    sound_enabled: Arc<AtomicBool>,
    tone: ToneSpec,
}

impl NotificationHandler {
    pub fn new(notifier: Arc<dyn Notifier>, sound_enabled: Arc<AtomicBool>) -> Self {
        Self {
            notifier,
            sound_enabled,
            tone: ToneSpec::default(),
        }
    }
}

#[async_trait]
impl Handler for NotificationHandler {
    async fn after(&self, message: &ChatMessage, response: &HandlerResponse) -> Result<()> {
        if !matches!(response, HandlerResponse::Reply(_)) {
            return Ok(());
        }
        if !self.sound_enabled.load(Ordering::Relaxed) {
            debug!("sound disabled, no tone");
            return Ok(());
        }
        if let Err(e) = self.notifier.notify(&self.tone).await {
            warn!(
                error = %e,
                conversation_id = %message.conversation_id,
                "Notification failed, ignoring"
            );
        }
        Ok(())
    }
}

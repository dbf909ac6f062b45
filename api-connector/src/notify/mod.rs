//! Notification dispatch
//!
//! After a response arrives, a call with a [`NotificationPolicy`] picks at
//! most one feedback event, translates its message for the call language
//! and hands it to a [`FeedbackEmitter`].
//!
//! Dispatch is best-effort: translation failures and a closed emitter are
//! logged and never reach the call result.

mod translation;

pub use translation::{
    NOTIFICATIONS_NAMESPACE, StaticTranslations, TranslationCache, TranslationProvider, Translator,
};

use shared::{Feedback, NotificationPolicy};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Feedback display (toasts, status bar, ...)
pub trait FeedbackEmitter: Send + Sync {
    fn show(&self, feedback: Feedback);
}

impl FeedbackEmitter for mpsc::UnboundedSender<Feedback> {
    fn show(&self, feedback: Feedback) {
        if self.send(feedback).is_err() {
            tracing::warn!("Feedback receiver dropped, message discarded");
        }
    }
}

/// Picks, translates and emits feedback events
#[derive(Clone)]
pub struct NotificationDispatcher {
    translations: Arc<TranslationCache>,
    emitter: Arc<dyn FeedbackEmitter>,
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("translations", &self.translations)
            .finish()
    }
}

impl NotificationDispatcher {
    pub fn new(translations: Arc<TranslationCache>, emitter: Arc<dyn FeedbackEmitter>) -> Self {
        Self {
            translations,
            emitter,
        }
    }

    pub fn translations(&self) -> &Arc<TranslationCache> {
        &self.translations
    }

    /// Emit the event selected by `policy` for this outcome, if any
    ///
    /// Returns the emitted feedback.
    pub async fn dispatch(
        &self,
        policy: &NotificationPolicy,
        lang: &str,
        status: u16,
        ok: bool,
    ) -> Option<Feedback> {
        let event = policy.select(status, ok)?;

        let translator = match self.translations.get_or_fetch(lang).await {
            Ok(translator) => translator,
            Err(e) => {
                tracing::warn!(lang = %lang, error = %e, "Failed to load notification translations");
                return None;
            }
        };

        let feedback = Feedback {
            message: translator.translate(&event.message),
            kind: event.kind,
        };
        self.emitter.show(feedback.clone());
        Some(feedback)
    }
}

//! User-facing feedback events
//!
//! A [`NotificationPolicy`] declares which feedback event an endpoint call
//! produces for a given response outcome. Event messages are translation
//! keys; they are resolved against the call language before display.

use serde::{Deserialize, Serialize};

/// Visual flavour of a feedback message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
    Success,
    Error,
    Warning,
    Info,
}

/// A feedback event as declared on an endpoint (message is a translation key)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: FeedbackType,
}

impl FeedbackEvent {
    pub fn new(message: impl Into<String>, kind: FeedbackType) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, FeedbackType::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, FeedbackType::Error)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, FeedbackType::Warning)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, FeedbackType::Info)
    }
}

/// Explicit status → event mapping. `event: None` suppresses any feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusNotification {
    pub code: u16,
    pub event: Option<FeedbackEvent>,
}

/// Which feedback to show for which response outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPolicy {
    #[serde(default)]
    pub handle_codes: Vec<StatusNotification>,
    #[serde(default)]
    pub success: Option<FeedbackEvent>,
    #[serde(default)]
    pub error: Option<FeedbackEvent>,
}

impl NotificationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a status code to an event
    pub fn on_status(mut self, code: u16, event: FeedbackEvent) -> Self {
        self.handle_codes.push(StatusNotification {
            code,
            event: Some(event),
        });
        self
    }

    /// Show nothing for this status code, defaults included
    pub fn silence(mut self, code: u16) -> Self {
        self.handle_codes.push(StatusNotification { code, event: None });
        self
    }

    pub fn on_success(mut self, event: FeedbackEvent) -> Self {
        self.success = Some(event);
        self
    }

    pub fn on_error(mut self, event: FeedbackEvent) -> Self {
        self.error = Some(event);
        self
    }

    /// Pick the event for a response outcome. At most one event is chosen.
    pub fn select(&self, status: u16, ok: bool) -> Option<&FeedbackEvent> {
        if let Some(mapping) = self.handle_codes.iter().find(|m| m.code == status) {
            return mapping.event.as_ref();
        }
        if ok {
            self.success.as_ref()
        } else {
            self.error.as_ref()
        }
    }
}

/// A translated feedback message ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: FeedbackType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_mapping_wins() {
        let policy = NotificationPolicy::new()
            .on_status(409, FeedbackEvent::warning("conflict"))
            .on_error(FeedbackEvent::error("failed"));
        assert_eq!(
            policy.select(409, false),
            Some(&FeedbackEvent::warning("conflict"))
        );
        assert_eq!(policy.select(500, false), Some(&FeedbackEvent::error("failed")));
    }

    #[test]
    fn test_silenced_status_suppresses_defaults() {
        let policy = NotificationPolicy::new()
            .silence(404)
            .on_success(FeedbackEvent::success("saved"));
        assert_eq!(policy.select(404, false), None);
        assert_eq!(policy.select(200, true), Some(&FeedbackEvent::success("saved")));
    }

    #[test]
    fn test_no_default_for_outcome() {
        let policy = NotificationPolicy::new().on_success(FeedbackEvent::success("saved"));
        assert_eq!(policy.select(500, false), None);
    }

    #[test]
    fn test_policy_deserialize() {
        let json = r#"{
            "handle_codes": [{"code": 404, "event": null}],
            "success": {"message": "saved", "type": "success"}
        }"#;
        let policy: NotificationPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.handle_codes.len(), 1);
        assert!(policy.handle_codes[0].event.is_none());
        assert_eq!(policy.success.unwrap().kind, FeedbackType::Success);
        assert!(policy.error.is_none());
    }
}

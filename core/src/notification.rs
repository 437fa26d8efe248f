//! Outcome notifications attached to a result.

use crate::effect::NotificationEffect;
use serde::{Deserialize, Serialize};

/// A structured outcome record: an effect plus a human-readable message.
///
/// Notifications are immutable once built. On a failure path they decide the
/// response status and form the response body; on a success path they are
/// informational and travel as `X-Notification` headers.
///
/// # Wire format
///
/// ```json
/// { "effect": "NotFound", "message": "order 42 not found", "key": "orderId" }
/// ```
///
/// `key` is omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    effect: NotificationEffect,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<String>,
}

impl Notification {
    /// Create a notification with the given effect and message.
    #[must_use]
    pub fn new(effect: NotificationEffect, message: impl Into<String>) -> Self {
        Self {
            effect,
            message: message.into(),
            key: None,
        }
    }

    /// Attach the field or rule name this notification is about.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Shorthand for a [`NotificationEffect::Validation`] notification on `key`.
    #[must_use]
    pub fn validation(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationEffect::Validation, message).with_key(key)
    }

    /// Shorthand for a [`NotificationEffect::NotFound`] notification.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(NotificationEffect::NotFound, message)
    }

    /// Shorthand for a [`NotificationEffect::Conflicted`] notification.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(NotificationEffect::Conflicted, message)
    }

    /// Effect of this notification.
    #[must_use]
    pub const fn effect(&self) -> NotificationEffect {
        self.effect
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Field or rule name, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_json_uses_camel_case_and_skips_missing_key() {
        let json = serde_json::to_value(Notification::not_found("gone")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "effect": "NotFound", "message": "gone" })
        );
    }

    #[test]
    fn test_json_with_key() {
        let note = Notification::validation("email", "Email is required");
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["key"], "email");
        assert_eq!(json["effect"], "Validation");

        let back: Notification = serde_json::from_value(json).unwrap();
        assert_eq!(back, note);
    }

    #[test]
    fn test_unknown_effect_is_rejected() {
        let result = serde_json::from_str::<Notification>(
            r#"{ "effect": "Teapot", "message": "short and stout" }"#,
        );
        assert!(result.is_err());
    }
}

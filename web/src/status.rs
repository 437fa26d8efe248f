//! Mapping from notification effects to HTTP status codes.

use crate::error::TranslateError;
use axum::http::StatusCode;
use result_bridge_core::effect::resolve_effect;
use result_bridge_core::{Notification, NotificationEffect};
use std::collections::HashMap;

/// Status table applied to failed results.
///
/// [`StatusPolicy::default`] carries the standard table:
///
/// | Effect | Status |
/// |---|---|
/// | `Validation`, `InvalidStatus` | 400 Bad Request |
/// | `NotFound` | 404 Not Found |
/// | `Error` | 422 Unprocessable Entity |
/// | `PreConditionFailed` | 412 Precondition Failed |
/// | `NotImplemented` | 501 Not Implemented |
/// | `NotAuthorized` | 403 Forbidden |
/// | `Conflicted` | 409 Conflict |
///
/// Hosts may override or remove entries. A failed result whose winning
/// effect has no entry is rejected with
/// [`TranslateError::UnsupportedEffect`]; there is no fallback status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPolicy {
    table: HashMap<NotificationEffect, StatusCode>,
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self::empty()
            .with(NotificationEffect::Validation, StatusCode::BAD_REQUEST)
            .with(NotificationEffect::InvalidStatus, StatusCode::BAD_REQUEST)
            .with(NotificationEffect::NotFound, StatusCode::NOT_FOUND)
            .with(NotificationEffect::Error, StatusCode::UNPROCESSABLE_ENTITY)
            .with(
                NotificationEffect::PreConditionFailed,
                StatusCode::PRECONDITION_FAILED,
            )
            .with(NotificationEffect::NotImplemented, StatusCode::NOT_IMPLEMENTED)
            .with(NotificationEffect::NotAuthorized, StatusCode::FORBIDDEN)
            .with(NotificationEffect::Conflicted, StatusCode::CONFLICT)
    }
}

impl StatusPolicy {
    /// A policy with no mappings at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Map `effect` to `status`, replacing any existing entry.
    #[must_use]
    pub fn with(mut self, effect: NotificationEffect, status: StatusCode) -> Self {
        self.table.insert(effect, status);
        self
    }

    /// Remove the entry for `effect`.
    #[must_use]
    pub fn without(mut self, effect: NotificationEffect) -> Self {
        self.table.remove(&effect);
        self
    }

    /// Status for a single effect.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::UnsupportedEffect`] if `effect` is unmapped.
    pub fn status_for(&self, effect: NotificationEffect) -> Result<StatusCode, TranslateError> {
        self.table
            .get(&effect)
            .copied()
            .ok_or(TranslateError::UnsupportedEffect(effect))
    }

    /// Status of a failed result: the status of its highest-priority effect.
    ///
    /// Returns `Ok(None)` when there are no notifications.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::UnsupportedEffect`] if the winning effect is
    /// unmapped.
    pub fn resolve(
        &self,
        notifications: &[Notification],
    ) -> Result<Option<StatusCode>, TranslateError> {
        resolve_effect(notifications.iter().map(Notification::effect))
            .map(|effect| self.status_for(effect))
            .transpose()
    }
}

//! Outcome taxonomy.
//!
//! Every [`Notification`](crate::notification::Notification) carries a
//! [`NotificationEffect`] describing what kind of outcome it reports. When a
//! result fails with several notifications, exactly one effect wins and
//! decides the transport status. The winner is chosen through an explicit
//! priority table, never through the enum's declaration order, so adding or
//! reordering variants cannot silently change which status a client sees.
//!
//! # Priority (low → high)
//!
//! ```text
//! Validation < InvalidStatus < NotFound < Error < PreConditionFailed
//!            < NotImplemented < NotAuthorized < Conflicted
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of an outcome notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationEffect {
    /// Input failed a validation rule.
    Validation,
    /// The target is in a state that does not allow the operation.
    InvalidStatus,
    /// The target does not exist.
    NotFound,
    /// The operation failed for a domain reason.
    Error,
    /// A precondition supplied by the caller did not hold.
    PreConditionFailed,
    /// The operation is not implemented.
    NotImplemented,
    /// The caller may not perform the operation.
    NotAuthorized,
    /// The operation conflicts with the current state of the target.
    Conflicted,
}

impl NotificationEffect {
    /// All effects, ordered from lowest to highest priority.
    pub const PRIORITY: [Self; 8] = [
        Self::Validation,
        Self::InvalidStatus,
        Self::NotFound,
        Self::Error,
        Self::PreConditionFailed,
        Self::NotImplemented,
        Self::NotAuthorized,
        Self::Conflicted,
    ];

    /// Rank of this effect in [`Self::PRIORITY`]. Higher wins.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Validation => 0,
            Self::InvalidStatus => 1,
            Self::NotFound => 2,
            Self::Error => 3,
            Self::PreConditionFailed => 4,
            Self::NotImplemented => 5,
            Self::NotAuthorized => 6,
            Self::Conflicted => 7,
        }
    }

    /// Stable name, identical to the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "Validation",
            Self::InvalidStatus => "InvalidStatus",
            Self::NotFound => "NotFound",
            Self::Error => "Error",
            Self::PreConditionFailed => "PreConditionFailed",
            Self::NotImplemented => "NotImplemented",
            Self::NotAuthorized => "NotAuthorized",
            Self::Conflicted => "Conflicted",
        }
    }
}

impl fmt::Display for NotificationEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Select the highest-priority effect among `effects`.
///
/// Returns `None` for an empty input. Duplicates are irrelevant: the result
/// only depends on the set of effects present, not on order or grouping.
pub fn resolve_effect<I>(effects: I) -> Option<NotificationEffect>
where
    I: IntoIterator<Item = NotificationEffect>,
{
    effects.into_iter().max_by_key(|effect| effect.priority())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_priority_table_matches_rank() {
        for (index, effect) in NotificationEffect::PRIORITY.iter().enumerate() {
            assert_eq!(usize::from(effect.priority()), index, "{effect}");
        }
    }

    #[test]
    fn test_resolve_empty() {
        assert_eq!(resolve_effect(Vec::new()), None);
    }

    #[test]
    fn test_conflict_beats_everything() {
        let resolved = resolve_effect([
            NotificationEffect::Conflicted,
            NotificationEffect::Validation,
            NotificationEffect::NotAuthorized,
        ]);
        assert_eq!(resolved, Some(NotificationEffect::Conflicted));
    }

    #[test]
    fn test_not_found_beats_validation() {
        let resolved = resolve_effect([
            NotificationEffect::Validation,
            NotificationEffect::Validation,
            NotificationEffect::NotFound,
        ]);
        assert_eq!(resolved, Some(NotificationEffect::NotFound));
    }

    #[test]
    fn test_serialized_name_matches_display() {
        for effect in NotificationEffect::PRIORITY {
            let json = serde_json::to_string(&effect).unwrap_or_default();
            assert_eq!(json, format!("\"{effect}\""));
        }
    }

    fn any_effect() -> impl Strategy<Value = NotificationEffect> {
        proptest::sample::select(NotificationEffect::PRIORITY.to_vec())
    }

    proptest! {
        #[test]
        fn prop_pair_resolves_to_higher_priority(a in any_effect(), b in any_effect()) {
            let expected = if a.priority() >= b.priority() { a } else { b };
            prop_assert_eq!(resolve_effect([a, b]), Some(expected));
            prop_assert_eq!(resolve_effect([b, a]), Some(expected));
        }

        #[test]
        fn prop_order_independent(mut effects in proptest::collection::vec(any_effect(), 1..16)) {
            let forward = resolve_effect(effects.clone());
            effects.reverse();
            prop_assert_eq!(resolve_effect(effects), forward);
        }
    }
}

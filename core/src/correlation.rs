//! Request-scoped correlation identifiers.
//!
//! A [`CorrelationId`] identifies one logical request chain in the logs. It
//! is ambient: code running inside a scope reads it with [`current`] instead
//! of receiving it as a parameter.
//!
//! The ambient value is stored in tokio task-local storage, so it follows the
//! future that owns it across `.await` points and worker threads. Two
//! requests running concurrently on the same worker never observe each
//! other's id.
//!
//! # Scopes
//!
//! ```text
//! Unscoped ──scope(id)──▶ Scoped ──future completes / panics──▶ Closed
//! ```
//!
//! Scopes nest. Closing an inner scope restores the value of the enclosing
//! one, and closing the outermost scope leaves no ambient value at all. The
//! restore happens when the scoped future finishes, is dropped, or unwinds.
//!
//! # Example
//!
//! ```
//! use result_bridge_core::correlation::{self, CorrelationId};
//!
//! # tokio_test::block_on(async {
//! let id = CorrelationId::new("request-42");
//! id.scope(async {
//!     assert_eq!(correlation::current().map(|id| id.to_string()).as_deref(), Some("request-42"));
//! })
//! .await;
//!
//! assert!(correlation::current().is_none());
//! # });
//! ```

use futures::future::Either;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::task::futures::TaskLocalFuture;
use tokio::task::JoinHandle;
use uuid::Uuid;

tokio::task_local! {
    static CURRENT: CorrelationId;
}

/// Prefix of synthesized correlation ids.
pub const GENERATED_PREFIX: &str = "request-";

/// Opaque identifier of one logical request chain.
///
/// Cheap to clone; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(Arc<str>);

impl CorrelationId {
    /// Wrap an existing token, typically taken from an inbound header.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(Arc::from(value.into()))
    }

    /// Synthesize a fresh id of the form `request-<uuid>`.
    #[must_use]
    pub fn generate() -> Self {
        Self::new(format!("{GENERATED_PREFIX}{}", Uuid::new_v4()))
    }

    /// The token as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Run `future` with this id as the ambient correlation id.
    ///
    /// The previous ambient value, if any, is restored once the returned
    /// future completes or is dropped.
    pub fn scope<F>(self, future: F) -> TaskLocalFuture<Self, F>
    where
        F: Future,
    {
        CURRENT.scope(self, future)
    }

    /// Wrap `future` so it runs in this id's scope wherever it is polled.
    ///
    /// Use before handing work to a spawner that does not go through
    /// [`spawn`].
    pub fn bind<F>(self, future: F) -> TaskLocalFuture<Self, F>
    where
        F: Future,
    {
        self.scope(future)
    }

    /// Synchronous counterpart of [`CorrelationId::scope`].
    pub fn scope_sync<R>(self, f: impl FnOnce() -> R) -> R {
        CURRENT.sync_scope(self, f)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CorrelationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The ambient correlation id, or `None` outside of any scope.
#[must_use]
pub fn current() -> Option<CorrelationId> {
    CURRENT.try_with(Clone::clone).ok()
}

/// Spawn a task that inherits the ambient correlation id.
///
/// `tokio::spawn` starts tasks with empty task-local storage; use this when
/// work started on behalf of a request must keep logging under its id.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let task = match current() {
        Some(id) => {
            tracing::debug!(correlation_id = %id, "Spawning task in correlation scope");
            Either::Left(id.bind(future))
        }
        None => Either::Right(future),
    };
    tokio::spawn(task)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::panic::AssertUnwindSafe;
    use std::time::Duration;

    fn ambient() -> Option<String> {
        current().map(|id| id.to_string())
    }

    #[tokio::test]
    async fn test_unscoped_has_no_id() {
        assert!(current().is_none());
    }

    #[test]
    fn test_generated_id_has_prefix_and_is_unique() {
        let a = CorrelationId::generate();
        let b = CorrelationId::generate();
        assert!(a.as_str().starts_with(GENERATED_PREFIX));
        let token = &a.as_str()[GENERATED_PREFIX.len()..];
        assert!(Uuid::parse_str(token).is_ok());
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_nested_scope_restores_outer() {
        CorrelationId::new("outer")
            .scope(async {
                assert_eq!(ambient().as_deref(), Some("outer"));

                CorrelationId::new("inner")
                    .scope(async {
                        assert_eq!(ambient().as_deref(), Some("inner"));
                    })
                    .await;

                assert_eq!(ambient().as_deref(), Some("outer"));
            })
            .await;

        assert!(current().is_none());
    }

    #[tokio::test]
    async fn test_scope_survives_await_points() {
        CorrelationId::new("sleepy")
            .scope(async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                tokio::task::yield_now().await;
                assert_eq!(ambient().as_deref(), Some("sleepy"));
            })
            .await;
    }

    #[tokio::test]
    async fn test_scope_restored_after_panic() {
        CorrelationId::new("outer")
            .scope(async {
                let result = AssertUnwindSafe(
                    CorrelationId::new("inner").scope(async { panic!("handler blew up") }),
                )
                .catch_unwind()
                .await;

                assert!(result.is_err());
                assert_eq!(ambient().as_deref(), Some("outer"));
            })
            .await;
    }

    #[test]
    fn test_sync_scope_nesting() {
        CorrelationId::new("outer").scope_sync(|| {
            CorrelationId::new("inner").scope_sync(|| {
                assert_eq!(ambient().as_deref(), Some("inner"));
            });
            assert_eq!(ambient().as_deref(), Some("outer"));
        });
        assert!(current().is_none());
    }

    #[tokio::test]
    async fn test_spawn_inherits_ambient_id() {
        let seen = CorrelationId::new("parent")
            .scope(async { spawn(async { ambient() }).await.unwrap() })
            .await;
        assert_eq!(seen.as_deref(), Some("parent"));

        let plain = CorrelationId::new("parent")
            .scope(async { tokio::spawn(async { ambient() }).await.unwrap() })
            .await;
        assert!(plain.is_none());
    }

    #[tokio::test]
    async fn test_bound_future_keeps_id_under_plain_spawn() {
        let bound = CorrelationId::new("bound").bind(async { ambient() });
        let seen = tokio::spawn(bound).await.unwrap();
        assert_eq!(seen.as_deref(), Some("bound"));
        assert!(current().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_scopes_are_isolated() {
        let handles: Vec<_> = (0..64u64)
            .map(|n| {
                tokio::spawn(async move {
                    let own = format!("request-{n}");
                    CorrelationId::new(own.clone())
                        .scope(async move {
                            for step in 0..5 {
                                tokio::time::sleep(Duration::from_millis((n + step) % 3)).await;
                                assert_eq!(ambient().as_deref(), Some(own.as_str()));
                            }
                        })
                        .await;
                })
            })
            .collect();

        for handle in handles {
            handle.await.expect("task should not panic");
        }
    }
}

//! # Result Bridge Testing
//!
//! Testing utilities and helpers for Result Bridge.
//!
//! This crate provides:
//! - Fixtures for notifications and pages
//! - Decoders for the wire headers written by the translator
//! - Response body helpers
//! - Property-based testing strategies
//! - Tracing initialization for tests
//!
//! ## Example
//!
//! ```ignore
//! use result_bridge_testing::{fixtures, wire};
//!
//! #[tokio::test]
//! async fn test_orders_page() {
//!     let response = app().oneshot(get("/orders?page=3")).await.unwrap();
//!
//!     let links = wire::link_relations(response.headers());
//!     assert_eq!(wire::page_of_relation(&links, "next"), Some(4));
//! }
//! ```

/// Fixtures for building test inputs.
pub mod fixtures {
    use result_bridge_core::{Notification, NotificationEffect, PageDescriptor};

    /// A notification with `effect` and a message naming it.
    #[must_use]
    pub fn notification(effect: NotificationEffect) -> Notification {
        Notification::new(effect, format!("{effect} raised in test"))
    }

    /// One notification per effect, in the given order.
    #[must_use]
    pub fn notifications(effects: &[NotificationEffect]) -> Vec<Notification> {
        effects.iter().copied().map(notification).collect()
    }

    /// Page `current_page` of a result set of `total` numbered items.
    ///
    /// Items are the 1-based positions of the results on the page.
    ///
    /// # Panics
    ///
    /// Panics if `current_page` or `per_page` is zero.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn numbered_page(current_page: u64, per_page: u64, total: u64) -> PageDescriptor<u64> {
        let start = (current_page - 1) * per_page + 1;
        let end = (current_page * per_page).min(total);
        PageDescriptor::new((start..=end).collect(), current_page, per_page, total)
            .expect("page fixture requires non-zero page and page size")
    }
}

/// Decoders for the headers written by the translator.
pub mod wire {
    use axum::http::HeaderMap;
    use base64::Engine;
    use result_bridge_core::Notification;

    /// Decode every `X-Notification` header, in order.
    ///
    /// Headers that are not valid base64 JSON notifications are skipped.
    #[must_use]
    pub fn notifications(headers: &HeaderMap) -> Vec<Notification> {
        headers
            .get_all("x-notification")
            .iter()
            .filter_map(|value| {
                base64::engine::general_purpose::STANDARD
                    .decode(value.as_bytes())
                    .ok()
            })
            .filter_map(|json| serde_json::from_slice(&json).ok())
            .collect()
    }

    /// Parse the `Link` header into `(rel, url)` pairs, in header order.
    #[must_use]
    pub fn link_relations(headers: &HeaderMap) -> Vec<(String, String)> {
        headers
            .get("link")
            .and_then(|value| value.to_str().ok())
            .map(parse_links)
            .unwrap_or_default()
    }

    /// Parse a `Link` header value into `(rel, url)` pairs.
    #[must_use]
    pub fn parse_links(value: &str) -> Vec<(String, String)> {
        value
            .split(',')
            .filter_map(|entry| {
                let (url, rel) = entry.trim().split_once(">; rel=\"")?;
                let url = url.strip_prefix('<')?;
                let rel = rel.strip_suffix('"')?;
                Some((rel.to_string(), url.to_string()))
            })
            .collect()
    }

    /// Value of the `page` query parameter of the link with relation `rel`.
    #[must_use]
    pub fn page_of_relation(links: &[(String, String)], rel: &str) -> Option<u64> {
        let (_, url) = links.iter().find(|(name, _)| name == rel)?;
        query_value(url, "page")?.parse().ok()
    }

    /// Value of query parameter `name` (case-insensitive) in `url`.
    #[must_use]
    pub fn query_value<'a>(url: &'a str, name: &str) -> Option<&'a str> {
        let (_, query) = url.split_once('?')?;
        query.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            key.eq_ignore_ascii_case(name).then_some(value)
        })
    }
}

/// Response body helpers.
pub mod body {
    use axum::response::Response;
    use bytes::Bytes;
    use serde::de::DeserializeOwned;

    /// Collect the whole body of `response`.
    ///
    /// # Panics
    ///
    /// Panics if the body cannot be read.
    #[allow(clippy::expect_used)]
    pub async fn bytes(response: Response) -> Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body should be readable")
    }

    /// Deserialize the JSON body of `response`.
    ///
    /// # Panics
    ///
    /// Panics if the body cannot be read or is not valid JSON for `T`.
    #[allow(clippy::expect_used)]
    pub async fn json<T: DeserializeOwned>(response: Response) -> T {
        let bytes = bytes(response).await;
        serde_json::from_slice(&bytes).expect("response body should be valid JSON")
    }
}

/// Property-based testing strategies.
pub mod strategies {
    use proptest::prelude::*;
    use result_bridge_core::NotificationEffect;

    /// Any notification effect.
    pub fn any_effect() -> impl Strategy<Value = NotificationEffect> {
        proptest::sample::select(NotificationEffect::PRIORITY.to_vec())
    }

    /// A non-empty list of effects.
    pub fn effects(max_len: usize) -> impl Strategy<Value = Vec<NotificationEffect>> {
        proptest::collection::vec(any_effect(), 1..=max_len.max(1))
    }
}

/// Install a test-friendly tracing subscriber.
///
/// Honors `RUST_LOG`; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

//! Custom Axum extractors.
//!
//! - [`Correlation`]: the correlation id of the current request
//! - [`Translator`](crate::translate::Translator): renders result envelopes
//!   (defined next to the translation rules)
//!
//! # Example
//!
//! ```ignore
//! use result_bridge_web::extractors::Correlation;
//!
//! async fn handler(Correlation(id): Correlation) -> String {
//!     tracing::info!(correlation_id = %id, "Processing request");
//!     format!("Request ID: {id}")
//! }
//! ```

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use result_bridge_core::correlation::{self, CorrelationId};

/// Correlation id of the current request.
///
/// Resolved from, in order:
///
/// 1. The id stored in request extensions by the correlation middleware
/// 2. The ambient correlation scope
/// 3. A freshly generated `request-<uuid>` id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correlation(pub CorrelationId);

#[async_trait]
impl<S> FromRequestParts<S> for Correlation
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .extensions
            .get::<CorrelationId>()
            .cloned()
            .or_else(correlation::current)
            .unwrap_or_else(CorrelationId::generate);

        Ok(Self(id))
    }
}

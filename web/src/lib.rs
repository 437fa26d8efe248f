//! Axum integration for Result Bridge.
//!
//! This crate is the transport edge of the Result Bridge architecture: it
//! renders [`ResultEnvelope`](result_bridge_core::ResultEnvelope)s as HTTP
//! responses and opens a correlation scope around every request.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        Correlation middleware           │  ← X-Request-ID, tracing span
//! ├─────────────────────────────────────────┤
//! │        Application handler              │  ← reads ambient correlation id
//! │  returns ResultEnvelope<T>              │
//! ├─────────────────────────────────────────┤
//! │        Translator                       │  ← status policy, pagination
//! │  status + body + headers                │     headers, X-Notification
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use axum::{response::Response, routing::get, Router};
//! use result_bridge_core::{PageDescriptor, ResultEnvelope};
//! use result_bridge_web::{ApiRouterExt, Translator, WebApiOptions};
//!
//! async fn list_orders(translator: Translator) -> Response {
//!     let page = PageDescriptor::new(orders, 1, 20, total)?;
//!     translator.respond(ResultEnvelope::page(page))
//! }
//!
//! let app = Router::new()
//!     .route("/api/v1/orders", get(list_orders))
//!     .with_api(&WebApiOptions::default())?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod file;
pub mod metrics;
pub mod middleware;
pub mod options;
pub mod setup;
pub mod status;
pub mod translate;

// Re-export key types for convenience
pub use error::{AppError, ConfigError, TranslateError};
pub use extractors::Correlation;
pub use file::FileDescriptor;
pub use middleware::{correlation_layer, CorrelationLayer};
pub use options::WebApiOptions;
pub use setup::ApiRouterExt;
pub use status::StatusPolicy;
pub use translate::{translate, ResponseSettings, Translation, Translator};

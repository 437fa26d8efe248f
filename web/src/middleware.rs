//! Axum middleware establishing a correlation scope per request.
//!
//! # Flow
//!
//! 1. **Read** the correlation header (default `X-Request-ID`). Its first
//!    value is used when present and non-empty, otherwise a fresh
//!    `request-<uuid>` id is generated
//! 2. **Store** the id in request extensions for the
//!    [`Correlation`](crate::extractors::Correlation) extractor
//! 3. **Open** an ambient correlation scope and a tracing span around the
//!    rest of the pipeline
//! 4. **Close** the scope when the inner service finishes, restoring the
//!    previous ambient value even if the handler panics
//! 5. **Echo** the id on the response, if enabled
//!
//! # Example
//!
//! ```ignore
//! use axum::Router;
//! use result_bridge_web::middleware::correlation_layer;
//!
//! let app = Router::new()
//!     .route("/api/orders", get(list_orders))
//!     .layer(correlation_layer());
//! ```

use crate::error::ConfigError;
use crate::metrics::CORRELATION_IDS_GENERATED;
use crate::options::WebApiOptions;
use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue},
    response::Response,
};
use result_bridge_core::CorrelationId;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::Instrument;

/// Create a layer reading the default `X-Request-ID` header, without echo.
#[must_use]
pub fn correlation_layer() -> CorrelationLayer {
    CorrelationLayer::default()
}

/// Layer for correlation scopes.
#[derive(Clone, Debug)]
pub struct CorrelationLayer {
    header: HeaderName,
    echo: bool,
}

impl CorrelationLayer {
    /// Layer reading `header`.
    #[must_use]
    pub const fn new(header: HeaderName) -> Self {
        Self {
            header,
            echo: false,
        }
    }

    /// Build the layer from host options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHeaderName`] if the configured header
    /// name is invalid.
    pub fn from_options(options: &WebApiOptions) -> Result<Self, ConfigError> {
        Ok(Self::new(options.correlation_header_name()?)
            .with_echo(options.echo_correlation_header))
    }

    /// Copy the correlation id onto responses.
    #[must_use]
    pub const fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Header this layer reads.
    #[must_use]
    pub const fn header(&self) -> &HeaderName {
        &self.header
    }
}

impl Default for CorrelationLayer {
    fn default() -> Self {
        Self::new(HeaderName::from_static("x-request-id"))
    }
}

impl<S> Layer<S> for CorrelationLayer {
    type Service = CorrelationMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorrelationMiddleware {
            inner,
            header: self.header.clone(),
            echo: self.echo,
        }
    }
}

/// Middleware service for correlation scopes.
#[derive(Clone, Debug)]
pub struct CorrelationMiddleware<S> {
    inner: S,
    header: HeaderName,
    echo: bool,
}

impl<S> Service<Request> for CorrelationMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let correlation_id = inbound_id(req.headers(), &self.header).unwrap_or_else(|| {
            metrics::counter!(CORRELATION_IDS_GENERATED).increment(1);
            CorrelationId::generate()
        });

        req.extensions_mut().insert(correlation_id.clone());

        let span = tracing::info_span!(
            "http_request",
            correlation_id = %correlation_id,
            method = %req.method(),
            uri = %req.uri(),
        );
        span.in_scope(|| {
            tracing::info!(
                correlation_id = %correlation_id,
                header = %self.header,
                "Correlation id assigned"
            );
        });

        // Synchronous work done by the inner service while building its
        // future also sees the id.
        let inner = &mut self.inner;
        let fut = correlation_id
            .clone()
            .scope_sync(|| span.in_scope(|| inner.call(req)));

        let echo = self.echo.then(|| self.header.clone());

        Box::pin(
            correlation_id
                .clone()
                .scope(async move {
                    let mut response = fut.await?;

                    if let Some(header) = echo {
                        if let Ok(value) = HeaderValue::from_str(correlation_id.as_str()) {
                            response.headers_mut().insert(header, value);
                        }
                    }

                    Ok::<_, S::Error>(response)
                })
                .instrument(span),
        )
    }
}

/// First value of `header`, if it is valid text and not blank.
fn inbound_id(headers: &HeaderMap, header: &HeaderName) -> Option<CorrelationId> {
    headers
        .get(header)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .map(CorrelationId::new)
}

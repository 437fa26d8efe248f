//! Options consumed from the hosting application.
//!
//! Values should come from the host's configuration source. The struct
//! deserializes with defaults for every missing field, so a partial section
//! such as `{ "correlationHeader": "X-Trace-ID" }` is enough.

use crate::error::ConfigError;
use axum::http::HeaderName;
use result_bridge_core::pagination::DEFAULT_PAGE_PARAMETER;
use serde::{Deserialize, Serialize};

/// Default correlation header.
pub const DEFAULT_CORRELATION_HEADER: &str = "X-Request-ID";

/// Web layer options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebApiOptions {
    /// Inbound header carrying the correlation id.
    ///
    /// Default: `X-Request-ID`
    pub correlation_header: String,

    /// Copy the correlation id onto the response under the same header.
    ///
    /// Default: `false`
    pub echo_correlation_header: bool,

    /// Query parameter holding the page number in navigation links.
    ///
    /// Default: `page`
    pub page_parameter: String,
}

impl WebApiOptions {
    /// Create options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the correlation header name.
    #[must_use]
    pub fn with_correlation_header(mut self, header: impl Into<String>) -> Self {
        self.correlation_header = header.into();
        self
    }

    /// Enable or disable echoing the correlation id on responses.
    #[must_use]
    pub const fn with_echo_correlation_header(mut self, echo: bool) -> Self {
        self.echo_correlation_header = echo;
        self
    }

    /// Set the page query parameter name.
    #[must_use]
    pub fn with_page_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.page_parameter = parameter.into();
        self
    }

    /// Parsed correlation header name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHeaderName`] if the configured name is
    /// not a valid HTTP header name.
    pub fn correlation_header_name(&self) -> Result<HeaderName, ConfigError> {
        HeaderName::from_bytes(self.correlation_header.as_bytes())
            .map_err(|_| ConfigError::InvalidHeaderName(self.correlation_header.clone()))
    }

    /// Check that every option is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first unusable option.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.correlation_header_name()?;
        if self.page_parameter.trim().is_empty() {
            return Err(ConfigError::EmptyPageParameter);
        }
        Ok(())
    }
}

impl Default for WebApiOptions {
    fn default() -> Self {
        Self {
            correlation_header: DEFAULT_CORRELATION_HEADER.to_string(),
            echo_correlation_header: false,
            page_parameter: DEFAULT_PAGE_PARAMETER.to_string(),
        }
    }
}

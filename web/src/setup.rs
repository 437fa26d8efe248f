//! One-call installation of the web layer on an Axum router.
//!
//! ```ignore
//! use result_bridge_web::{ApiRouterExt, WebApiOptions};
//!
//! let options: WebApiOptions = settings.get("apiOptions")?;
//! let app = Router::new()
//!     .route("/orders", get(list_orders))
//!     .with_api(&options)?;
//! ```

use crate::error::ConfigError;
use crate::middleware::CorrelationLayer;
use crate::options::WebApiOptions;
use crate::status::StatusPolicy;
use crate::translate::ResponseSettings;
use axum::{Extension, Router};
use std::sync::Arc;

/// Installs correlation scopes and translator settings on a router.
pub trait ApiRouterExt: Sized {
    /// Install the web layer with the standard status policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `options` fail validation.
    fn with_api(self, options: &WebApiOptions) -> Result<Self, ConfigError>;

    /// Install the web layer with a custom status policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `options` fail validation.
    fn with_api_policy(
        self,
        options: &WebApiOptions,
        policy: StatusPolicy,
    ) -> Result<Self, ConfigError>;
}

impl<S> ApiRouterExt for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_api(self, options: &WebApiOptions) -> Result<Self, ConfigError> {
        self.with_api_policy(options, StatusPolicy::default())
    }

    fn with_api_policy(
        self,
        options: &WebApiOptions,
        policy: StatusPolicy,
    ) -> Result<Self, ConfigError> {
        options.validate()?;

        let settings =
            Arc::new(ResponseSettings::new(policy).with_page_parameter(options.page_parameter.clone()));
        let correlation = CorrelationLayer::from_options(options)?;

        crate::metrics::describe_metrics();
        tracing::info!(
            correlation_header = %options.correlation_header,
            echo = options.echo_correlation_header,
            page_parameter = %options.page_parameter,
            "Result translation layer installed"
        );

        Ok(self.layer(Extension(settings)).layer(correlation))
    }
}

//! Metric names and descriptions.
//!
//! Metrics go through the `metrics` facade; nothing is recorded unless the
//! host installs a recorder.

use metrics::describe_counter;

/// Responses rendered from result envelopes, labeled by `status`.
pub const RESPONSES_TRANSLATED: &str = "result_bridge_responses_translated_total";

/// Envelopes that could not be rendered, labeled by `kind`.
pub const TRANSLATION_FAILURES: &str = "result_bridge_translation_failures_total";

/// Correlation ids synthesized because the inbound header was missing.
pub const CORRELATION_IDS_GENERATED: &str = "result_bridge_correlation_ids_generated_total";

/// Register all metric descriptions.
pub fn describe_metrics() {
    describe_counter!(
        RESPONSES_TRANSLATED,
        "Total number of responses rendered from result envelopes"
    );
    describe_counter!(
        TRANSLATION_FAILURES,
        "Total number of result envelopes that failed to render"
    );
    describe_counter!(
        CORRELATION_IDS_GENERATED,
        "Total number of correlation ids generated for requests without one"
    );
}

//! Rendering of result envelopes into HTTP responses.
//!
//! # Rules
//!
//! Evaluated in order:
//!
//! 1. No envelope, or neither output nor notifications → `400`, empty body.
//! 2. Single value → `200` with the value as JSON. Each notification is
//!    attached as an `X-Notification` header holding base64 of its JSON.
//! 3. Plain list → `204` when empty, otherwise as rule 2.
//! 4. Page → `204` when the result set is empty, otherwise `206` with the
//!    items as JSON plus `Link`, `X-Total-Count` and `Content-Range`.
//! 5. No output, some notifications → status of the highest-priority effect
//!    (see [`StatusPolicy`]), notifications as JSON body.
//! 6. No output, no notifications → `400`, empty body.
//!
//! Notifications on a success path never change the status.
//!
//! # Example
//!
//! ```ignore
//! use axum::{response::Response, routing::get, Router};
//! use result_bridge_web::Translator;
//!
//! async fn list_orders(translator: Translator) -> Response {
//!     translator.respond(orders::list_page(translator.target()).await)
//! }
//!
//! let app = Router::new().route("/orders", get(list_orders));
//! ```

use crate::error::{AppError, TranslateError};
use crate::metrics::{RESPONSES_TRANSLATED, TRANSLATION_FAILURES};
use crate::status::StatusPolicy;
use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, OriginalUri},
    http::{header, request::Parts, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use base64::Engine;
use bytes::Bytes;
use result_bridge_core::pagination::{build_links_with, compute_range, DEFAULT_PAGE_PARAMETER};
use result_bridge_core::{Notification, Output, PageDescriptor, ResultEnvelope};
use serde::Serialize;
use std::sync::Arc;

/// One header per notification on success responses: base64 of the JSON.
pub const X_NOTIFICATION: &str = "x-notification";

/// Size of the whole result set on paginated responses.
pub const X_TOTAL_COUNT: &str = "x-total-count";

/// Settings shared by every translation in an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSettings {
    policy: StatusPolicy,
    page_parameter: String,
}

impl ResponseSettings {
    /// Settings with the given status policy and the default page parameter.
    #[must_use]
    pub fn new(policy: StatusPolicy) -> Self {
        Self {
            policy,
            page_parameter: DEFAULT_PAGE_PARAMETER.to_string(),
        }
    }

    /// Set the query parameter used in navigation links.
    #[must_use]
    pub fn with_page_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.page_parameter = parameter.into();
        self
    }

    /// Active status policy.
    #[must_use]
    pub const fn policy(&self) -> &StatusPolicy {
        &self.policy
    }

    /// Query parameter used in navigation links.
    #[must_use]
    pub fn page_parameter(&self) -> &str {
        &self.page_parameter
    }
}

impl Default for ResponseSettings {
    fn default() -> Self {
        Self::new(StatusPolicy::default())
    }
}

/// A rendered response: status, headers and optional body.
#[derive(Debug, Clone)]
pub struct Translation {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl Translation {
    pub(crate) fn bare(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub(crate) fn json<B: Serialize + ?Sized>(
        status: StatusCode,
        body: &B,
    ) -> Result<Self, TranslateError> {
        let bytes = serde_json::to_vec(body)?;
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Ok(Self {
            status,
            headers,
            body: Some(Bytes::from(bytes)),
        })
    }

    pub(crate) fn with_body(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body: Some(body),
        }
    }

    /// Response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Response body, `None` when the response has no content.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    fn insert_header(
        &mut self,
        name: HeaderName,
        label: &'static str,
        value: String,
    ) -> Result<(), TranslateError> {
        let value = HeaderValue::try_from(value).map_err(|source| TranslateError::InvalidHeader {
            header: label,
            source,
        })?;
        self.headers.append(name, value);
        Ok(())
    }

    fn attach_notifications(&mut self, notifications: &[Notification]) -> Result<(), TranslateError> {
        for notification in notifications {
            let json = serde_json::to_vec(notification)?;
            let encoded = base64::engine::general_purpose::STANDARD.encode(json);
            self.insert_header(
                HeaderName::from_static(X_NOTIFICATION),
                "X-Notification",
                encoded,
            )?;
        }
        Ok(())
    }
}

impl IntoResponse for Translation {
    fn into_response(self) -> Response {
        let body = self.body.map_or_else(Body::empty, Body::from);
        let mut response = Response::new(body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Render `envelope` for a request to `path_and_query`.
///
/// `path_and_query` is the current request target; it is only used to build
/// pagination links.
///
/// # Errors
///
/// Returns [`TranslateError`] when the winning notification effect has no
/// status in the policy, or when a body or header cannot be encoded. Both
/// are defects and should surface as server faults.
pub fn translate<T: Serialize>(
    envelope: Option<ResultEnvelope<T>>,
    path_and_query: &str,
    settings: &ResponseSettings,
) -> Result<Translation, TranslateError> {
    let Some(envelope) = envelope.filter(|envelope| !envelope.is_malformed()) else {
        return Ok(Translation::bare(StatusCode::BAD_REQUEST));
    };

    let (output, notifications) = envelope.into_parts();
    match output {
        Some(Output::Single(value)) => ok_with_notifications(&value, &notifications),
        Some(Output::Sequence(values)) if values.is_empty() => {
            Ok(Translation::bare(StatusCode::NO_CONTENT))
        }
        Some(Output::Sequence(values)) => ok_with_notifications(&values, &notifications),
        Some(Output::Page(page)) => partial_content(page, path_and_query, settings),
        None => failure(&notifications, settings.policy()),
    }
}

fn ok_with_notifications<B: Serialize + ?Sized>(
    body: &B,
    notifications: &[Notification],
) -> Result<Translation, TranslateError> {
    let mut translation = Translation::json(StatusCode::OK, body)?;
    translation.attach_notifications(notifications)?;
    Ok(translation)
}

fn partial_content<T: Serialize>(
    page: PageDescriptor<T>,
    path_and_query: &str,
    settings: &ResponseSettings,
) -> Result<Translation, TranslateError> {
    if page.is_empty() {
        return Ok(Translation::bare(StatusCode::NO_CONTENT));
    }

    let links = build_links_with(
        path_and_query,
        settings.page_parameter(),
        page.current_page(),
        page.total_pages(),
    );
    let (start, end) = compute_range(
        page.current_page(),
        page.results_per_page(),
        page.total_results(),
    );
    let total = page.total_results();
    let content_range = format!(" {} {start}-{end}/{total}", item_type_name::<T>());

    let mut translation = Translation::json(StatusCode::PARTIAL_CONTENT, page.items())?;
    translation.insert_header(header::LINK, "Link", links)?;
    translation.insert_header(
        HeaderName::from_static(X_TOTAL_COUNT),
        "X-Total-Count",
        total.to_string(),
    )?;
    translation.insert_header(header::CONTENT_RANGE, "Content-Range", content_range)?;
    Ok(translation)
}

/// Rules 5 and 6: no output.
pub(crate) fn failure(
    notifications: &[Notification],
    policy: &StatusPolicy,
) -> Result<Translation, TranslateError> {
    match policy.resolve(notifications)? {
        Some(status) => Translation::json(status, notifications),
        None => Ok(Translation::bare(StatusCode::BAD_REQUEST)),
    }
}

/// Unqualified name of `T` without generic arguments, e.g. `Order` for
/// `shop::orders::Order` or `Vec` for `Vec<u8>`.
///
/// References are looked through. Tuples, slices and arrays have no single
/// name and keep their spelling with spaces removed, so the value stays one
/// `Content-Range` token.
#[must_use]
pub fn item_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>().trim_start_matches('&');
    let full = full.strip_prefix("mut ").unwrap_or(full);
    if full.starts_with('(') || full.starts_with('[') {
        return full.replace(' ', "");
    }
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

/// Extractor that renders result envelopes for the current request.
///
/// Captures the original request path and query (for pagination links) and
/// the [`ResponseSettings`] installed by
/// [`ApiRouterExt`](crate::setup::ApiRouterExt). Falls back to default
/// settings when none are installed.
#[derive(Debug, Clone)]
pub struct Translator {
    target: String,
    settings: Arc<ResponseSettings>,
}

impl Translator {
    /// Create a translator for an explicit request target.
    #[must_use]
    pub fn new(target: impl Into<String>, settings: Arc<ResponseSettings>) -> Self {
        Self {
            target: target.into(),
            settings,
        }
    }

    /// Path and query of the current request.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Active settings.
    #[must_use]
    pub fn settings(&self) -> &ResponseSettings {
        &self.settings
    }

    /// Render an envelope without converting failures into responses.
    ///
    /// # Errors
    ///
    /// See [`translate`].
    pub fn translate<T: Serialize>(
        &self,
        envelope: impl Into<Option<ResultEnvelope<T>>>,
    ) -> Result<Translation, TranslateError> {
        translate(envelope.into(), &self.target, &self.settings)
    }

    /// Render an envelope into a response.
    ///
    /// Translation defects become a labeled `500` response and are logged.
    pub fn respond<T: Serialize>(&self, envelope: impl Into<Option<ResultEnvelope<T>>>) -> Response {
        self.finish(self.translate(envelope))
    }

    pub(crate) fn finish(&self, result: Result<Translation, TranslateError>) -> Response {
        match result {
            Ok(translation) => {
                metrics::counter!(
                    RESPONSES_TRANSLATED,
                    "status" => translation.status().as_str().to_string()
                )
                .increment(1);
                tracing::debug!(
                    status = %translation.status(),
                    target = %self.target,
                    "Translated result envelope"
                );
                translation.into_response()
            }
            Err(error) => {
                metrics::counter!(TRANSLATION_FAILURES, "kind" => error.kind()).increment(1);
                AppError::from(error).into_response()
            }
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Translator
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map_or(&parts.uri, |original| &original.0);
        let target = uri
            .path_and_query()
            .map_or_else(|| uri.path().to_string(), ToString::to_string);

        let settings = parts
            .extensions
            .get::<Arc<ResponseSettings>>()
            .cloned()
            .unwrap_or_default();

        Ok(Self { target, settings })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use result_bridge_core::NotificationEffect;
    use serde_json::{json, Value};

    #[derive(Serialize)]
    struct Order {
        id: u32,
    }

    fn render<T: Serialize>(envelope: Option<ResultEnvelope<T>>) -> Translation {
        translate(envelope, "/orders", &ResponseSettings::default()).unwrap()
    }

    fn body_json(translation: &Translation) -> Value {
        serde_json::from_slice(translation.body().expect("body")).unwrap()
    }

    #[test]
    fn test_absent_envelope_is_bad_request() {
        let translation = render::<Order>(None);
        assert_eq!(translation.status(), StatusCode::BAD_REQUEST);
        assert!(translation.body().is_none());
    }

    #[test]
    fn test_malformed_envelope_is_bad_request() {
        let translation = render(Some(ResultEnvelope::<Order>::empty()));
        assert_eq!(translation.status(), StatusCode::BAD_REQUEST);
        assert!(translation.body().is_none());
    }

    #[test]
    fn test_no_output_no_notifications_is_bad_request() {
        let translation = render(Some(ResultEnvelope::<Order>::failure(Vec::new())));
        assert_eq!(translation.status(), StatusCode::BAD_REQUEST);
        assert!(translation.body().is_none());
    }

    #[test]
    fn test_single_value_is_ok() {
        let translation = render(Some(ResultEnvelope::single(Order { id: 7 })));
        assert_eq!(translation.status(), StatusCode::OK);
        assert_eq!(body_json(&translation), json!({ "id": 7 }));
        assert_eq!(
            translation.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert!(translation.headers().get(X_NOTIFICATION).is_none());
    }

    #[test]
    fn test_success_notifications_become_headers() {
        let envelope = ResultEnvelope::single(Order { id: 1 }).with_notifications([
            Notification::new(NotificationEffect::Conflicted, "already shipped"),
            Notification::validation("note", "note was truncated"),
        ]);
        let translation = render(Some(envelope));

        assert_eq!(translation.status(), StatusCode::OK);
        let headers: Vec<_> = translation.headers().get_all(X_NOTIFICATION).iter().collect();
        assert_eq!(headers.len(), 2);

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(headers[0].as_bytes())
            .unwrap();
        let first: Value = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(
            first,
            json!({ "effect": "Conflicted", "message": "already shipped" })
        );
    }

    #[test]
    fn test_empty_sequence_is_no_content() {
        let translation = render(Some(ResultEnvelope::<Order>::sequence(Vec::new())));
        assert_eq!(translation.status(), StatusCode::NO_CONTENT);
        assert!(translation.body().is_none());
    }

    #[test]
    fn test_sequence_is_ok() {
        let envelope = ResultEnvelope::sequence(vec![Order { id: 1 }, Order { id: 2 }])
            .with_notification(Notification::new(NotificationEffect::Error, "partial"));
        let translation = render(Some(envelope));
        assert_eq!(translation.status(), StatusCode::OK);
        assert_eq!(body_json(&translation), json!([{ "id": 1 }, { "id": 2 }]));
        assert_eq!(translation.headers().get_all(X_NOTIFICATION).iter().count(), 1);
    }

    #[test]
    fn test_page_is_partial_content() {
        let page = PageDescriptor::new(vec![Order { id: 11 }, Order { id: 12 }], 2, 10, 15).unwrap();
        let translation =
            translate(Some(ResultEnvelope::page(page)), "/orders?page=2", &ResponseSettings::default())
                .unwrap();

        assert_eq!(translation.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(body_json(&translation), json!([{ "id": 11 }, { "id": 12 }]));
        assert_eq!(translation.headers()[X_TOTAL_COUNT], "15");
        assert_eq!(translation.headers()[header::CONTENT_RANGE], " Order 11-15/15");
        assert_eq!(
            translation.headers()[header::LINK],
            "</orders?page=2>; rel=\"last\",</orders?page=1>; rel=\"first\",</orders?page=1>; rel=\"prev\","
        );
    }

    #[test]
    fn test_empty_page_is_no_content() {
        let page = PageDescriptor::<Order>::new(Vec::new(), 1, 10, 0).unwrap();
        let translation = render(Some(ResultEnvelope::page(page)));
        assert_eq!(translation.status(), StatusCode::NO_CONTENT);
        assert!(translation.body().is_none());
        assert!(translation.headers().get(header::LINK).is_none());
    }

    #[test]
    fn test_page_uses_configured_parameter() {
        let settings = ResponseSettings::default().with_page_parameter("pagina");
        let page = PageDescriptor::new(vec![Order { id: 1 }], 1, 1, 2).unwrap();
        let translation = translate(Some(ResultEnvelope::page(page)), "/orders", &settings).unwrap();
        assert!(translation.headers()[header::LINK]
            .to_str()
            .unwrap()
            .starts_with("</orders?pagina=2>; rel=\"next\","));
    }

    #[test]
    fn test_failure_status_and_body() {
        let notes = vec![
            Notification::validation("email", "Email is required"),
            Notification::not_found("customer 7 not found"),
        ];
        let translation = render(Some(ResultEnvelope::<Order>::failure(notes)));
        assert_eq!(translation.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(&translation),
            json!([
                { "effect": "Validation", "message": "Email is required", "key": "email" },
                { "effect": "NotFound", "message": "customer 7 not found" }
            ])
        );
        assert!(translation.headers().get(X_NOTIFICATION).is_none());
    }

    #[test]
    fn test_failure_with_unmapped_effect_is_defect() {
        let settings = ResponseSettings::new(
            StatusPolicy::default().without(NotificationEffect::PreConditionFailed),
        );
        let envelope = ResultEnvelope::<Order>::failure(vec![Notification::new(
            NotificationEffect::PreConditionFailed,
            "etag mismatch",
        )]);
        let err = translate(Some(envelope), "/orders", &settings).unwrap_err();
        assert_eq!(err.kind(), "UNSUPPORTED_EFFECT");
    }

    #[test]
    fn test_item_type_name() {
        assert_eq!(item_type_name::<Order>(), "Order");
        assert_eq!(item_type_name::<String>(), "String");
        assert_eq!(item_type_name::<Vec<Order>>(), "Vec");
        assert_eq!(item_type_name::<u64>(), "u64");
        assert_eq!(item_type_name::<&Order>(), "Order");
        assert_eq!(item_type_name::<(u32, u8)>(), "(u32,u8)");
        assert_eq!(item_type_name::<[u8; 4]>(), "[u8;4]");
    }

    #[tokio::test]
    async fn test_extractor_captures_path_and_query() {
        let request = axum::http::Request::builder()
            .uri("/orders?page=2&sort=id")
            .body(())
            .unwrap();
        let (mut parts, ()) = request.into_parts();
        let translator = Translator::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(translator.target(), "/orders?page=2&sort=id");
        assert_eq!(translator.settings(), &ResponseSettings::default());
    }

    #[tokio::test]
    async fn test_extractor_uses_installed_settings() {
        let settings = Arc::new(ResponseSettings::default().with_page_parameter("p"));
        let mut request = axum::http::Request::builder().uri("/x").body(()).unwrap();
        request.extensions_mut().insert(Arc::clone(&settings));
        let (mut parts, ()) = request.into_parts();
        let translator = Translator::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(translator.settings().page_parameter(), "p");
    }

    #[test]
    fn test_respond_maps_defect_to_server_error() {
        let translator = Translator::new("/orders", Arc::new(ResponseSettings::new(StatusPolicy::empty())));
        let response = translator.respond(ResultEnvelope::<Order>::failure(vec![
            Notification::not_found("missing"),
        ]));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

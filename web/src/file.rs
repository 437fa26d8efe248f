//! File download results.
//!
//! A handler that produces a file returns a [`FileDescriptor`] inside a
//! result envelope. Failures follow the same notification rules as any other
//! result; a present file is read and sent as an attachment.

use crate::error::TranslateError;
use crate::translate::{failure, Translation, Translator};
use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};
use bytes::Bytes;
use result_bridge_core::{Output, ResultEnvelope};
use std::path::PathBuf;

/// A file on disk to be sent to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Location of the file.
    pub full_path: PathBuf,
    /// MIME type sent as `Content-Type`.
    pub content_type: String,
    /// Name suggested to the client in `Content-Disposition`.
    pub original_name: String,
}

impl FileDescriptor {
    /// Describe a file.
    #[must_use]
    pub fn new(
        full_path: impl Into<PathBuf>,
        content_type: impl Into<String>,
        original_name: impl Into<String>,
    ) -> Self {
        Self {
            full_path: full_path.into(),
            content_type: content_type.into(),
            original_name: original_name.into(),
        }
    }
}

impl Translator {
    /// Render a file envelope without converting failures into responses.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::File`] if the file cannot be read,
    /// [`TranslateError::UnsupportedFileOutput`] if the envelope holds a list
    /// or a page, and the same errors as [`Translator::translate`] otherwise.
    pub async fn translate_file(
        &self,
        envelope: impl Into<Option<ResultEnvelope<FileDescriptor>>>,
    ) -> Result<Translation, TranslateError> {
        let Some(envelope) = envelope.into().filter(|envelope| !envelope.is_malformed()) else {
            return Ok(Translation::bare(StatusCode::BAD_REQUEST));
        };

        let (output, notifications) = envelope.into_parts();
        match output {
            Some(Output::Single(file)) => attachment(file).await,
            Some(Output::Sequence(_) | Output::Page(_)) => Err(TranslateError::UnsupportedFileOutput),
            None => failure(&notifications, self.settings().policy()),
        }
    }

    /// Render a file envelope into a response.
    pub async fn respond_file(
        &self,
        envelope: impl Into<Option<ResultEnvelope<FileDescriptor>>>,
    ) -> Response {
        let result = self.translate_file(envelope).await;
        self.finish(result)
    }
}

async fn attachment(file: FileDescriptor) -> Result<Translation, TranslateError> {
    let contents = tokio::fs::read(&file.full_path)
        .await
        .map_err(|source| TranslateError::File {
            path: file.full_path.clone(),
            source,
        })?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::try_from(file.content_type).map_err(|source| TranslateError::InvalidHeader {
            header: "Content-Type",
            source,
        })?,
    );
    let disposition = format!(
        "attachment; filename=\"{}\"",
        header_safe_name(&file.original_name)
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::try_from(disposition).map_err(|source| TranslateError::InvalidHeader {
            header: "Content-Disposition",
            source,
        })?,
    );

    tracing::debug!(
        path = %file.full_path.display(),
        bytes = contents.len(),
        "Sending file result"
    );

    Ok(Translation::with_body(
        StatusCode::OK,
        headers,
        Bytes::from(contents),
    ))
}

/// Replace characters that cannot appear inside a quoted header parameter.
fn header_safe_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c == ' ' || c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::status::StatusPolicy;
    use crate::translate::ResponseSettings;
    use result_bridge_core::Notification;
    use std::sync::Arc;

    fn translator() -> Translator {
        Translator::new("/files/1", Arc::new(ResponseSettings::new(StatusPolicy::default())))
    }

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("result-bridge-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_file_is_sent_as_attachment() {
        let path = temp_file("report.csv", b"id,total\n1,10\n");
        let envelope = ResultEnvelope::single(FileDescriptor::new(&path, "text/csv", "report.csv"));

        let translation = translator().translate_file(envelope).await.unwrap();

        assert_eq!(translation.status(), StatusCode::OK);
        assert_eq!(translation.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            translation.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"report.csv\""
        );
        assert_eq!(translation.body().unwrap().as_ref(), b"id,total\n1,10\n");

        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_server_fault() {
        let envelope = ResultEnvelope::single(FileDescriptor::new(
            "/definitely/not/here.bin",
            "application/octet-stream",
            "here.bin",
        ));

        let response = translator().respond_file(envelope).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_file_failure_uses_notification_status() {
        let envelope = ResultEnvelope::<FileDescriptor>::failure(vec![Notification::not_found(
            "file 1 not found",
        )]);
        let translation = translator().translate_file(envelope).await.unwrap();
        assert_eq!(translation.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_file_envelope_is_bad_request() {
        let translation = translator()
            .translate_file(ResultEnvelope::<FileDescriptor>::empty())
            .await
            .unwrap();
        assert_eq!(translation.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_file_list_is_rejected() {
        let envelope = ResultEnvelope::sequence(vec![FileDescriptor::new("/a", "text/plain", "a")]);
        let err = translator().translate_file(envelope).await.unwrap_err();
        assert_eq!(err.kind(), "UNSUPPORTED_FILE_OUTPUT");
    }

    #[test]
    fn test_header_safe_name() {
        assert_eq!(header_safe_name("q3 \"final\".pdf"), "q3 _final_.pdf");
        assert_eq!(header_safe_name("relatório.pdf"), "relat_rio.pdf");
    }
}

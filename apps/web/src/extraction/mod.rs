//! Résumé text extraction.
//!
//! Dispatches uploaded bytes to the PDF or DOCX extractor based on the
//! declared MIME type. Both extractors return one block of text per page or
//! paragraph; blocks are joined with `\n` in document order.

pub mod docx;
pub mod pdf;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Message shown to the user when the upload is neither PDF nor DOCX.
pub const UNSUPPORTED_TYPE_MESSAGE: &str =
    "Unsupported file type. Please upload a PDF or DOCX file.";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{msg} (received '{0}')", msg = UNSUPPORTED_TYPE_MESSAGE)]
    UnsupportedType(String),

    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("Could not read DOCX: {0}")]
    Docx(String),

    #[error("Extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Maps a declared MIME type to a supported document kind.
    /// Parameters such as `; charset=...` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(PDF_MIME) {
            Some(DocumentKind::Pdf)
        } else if essence.eq_ignore_ascii_case(DOCX_MIME) {
            Some(DocumentKind::Docx)
        } else {
            None
        }
    }

    /// Resolves the kind of an upload. The declared content type wins; the
    /// file extension is consulted only when the browser declared nothing
    /// useful.
    pub fn detect(
        content_type: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<Self, ExtractError> {
        let declared = content_type
            .map(str::trim)
            .filter(|ct| !ct.is_empty() && !ct.eq_ignore_ascii_case("application/octet-stream"));

        if let Some(ct) = declared {
            return Self::from_mime(ct).ok_or_else(|| ExtractError::UnsupportedType(ct.to_string()));
        }

        let extension = file_name
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Ok(DocumentKind::Pdf),
            Some("docx") => Ok(DocumentKind::Docx),
            _ => Err(ExtractError::UnsupportedType(
                content_type
                    .or(file_name)
                    .unwrap_or("unknown")
                    .to_string(),
            )),
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            DocumentKind::Pdf => PDF_MIME,
            DocumentKind::Docx => DOCX_MIME,
        }
    }
}

/// Text pulled out of an uploaded résumé.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedDocument {
    pub kind: DocumentKind,
    pub text: String,
}

/// Extracts text synchronously. Callers on the async runtime should prefer
/// `extract_upload`, which moves the parsing onto the blocking pool.
pub fn extract_text(bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractError> {
    let blocks = match kind {
        DocumentKind::Pdf => pdf::extract_pages(bytes)?,
        DocumentKind::Docx => docx::extract_paragraphs(bytes)?,
    };
    Ok(blocks.join("\n"))
}

/// Detects the document kind of an upload and extracts its text.
pub async fn extract_upload(
    bytes: bytes::Bytes,
    content_type: Option<&str>,
    file_name: Option<&str>,
) -> Result<ExtractedDocument, ExtractError> {
    let kind = DocumentKind::detect(content_type, file_name)?;
    let size = bytes.len();

    let text = tokio::task::spawn_blocking(move || extract_text(&bytes, kind)).await??;

    info!(
        "Extracted {} chars from {} upload ({} bytes)",
        text.chars().count(),
        kind.mime(),
        size
    );

    Ok(ExtractedDocument { kind, text })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime_supported_types() {
        assert_eq!(DocumentKind::from_mime(PDF_MIME), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_mime(DOCX_MIME), Some(DocumentKind::Docx));
        assert_eq!(
            DocumentKind::from_mime("Application/PDF; name=cv.pdf"),
            Some(DocumentKind::Pdf)
        );
    }

    #[test]
    fn test_from_mime_rejects_legacy_word_and_text() {
        assert_eq!(DocumentKind::from_mime("application/msword"), None);
        assert_eq!(DocumentKind::from_mime("text/plain"), None);
    }

    #[test]
    fn test_detect_prefers_declared_type() {
        let kind = DocumentKind::detect(Some(PDF_MIME), Some("resume.docx")).unwrap();
        assert_eq!(kind, DocumentKind::Pdf);
    }

    #[test]
    fn test_detect_declared_unsupported_type_is_error() {
        let err = DocumentKind::detect(Some("text/plain"), Some("resume.pdf")).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedType(ref t) if t == "text/plain"));
        assert!(err.to_string().starts_with(UNSUPPORTED_TYPE_MESSAGE));
    }

    #[test]
    fn test_detect_falls_back_to_extension() {
        assert_eq!(
            DocumentKind::detect(None, Some("Jane_Doe.PDF")).unwrap(),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::detect(Some("application/octet-stream"), Some("cv.docx")).unwrap(),
            DocumentKind::Docx
        );
    }

    #[test]
    fn test_detect_unknown_extension_is_error() {
        assert!(DocumentKind::detect(None, Some("resume.txt")).is_err());
        assert!(DocumentKind::detect(None, None).is_err());
    }

    #[test]
    fn test_extract_text_joins_docx_paragraphs_with_newlines() {
        let bytes = docx::tests::build_docx(&["Jane Doe", "Rust Engineer", "Berlin"]);
        let text = extract_text(&bytes, DocumentKind::Docx).unwrap();
        assert_eq!(text, "Jane Doe\nRust Engineer\nBerlin");
    }

    #[test]
    fn test_extract_text_joins_pdf_pages_with_newlines() {
        let bytes = pdf::tests::build_pdf(&["A", "B"]);
        let text = extract_text(&bytes, DocumentKind::Pdf).unwrap();
        assert_eq!(text, "A\n\nB\n");
    }

    #[tokio::test]
    async fn test_extract_upload_pdf_by_extension() {
        let bytes = pdf::tests::build_pdf(&["Jane Doe", "Acme"]);
        let doc = extract_upload(bytes.into(), Some("application/octet-stream"), Some("cv.pdf"))
            .await
            .unwrap();
        assert_eq!(doc.kind, DocumentKind::Pdf);
        assert_eq!(doc.text, "Jane Doe\n\nAcme\n");
    }

    #[test]
    fn test_extract_text_garbage_pdf_is_error() {
        let err = extract_text(b"definitely not a pdf", DocumentKind::Pdf).unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }

    #[tokio::test]
    async fn test_extract_upload_docx() {
        let bytes = docx::tests::build_docx(&["Summary", "Built things"]);
        let doc = extract_upload(bytes.into(), Some(DOCX_MIME), Some("cv.docx"))
            .await
            .unwrap();
        assert_eq!(doc.kind, DocumentKind::Docx);
        assert_eq!(doc.text, "Summary\nBuilt things");
    }

    #[tokio::test]
    async fn test_extract_upload_unsupported_type() {
        let err = extract_upload(
            bytes::Bytes::from_static(b"plain text resume"),
            Some("text/plain"),
            Some("cv.txt"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedType(_)));
    }
}

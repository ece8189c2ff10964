//! PDF text extraction

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::providers::TextExtractor;

/// PDF extractor: pdf-extract first, lopdf when that fails
pub struct PdfExtractor {
    /// Upper bound on a single extraction
    timeout: Duration,
}

impl PdfExtractor {
    /// Create an extractor with the given time bound
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Extract text synchronously (runs on the blocking pool)
    pub fn extract_blocking(data: &[u8]) -> Result<String> {
        match pdf_extract::extract_text_from_mem(data) {
            Ok(text) => Ok(text.replace('\0', "")),
            Err(e) => {
                tracing::warn!("pdf-extract failed: {}, trying fallback", e);
                Self::extract_fallback(data)
            }
        }
    }

    /// Fallback PDF text extraction using lopdf directly
    fn extract_fallback(data: &[u8]) -> Result<String> {
        use lopdf::Document;

        let doc = Document::load_mem(data)
            .map_err(|e| Error::extraction("document.pdf", format!("Failed to load PDF: {}", e)))?;

        if doc.is_encrypted() {
            return Err(Error::extraction("document.pdf", "PDF is encrypted"));
        }

        let mut all_text = String::new();
        for (page_num, _page_id) in doc.get_pages() {
            match doc.extract_text(&[page_num]) {
                Ok(text) => {
                    if !all_text.is_empty() {
                        all_text.push('\n');
                    }
                    all_text.push_str(&text);
                }
                Err(e) => {
                    tracing::debug!("Could not extract text for page {}: {}", page_num, e);
                }
            }
        }

        if all_text.trim().is_empty() {
            tracing::warn!("Fallback extraction produced no text, PDF may be image-based");
        }

        Ok(all_text)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

#[async_trait]
impl TextExtractor for PdfExtractor {
    async fn extract(&self, data: Bytes) -> Result<String> {
        let task = tokio::task::spawn_blocking(move || Self::extract_blocking(&data));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            // pdf-extract panics on some malformed fonts
            Ok(Err(join_err)) => Err(Error::extraction(
                "document.pdf",
                format!("Extraction task failed: {}", join_err),
            )),
            Err(_) => {
                tracing::error!("PDF extraction timeout after {:?}", self.timeout);
                Err(Error::extraction(
                    "document.pdf",
                    format!("Extraction timed out after {}s", self.timeout.as_secs()),
                ))
            }
        }
    }

    fn name(&self) -> &str {
        "pdf-extract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// One-page document showing `text` in a standard font
    fn build_pdf(text: &str, encrypted: bool) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if encrypted {
            // Security handler revision no reader here supports
            let encrypt_id = doc.add_object(dictionary! {
                "Filter" => "Standard",
                "V" => 5,
                "R" => 6,
            });
            doc.trailer.set("Encrypt", encrypt_id);
        }

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[tokio::test]
    async fn test_extracts_text_from_pdf() {
        let extractor = PdfExtractor::default();
        let text = extractor
            .extract(Bytes::from(build_pdf("Hello world.", false)))
            .await
            .unwrap();
        assert_eq!(text.trim(), "Hello world.");
    }

    #[test]
    fn test_lopdf_fallback_extracts_text() {
        let text = PdfExtractor::extract_fallback(&build_pdf("Hello world.", false)).unwrap();
        assert_eq!(text.trim(), "Hello world.");
    }

    #[tokio::test]
    async fn test_encrypted_pdf_fails_extraction() {
        let data = build_pdf("Secret text.", true);

        match PdfExtractor::extract_fallback(&data) {
            Err(Error::ExtractionFailed { message, .. }) => assert!(message.contains("encrypted")),
            other => panic!("unexpected result: {other:?}"),
        }

        let result = PdfExtractor::default().extract(Bytes::from(data)).await;
        assert!(matches!(result, Err(Error::ExtractionFailed { .. })));
    }

    #[tokio::test]
    async fn test_garbage_bytes_fail_extraction() {
        let extractor = PdfExtractor::default();
        let result = extractor
            .extract(Bytes::from_static(b"this is not a pdf at all"))
            .await;
        assert!(matches!(result, Err(Error::ExtractionFailed { .. })));
    }

    #[tokio::test]
    async fn test_empty_input_fails_extraction() {
        let extractor = PdfExtractor::new(Duration::from_secs(5));
        let result = extractor.extract(Bytes::new()).await;
        assert!(matches!(result, Err(Error::ExtractionFailed { .. })));
    }
}

//! Text extraction for corpus files

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::FileType;

/// How long the whole-document PDF extractor may run before we give up on it
const PDF_EXTRACT_TIMEOUT: Duration = Duration::from_secs(60);

/// Which PDF extractor produced the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfMethod {
    /// lopdf, page by page (page-limited)
    PageText,
    /// pdf-extract over the whole document
    WholeDocument,
    /// Printable bytes scraped from the raw file
    RawBytes,
}

/// Multi-format text extractor
pub struct FileParser;

impl FileParser {
    /// Extract plain text from file bytes.
    ///
    /// `name` is only used in error messages. `max_pdf_pages` bounds the page-aware
    /// PDF extractor.
    pub fn extract(
        name: &str,
        file_type: FileType,
        data: &[u8],
        max_pdf_pages: u32,
    ) -> Result<String> {
        match file_type {
            FileType::Txt | FileType::Markdown => Ok(Self::parse_text(data)),
            FileType::Pdf => Self::parse_pdf(name, data, max_pdf_pages).map(|(text, _)| text),
            FileType::Docx | FileType::Doc => Self::parse_docx(name, data),
            FileType::Unknown => Err(Error::UnsupportedFileType(name.to_string())),
        }
    }

    /// Decode text permissively; invalid sequences become U+FFFD
    fn parse_text(data: &[u8]) -> String {
        String::from_utf8_lossy(data).into_owned()
    }

    /// Extract PDF text, falling back through the available extractors
    pub fn parse_pdf(name: &str, data: &[u8], max_pages: u32) -> Result<(String, PdfMethod)> {
        match Self::extract_pdf_pages(data, max_pages) {
            Ok(text) => return Ok((text, PdfMethod::PageText)),
            Err(e) => tracing::warn!("Page extraction failed for {}: {}", name, e),
        }

        match Self::extract_pdf_whole(data) {
            Ok(text) => return Ok((text, PdfMethod::WholeDocument)),
            Err(e) => tracing::warn!("Whole-document extraction failed for {}: {}", name, e),
        }

        let text = Self::extract_printable(data);
        tracing::info!("Raw extraction yielded {} characters for {}", text.len(), name);
        if text.is_empty() {
            return Err(Error::file_parse(name, "No text content could be extracted from PDF"));
        }
        Ok((text, PdfMethod::RawBytes))
    }

    /// Page-aware extraction with lopdf, limited to the first `max_pages` pages
    fn extract_pdf_pages(data: &[u8], max_pages: u32) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::file_parse("document.pdf", format!("Failed to load PDF: {}", e)))?;

        let pages = doc.get_pages();
        tracing::debug!("PDF has {} pages", pages.len());

        let mut content = String::new();
        for page_number in pages.keys().take(max_pages as usize) {
            let page_text = doc.extract_text(&[*page_number]).map_err(|e| {
                Error::file_parse("document.pdf", format!("Page {}: {}", page_number, e))
            })?;
            tracing::debug!(
                "Page {} extracted {} characters",
                page_number,
                page_text.len()
            );
            content.push_str(&page_text);
            content.push('\n');
        }

        if content.trim().is_empty() {
            return Err(Error::file_parse("document.pdf", "No text on the first pages"));
        }
        Ok(content)
    }

    /// Whole-document extraction with pdf-extract, isolated in a thread so a
    /// panic or a hang on a problematic font does not take the request down
    fn extract_pdf_whole(data: &[u8]) -> Result<String> {
        let data_vec = data.to_vec();
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let result = pdf_extract::extract_text_from_mem(&data_vec);
            let _ = tx.send(result);
        });

        match rx.recv_timeout(PDF_EXTRACT_TIMEOUT) {
            Ok(Ok(text)) => {
                let _ = handle.join();
                if text.trim().is_empty() {
                    return Err(Error::file_parse("document.pdf", "pdf-extract found no text"));
                }
                Ok(text)
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(Error::file_parse("document.pdf", e.to_string()))
            }
            Err(mpsc::RecvTimeoutError::Timeout) => Err(Error::file_parse(
                "document.pdf",
                format!("pdf-extract timed out after {:?}", PDF_EXTRACT_TIMEOUT),
            )),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(Error::file_parse("document.pdf", "pdf-extract thread crashed"))
            }
        }
    }

    /// Keep printable ASCII and collapse whitespace
    fn extract_printable(data: &[u8]) -> String {
        let decoded: String = String::from_utf8_lossy(data)
            .chars()
            .map(|c| {
                if matches!(c, ' '..='~' | '\n' | '\r' | '\t') {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        decoded.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Extract visible paragraph text from a Word document
    fn parse_docx(name: &str, data: &[u8]) -> Result<String> {
        let doc = docx_rs::read_docx(data).map_err(|e| Error::file_parse(name, e.to_string()))?;

        let mut paragraphs = Vec::new();
        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                let mut text = String::new();
                for child in p.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(t) = child {
                                text.push_str(&t.text);
                            }
                        }
                    }
                }
                paragraphs.push(text);
            }
        }

        Ok(paragraphs.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_decoding_is_permissive() {
        let data = b"momentum \xff\xfe is conserved";
        let text = FileParser::extract("notes.txt", FileType::Txt, data, 20).unwrap();
        assert!(text.contains("momentum"));
        assert!(text.contains("is conserved"));
    }

    #[test]
    fn test_printable_scan_discards_binary() {
        let data = b"%PDF-1.4\x00\x01\x02 Hello\n\n\tWorld \xe2\x80\x99 end";
        let text = FileParser::extract_printable(data);
        assert_eq!(text, "%PDF-1.4 Hello World end");
    }

    #[test]
    fn test_broken_pdf_falls_back_to_raw_bytes() {
        let data = b"%PDF-1.4 not really a pdf but has Newton's laws inside";
        let (text, method) = FileParser::parse_pdf("broken.pdf", data, 20).unwrap();
        assert_eq!(method, PdfMethod::RawBytes);
        assert!(text.contains("Newton's laws"));
    }

    fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        use docx_rs::{Docx, Paragraph, Run};

        let docx = paragraphs.iter().fold(Docx::new(), |docx, text| {
            docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)))
        });
        let mut cursor = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

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

        let kids: Vec<Object> = pages
            .iter()
            .map(|text| {
                let content = Content {
                    operations: vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 12.into()]),
                        Operation::new("Td", vec![72.into(), 720.into()]),
                        Operation::new("Tj", vec![Object::string_literal(*text)]),
                        Operation::new("ET", vec![]),
                    ],
                };
                let content_id =
                    doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => content_id,
                    "Resources" => resources_id,
                    "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                })
                .into()
            })
            .collect();

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut data = Vec::new();
        doc.save_to(&mut data).unwrap();
        data
    }

    #[test]
    fn test_docx_paragraphs_joined_by_newline() {
        let data = docx_bytes(&["Chapter 1: Forces", "F = ma"]);
        let text = FileParser::extract("forces.docx", FileType::Docx, &data, 20).unwrap();
        assert_eq!(text, "Chapter 1: Forces\nF = ma");
    }

    #[test]
    fn test_pdf_page_extraction_respects_page_limit() {
        let data = pdf_bytes(&["Kinematics", "Dynamics", "Thermodynamics"]);

        let first = FileParser::extract_pdf_pages(&data, 1).unwrap();
        assert!(first.contains("Kinematics"));
        assert!(!first.contains("Dynamics"));

        let (all, method) = FileParser::parse_pdf("mechanics.pdf", &data, 20).unwrap();
        assert_eq!(method, PdfMethod::PageText);
        assert!(all.contains("Kinematics"));
        assert!(all.contains("Thermodynamics"));
    }

    #[test]
    fn test_invalid_docx_is_error() {
        let result = FileParser::extract("broken.docx", FileType::Docx, b"not a zip", 20);
        assert!(matches!(result, Err(Error::FileParse { .. })));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result = FileParser::extract("data.bin", FileType::Unknown, b"abc", 20);
        assert!(matches!(result, Err(Error::UnsupportedFileType(_))));
    }
}

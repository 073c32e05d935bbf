//! Source document loading.
//!
//! The document is read exactly once at startup. The file extension picks
//! the extractor: `.pdf` and `.docx` are decoded, anything else must already
//! be UTF-8 text.

use std::io::Read;
use std::path::Path;

use crate::error::{ExtractError, StartupError};

/// Maximum decompressed bytes read from `word/document.xml` (zip-bomb guard).
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// How a document's bytes are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("pdf") => DocumentKind::Pdf,
            Some("docx") => DocumentKind::Docx,
            _ => DocumentKind::PlainText,
        }
    }
}

/// Read the document at `path` and return its full text.
pub fn load_document(path: &Path) -> Result<String, StartupError> {
    let bytes = std::fs::read(path).map_err(|source| StartupError::DocumentRead {
        path: path.to_path_buf(),
        source,
    })?;

    let kind = DocumentKind::from_path(path);
    let text = extract_text(&bytes, kind).map_err(|source| StartupError::DocumentExtract {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        ?kind,
        bytes = bytes.len(),
        chars = text.len(),
        "loaded document"
    );
    Ok(text)
}

/// Extract plain text from raw document bytes.
pub fn extract_text(bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractError> {
    match kind {
        DocumentKind::Pdf => extract_pdf(bytes),
        DocumentKind::Docx => extract_docx(bytes),
        DocumentKind::PlainText => String::from_utf8(bytes.to_vec()).map_err(|_| ExtractError::NotUtf8),
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| ExtractError::Docx(e.to_string()))?;
    let entry = archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut doc_xml = Vec::new();
    entry
        .take(MAX_XML_ENTRY_BYTES)
        .read_to_end(&mut doc_xml)
        .map_err(|e| ExtractError::Docx(e.to_string()))?;
    if doc_xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err(ExtractError::Docx(
            "word/document.xml exceeds size limit".to_string(),
        ));
    }

    docx_paragraph_text(&doc_xml)
}

/// Collect `<w:t>` runs, separating paragraphs (`</w:p>`) with newlines so
/// words from adjacent paragraphs never fuse together.
fn docx_paragraph_text(xml: &[u8]) -> Result<String, ExtractError> {
    use quick_xml::events::Event;

    let mut out = String::new();
    let mut reader = quick_xml::Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut in_text = false;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text = true,
            Ok(Event::Text(te)) if in_text => {
                let text = te
                    .unescape()
                    .map_err(|e| ExtractError::Docx(e.to_string()))?;
                out.push_str(&text);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Docx(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(out)
}

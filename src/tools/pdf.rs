//! PDF text extraction (`read_financial_pdf`)

use std::path::Path;
use std::sync::LazyLock;

use lopdf::Document;
use regex::Regex;
use tracing::{debug, warn};

use super::{ToolKind, ToolOutput};

/// Load and return cleaned text from a financial PDF.
///
/// Blocking; callers on the async executor should go through
/// `spawn_blocking`.
pub fn read_document_text(path: &str) -> ToolOutput {
    if path.is_empty() || !Path::new(path).exists() {
        return ToolOutput::failed(
            ToolKind::ReadFinancialPdf,
            format!("File not found: {}", path),
        );
    }

    let document = match Document::load(path) {
        Ok(doc) => doc,
        Err(e) => {
            warn!(path = %path, error = %e, "Failed to load PDF");
            return ToolOutput::failed(ToolKind::ReadFinancialPdf, format!("Error reading PDF: {}", e));
        }
    };

    let pages = document.get_pages();
    if pages.is_empty() {
        return no_text();
    }

    let mut page_texts = Vec::with_capacity(pages.len());
    for page_number in pages.keys() {
        match document.extract_text(&[*page_number]) {
            Ok(text) => page_texts.push(text),
            Err(e) => {
                warn!(path = %path, page = page_number, error = %e, "Failed to extract page text");
                return ToolOutput::failed(
                    ToolKind::ReadFinancialPdf,
                    format!("Error reading PDF: {}", e),
                );
            }
        }
    }

    let text = clean_text(&page_texts.join("\n\n"));
    if text.is_empty() {
        return no_text();
    }

    debug!(path = %path, pages = pages.len(), chars = text.len(), "Extracted PDF text");
    ToolOutput::Text(text)
}

fn no_text() -> ToolOutput {
    ToolOutput::failed(
        ToolKind::ReadFinancialPdf,
        "No extractable text (possibly image-only scan).",
    )
}

static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid whitespace pattern"));
static BLANK_LINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline pattern"));

/// Collapse runs of spaces/tabs into one space and three or more newlines
/// into a single blank line, then trim.
pub fn clean_text(text: &str) -> String {
    let text = HORIZONTAL_SPACE.replace_all(text, " ");
    let text = BLANK_LINE_RUN.replace_all(&text, "\n\n");
    text.trim().to_string()
}

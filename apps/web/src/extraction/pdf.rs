//! PDF text extraction: one block of text per page.

use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use tracing::warn;

use super::ExtractError;

/// Returns the text of every page, in page order.
///
/// Pages are read with `lopdf`; each text object on a page ends in `\n`.
/// A file `lopdf` cannot load is an error. If a single page fails to decode,
/// the whole document is re-read with `pdf-extract`, which yields one block.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    let doc = Document::load_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;

    let mut pages = Vec::new();
    for page_num in doc.get_pages().keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(text) => pages.push(text),
            Err(e) => {
                warn!("lopdf could not read page {page_num} ({e}), falling back to pdf-extract");
                return extract_whole(bytes).map(|text| vec![text]);
            }
        }
    }

    Ok(pages)
}

fn extract_whole(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract panics on some malformed font tables instead of erroring.
    panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
        .map_err(|_| ExtractError::Pdf("pdf-extract panicked while reading the document".to_string()))?
        .map_err(|e| ExtractError::Pdf(e.to_string()))
}

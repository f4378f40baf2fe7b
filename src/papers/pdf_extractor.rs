//! PDF text extraction wrapper
//!
//! Wraps pdf-extract crate with error handling for:
//! - Unreadable files
//! - Encrypted or corrupted PDFs (including fonts/streams that make it panic)
//! - Scanned/image-only PDFs (no text layer)

use std::panic::{self, UnwindSafe};
use std::path::Path;

use crate::error::{Error, Result};
use crate::{elog, log};

/// Extract full text from PDF bytes
///
/// `origin` is only used for error messages.
pub fn extract_text_from_pdf(pdf_bytes: &[u8], origin: &Path) -> Result<String> {
    let text = run_parser(|| pdf_extract::extract_text_from_mem(pdf_bytes), origin)?;

    if text.trim().is_empty() {
        return Err(Error::EmptyDocument { path: origin.to_path_buf() });
    }

    Ok(text)
}

/// Run the parser, turning both its errors and its panics into `Extraction`.
/// pdf-extract can panic on malformed fonts or streams.
fn run_parser<F>(parse: F, origin: &Path) -> Result<String>
where
    F: FnOnce() -> std::result::Result<String, pdf_extract::OutputError> + UnwindSafe,
{
    match panic::catch_unwind(parse) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(Error::Extraction {
            path: origin.to_path_buf(),
            message: e.to_string(),
        }),
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown cause".to_string());
            Err(Error::Extraction {
                path: origin.to_path_buf(),
                message: format!("PDF parser crashed: {}", reason),
            })
        }
    }
}

/// Read a PDF from disk and return its page text as one string
pub fn extract_text_from_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| Error::ReadPdf {
        path: path.to_path_buf(),
        source,
    })?;

    log!("[Extractor] Read {} bytes from {}", bytes.len(), path.display());

    match extract_text_from_pdf(&bytes, path) {
        Ok(text) => {
            log!(
                "[Extractor] Extracted {} words, {} lines",
                text.split_whitespace().count(),
                text.lines().count()
            );
            Ok(text)
        }
        Err(e) => {
            elog!("[Extractor] {}", e);
            Err(e)
        }
    }
}

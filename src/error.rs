//! Crate-wide error type

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read PDF {}: {source}", path.display())]
    ReadPdf {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to extract text from {}: {message}", path.display())]
    Extraction { path: PathBuf, message: String },

    /// Scanned or image-only PDFs extract to nothing
    #[error("no extractable text in {} (scanned or image-only PDF?)", path.display())]
    EmptyDocument { path: PathBuf },

    #[error("summarization model error: {0}")]
    Model(String),

    #[error("settings error: {0}")]
    Settings(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<candle_core::Error> for Error {
    fn from(e: candle_core::Error) -> Self {
        Error::Model(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_message_names_file() {
        let err = Error::EmptyDocument { path: PathBuf::from("paper.pdf") };
        assert!(err.to_string().contains("paper.pdf"));
    }

    #[test]
    fn test_candle_error_maps_to_model() {
        let err: Error = candle_core::Error::Msg("boom".to_string()).into();
        assert!(matches!(err, Error::Model(ref m) if m.contains("boom")));
    }
}

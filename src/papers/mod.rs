//! Research paper text: PDF extraction and section lookup

pub mod pdf_extractor;
pub mod section_parser;

use serde::Serialize;

/// Sections a menu question can ask about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Methods,
    Results,
    Conclusion,
}

impl SectionKind {
    /// Keyword handed to the section locator
    pub fn keyword(self) -> &'static str {
        match self {
            SectionKind::Methods => "method",
            SectionKind::Results => "result",
            SectionKind::Conclusion => "conclusion",
        }
    }
}

/// One heading found by the outline pass
#[derive(Debug, Clone, Serialize)]
pub struct OutlineEntry {
    pub heading: String,
    pub word_count: usize,
    pub preview: String,
}

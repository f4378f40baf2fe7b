//! Section lookup for academic papers
//!
//! Two heuristics over raw extracted text:
//! - Keyword lookup: capture from the first line containing a keyword up to
//!   the next blank line (used to answer menu questions)
//! - Outline: split the text at well-known section headings

use std::sync::OnceLock;

use regex::Regex;

use super::{OutlineEntry, SectionKind};
use crate::utils::safe_truncate;

pub const SECTION_NOT_FOUND: &str = "Section not found.";

pub const UNRECOGNIZED_QUESTION: &str = "Sorry, I couldn't understand your question. Try again with keywords like 'methods', 'results', or 'conclusion'.";

/// Trigger terms checked against the question, in priority order
const QUESTION_TRIGGERS: &[(&[&str], SectionKind)] = &[
    (&["method"], SectionKind::Methods),
    (&["result", "finding"], SectionKind::Results),
    (&["conclusion"], SectionKind::Conclusion),
];

/// Headings recognized by the outline, in canonical order
const OUTLINE_HEADINGS: &[&str] = &[
    "abstract",
    "introduction",
    "methods",
    "results",
    "discussion",
    "conclusion",
];

const PREVIEW_BYTES: usize = 160;

/// Capture the lines from the first one containing `keyword` (case-insensitive
/// substring) up to, not including, the next blank line.
///
/// Every captured line is followed by a newline. Returns [`SECTION_NOT_FOUND`]
/// if no line contains the keyword.
pub fn extract_section(text: &str, keyword: &str) -> String {
    let keyword = keyword.to_lowercase();
    let mut section = String::new();
    let mut found = false;

    for line in split_lines(text) {
        if line.to_lowercase().contains(&keyword) {
            found = true;
        } else if found && line.trim().is_empty() {
            break;
        }

        if found {
            section.push_str(line);
            section.push('\n');
        }
    }

    if section.is_empty() {
        SECTION_NOT_FOUND.to_string()
    } else {
        section
    }
}

/// Characters that end a line: `\n`, `\r`, vertical tab, form feed, the
/// file/group/record separators, NEL and the Unicode line/paragraph separators
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Split into lines without their terminators; `\r\n` counts as one break.
/// A trailing terminator does not produce a final empty line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(_, '\n')) = chars.peek() {
                chars.next();
                start += 1;
            }
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Which section a free-form question asks about. First matching family wins.
pub fn classify_question(question: &str) -> Option<SectionKind> {
    let question = question.to_lowercase();
    QUESTION_TRIGGERS
        .iter()
        .find(|(terms, _)| terms.iter().any(|term| question.contains(term)))
        .map(|(_, kind)| *kind)
}

/// Answer a menu question by keyword dispatch into [`extract_section`]
pub fn answer_question(text: &str, question: &str) -> String {
    match classify_question(question) {
        Some(kind) => extract_section(text, kind.keyword()),
        None => UNRECOGNIZED_QUESTION.to_string(),
    }
}

fn heading_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| {
        Regex::new(r"(?i)\b(abstract|introduction|methods|results|discussion|conclusion)\b")
            .expect("heading pattern is valid")
    })
}

/// Split the text at every known heading occurrence.
///
/// A section's body runs from the end of its heading to the start of the
/// next heading. A heading seen twice keeps the later body.
pub fn identify_sections(text: &str) -> Vec<OutlineEntry> {
    let mut bodies: [Option<&str>; OUTLINE_HEADINGS.len()] = [None; OUTLINE_HEADINGS.len()];
    let matches: Vec<_> = heading_regex().find_iter(text).collect();

    for (i, m) in matches.iter().enumerate() {
        let end = matches.get(i + 1).map(|next| next.start()).unwrap_or(text.len());
        let name = m.as_str().to_lowercase();
        if let Some(slot) = OUTLINE_HEADINGS.iter().position(|h| *h == name) {
            bodies[slot] = Some(text[m.end()..end].trim());
        }
    }

    OUTLINE_HEADINGS
        .iter()
        .zip(bodies)
        .filter_map(|(heading, body)| {
            let body = body?;
            let cleaned = clean_text(body);
            Some(OutlineEntry {
                heading: heading.to_string(),
                word_count: cleaned.split_whitespace().count(),
                preview: safe_truncate(&cleaned, PREVIEW_BYTES).to_string(),
            })
        })
        .collect()
}

/// Clean text by removing hyphenation and normalizing whitespace
fn clean_text(text: &str) -> String {
    text.replace("-\n", "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

//! Interactive menu loop over one loaded document
//!
//! The loop reads from any `BufRead` and writes to any `Write`, so the CLI
//! drives it with stdin/stdout and tests drive it with in-memory buffers.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::error::Result;
use crate::log;
use crate::papers::section_parser::{answer_question, classify_question};
use crate::summarizer::{summarize_document, Summarize};

pub const WELCOME: &str = "📄 Welcome to the Research Paper Summarizer Bot!";
pub const PATH_PROMPT: &str = "Enter the path to the research paper PDF: ";
pub const EXTRACTING: &str = "🔍 Extracting and analyzing the document...";

const MENU: &str = "\n🤖 How can I help you?\n\
                    1. Get a full paper summary\n\
                    2. Ask a specific question (e.g., methods, findings)\n\
                    3. Exit\n\
                    Choose an option: ";
const QUESTION_PROMPT: &str =
    "Enter your question (you can ask about findings, conclusion, etc.): ";
const SEARCHING: &str = "🔎 Searching the text for relevant content...";
pub const INVALID_CHOICE: &str = "❌ Invalid choice. Please try again.";
pub const GOODBYE: &str = "👋 Goodbye!";

/// A line typed at the menu prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Summarize,
    Ask,
    Exit,
    Invalid,
}

impl MenuChoice {
    /// Exact match on the line, surrounding spaces make it invalid
    pub fn parse(line: &str) -> Self {
        match line {
            "1" => MenuChoice::Summarize,
            "2" => MenuChoice::Ask,
            "3" => MenuChoice::Exit,
            _ => MenuChoice::Invalid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingChoice,
    Finished,
}

/// Read one line without its terminator. `None` at end of input.
pub fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Some(line))
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    text: &str,
) -> Result<Option<String>> {
    write!(output, "{}", text)?;
    output.flush()?;
    read_line(input)
}

/// Ask for the PDF path. `None` if input ended first.
pub fn prompt_pdf_path<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<Option<PathBuf>> {
    Ok(prompt(input, output, PATH_PROMPT)?.map(|line| PathBuf::from(line.trim())))
}

pub struct Session<S: Summarize> {
    document: String,
    summarizer: S,
    max_input_words: usize,
    state: SessionState,
}

impl<S: Summarize> Session<S> {
    pub fn new(document: String, summarizer: S, max_input_words: usize) -> Self {
        Self {
            document,
            summarizer,
            max_input_words,
            state: SessionState::AwaitingChoice,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    #[cfg(test)]
    fn summarizer(&self) -> &S {
        &self.summarizer
    }

    /// Run until the user exits or input ends
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<()> {
        while self.state == SessionState::AwaitingChoice {
            self.state = self.step(input, output)?;
        }
        Ok(())
    }

    /// One menu round trip
    fn step<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<SessionState> {
        let Some(line) = prompt(input, output, MENU)? else {
            writeln!(output)?;
            writeln!(output, "{}", GOODBYE)?;
            return Ok(SessionState::Finished);
        };

        match MenuChoice::parse(&line) {
            MenuChoice::Summarize => {
                writeln!(output, "\n📚 Summary:")?;
                let summary =
                    summarize_document(&mut self.summarizer, &self.document, self.max_input_words);
                match summary {
                    Ok(summary) => writeln!(output, "{}", summary)?,
                    Err(e) => writeln!(output, "❌ Summarization failed: {}", e)?,
                }
            }
            MenuChoice::Ask => {
                let Some(question) = prompt(input, output, QUESTION_PROMPT)? else {
                    writeln!(output)?;
                    writeln!(output, "{}", GOODBYE)?;
                    return Ok(SessionState::Finished);
                };
                writeln!(output, "{}", SEARCHING)?;
                log!("[Session] Question classified as {:?}", classify_question(&question));
                let response = answer_question(&self.document, &question);
                writeln!(output, "\n📝 Response:\n{}", response)?;
            }
            MenuChoice::Exit => {
                writeln!(output, "{}", GOODBYE)?;
                return Ok(SessionState::Finished);
            }
            MenuChoice::Invalid => {
                log!("[Session] Invalid menu choice {:?}", line);
                writeln!(output, "{}", INVALID_CHOICE)?;
            }
        }

        Ok(SessionState::AwaitingChoice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::papers::section_parser::{SECTION_NOT_FOUND, UNRECOGNIZED_QUESTION};
    use std::io::Cursor;

    const PAPER: &str = "Methods\nWe did X.\n\nResults\nWe found Y.\n";

    #[derive(Default)]
    struct Recorder {
        inputs: Vec<String>,
    }

    impl Summarize for Recorder {
        fn summarize(&mut self, text: &str) -> Result<String> {
            self.inputs.push(text.to_string());
            Ok("A short summary.".to_string())
        }
    }

    struct Broken;

    impl Summarize for Broken {
        fn summarize(&mut self, _text: &str) -> Result<String> {
            Err(Error::Model("no weights".to_string()))
        }
    }

    fn run_session<S: Summarize>(session: &mut Session<S>, keys: &str) -> String {
        let mut input = Cursor::new(keys.as_bytes().to_vec());
        let mut output = Vec::new();
        session.run(&mut input, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_menu_choice_parse() {
        assert_eq!(MenuChoice::parse("1"), MenuChoice::Summarize);
        assert_eq!(MenuChoice::parse("2"), MenuChoice::Ask);
        assert_eq!(MenuChoice::parse("3"), MenuChoice::Exit);
        assert_eq!(MenuChoice::parse("9"), MenuChoice::Invalid);
        assert_eq!(MenuChoice::parse(" 1"), MenuChoice::Invalid);
        assert_eq!(MenuChoice::parse(""), MenuChoice::Invalid);
    }

    #[test]
    fn test_read_line_strips_terminators() {
        let mut input = Cursor::new(b"one\r\ntwo\nthree".to_vec());
        assert_eq!(read_line(&mut input).unwrap().as_deref(), Some("one"));
        assert_eq!(read_line(&mut input).unwrap().as_deref(), Some("two"));
        assert_eq!(read_line(&mut input).unwrap().as_deref(), Some("three"));
        assert_eq!(read_line(&mut input).unwrap(), None);
    }

    #[test]
    fn test_invalid_choice_reprompts() {
        let mut session = Session::new(PAPER.to_string(), Recorder::default(), 1300);
        let out = run_session(&mut session, "9\n3\n");

        assert!(out.contains(INVALID_CHOICE));
        assert_eq!(out.matches("Choose an option: ").count(), 2);
        assert!(out.ends_with(&format!("{}\n", GOODBYE)));
        assert_eq!(session.state(), SessionState::Finished);
    }

    #[test]
    fn test_summary_uses_full_document() {
        let mut session = Session::new(PAPER.to_string(), Recorder::default(), 1300);
        let out = run_session(&mut session, "1\n3\n");

        assert!(out.contains("\n📚 Summary:\nA short summary.\n"));
        assert_eq!(session.summarizer().inputs, vec![PAPER.to_string()]);
    }

    #[test]
    fn test_summary_input_truncated() {
        let mut session = Session::new("one two three four".to_string(), Recorder::default(), 2);
        run_session(&mut session, "1\n1\n3\n");
        assert_eq!(session.summarizer().inputs, vec!["one two".to_string(), "one two".to_string()]);
    }

    #[test]
    fn test_question_returns_section() {
        let mut session = Session::new(PAPER.to_string(), Recorder::default(), 1300);
        let out = run_session(&mut session, "2\nHow were the methods chosen?\n3\n");

        assert!(out.contains(SEARCHING));
        assert!(out.contains("\n📝 Response:\nMethods\nWe did X.\n\n"));
    }

    #[test]
    fn test_question_missing_section() {
        let mut session = Session::new(PAPER.to_string(), Recorder::default(), 1300);
        let out = run_session(&mut session, "2\nwhat is the conclusion?\n3\n");
        assert!(out.contains(&format!("\n📝 Response:\n{}\n", SECTION_NOT_FOUND)));
    }

    #[test]
    fn test_question_unrecognized() {
        let mut session = Session::new(PAPER.to_string(), Recorder::default(), 1300);
        let out = run_session(&mut session, "2\nwho are the authors?\n3\n");
        assert!(out.contains(UNRECOGNIZED_QUESTION));
        assert!(session.summarizer().inputs.is_empty());
    }

    #[test]
    fn test_end_of_input_finishes() {
        let mut session = Session::new(PAPER.to_string(), Recorder::default(), 1300);
        let out = run_session(&mut session, "9\n");
        assert_eq!(out.matches(GOODBYE).count(), 1);
        assert_eq!(session.state(), SessionState::Finished);
    }

    #[test]
    fn test_summarizer_failure_keeps_loop_alive() {
        let mut session = Session::new(PAPER.to_string(), Broken, 1300);
        let out = run_session(&mut session, "1\n2\nresults?\n3\n");
        assert!(out.contains("❌ Summarization failed: summarization model error: no weights"));
        assert!(out.contains("Results\nWe found Y.\n"));
    }

    #[test]
    fn test_prompt_pdf_path_trims() {
        let mut input = Cursor::new(b"  paper.pdf  \n".to_vec());
        let mut output = Vec::new();
        let path = prompt_pdf_path(&mut input, &mut output).unwrap();
        assert_eq!(path, Some(PathBuf::from("paper.pdf")));
        assert_eq!(String::from_utf8(output).unwrap(), PATH_PROMPT);
    }
}

//! papersum CLI - summarize research paper PDFs and look up their sections
//!
//! Usage: papersum [OPTIONS] [COMMAND]
//!
//! Without a command it starts the interactive menu. The one-shot commands
//! support JSON output for scripting.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use papersum_lib::papers::{pdf_extractor, section_parser};
use papersum_lib::session::{self, Session};
use papersum_lib::settings::{self, Settings};
use papersum_lib::summarizer::{summarize_document, LazySummarizer};
use papersum_lib::{elog, log, logging, Error};
use serde_json::json;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "papersum")]
#[command(version, about = "Research paper summarizer bot", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Settings file (default: <config dir>/papersum/settings.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Echo diagnostics to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu: summary, section questions, exit
    Chat {
        /// PDF to load (prompted for when omitted)
        pdf: Option<PathBuf>,
    },
    /// Print a summary of the whole paper
    Summarize {
        pdf: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Answer a methods/results/conclusion question
    Ask {
        pdf: PathBuf,
        question: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List recognized section headings
    Sections {
        pdf: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Settings file operations
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print effective settings as JSON
    Show,
    /// Print the settings file path
    Path,
    /// Write current settings (defaults for missing fields) to disk
    Init,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    let cli = Cli::parse();

    match &cli.config {
        Some(path) => settings::init_with_path(path.clone()),
        None => settings::init(settings::default_config_dir()),
    }
    let current = settings::get();

    logging::set_verbose(cli.verbose);
    let log_dir = logging::default_log_dir();
    if let Some(log_path) = logging::init_logging(&log_dir, current.log_retention_days) {
        if cli.verbose {
            eprintln!("Logging to: {}", log_path.display());
        }
    }

    if let Err(e) = run_cli(cli, current) {
        elog!("Error: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli, current: Settings) -> Result<(), Error> {
    match cli.command.unwrap_or(Commands::Chat { pdf: None }) {
        Commands::Chat { pdf } => run_chat(pdf, current),
        Commands::Summarize { pdf, json } => {
            let text = load_document(&pdf)?;
            let mut summarizer = LazySummarizer::new(current.clone());
            let summary = summarize_document(&mut summarizer, &text, current.max_input_words)?;
            if json {
                print_json(&json!({ "file": pdf.display().to_string(), "summary": summary }));
            } else {
                println!("{}", summary);
            }
            Ok(())
        }
        Commands::Ask { pdf, question, json } => {
            let text = load_document(&pdf)?;
            let kind = section_parser::classify_question(&question);
            let response = section_parser::answer_question(&text, &question);
            if json {
                print_json(&json!({
                    "file": pdf.display().to_string(),
                    "question": question,
                    "section": kind,
                    "response": response,
                }));
            } else {
                println!("{}", response);
            }
            Ok(())
        }
        Commands::Sections { pdf, json } => {
            let text = load_document(&pdf)?;
            let outline = section_parser::identify_sections(&text);
            if json {
                print_json(&json!({ "file": pdf.display().to_string(), "sections": outline }));
            } else if outline.is_empty() {
                println!("No known section headings found.");
            } else {
                for entry in &outline {
                    println!(
                        "{:14} {:6} words  {}",
                        entry.heading, entry.word_count, entry.preview
                    );
                }
            }
            Ok(())
        }
        Commands::Config { cmd } => handle_config(cmd, &current),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "papersum", &mut io::stdout());
            Ok(())
        }
    }
}

fn run_chat(pdf: Option<PathBuf>, current: Settings) -> Result<(), Error> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();

    writeln!(output, "{}", session::WELCOME)?;
    let pdf = match pdf {
        Some(pdf) => pdf,
        None => match session::prompt_pdf_path(&mut input, &mut output)? {
            Some(pdf) => pdf,
            None => return Ok(()),
        },
    };

    writeln!(output, "\n{}", session::EXTRACTING)?;
    output.flush()?;
    let text = load_document(&pdf)?;

    log!("[Session] Started on {}", pdf.display());
    let max_input_words = current.max_input_words;
    let mut chat = Session::new(text, LazySummarizer::new(current), max_input_words);
    chat.run(&mut input, &mut output)?;
    log!("[Session] Finished");
    Ok(())
}

fn load_document(pdf: &Path) -> Result<String, Error> {
    pdf_extractor::extract_text_from_file(pdf)
}

fn handle_config(cmd: ConfigCommands, current: &Settings) -> Result<(), Error> {
    match cmd {
        ConfigCommands::Show => {
            let effective = Settings {
                model_id: current.effective_model_id(),
                ..current.clone()
            };
            print_json(&effective);
        }
        ConfigCommands::Path => match settings::config_path() {
            Some(path) => println!("{}", path.display()),
            None => println!("(settings not initialized)"),
        },
        ConfigCommands::Init => {
            let path = settings::save()?;
            println!("Settings written to {}", path.display());
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => elog!("Failed to serialize output: {}", e),
    }
}

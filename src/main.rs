//! rawline - Main Entry Point
//!
//! Small interactive loop around the line editor: every line read is echoed
//! back. `history` lists the recalled lines, `exit` or end of input quits.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use rawline::{EditorConfig, History, Prompter, ReadLineError, RenderMode, StdTerminal};

/// Read lines with history recall and echo them back
#[derive(Debug, Parser)]
#[command(name = "rawline", version, about)]
struct Args {
    /// Prompt shown before each line
    #[arg(short, long)]
    prompt: Option<String>,

    /// Keep the cursor on one row even for lines wider than the terminal
    #[arg(long)]
    single_row: bool,

    /// Maximum number of history lines kept
    #[arg(long)]
    max_history: Option<usize>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(2);
        }
    };

    match run(config) {
        Ok(()) => {}
        Err(ReadLineError::Interrupted) => process::exit(130),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    }
}

/// Log to stderr only when RUST_LOG asks for it, so the edited line is not
/// interleaved with log output by default
fn init_tracing() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr);
    if let Err(e) = subscriber.try_init() {
        eprintln!("WARNING: failed to initialize logging: {}", e);
    }
}

fn load_config(args: &Args) -> Result<EditorConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
            EditorConfig::from_json(&json)
                .map_err(|e| format!("invalid config {}: {}", path.display(), e))?
        }
        None => EditorConfig::default(),
    };

    if let Some(prompt) = &args.prompt {
        config.prompt = prompt.clone();
    }
    if args.single_row {
        config.render_mode = RenderMode::SingleRow;
    }
    if let Some(max) = args.max_history {
        config.max_history_size = max;
    }
    Ok(config)
}

fn run(config: EditorConfig) -> Result<(), ReadLineError> {
    let mut history: History = config.new_history();
    let mut prompter = Prompter::with_config(StdTerminal::new(), config);

    loop {
        let line = match prompter.read_line_default(&mut history) {
            Ok(line) => line,
            Err(ReadLineError::Eof) => return Ok(()),
            Err(e) => return Err(e),
        };

        match line.trim() {
            "exit" | "quit" => return Ok(()),
            "history" => {
                for entry in history.get_summary(None) {
                    println!("{}", entry);
                }
            }
            "config" => {
                for entry in prompter.config().get_summary() {
                    println!("{}", entry);
                }
            }
            _ => println!("{}", line),
        }
    }
}

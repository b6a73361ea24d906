//! # UltraBlog Shell
//!
//! Runs the command core on the in-memory editor, reading command lines
//! from `-c` arguments and then from stdin.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use ultrablog::cmd_args::CommandLineArgs;
use ultrablog::editor::MemoryEditor;
use ultrablog::shell::Shell;
use ultrablog::{AppContext, Settings};

const LOG_LEVEL_VAR: &str = "ULTRABLOG_LOG_LEVEL";

fn init_logging(verbose: bool) {
    let level = if verbose {
        "debug".to_string()
    } else {
        std::env::var(LOG_LEVEL_VAR).unwrap_or_else(|_| "error".to_string())
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("error")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn ask(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
        Err(_) => false,
    }
}

fn main() -> Result<()> {
    let args = CommandLineArgs::parse();
    init_logging(args.verbose());

    let settings = Settings::load(args.profile())?;
    tracing::debug!("Loaded profile '{}'", args.profile());

    let editor = MemoryEditor::new().with_confirmer(Box::new(ask));
    let transcript = editor.transcript();
    let ctx = AppContext::from_settings(settings, Box::new(editor))?;
    let mut shell = Shell::new(ctx, transcript);

    let mut out = io::stdout();
    for line in args.commands() {
        if !shell.run_line(line, &mut out)? {
            return Ok(());
        }
    }

    let interactive = atty::is(atty::Stream::Stdin);
    let stdin = io::stdin();
    loop {
        if interactive {
            print!("ub> ");
            out.flush()?;
        }
        // The lock is not held across lines so prompts can read answers.
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if !shell.run_line(&line, &mut out)? {
            break;
        }
    }
    Ok(())
}

//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod render;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cli::render::{run_export, run_render};
use crate::core::config::Config;
use crate::ui::chat_loop::run_chat;

#[derive(Parser)]
#[command(name = "causerie")]
#[command(about = "A terminal chat interface with a built-in Markdown renderer")]
#[command(
    long_about = "Causerie is a full-screen terminal chat client for a single conversation. \
Messages are written in a small Markdown dialect and rendered both on screen and, \
via the render/export commands, as sanitized HTML fragments.\n\n\
Controls:\n\
  Type              Enter your message in the composer\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a newline\n\
  Alt+B/I/S/C       Bold, italic, strikethrough, inline code\n\
  Alt+K             Insert a link around the selection\n\
  Alt+U/O/Q         Toggle bullet, numbered list, or quote prefix\n\
  Alt+1/2           Toggle heading prefix\n\
  Alt+A / Alt+X     Attach a file / discard the last attachment\n\
  Alt+Up/Down       Select a message; Alt+R toggles a 👍 reaction\n\
  Alt+L             Enable transcript logging, or pause/resume it\n\
  Ctrl+U            Clear the composer\n\
  PageUp/PageDown   Scroll through chat history\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable transcript logging to the specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,

    /// Refuse malformed link targets instead of falling back to the label
    #[arg(long, global = true)]
    pub strict_links: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Render Markdown from a file (or stdin) as an HTML fragment
    Render {
        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Render Markdown into a standalone HTML document
    Export {
        /// Input file
        file: PathBuf,
        /// Where to write the HTML document
        #[arg(short, long)]
        output: PathBuf,
        /// Document title; defaults to the input file name
        #[arg(long)]
        title: Option<String>,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let args = Args::parse();

    let mut config = Config::load()?;
    if args.strict_links {
        config.strict_links = Some(true);
    }

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(args.log, config).await,
        Commands::Render { file } => run_render(file, &config),
        Commands::Export {
            file,
            output,
            title,
        } => run_export(&file, &output, title.as_deref(), &config),
    }
}

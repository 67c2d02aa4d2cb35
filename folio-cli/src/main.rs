//! Folio CLI - Command-line front end for the Folio book editor

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new book file with an Introduction page
    New {
        /// Output `.book` file
        path: PathBuf,

        #[arg(long, default_value = folio_core::types::DEFAULT_TITLE)]
        title: String,

        #[arg(long, default_value = folio_core::types::DEFAULT_AUTHOR)]
        author: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display information about a book file
    Info {
        path: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a book file
    Validate { path: PathBuf },

    /// Apply an editing action to a book file and save it back
    Edit {
        path: PathBuf,

        /// Answer yes to confirmation prompts
        #[arg(short, long, global = true)]
        yes: bool,

        #[command(subcommand)]
        action: commands::EditAction,
    },

    /// Save a book file to the local project slot and downloads directory
    Save { path: PathBuf },

    /// Restore the autosaved draft or the last saved book into a file
    Recover {
        /// Output `.book` file
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,

        /// Load the last saved book without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Export a book file
    Export {
        path: PathBuf,

        /// Output format (pdf, docx, epub, html, all)
        #[arg(short, long, default_value = "pdf")]
        format: String,

        /// Directory the artifacts are written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "folio_cli=debug,folio_core=debug"
    } else {
        "folio_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::New {
            path,
            title,
            author,
            force,
        } => commands::new_book(&path, &title, &author, force).await,

        Commands::Info { path, json } => commands::info(&path, json).await,

        Commands::Validate { path } => commands::validate(&path).await,

        Commands::Edit { path, yes, action } => commands::edit(&path, action, yes).await,

        Commands::Save { path } => commands::save(&path).await,

        Commands::Recover { output, force, yes } => {
            commands::recover(&output, force, yes).await
        }

        Commands::Export {
            path,
            format,
            output_dir,
        } => commands::export(&path, &format, &output_dir).await,
    }
}

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use litrev::{header::DEFAULT_DELIMITER, render::OutputFormat};

#[derive(Debug, Parser)]
#[command(
    name = "litrev",
    version,
    about = "Extract bibliographic header blocks from papers and notes, then filter and export them"
)]
pub struct Cli {
    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load documents, optionally filter them, and print or export the rows
    Scan(ScanArgs),
    /// Load documents and filter them interactively
    Shell(ShellArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

/// Options shared by every command that loads documents.
#[derive(Debug, Args)]
pub struct LoadArgs {
    /// Marker that opens and closes the header block
    #[arg(long, env = "LITREV_DELIMITER", default_value = DEFAULT_DELIMITER)]
    pub delimiter: String,

    /// Only pick up files in folders whose relative path matches this glob
    #[arg(long)]
    pub glob: Option<String>,

    /// Field separator for CSV output (a single character, or "tab")
    #[arg(long, default_value = ",")]
    pub separator: String,

    /// Add a leading File column to CSV output
    #[arg(long)]
    pub with_file: bool,
}

// -- Scan --

#[derive(Debug, Parser)]
pub struct ScanArgs {
    /// Files or folders to load
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Keep rows whose display fields contain this text (case-insensitive)
    #[arg(short, long, conflicts_with = "search")]
    pub filter: Option<String>,

    /// Keep documents whose full text contains this text (case-insensitive)
    #[arg(short, long)]
    pub search: Option<String>,

    /// How to print the rows
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Also write the rows as CSV to this file
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    #[command(flatten)]
    pub load: LoadArgs,
}

// -- Shell --

#[derive(Debug, Parser)]
pub struct ShellArgs {
    /// Files or folders to load on start
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub load: LoadArgs,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "litrev",
            &mut std::io::stdout(),
        );
    }
}

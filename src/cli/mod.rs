//! CLI module for the Motry client
//!
//! Every interaction the window offers is also available from the command
//! line. Without a subcommand the window opens.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use output::{OutputFormat, print_error};

/// Motry - vehicle community client
#[derive(Parser, Debug)]
#[command(name = "motry")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[command(flatten)]
    pub output: OutputOptions,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output formatting options
#[derive(Parser, Debug, Clone)]
pub struct OutputOptions {
    /// Output in JSON format (for machine parsing)
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl OutputOptions {
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// My favorites
    Favorite {
        #[command(subcommand)]
        command: commands::membership::MembershipCommands,
    },

    /// My garage
    Garage {
        #[command(subcommand)]
        command: commands::membership::MembershipCommands,
    },

    /// Rate a vehicle from 1 to 5 stars
    Rate {
        /// Vehicle id
        vehicle: u64,

        /// Score (1-5)
        score: u8,
    },

    /// Comment on a post
    Comment {
        /// Post id
        post: u64,

        /// Comment text
        text: String,

        /// Reply to this comment
        #[arg(long)]
        parent: Option<u64>,

        /// Link an image by URL
        #[arg(long)]
        image_url: Option<String>,

        /// Upload an image file
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Print pushed new-post alerts as they arrive
    Listen {
        /// Stop after this many alerts
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Show what a vehicle page binds to
    Page {
        /// Vehicle id
        vehicle: u64,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommands,
    },
}

/// Run the CLI with a parsed subcommand
pub async fn run(command: Commands, output: &OutputOptions) -> anyhow::Result<()> {
    let format = output.format();
    let quiet = output.quiet;

    match command {
        Commands::Favorite { command } => {
            commands::membership::run(crate::toggle::ToggleKind::Favorite, command, format, quiet).await
        }
        Commands::Garage { command } => {
            commands::membership::run(crate::toggle::ToggleKind::Garage, command, format, quiet).await
        }
        Commands::Rate { vehicle, score } => commands::rate::run(vehicle, score, format, quiet).await,
        Commands::Comment {
            post,
            text,
            parent,
            image_url,
            image,
        } => {
            let args = commands::comment::CommentArgs {
                post,
                text,
                parent,
                image_url,
                image,
            };
            commands::comment::run(args, format, quiet).await
        }
        Commands::Listen { count } => commands::listen::run(count, format, quiet).await,
        Commands::Page { vehicle } => commands::page::run(vehicle, format, quiet).await,
        Commands::Config { command } => commands::config::run(command, format, quiet).await,
    }
}

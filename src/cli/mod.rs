//! CLI module for Lese.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Lese - an AI assistant for arXiv quantum physics papers
///
/// Browse, rate and summarize papers in conversation, with a concert
/// booking assistant alongside to show the same tool-calling loop over a
/// different data source. The name "Lese" comes from the Norwegian word
/// for "read."
#[derive(Parser, Debug)]
#[command(name = "lese")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chat with the arXiv assistant (streaming, with paper tools)
    Chat {
        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Chat with the concert booking assistant
    Concerts {
        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Chat with the arXiv assistant through the Assistants API
    Assistant {
        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Fetch a day's quant-ph papers and rank them by model rating
    Digest {
        /// Submission date (YYYY-MM-DD, default: today)
        date: Option<String>,

        /// LLM model for rating
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Ask a question answered only from a day's papers
    Ask {
        /// The question to ask
        question: String,

        /// Submission date to draw papers from (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// Maximum number of papers used as context
        #[arg(short = 'p', long, default_value = "3")]
        max_papers: usize,

        /// LLM model for answer generation
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Check configuration and credentials
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}

//! CLI output formatting utilities.

use console::{style, Style};
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a bordered panel with a header and body.
    pub fn panel(title: &str, body: &str) {
        println!("\n{}", style(format!("── {} ──", title)).bold());
        for line in body.lines() {
            println!("  {}", line);
        }
        println!();
    }

    /// Print one rated paper row, color-coded by rating.
    pub fn rated_paper_row(rating: u8, id: &str, updated: &str, title: &str) {
        let color = match rating {
            4..=5 => Style::new().green(),
            2..=3 => Style::new().yellow(),
            1 => Style::new().red(),
            _ => Style::new(),
        };

        println!(
            "  {}  {} {}  {}",
            color.apply_to(rating).bold(),
            style(id).bold(),
            style(updated).dim(),
            color.apply_to(title),
        );
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

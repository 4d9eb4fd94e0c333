//! Console output for fsfuzz
//!
//! A spinner while the listing is built, plus header and listing summaries
//! styled with `console`.

use crate::walker::{EnumerationProgress, EnumerationStats, TargetSet};
use console::style;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Spinner shown during enumeration
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update the progress display
    pub fn update(&self, progress: &EnumerationProgress) {
        let msg = format!(
            "Dirs: {} | Files: {} | Errors: {} | Pending: {} | Rate: {:.0}/s",
            format_number(progress.dirs),
            format_number(progress.files),
            format_number(progress.errors),
            progress.pending_dirs,
            progress.entries_per_second(),
        );

        self.bar.set_message(msg);
    }

    pub fn set_status(&self, status: &str) {
        self.bar.set_message(status.to_string());
    }

    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| chunk.iter().rev().map(|&b| b as char).collect::<String>())
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Lines of the run header, one per setting
pub fn header_lines(
    root: &Path,
    workers: usize,
    buffer_capacity: usize,
    fill_byte: u8,
    seed: u64,
) -> Vec<String> {
    vec![
        format!("  {} {}", style("Root:").bold(), root.display()),
        format!("  {} {}", style("Workers:").bold(), workers),
        format!(
            "  {} {} of {:#04x}",
            style("Buffer:").bold(),
            format_size(buffer_capacity as u64, BINARY),
            fill_byte
        ),
        format!("  {} {}", style("Seed:").bold(), seed),
    ]
}

/// Print a header before enumeration starts
pub fn print_header(root: &Path, workers: usize, buffer_capacity: usize, fill_byte: u8, seed: u64) {
    println!();
    println!(
        "{} {}",
        style("fsfuzz").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    for line in header_lines(root, workers, buffer_capacity, fill_byte, seed) {
        println!("{}", line);
    }
    println!();
}

/// Print what the enumeration produced
pub fn print_listing(targets: &TargetSet, stats: &EnumerationStats, duration: Duration) {
    println!();
    println!(
        "{}",
        style(format!(
            "Created listing of {} files",
            format_number(targets.len() as u64)
        ))
        .green()
        .bold()
    );
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  {} {}",
        style("Readable:").bold(),
        format_number(targets.readable_count() as u64)
    );
    println!(
        "  {} {}",
        style("Writable:").bold(),
        format_number(targets.writable_count() as u64)
    );
    println!(
        "  {} {}",
        style("Directories:").bold(),
        format_number(stats.dirs)
    );
    println!(
        "  {} {} symlinks, {} special",
        style("Skipped:").bold(),
        format_number(stats.symlinks),
        format_number(stats.special)
    );
    if stats.errors > 0 {
        println!(
            "  {} {}",
            style("Errors:").yellow().bold(),
            format_number(stats.errors)
        );
    }
    println!(
        "  {} {:.1}s",
        style("Duration:").bold(),
        duration.as_secs_f64()
    );
    println!();
}

//! Terminal rendering of reports, history and chat messages.

use colored::Colorize;
use sitescout_application::AnalysisStatus;
use sitescout_core::analysis::{AnalysisResult, Source};
use sitescout_core::chat::ChatMessage;
use sitescout_core::history::HistoryEntry;
use std::io::Write;

fn heading(title: &str) {
    println!();
    println!("{}", title.bright_magenta().bold());
}

fn bullet_list(label: &str, items: &[String]) {
    println!("  {}", label.bold());
    if items.is_empty() {
        println!("    {}", "(none)".bright_black());
    }
    for item in items {
        println!("    - {item}");
    }
}

fn sources(sources: &[Source]) {
    for (index, source) in sources.iter().enumerate() {
        println!(
            "  [{}] {} {}",
            index + 1,
            source.title,
            source.uri.bright_black()
        );
    }
}

pub fn report(result: &AnalysisResult) {
    println!(
        "{} {}",
        "Intelligence report:".bright_green().bold(),
        result.domain().bright_cyan()
    );

    heading("Summary");
    println!("  {}", result.summary());

    heading("Purpose");
    println!("  {}", result.purpose());

    heading("How it works");
    println!("  {}", result.operational_flow());

    heading("Requirements");
    let requirements = result.requirements();
    bullet_list("Functional", &requirements.functional);
    bullet_list("Technical", &requirements.technical);
    bullet_list("User experience", &requirements.user_experience);

    heading("Site structure");
    for page in result.structure() {
        println!("  {} {}", page.page.bright_cyan(), page.description);
    }

    if !result.sources().is_empty() {
        heading("Sources");
        sources(result.sources());
    }
}

pub fn cached_notice(entry: &HistoryEntry) {
    eprintln!(
        "{}",
        format!(
            "Using cached analysis from {} (id {}). Pass --fresh to re-run.",
            entry.timestamp.format("%Y-%m-%d %H:%M UTC"),
            entry.id
        )
        .bright_black()
    );
}

pub fn history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("{}", "No cached analyses.".bright_black());
        return;
    }
    for entry in entries {
        println!(
            "{}  {}  {}",
            entry.id.bright_black(),
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.domain.bright_cyan()
        );
    }
}

/// Rewrites the progress line in place on stderr.
pub fn progress(status: AnalysisStatus, message: &str) {
    let mut stderr = std::io::stderr();
    let _ = write!(
        stderr,
        "\r\x1b[2K{} {}",
        format!("[{status}]").yellow(),
        message.bright_black()
    );
    let _ = stderr.flush();
}

pub fn clear_progress() {
    let mut stderr = std::io::stderr();
    let _ = write!(stderr, "\r\x1b[2K");
    let _ = stderr.flush();
}

pub fn answer(message: &ChatMessage) {
    if message.is_deep_dive == Some(true) {
        println!("{}", "[deep dive]".bright_yellow());
    }
    for line in message.content.lines() {
        println!("{}", line.bright_blue());
    }
    if let Some(found) = message.sources.as_deref().filter(|found| !found.is_empty()) {
        sources(found);
    }
}

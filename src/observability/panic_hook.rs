//! Structured crash report printed in place of the default panic message.
//!
//! The report names the synthesis phase, the file being processed and how
//! far the run got, which is usually enough to reproduce a crash with a
//! single input file.

use super::context::{get_current_context, get_progress, SynthesisContext};
use std::panic::PanicHookInfo;
use tracing::Span;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const WIDTH: usize = 76;

pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        print_crash_report(info);
    }));
}

fn print_crash_report(info: &PanicHookInfo<'_>) {
    let context = get_current_context();
    let (processed, total) = get_progress();

    eprintln!();
    for line in report_lines(
        &extract_panic_message(info),
        info.location().map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column())),
        &context,
        processed,
        total,
    ) {
        eprintln!("{line}");
    }

    if std::env::var("RUST_BACKTRACE").is_ok() {
        eprintln!();
        eprintln!("{}", std::backtrace::Backtrace::capture());
    } else {
        eprintln!("Run with RUST_BACKTRACE=1 for a stack trace");
    }
    if let Some(file) = &context.current_file {
        eprintln!("Include this report and the file {} when filing an issue", file.display());
    }
}

fn report_lines(
    message: &str,
    location: Option<String>,
    context: &SynthesisContext,
    processed: usize,
    total: usize,
) -> Vec<String> {
    let rule = format!("+{}+", "-".repeat(WIDTH + 2));
    let row = |label: &str, value: &str| {
        let text = format!("{label}{value}");
        format!("| {:<WIDTH$} |", truncate(&text, WIDTH))
    };

    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let mut lines = vec![
        rule.clone(),
        row("DESIGNMAP CRASH REPORT", ""),
        rule.clone(),
        row("Version: ", VERSION),
        row("Platform: ", std::env::consts::OS),
        row("Time: ", &timestamp),
        rule.clone(),
        row("PANIC: ", message),
    ];
    if let Some(location) = location {
        lines.push(row("Location: ", &location));
    }

    lines.push(rule.clone());
    match &context.phase {
        Some(phase) => lines.push(row("Phase: ", &phase.to_string())),
        None => lines.push(row("Phase: ", "(not set, crashed before synthesis started)")),
    }
    if let Some(metadata) = Span::current().metadata() {
        lines.push(row("Span: ", metadata.name()));
    }
    if let Some(file) = &context.current_file {
        lines.push(row("File: ", &file.display().to_string()));
    }
    if total > 0 {
        let pct = processed * 100 / total;
        lines.push(row("Progress: ", &format!("{processed} / {total} files ({pct}%)")));
    }
    lines.push(rule);
    lines
}

fn extract_panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::context::SynthesisPhase;
    use std::path::PathBuf;

    #[test]
    fn test_truncate_long_string() {
        let result = truncate("this is a long string that needs truncation", 20);
        assert_eq!(result.chars().count(), 20);
        assert!(result.ends_with("..."));
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_report_names_phase_file_and_progress() {
        let context = SynthesisContext {
            phase: Some(SynthesisPhase::Parsing),
            current_file: Some(PathBuf::from("src/app.py")),
        };
        let lines = report_lines("boom", Some("src/lib.rs:1:1".into()), &context, 3, 4);

        assert!(lines.iter().any(|l| l.contains("PANIC: boom")));
        assert!(lines.iter().any(|l| l.contains("Phase: parsing")));
        assert!(lines.iter().any(|l| l.contains("File: src/app.py")));
        assert!(lines.iter().any(|l| l.contains("3 / 4 files (75%)")));
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|l| l.chars().count() == width));
    }

    #[test]
    fn test_report_without_phase() {
        let lines = report_lines("boom", None, &SynthesisContext::new(), 0, 0);
        assert!(lines.iter().any(|l| l.contains("not set")));
        assert!(!lines.iter().any(|l| l.contains("Progress")));
    }
}

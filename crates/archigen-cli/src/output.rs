//! Output management and formatting.
//!
//! Human output goes through [`OutputManager`]; with `--output-format json`
//! commands emit one JSON document instead and the status lines are muted.

use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use archigen_core::prelude::{GenerationReport, ReportStatus};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;
use crate::error::CliResult;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Auto: Human on a terminal, Plain when piped.
        let resolved_format = match args.output_format {
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            other => other,
        };

        Self {
            resolved_format,
            quiet: args.quiet || resolved_format == OutputFormat::Json,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Status lines ──────────────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// `✓ <msg>`
    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.marked("\u{2713}", msg, |s| s.green().bold().to_string(), |s| s.green().to_string())
    }

    /// `✗ <msg>`, written even in quiet mode.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2717} {msg}")
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        Term::stderr().write_line(&line)
    }

    /// `⚠ <msg>`
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.marked("\u{26a0}", msg, |s| s.yellow().bold().to_string(), |s| s.yellow().to_string())
    }

    /// `ℹ <msg>`
    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.marked("\u{2139}", msg, |s| s.blue().bold().to_string(), |s| s.blue().to_string())
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    fn marked(
        &self,
        marker: &str,
        msg: &str,
        paint_marker: impl Fn(&str) -> String,
        paint_msg: impl Fn(&str) -> String,
    ) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("{marker} {msg}")
        } else {
            format!("{} {}", paint_marker(marker), paint_msg(msg))
        };
        self.term.write_line(&line)
    }

    // ── Structured output ─────────────────────────────────────────────────

    /// One line per artifact, paths relative to `base`.
    pub fn report(&self, report: &GenerationReport, base: &Path) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        for entry in report.entries() {
            let path = entry.path.strip_prefix(base).unwrap_or(&entry.path);
            self.term.write_line(&self.report_line(
                &entry.status,
                entry.artifact.as_str(),
                &path.display().to_string(),
            ))?;
        }
        Ok(())
    }

    fn report_line(&self, status: &ReportStatus, artifact: &str, path: &str) -> String {
        let marker = match status {
            ReportStatus::Created | ReportStatus::Updated => "\u{2713}",
            ReportStatus::Unchanged => "\u{00b7}",
            ReportStatus::Preserved | ReportStatus::Advisory(_) => "\u{2139}",
            ReportStatus::Skipped(_) => "\u{26a0}",
            ReportStatus::Failed(_) => "\u{2717}",
        };
        let mut line = format!("{marker} {:<10} {artifact:<24} {path}", status.label());
        if let Some(detail) = status.detail() {
            line.push_str(&format!("\n    {detail}"));
        }

        if self.no_color {
            return line;
        }
        match status {
            ReportStatus::Created | ReportStatus::Updated => line.green().to_string(),
            ReportStatus::Unchanged => line.dimmed().to_string(),
            ReportStatus::Preserved | ReportStatus::Advisory(_) => line.blue().to_string(),
            ReportStatus::Skipped(_) => line.yellow().to_string(),
            ReportStatus::Failed(_) => line.red().to_string(),
        }
    }

    /// Pretty JSON on stdout; never suppressed.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> CliResult<()> {
        let text = serde_json::to_string_pretty(value)?;
        self.term.write_line(&text)?;
        Ok(())
    }

    // ── Interaction ───────────────────────────────────────────────────────

    /// Spinner on stderr; hidden when quiet or not on a terminal.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.quiet || !io::stderr().is_terminal() {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(msg.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }

    /// `true` when prompts can be shown.
    pub fn can_prompt(&self) -> bool {
        cfg!(feature = "interactive")
            && self.resolved_format != OutputFormat::Json
            && io::stdin().is_terminal()
            && io::stderr().is_terminal()
    }

    /// Yes/no question. Returns `default` when prompting is impossible.
    pub fn confirm(&self, prompt: &str, default: bool) -> CliResult<bool> {
        if !self.can_prompt() {
            return Ok(default);
        }
        prompt_confirm(prompt, default)
    }

    /// Pick one of `items`. `None` when prompting is impossible.
    pub fn select(&self, prompt: &str, items: &[String]) -> CliResult<Option<usize>> {
        if !self.can_prompt() || items.is_empty() {
            return Ok(None);
        }
        prompt_select(prompt, items).map(Some)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }
}

#[cfg(feature = "interactive")]
fn prompt_confirm(prompt: &str, default: bool) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(prompt_error)
}

#[cfg(feature = "interactive")]
fn prompt_select(prompt: &str, items: &[String]) -> CliResult<usize> {
    dialoguer::Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()
        .map_err(prompt_error)
}

#[cfg(feature = "interactive")]
fn prompt_error(e: dialoguer::Error) -> crate::error::CliError {
    crate::error::CliError::IoError {
        message: "prompt failed".into(),
        source: io::Error::other(e.to_string()),
    }
}

#[cfg(not(feature = "interactive"))]
fn prompt_confirm(_prompt: &str, default: bool) -> CliResult<bool> {
    Ok(default)
}

#[cfg(not(feature = "interactive"))]
fn prompt_select(_prompt: &str, _items: &[String]) -> CliResult<usize> {
    Ok(0)
}

//! Output formatting.

use crate::cli::OutputFormat;
use serde::Serialize;

/// What happened to one stylesheet during a pass.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// The stylesheet path.
    pub file: String,
    /// The declaration file path, when one was derived.
    pub output: Option<String>,
    /// `written`, `unchanged`, or `error`.
    pub status: String,
    /// The error text for `error` status.
    pub message: Option<String>,
    /// Warnings from declaration assembly (e.g. skipped named exports).
    pub warnings: Vec<String>,
    /// Number of exported tokens.
    pub tokens: usize,
}

/// Totals for one pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    /// Stylesheets processed.
    pub file_count: usize,
    /// Declaration files written (excludes unchanged ones).
    pub written_count: usize,
    /// Stylesheets that failed.
    pub error_count: usize,
}

impl RunSummary {
    /// Formats the closing summary line.
    pub fn format(&self) -> String {
        format!(
            "{} file{} checked, {} written, {} error{}",
            self.file_count,
            if self.file_count == 1 { "" } else { "s" },
            self.written_count,
            self.error_count,
            if self.error_count == 1 { "" } else { "s" },
        )
    }
}

/// Prints per-file reports in the selected format.
pub struct Formatter {
    format: OutputFormat,
    silent: bool,
    json_reports: Vec<FileReport>,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat, silent: bool) -> Self {
        Self {
            format,
            silent,
            json_reports: Vec::new(),
        }
    }

    /// Records one file's outcome, printing immediately in human mode.
    pub fn report(&mut self, report: FileReport) {
        match self.format {
            OutputFormat::Human => {
                match report.status.as_str() {
                    "error" => {
                        eprintln!(
                            "{}: {}",
                            report.file,
                            report.message.as_deref().unwrap_or("unknown error")
                        );
                    }
                    "written" if !self.silent => {
                        if let Some(output) = &report.output {
                            println!(
                                "Wrote {} ({} token{})",
                                output,
                                report.tokens,
                                if report.tokens == 1 { "" } else { "s" }
                            );
                        }
                    }
                    _ => {}
                }
                for warning in &report.warnings {
                    eprintln!("Warning: {}: {warning}", report.file);
                }
            }
            OutputFormat::Json => self.json_reports.push(report),
        }
    }

    /// Flushes the pass: prints the JSON array or the human summary line.
    pub fn finish(&mut self, summary: &RunSummary) {
        match self.format {
            OutputFormat::Human => {
                if !self.silent || summary.error_count > 0 {
                    println!("{}", summary.format());
                }
            }
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&self.json_reports)
                    .unwrap_or_else(|_| "[]".to_string());
                println!("{json}");
                self.json_reports.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_format() {
        let summary = RunSummary {
            file_count: 3,
            written_count: 2,
            error_count: 1,
        };
        assert_eq!(summary.format(), "3 files checked, 2 written, 1 error");
    }

    #[test]
    fn test_summary_singular() {
        let summary = RunSummary {
            file_count: 1,
            written_count: 0,
            error_count: 0,
        };
        assert_eq!(summary.format(), "1 file checked, 0 written, 0 errors");
    }
}

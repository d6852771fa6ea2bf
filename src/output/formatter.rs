//! Output formatters for run reports
//!
//! Provides table, JSON, CSV and one-line summary formats.

use std::str::FromStr;

use crate::models::RunReport;

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    JsonPretty,
    Csv,
    Summary,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Ok(OutputFormat::JsonPretty),
            "csv" => Ok(OutputFormat::Csv),
            "summary" => Ok(OutputFormat::Summary),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

/// Report formatter
pub struct ReportFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ReportFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Format a run report
    pub fn format_report(&self, report: &RunReport) -> String {
        match self.format {
            OutputFormat::Table => self.format_table(report),
            OutputFormat::Json => serde_json::to_string(report).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Csv => self.format_csv(report),
            OutputFormat::Summary => self.format_summary(report),
        }
    }

    fn paint(&self, text: String, code: &str) -> String {
        if self.colorize {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text
        }
    }

    fn format_table(&self, report: &RunReport) -> String {
        let mut output = String::new();

        output.push_str("\n╔══════════════════════════════════════════════════════════════╗\n");
        output.push_str(&format!("║  Run {:56} ║\n", report.id));
        output.push_str(&format!(
            "║  Workers: {:3} | Policy: {:34} ║\n",
            report.concurrency, report.policy
        ));
        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        for failure in &report.failures {
            let line = format!("{:12} {}", failure.item, failure.error);
            output.push_str(&format!(
                "║  {} {:57} ║\n",
                self.paint("✗".to_string(), "31"),
                truncate(&line, 57)
            ));
        }
        if !report.failures.is_empty() {
            output.push_str("╠══════════════════════════════════════════════════════════════╣\n");
        }

        let ok_str = self.paint(format!("{:4}", report.succeeded()), "32");
        let fail_str = if report.failed() > 0 {
            self.paint(format!("{:4}", report.failed()), "31")
        } else {
            format!("{:4}", report.failed())
        };

        output.push_str(&format!(
            "║  Consumed: {:4} | Succeeded: {} | Failed: {}               ║\n",
            report.consumed, ok_str, fail_str
        ));
        output.push_str(&format!(
            "║  Success Rate: {:5.1}% | Duration: {:6}ms                  ║\n",
            report.success_rate(),
            report.duration_ms
        ));
        if report.stopped_prematurely {
            output.push_str(&format!(
                "║  {:60}║\n",
                self.paint("Stopped early by failure handler".to_string(), "33")
            ));
        }
        output.push_str("╚══════════════════════════════════════════════════════════════╝\n");

        output
    }

    fn format_csv(&self, report: &RunReport) -> String {
        let mut output = String::new();
        output.push_str("status,item,detail\n");
        for result in &report.results {
            output.push_str(&format!("succeeded,,\"{}\"\n", escape_csv(result)));
        }
        for failure in &report.failures {
            output.push_str(&format!(
                "failed,\"{}\",\"{}\"\n",
                escape_csv(&failure.item),
                escape_csv(&failure.error)
            ));
        }
        output
    }

    fn format_summary(&self, report: &RunReport) -> String {
        format!(
            "Run {}: {}/{} succeeded ({:.1}%) with {} workers in {}ms{}",
            report.id,
            report.succeeded(),
            report.succeeded() + report.failed(),
            report.success_rate(),
            report.concurrency,
            report.duration_ms,
            if report.stopped_prematurely {
                " [stopped early]"
            } else {
                ""
            }
        )
    }
}

fn escape_csv(s: &str) -> String {
    s.replace('"', "\"\"")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

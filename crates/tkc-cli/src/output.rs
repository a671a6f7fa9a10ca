/// Rendering of batch results for `tkc`.
///
/// ```text
/// ┌────────┬──────────────────────────────┬──────────────────────────────┐
/// │ Format │ Counted file (stdout)        │ Total (stdout, --total)      │
/// ├────────┼──────────────────────────────┼──────────────────────────────┤
/// │ plain  │ notes.md 1423                │ total 1423                   │
/// │ json   │ {"path":"notes.md",          │ {"total":1423}               │
/// │        │  "tokens":1423}              │                              │
/// └────────┴──────────────────────────────┴──────────────────────────────┘
/// ```
///
/// Failures are written to stderr as `error: <path>: <cause>` in both
/// formats, so stdout stays parseable.
use std::io::{self, Write};

use anyhow::{Result, anyhow};
use tkc_core::{CountError, FileReport, ReportSink};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// Parses the `--format` string to an [`OutputFormat`].
pub fn parse_output_format(s: &str) -> Result<OutputFormat> {
    match s.to_lowercase().as_str() {
        "plain" | "text" => Ok(OutputFormat::Plain),
        "json" | "jsonl" => Ok(OutputFormat::Json),
        _ => Err(anyhow!("unknown format {s:?} — expected plain|json")),
    }
}

/// A [`ReportSink`] writing count lines to `out` and diagnostics to `err`.
pub struct ReportWriter<O, E> {
    format: OutputFormat,
    out: O,
    err: E,
}

impl<O: Write, E: Write> ReportWriter<O, E> {
    pub fn new(format: OutputFormat, out: O, err: E) -> Self {
        Self { format, out, err }
    }

    /// Write the closing total line.
    pub fn total(&mut self, total_tokens: usize) -> io::Result<()> {
        match self.format {
            OutputFormat::Plain => writeln!(self.out, "total {total_tokens}"),
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, &serde_json::json!({ "total": total_tokens }))?;
                writeln!(self.out)
            }
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()?;
        self.err.flush()
    }

    #[cfg(test)]
    fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> ReportSink for ReportWriter<O, E> {
    type Error = io::Error;

    fn counted(&mut self, report: &FileReport) -> io::Result<()> {
        match self.format {
            OutputFormat::Plain => writeln!(self.out, "{} {}", report.path, report.tokens),
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, report)?;
                writeln!(self.out)
            }
        }
    }

    fn failed(&mut self, label: &str, error: &CountError) -> io::Result<()> {
        tracing::warn!(path = label, %error, "file not counted");
        writeln!(self.err, "error: {label}: {error}")
    }
}

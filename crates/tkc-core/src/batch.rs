use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::counter::TokenCounter;
use crate::error::CountError;

/// Something to count: a file on disk, or standard input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    /// Interpret a command-line argument; `-` means standard input.
    pub fn from_arg(arg: impl Into<PathBuf>) -> Self {
        let path = arg.into();
        if path.as_os_str() == "-" {
            Self::Stdin
        } else {
            Self::File(path)
        }
    }

    /// The label printed next to the count: the path as given, or `-`.
    pub fn label(&self) -> String {
        match self {
            Self::Stdin => "-".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    fn count(&self, counter: &TokenCounter) -> Result<usize, CountError> {
        match self {
            Self::Stdin => counter.count_reader(Path::new("-"), io::stdin().lock()),
            Self::File(path) => counter.count_file(path),
        }
    }
}

/// A successful count for one input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: String,
    pub tokens: usize,
}

/// What happens to the rest of a batch after one input fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Report the failure and carry on with the next input.
    #[default]
    Continue,
    /// Stop at the first failure; later inputs are never read.
    Abort,
}

/// Receives batch results in input order.
///
/// The sink does the printing. Its own errors (e.g. a closed stdout) stop
/// the batch regardless of [`FailurePolicy`].
pub trait ReportSink {
    type Error;

    fn counted(&mut self, report: &FileReport) -> Result<(), Self::Error>;

    fn failed(&mut self, label: &str, error: &CountError) -> Result<(), Self::Error>;
}

/// Totals for a finished (or aborted) batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub counted: usize,
    pub failed: usize,
    pub total_tokens: usize,
    /// True when [`FailurePolicy::Abort`] stopped the batch early.
    pub aborted: bool,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Counts a sequence of inputs with one [`TokenCounter`].
///
/// Inputs are processed strictly in order, one at a time. A failed input
/// never produces a report, only a [`ReportSink::failed`] call.
pub struct Batch<'a> {
    counter: &'a TokenCounter,
    policy: FailurePolicy,
}

impl<'a> Batch<'a> {
    pub fn new(counter: &'a TokenCounter, policy: FailurePolicy) -> Self {
        Self { counter, policy }
    }

    /// Count every input, forwarding each result to `sink`.
    ///
    /// # Errors
    ///
    /// Only sink errors are returned; counting failures are reported
    /// through the sink and tallied in the summary.
    pub fn run<S: ReportSink>(
        &self,
        inputs: &[Input],
        sink: &mut S,
    ) -> Result<BatchSummary, S::Error> {
        let mut summary = BatchSummary::default();

        for input in inputs {
            let label = input.label();
            match input.count(self.counter) {
                Ok(tokens) => {
                    summary.counted += 1;
                    summary.total_tokens += tokens;
                    sink.counted(&FileReport {
                        path: label,
                        tokens,
                    })?;
                }
                Err(error) => {
                    summary.failed += 1;
                    sink.failed(&label, &error)?;
                    if self.policy == FailurePolicy::Abort {
                        tracing::debug!(path = %label, "aborting batch after failure");
                        summary.aborted = true;
                        break;
                    }
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::fs;

    use super::*;
    use crate::config::CounterConfig;

    #[derive(Default)]
    struct Recorder {
        lines: Vec<String>,
    }

    impl ReportSink for Recorder {
        type Error = Infallible;

        fn counted(&mut self, report: &FileReport) -> Result<(), Infallible> {
            self.lines.push(format!("ok {} {}", report.path, report.tokens));
            Ok(())
        }

        fn failed(&mut self, label: &str, _error: &CountError) -> Result<(), Infallible> {
            self.lines.push(format!("err {label}"));
            Ok(())
        }
    }

    #[test]
    fn dash_is_stdin() {
        assert_eq!(Input::from_arg("-"), Input::Stdin);
        assert_eq!(Input::Stdin.label(), "-");
        assert_eq!(
            Input::from_arg("notes.md"),
            Input::File(PathBuf::from("notes.md"))
        );
    }

    fn fixture(dir: &Path, name: &str, text: &str) -> Input {
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        Input::File(path)
    }

    #[test]
    fn continue_policy_reports_every_input() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = vec![
            fixture(dir.path(), "a.txt", "hello world"),
            Input::File(dir.path().join("missing.txt")),
            fixture(dir.path(), "b.txt", ""),
        ];
        let counter = TokenCounter::new(&CounterConfig::default()).unwrap();
        let mut sink = Recorder::default();

        let summary = Batch::new(&counter, FailurePolicy::Continue)
            .run(&inputs, &mut sink)
            .unwrap();

        assert_eq!(sink.lines.len(), 3);
        assert!(sink.lines[0].starts_with("ok ") && sink.lines[0].ends_with("a.txt 2"));
        assert!(sink.lines[1].starts_with("err "));
        assert!(sink.lines[2].ends_with("b.txt 0"));
        assert_eq!(
            summary,
            BatchSummary {
                counted: 2,
                failed: 1,
                total_tokens: 2,
                aborted: false,
            }
        );
        assert!(!summary.is_success());
    }

    #[test]
    fn abort_policy_stops_at_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = vec![
            Input::File(dir.path().join("missing.txt")),
            fixture(dir.path(), "a.txt", "hello world"),
        ];
        let counter = TokenCounter::new(&CounterConfig::default()).unwrap();
        let mut sink = Recorder::default();

        let summary = Batch::new(&counter, FailurePolicy::Abort)
            .run(&inputs, &mut sink)
            .unwrap();

        assert_eq!(sink.lines.len(), 1);
        assert!(summary.aborted);
        assert_eq!(summary.counted, 0);
    }
}

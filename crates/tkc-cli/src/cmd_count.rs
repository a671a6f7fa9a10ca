/// Implementation of the `tkc` count run.
///
/// Builds a [`CounterConfig`] from the flags, resolves the encoding once,
/// then counts every file in argument order through a [`Batch`].
///
/// # Example output
///
/// ```text
/// $ tkc --total README.md docs/guide.md nope.md
/// README.md 812
/// docs/guide.md 2304
/// error: nope.md: cannot read file: No such file or directory (os error 2)
/// total 3116
/// ```
///
/// An unknown `--model` or `--encoding` fails before any file is read,
/// since it would fail every file identically. Standard input (`-`) can be
/// named once; a second `-` would only ever see a drained stream.
use std::io;

use anyhow::{Context, Result, anyhow, bail};
use tkc_core::{
    Batch, CounterConfig, EncodingSelector, FailurePolicy, Input, KNOWN_ENCODINGS, NewlineMode,
    SpecialTokens, TokenCounter,
};

use crate::Cli;
use crate::output::{ReportWriter, parse_output_format};

/// Run the count command.
///
/// Returns `Ok(true)` when every file was counted and `Ok(false)` when at
/// least one failed (each failure has already been reported on stderr).
///
/// # Errors
///
/// Returns an error for invalid flag values, an unresolvable encoding, or
/// a failure writing to stdout/stderr.
pub fn run(cli: &Cli) -> Result<bool> {
    if cli.list_encodings {
        for name in KNOWN_ENCODINGS {
            println!("{name}");
        }
        return Ok(true);
    }

    let config = counter_config(cli)?;
    let format = parse_output_format(&cli.format)?;
    let policy = if cli.fail_fast {
        FailurePolicy::Abort
    } else {
        FailurePolicy::Continue
    };

    let inputs: Vec<Input> = cli.files.iter().cloned().map(Input::from_arg).collect();
    if inputs.iter().filter(|input| **input == Input::Stdin).count() > 1 {
        bail!("standard input (`-`) can only be counted once per run");
    }

    let counter = TokenCounter::new(&config)
        .with_context(|| format!("cannot resolve {}", config.selector))?;
    tracing::info!(
        encoding = counter.encoding_name(),
        files = cli.files.len(),
        "counting"
    );

    let mut writer = ReportWriter::new(format, io::stdout().lock(), io::stderr().lock());

    let summary = Batch::new(&counter, policy)
        .run(&inputs, &mut writer)
        .context("failed to write report")?;

    if cli.total && !summary.aborted {
        writer
            .total(summary.total_tokens)
            .context("failed to write report")?;
    }
    writer.flush().context("failed to write report")?;

    tracing::info!(
        counted = summary.counted,
        failed = summary.failed,
        total_tokens = summary.total_tokens,
        "done"
    );
    Ok(summary.is_success())
}

/// Maps the encoding and policy flags to a [`CounterConfig`].
fn counter_config(cli: &Cli) -> Result<CounterConfig> {
    let selector = match &cli.encoding {
        Some(name) => EncodingSelector::Encoding(name.clone()),
        None => EncodingSelector::Model(cli.model.clone()),
    };

    Ok(CounterConfig {
        selector,
        special_tokens: parse_special_tokens(&cli.special)?,
        newlines: if cli.preserve_newlines {
            NewlineMode::Preserve
        } else {
            NewlineMode::Universal
        },
    })
}

/// Parses the `--special` string to a [`SpecialTokens`] policy.
fn parse_special_tokens(s: &str) -> Result<SpecialTokens> {
    match s.to_lowercase().as_str() {
        "ordinary" => Ok(SpecialTokens::Ordinary),
        "allow" | "all" => Ok(SpecialTokens::Allow),
        "reject" | "disallow" => Ok(SpecialTokens::Reject),
        _ => Err(anyhow!(
            "unknown special-token policy {s:?} — expected ordinary|allow|reject"
        )),
    }
}

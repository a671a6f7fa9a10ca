/// `tkc` — count the tokens a text file would consume under a tokenizer
/// encoding.
///
/// # Usage
///
/// ```text
/// tkc [OPTIONS] <FILES>...
///
/// Arguments:
///   <FILES>...  Files to count; `-` reads standard input
///
/// Options:
///   -m, --model <MODEL>        Model id selecting the encoding [default: gpt-4o-mini]
///   -e, --encoding <NAME>      Encoding table name, instead of a model id
///       --special <POLICY>     ordinary | allow | reject [default: ordinary]
///       --preserve-newlines    Count \r\n and \r as stored (default translates to \n)
///       --format <FORMAT>      plain | json [default: plain]
///       --total                Print a total after the per-file lines
///       --fail-fast            Stop at the first file that fails
///       --list-encodings       Print known encoding names and exit
///   -v, --verbose...           Raise log verbosity (repeatable)
/// ```
///
/// Each file produces one `<path> <tokens>` line on stdout, in argument
/// order. Failures go to stderr as `error: <path>: <cause>` and never
/// produce a count line.
///
/// # Exit codes
///
/// | Code | Meaning                                         |
/// |------|-------------------------------------------------|
/// | 0    | Every file was counted                          |
/// | 1    | At least one file failed, or setup failed       |
use std::path::PathBuf;
use std::process;

use clap::Parser;

mod cmd_count;
mod logging;
mod output;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Count tokens in text files under a tokenizer encoding.
#[derive(Parser)]
#[command(name = "tkc", version, about = "Token counter for text files")]
pub struct Cli {
    /// Files to count. `-` reads standard input.
    #[arg(required_unless_present = "list_encodings")]
    pub files: Vec<PathBuf>,

    /// Model id used to select the encoding (e.g. `gpt-4o-mini`, `gpt-4`).
    #[arg(short, long, default_value = tkc_core::DEFAULT_MODEL)]
    pub model: String,

    /// Encoding table name (e.g. `cl100k_base`). Overrides `--model`.
    #[arg(short, long, conflicts_with = "model")]
    pub encoding: Option<String>,

    /// Special-token policy: `ordinary`, `allow`, or `reject`.
    ///
    /// `ordinary` counts markup such as `<|endoftext|>` as plain text,
    /// `allow` counts it as one special token, and `reject` fails the file.
    #[arg(long, default_value = "ordinary")]
    pub special: String,

    /// Count carriage returns as stored instead of translating `\r\n` and
    /// lone `\r` to `\n` (the default, matching a text-mode read).
    #[arg(long)]
    pub preserve_newlines: bool,

    /// Output format: `plain` (`<path> <tokens>`) or `json` (JSON lines).
    #[arg(long, default_value = "plain")]
    pub format: String,

    /// Print a `total <n>` line summing every counted file.
    #[arg(long)]
    pub total: bool,

    /// Abort the run at the first file that fails.
    ///
    /// By default failures are reported and the remaining files are still
    /// counted; the exit code is 1 either way.
    #[arg(long)]
    pub fail_fast: bool,

    /// Print the encoding names accepted by `--encoding` and exit.
    #[arg(long)]
    pub list_encodings: bool,

    /// Raise log verbosity: `-v` warn, `-vv` info, `-vvv` debug, `-vvvv` trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cmd_count::run(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}

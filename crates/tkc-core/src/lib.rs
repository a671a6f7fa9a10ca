#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

//! Token counting for text files.
//!
//! A [`TokenCounter`] resolves a tokenizer encoding once (by model id or
//! table name) and then counts the tokens in files, readers, or strings.
//! [`Batch`] drives a counter over several inputs in order and hands each
//! result to a [`ReportSink`].
//!
//! ```no_run
//! use tkc_core::{CounterConfig, TokenCounter};
//!
//! let counter = TokenCounter::new(&CounterConfig::default())?;
//! let tokens = counter.count_file("README.md".as_ref())?;
//! println!("README.md {tokens}");
//! # Ok::<(), tkc_core::CountError>(())
//! ```

pub mod batch;
pub mod config;
pub mod counter;
pub mod encoding;
pub mod error;
pub mod tiktoken;

pub use batch::{Batch, BatchSummary, FailurePolicy, FileReport, Input, ReportSink};
pub use config::{CounterConfig, DEFAULT_MODEL, EncodingSelector, NewlineMode, SpecialTokens};
pub use counter::{TokenCounter, count};
pub use encoding::{Encoding, EncodingResolver};
pub use error::CountError;
pub use tiktoken::{KNOWN_ENCODINGS, TiktokenEncoding, TiktokenResolver};

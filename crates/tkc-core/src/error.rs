use std::path::PathBuf;

/// Errors that can occur while resolving an encoding or counting tokens.
///
/// Every variant is fatal for the input being counted. Nothing is retried;
/// the caller decides whether the rest of a batch continues.
///
/// ```text
/// ┌───────────────────┬──────────────────────────────────────────────────┐
/// │ Variant           │ Cause                                            │
/// ├───────────────────┼──────────────────────────────────────────────────┤
/// │ FileAccess        │ Path missing, unreadable, or a directory         │
/// │ Decoding          │ File bytes are not valid UTF-8                   │
/// │ UnknownModel      │ Model id has no registered encoding              │
/// │ UnknownEncoding   │ Encoding name is not a known BPE table           │
/// │ EncodingLoad      │ The BPE table failed to build                    │
/// │ DisallowedSpecial │ Special-token text under the `reject` policy     │
/// └───────────────────┴──────────────────────────────────────────────────┘
/// ```
///
/// Display strings never repeat the path: callers that report per-file
/// failures prefix the label themselves (`error: notes.md: ...`).
#[derive(Debug, thiserror::Error)]
pub enum CountError {
    #[error("cannot read file: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not valid UTF-8 text: {source}")]
    Decoding {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("unknown model {model:?}: no tokenizer encoding is registered for it")]
    UnknownModel { model: String },

    #[error("unknown encoding {name:?}, expected one of: {}", crate::KNOWN_ENCODINGS.join(", "))]
    UnknownEncoding { name: String },

    #[error("failed to load encoding {name}: {message}")]
    EncodingLoad { name: String, message: String },

    #[error("text contains special-token markup, rejected by the `reject` policy")]
    DisallowedSpecial,
}

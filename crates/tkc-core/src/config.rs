use std::fmt;

/// Model id used when the caller does not name one.
///
/// `gpt-4o-mini` resolves to the `o200k_base` encoding.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for a [`TokenCounter`](crate::TokenCounter).
///
/// Fixed at construction: the encoding is resolved once from `selector`,
/// and every subsequent count applies the same policies.
///
/// ```text
/// ┌────────────────┬────────────────────────────────────────────────────┐
/// │ Field          │ Purpose                                            │
/// ├────────────────┼────────────────────────────────────────────────────┤
/// │ selector       │ Which encoding table to apply (by model or name)   │
/// │ special_tokens │ How special-token markup in the text is treated    │
/// │ newlines       │ Whether line endings are normalised before encoding│
/// └────────────────┴────────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CounterConfig {
    pub selector: EncodingSelector,
    pub special_tokens: SpecialTokens,
    pub newlines: NewlineMode,
}

impl CounterConfig {
    /// Default policies with the encoding chosen by model id.
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            selector: EncodingSelector::Model(model.into()),
            ..Self::default()
        }
    }

    /// Default policies with the encoding chosen by table name.
    pub fn for_encoding(name: impl Into<String>) -> Self {
        Self {
            selector: EncodingSelector::Encoding(name.into()),
            ..Self::default()
        }
    }
}

/// How the encoding table is chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodingSelector {
    /// A model id such as `gpt-4o-mini` or `gpt-3.5-turbo`.
    Model(String),
    /// An encoding table name such as `cl100k_base`.
    Encoding(String),
}

impl Default for EncodingSelector {
    fn default() -> Self {
        Self::Model(DEFAULT_MODEL.to_string())
    }
}

impl fmt::Display for EncodingSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model(model) => write!(f, "model {model}"),
            Self::Encoding(name) => write!(f, "encoding {name}"),
        }
    }
}

/// Treatment of special-token markup (e.g. `<|endoftext|>`) found in text.
///
/// ```text
/// ┌──────────┬────────────────────────────────────────────────────────┐
/// │ Policy   │ Behavior                                               │
/// ├──────────┼────────────────────────────────────────────────────────┤
/// │ Ordinary │ Encode the markup as plain text (default)              │
/// │ Allow    │ Encode each occurrence as its single special token     │
/// │ Reject   │ Fail the input with `DisallowedSpecial`                │
/// └──────────┴────────────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpecialTokens {
    #[default]
    Ordinary,
    Allow,
    Reject,
}

/// Line-ending handling applied to decoded text before encoding.
///
/// The default matches a text-mode read: a CRLF file counts the same as
/// its LF twin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NewlineMode {
    /// Count the text exactly as stored, carriage returns included.
    Preserve,
    /// Translate `\r\n` and lone `\r` to `\n` first, as a text-mode read does.
    #[default]
    Universal,
}

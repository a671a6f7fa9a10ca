use tiktoken_rs::CoreBPE;
use tiktoken_rs::get_bpe_from_tokenizer;
use tiktoken_rs::tokenizer::{Tokenizer, get_tokenizer};

use crate::config::EncodingSelector;
use crate::encoding::{Encoding, EncodingResolver};
use crate::error::CountError;

/// Encoding table names accepted by [`EncodingSelector::Encoding`].
pub const KNOWN_ENCODINGS: &[&str] = &[
    "o200k_base",
    "cl100k_base",
    "p50k_base",
    "p50k_edit",
    "r50k_base",
];

/// A BPE table from `tiktoken-rs`.
pub struct TiktokenEncoding {
    name: String,
    bpe: CoreBPE,
}

impl TiktokenEncoding {
    /// Build the table for a `tiktoken-rs` tokenizer.
    ///
    /// # Errors
    ///
    /// Returns [`CountError::EncodingLoad`] if the embedded table fails to
    /// parse.
    pub fn from_tokenizer(tokenizer: Tokenizer) -> Result<Self, CountError> {
        let name = tokenizer_name(&tokenizer);
        let bpe = get_bpe_from_tokenizer(tokenizer).map_err(|e| CountError::EncodingLoad {
            name: name.clone(),
            message: e.to_string(),
        })?;
        Ok(Self { name, bpe })
    }
}

impl Encoding for TiktokenEncoding {
    fn name(&self) -> &str {
        &self.name
    }

    fn encode_ordinary(&self, text: &str) -> Vec<u32> {
        self.bpe.encode_ordinary(text)
    }

    fn encode_with_special_tokens(&self, text: &str) -> Vec<u32> {
        self.bpe.encode_with_special_tokens(text)
    }
}

/// Resolves selectors against the tables embedded in `tiktoken-rs`.
///
/// Model ids go through `tiktoken-rs`'s own model registry (exact names and
/// dated prefixes such as `gpt-4o-2024-08-06`). Encoding names are matched
/// against [`KNOWN_ENCODINGS`], plus `gpt2` as an alias of `r50k_base`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TiktokenResolver;

impl EncodingResolver for TiktokenResolver {
    fn resolve(&self, selector: &EncodingSelector) -> Result<Box<dyn Encoding>, CountError> {
        let tokenizer = match selector {
            EncodingSelector::Model(model) => {
                get_tokenizer(model).ok_or_else(|| CountError::UnknownModel {
                    model: model.clone(),
                })?
            }
            EncodingSelector::Encoding(name) => {
                tokenizer_for_encoding(name).ok_or_else(|| CountError::UnknownEncoding {
                    name: name.clone(),
                })?
            }
        };

        let encoding = TiktokenEncoding::from_tokenizer(tokenizer)?;
        tracing::debug!(%selector, encoding = encoding.name(), "resolved encoding");
        Ok(Box::new(encoding))
    }
}

fn tokenizer_for_encoding(name: &str) -> Option<Tokenizer> {
    match name.to_ascii_lowercase().as_str() {
        "o200k_base" => Some(Tokenizer::O200kBase),
        "cl100k_base" => Some(Tokenizer::Cl100kBase),
        "p50k_base" => Some(Tokenizer::P50kBase),
        "p50k_edit" => Some(Tokenizer::P50kEdit),
        "r50k_base" | "gpt2" => Some(Tokenizer::R50kBase),
        _ => None,
    }
}

fn tokenizer_name(tokenizer: &Tokenizer) -> String {
    match tokenizer {
        Tokenizer::O200kBase => "o200k_base".to_string(),
        Tokenizer::Cl100kBase => "cl100k_base".to_string(),
        Tokenizer::P50kBase => "p50k_base".to_string(),
        Tokenizer::P50kEdit => "p50k_edit".to_string(),
        Tokenizer::R50kBase => "r50k_base".to_string(),
        other => format!("{other:?}").to_ascii_lowercase(),
    }
}

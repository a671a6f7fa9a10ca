use crate::config::EncodingSelector;
use crate::error::CountError;

/// A resolved tokenizer encoding.
///
/// The counter only depends on this input/output contract; the merge
/// algorithm behind it is opaque. [`TiktokenEncoding`](crate::TiktokenEncoding)
/// is the production implementation, and tests substitute simpler ones.
///
/// Implementations must be `Send + Sync` so a counter can be shared across
/// threads.
pub trait Encoding: Send + Sync {
    /// Canonical table name, e.g. `o200k_base`.
    fn name(&self) -> &str;

    /// Encode `text`, treating special-token markup as plain text.
    fn encode_ordinary(&self, text: &str) -> Vec<u32>;

    /// Encode `text`, mapping special-token markup to special tokens.
    fn encode_with_special_tokens(&self, text: &str) -> Vec<u32>;
}

/// Maps an [`EncodingSelector`] to a loaded [`Encoding`].
///
/// Resolution is a one-time step per counter; loading a BPE table is far
/// more expensive than encoding a typical file.
pub trait EncodingResolver {
    /// Resolve the selector.
    ///
    /// # Errors
    ///
    /// Returns [`CountError::UnknownModel`] or [`CountError::UnknownEncoding`]
    /// when the selector names nothing known, and
    /// [`CountError::EncodingLoad`] when the table cannot be built.
    fn resolve(&self, selector: &EncodingSelector) -> Result<Box<dyn Encoding>, CountError>;
}

use std::borrow::Cow;
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::config::{CounterConfig, NewlineMode, SpecialTokens};
use crate::encoding::{Encoding, EncodingResolver};
use crate::error::CountError;
use crate::tiktoken::TiktokenResolver;

/// Counts tokens under one resolved encoding.
///
/// The encoding is resolved once in the constructor. Each count call is a
/// pure function of the input text and the counter's configuration:
///
/// ```text
/// read bytes ──▶ UTF-8 decode ──▶ newline mode ──▶ encode ──▶ len()
///     │               │                               │
///  FileAccess      Decoding                   DisallowedSpecial
///                                             (reject policy only)
/// ```
///
/// Decoding is strict: invalid UTF-8 fails the input rather than being
/// replaced lossily, so a count always describes the file's actual text.
pub struct TokenCounter {
    encoding: Box<dyn Encoding>,
    special_tokens: SpecialTokens,
    newlines: NewlineMode,
}

impl TokenCounter {
    /// Resolve the configured encoding through `tiktoken-rs`.
    ///
    /// # Errors
    ///
    /// Returns [`CountError::UnknownModel`], [`CountError::UnknownEncoding`]
    /// or [`CountError::EncodingLoad`] if the selector cannot be resolved.
    pub fn new(config: &CounterConfig) -> Result<Self, CountError> {
        Self::with_resolver(&TiktokenResolver, config)
    }

    /// Resolve the configured encoding through an arbitrary resolver.
    ///
    /// # Errors
    ///
    /// Propagates whatever the resolver returns.
    pub fn with_resolver(
        resolver: &dyn EncodingResolver,
        config: &CounterConfig,
    ) -> Result<Self, CountError> {
        let encoding = resolver.resolve(&config.selector)?;
        Ok(Self::from_encoding(encoding, config))
    }

    /// Wrap an already-resolved encoding. The config's selector is ignored.
    pub fn from_encoding(encoding: Box<dyn Encoding>, config: &CounterConfig) -> Self {
        Self {
            encoding,
            special_tokens: config.special_tokens,
            newlines: config.newlines,
        }
    }

    /// Name of the encoding table this counter applies.
    pub fn encoding_name(&self) -> &str {
        self.encoding.name()
    }

    /// Count the tokens in `text`.
    ///
    /// Returns 0 for empty text and at least 1 for non-empty text.
    ///
    /// # Errors
    ///
    /// Returns [`CountError::DisallowedSpecial`] under
    /// [`SpecialTokens::Reject`] when the text contains special-token markup.
    pub fn count_text(&self, text: &str) -> Result<usize, CountError> {
        let text = normalize_newlines(text, self.newlines);

        let tokens = match self.special_tokens {
            SpecialTokens::Ordinary => self.encoding.encode_ordinary(&text),
            SpecialTokens::Allow => self.encoding.encode_with_special_tokens(&text),
            SpecialTokens::Reject => {
                let ordinary = self.encoding.encode_ordinary(&text);
                // Identical unless some markup matched a special token.
                if self.encoding.encode_with_special_tokens(&text) != ordinary {
                    return Err(CountError::DisallowedSpecial);
                }
                ordinary
            }
        };

        Ok(tokens.len())
    }

    /// Read a whole file and count its tokens.
    ///
    /// # Errors
    ///
    /// Returns [`CountError::FileAccess`] if the file cannot be read (this
    /// includes directories), [`CountError::Decoding`] if it is not UTF-8,
    /// plus anything [`count_text`](Self::count_text) returns.
    pub fn count_file(&self, path: &Path) -> Result<usize, CountError> {
        let bytes = fs::read(path).map_err(|source| CountError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        let count = self.count_bytes(path, &bytes)?;
        tracing::trace!(path = %path.display(), tokens = count, "counted file");
        Ok(count)
    }

    /// Drain a reader and count its tokens. `label` stands in for the path
    /// in errors (e.g. `-` for standard input).
    ///
    /// # Errors
    ///
    /// Same as [`count_file`](Self::count_file).
    pub fn count_reader(&self, label: &Path, mut reader: impl Read) -> Result<usize, CountError> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|source| CountError::FileAccess {
                path: label.to_path_buf(),
                source,
            })?;
        self.count_bytes(label, &bytes)
    }

    fn count_bytes(&self, path: &Path, bytes: &[u8]) -> Result<usize, CountError> {
        let text = std::str::from_utf8(bytes).map_err(|source| CountError::Decoding {
            path: path.to_path_buf(),
            source,
        })?;
        self.count_text(text)
    }
}

/// Count the tokens in the file at `path` under `model`.
///
/// One-shot form of [`TokenCounter`]: resolves the encoding on every call.
/// Build a counter instead when counting more than one file.
///
/// # Errors
///
/// Any [`CountError`]; see [`TokenCounter::new`] and
/// [`TokenCounter::count_file`].
pub fn count(path: impl AsRef<Path>, model: &str) -> Result<usize, CountError> {
    TokenCounter::new(&CounterConfig::for_model(model))?.count_file(path.as_ref())
}

fn normalize_newlines(text: &str, mode: NewlineMode) -> Cow<'_, str> {
    match mode {
        NewlineMode::Universal if text.contains('\r') => {
            Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
        }
        _ => Cow::Borrowed(text),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::config::EncodingSelector;

    /// One token per whitespace-separated word; `<|sp|>` is the only
    /// special token.
    struct WordEncoding;

    impl Encoding for WordEncoding {
        fn name(&self) -> &str {
            "words"
        }

        fn encode_ordinary(&self, text: &str) -> Vec<u32> {
            text.split_whitespace().map(|w| w.len() as u32).collect()
        }

        fn encode_with_special_tokens(&self, text: &str) -> Vec<u32> {
            text.split_whitespace()
                .flat_map(|w| {
                    if w == "<|sp|>" {
                        vec![u32::MAX]
                    } else {
                        self.encode_ordinary(w)
                    }
                })
                .collect()
        }
    }

    struct WordResolver;

    impl EncodingResolver for WordResolver {
        fn resolve(&self, selector: &EncodingSelector) -> Result<Box<dyn Encoding>, CountError> {
            match selector {
                EncodingSelector::Model(m) if m == "words" => Ok(Box::new(WordEncoding)),
                EncodingSelector::Model(m) => Err(CountError::UnknownModel { model: m.clone() }),
                EncodingSelector::Encoding(n) => {
                    Err(CountError::UnknownEncoding { name: n.clone() })
                }
            }
        }
    }

    fn counter(special_tokens: SpecialTokens) -> TokenCounter {
        let config = CounterConfig {
            selector: EncodingSelector::Model("words".into()),
            special_tokens,
            ..CounterConfig::default()
        };
        TokenCounter::with_resolver(&WordResolver, &config).unwrap()
    }

    #[test]
    fn counts_with_mock_encoding() {
        let c = counter(SpecialTokens::Ordinary);
        assert_eq!(c.encoding_name(), "words");
        assert_eq!(c.count_text("one two three").unwrap(), 3);
        assert_eq!(c.count_text("").unwrap(), 0);
    }

    #[test]
    fn resolver_errors_propagate() {
        let config = CounterConfig::for_model("nope");
        let err = TokenCounter::with_resolver(&WordResolver, &config).err().unwrap();
        assert!(matches!(err, CountError::UnknownModel { .. }));
    }

    #[test]
    fn reject_policy_fails_on_special_markup() {
        let c = counter(SpecialTokens::Reject);
        assert_eq!(c.count_text("plain words only").unwrap(), 3);
        assert!(matches!(
            c.count_text("before <|sp|> after"),
            Err(CountError::DisallowedSpecial)
        ));
    }

    #[test]
    fn allow_policy_uses_special_encoding() {
        let c = counter(SpecialTokens::Allow);
        assert_eq!(c.count_text("a <|sp|> b").unwrap(), 3);
    }

    #[test]
    fn reader_rejects_invalid_utf8() {
        let c = counter(SpecialTokens::Ordinary);
        let err = c
            .count_reader(Path::new("-"), Cursor::new(vec![b'o', b'k', 0xFF]))
            .unwrap_err();
        match err {
            CountError::Decoding { path, source } => {
                assert_eq!(path, Path::new("-"));
                assert_eq!(source.valid_up_to(), 2);
            }
            other => panic!("expected Decoding, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_file_access() {
        let c = counter(SpecialTokens::Ordinary);
        let err = c.count_file(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, CountError::FileAccess { .. }));
    }

    #[test]
    fn directory_is_file_access() {
        let dir = tempfile::tempdir().unwrap();
        let c = counter(SpecialTokens::Ordinary);
        let err = c.count_file(dir.path()).unwrap_err();
        assert!(matches!(err, CountError::FileAccess { .. }));
    }

    #[test]
    fn universal_newlines_translate_cr() {
        assert_eq!(
            normalize_newlines("a\r\nb\rc\n", NewlineMode::Universal),
            "a\nb\nc\n"
        );
        assert_eq!(
            normalize_newlines("a\r\nb", NewlineMode::Preserve),
            "a\r\nb"
        );
        assert!(matches!(
            normalize_newlines("no returns", NewlineMode::Universal),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn default_counts_crlf_like_lf() {
        let c = TokenCounter::new(&CounterConfig::default()).unwrap();
        for (crlf, lf) in [
            ("  \r\n  \r\n", "  \n  \n"),
            ("line one\r\nline two\r\n", "line one\nline two\n"),
            ("old mac\rline", "old mac\nline"),
        ] {
            assert_eq!(
                c.count_text(crlf).unwrap(),
                c.count_text(lf).unwrap(),
                "{crlf:?}"
            );
        }
    }

    #[test]
    fn preserve_counts_carriage_returns() {
        let config = CounterConfig {
            newlines: NewlineMode::Preserve,
            ..CounterConfig::default()
        };
        let preserve = TokenCounter::new(&config).unwrap();
        let bpe = tiktoken_rs::o200k_base().unwrap();
        for text in ["  \r\n  \r\n", "line one\r\nline two\r"] {
            assert_eq!(
                preserve.count_text(text).unwrap(),
                bpe.encode_ordinary(text).len(),
                "{text:?}"
            );
        }
    }

    #[test]
    fn hello_world_default_model() {
        let c = TokenCounter::new(&CounterConfig::default()).unwrap();
        assert_eq!(c.encoding_name(), "o200k_base");
        assert_eq!(c.count_text("hello world").unwrap(), 2);
    }

    #[test]
    fn one_shot_count_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("greeting.txt");
        fs::write(&path, "hello world").unwrap();
        assert_eq!(count(&path, "gpt-4o-mini").unwrap(), 2);
        assert!(matches!(
            count(&path, "unknown-model"),
            Err(CountError::UnknownModel { .. })
        ));
    }
}

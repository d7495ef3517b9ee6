//! Stemming capability used by [`stem_text_with`](crate::preprocessing::stem_text_with).
//!
//! The algorithm is a replaceable component: anything implementing [`Stem`]
//! can be injected, including plain closures.

use rust_stemmers::{Algorithm, Stemmer};

/// Reduces a single token to its root form.
pub trait Stem: Send + Sync {
    fn stem(&self, word: &str) -> String;

    fn name(&self) -> &'static str;
}

/// Snowball stemmer for English, the default.
pub struct SnowballStemmer {
    inner: Stemmer,
}

impl SnowballStemmer {
    pub fn english() -> Self {
        Self { inner: Stemmer::create(Algorithm::English) }
    }

    pub fn new(algorithm: Algorithm) -> Self {
        Self { inner: Stemmer::create(algorithm) }
    }
}

impl Default for SnowballStemmer {
    fn default() -> Self {
        Self::english()
    }
}

impl std::fmt::Debug for SnowballStemmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowballStemmer").finish_non_exhaustive()
    }
}

impl Stem for SnowballStemmer {
    fn stem(&self, word: &str) -> String {
        self.inner.stem(word).into_owned()
    }

    fn name(&self) -> &'static str {
        "snowball"
    }
}

/// Returns words unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityStemmer;

impl Stem for IdentityStemmer {
    fn stem(&self, word: &str) -> String {
        word.to_string()
    }

    fn name(&self) -> &'static str {
        "identity"
    }
}

impl<F> Stem for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn stem(&self, word: &str) -> String {
        self(word)
    }

    fn name(&self) -> &'static str {
        "custom"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowball_reduces_common_suffixes() {
        let stemmer = SnowballStemmer::english();
        assert_eq!(stemmer.stem("running"), "run");
        assert_eq!(stemmer.stem("searching"), "search");
        assert_eq!(stemmer.stem("documents"), "document");
    }

    #[test]
    fn closures_are_stemmers() {
        let chop = |w: &str| w.trim_end_matches('s').to_string();
        assert_eq!(Stem::stem(&chop, "cats"), "cat");
        assert_eq!(chop.name(), "custom");
        assert_eq!(IdentityStemmer.stem("flies"), "flies");
    }
}

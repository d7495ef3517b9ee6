//! String-to-string normalizers and the filter chain that composes them.
//!
//! Every normalizer is a pure `&str -> String` function. [`Filter`] names
//! them so a chain can be configured from text, and [`Pipeline`] applies a
//! chain with injected stemming and stopword capabilities.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::stem::{SnowballStemmer, Stem};
use crate::stopwords::{StopwordSet, Stopwords};
use crate::tokenizer::{join, tokenize};

lazy_static! {
    static ref RE_TAGS: Regex = Regex::new(r"<[^>]+>").expect("valid regex");
    static ref RE_NUMERIC: Regex = Regex::new(r"\d+").expect("valid regex");
    static ref RE_WHITESPACE: Regex = Regex::new(r"\s+").expect("valid regex");
    static ref RE_ALPHA_NUM: Regex = Regex::new(r"(\p{L})(\d)").expect("valid regex");
    static ref RE_NUM_ALPHA: Regex = Regex::new(r"(\d)(\p{L})").expect("valid regex");
    static ref STEMMER: SnowballStemmer = SnowballStemmer::english();
    static ref DEFAULT_PIPELINE: Pipeline = Pipeline::default();
}

/// Non-ASCII symbols treated as punctuation in addition to ASCII punctuation.
const EXTRA_PUNCTUATION: &[char] = &[
    '«', '»', '“', '”', '‘', '’', '„', '…', '–', '—', '¡', '¿', '·', '•',
];

/// Minimum token length used when `strip_short` is configured without one.
pub const DEFAULT_MIN_LEN: usize = 3;

/// The chain applied by [`preprocess_string`].
pub const DEFAULT_FILTERS: &[Filter] = &[
    Filter::Lowercase,
    Filter::StripTags,
    Filter::StripPunctuation2,
    Filter::StripMultipleWhitespaces,
    Filter::StripNumeric,
    Filter::RemoveStopwords,
    Filter::StripShort(DEFAULT_MIN_LEN),
    Filter::Stem,
];

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || EXTRA_PUNCTUATION.contains(&c)
}

pub fn lowercase(text: &str) -> String {
    text.to_lowercase()
}

/// NFKC normalization: compatibility characters are folded to their
/// canonical composed form.
pub fn normalize_unicode(text: &str) -> String {
    text.nfkc().collect()
}

/// Remove `<...>` markup, leaving the surrounding text untouched.
pub fn strip_tags(text: &str) -> String {
    RE_TAGS.replace_all(text, "").into_owned()
}

pub fn strip_numeric(text: &str) -> String {
    RE_NUMERIC.replace_all(text, "").into_owned()
}

/// Remove punctuation characters outright.
pub fn strip_punctuation(text: &str) -> String {
    text.chars().filter(|&c| !is_punctuation(c)).collect()
}

/// Replace every punctuation character with a space.
pub fn strip_punctuation2(text: &str) -> String {
    text.chars()
        .map(|c| if is_punctuation(c) { ' ' } else { c })
        .collect()
}

/// Replace each character that is not a letter, digit or whitespace with a space.
pub fn strip_non_alphanum(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect()
}

/// Separate letter runs from digit runs: `diet1` -> `diet 1`, `1diet` -> `1 diet`.
pub fn split_alphanum(text: &str) -> String {
    let text = RE_ALPHA_NUM.replace_all(text, "$1 $2");
    RE_NUM_ALPHA.replace_all(&text, "$1 $2").into_owned()
}

/// Collapse whitespace runs into one ASCII space. Leading and trailing
/// whitespace is collapsed too, not trimmed.
pub fn strip_multiple_whitespaces(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").into_owned()
}

/// Drop tokens shorter than `min_len` characters.
pub fn strip_short(text: &str, min_len: usize) -> String {
    join(
        tokenize(text)
            .into_iter()
            .filter(|token| token.chars().count() >= min_len),
    )
}

/// Drop tokens found in the built-in English stopword list.
pub fn remove_stopwords(text: &str) -> String {
    remove_stopwords_with(text, Stopwords::english())
}

pub fn remove_stopwords_with<S: StopwordSet + ?Sized>(text: &str, stopwords: &S) -> String {
    join(
        tokenize(text)
            .into_iter()
            .filter(|token| !stopwords.is_stopword(token)),
    )
}

/// Lower-case and stem every token with the default English stemmer.
pub fn stem_text(text: &str) -> String {
    stem_text_with(text, &*STEMMER)
}

/// Lower-case and stem every token with `stemmer`.
///
/// Tokens are handed to the stemmer whole, so trailing punctuation such as
/// `"words,"` leaves suffix rules unmatched and survives unchanged.
pub fn stem_text_with<S: Stem + ?Sized>(text: &str, stemmer: &S) -> String {
    let lowered = text.to_lowercase();
    let stemmed: Vec<String> = tokenize(&lowered)
        .into_iter()
        .map(|token| stemmer.stem(token))
        .collect();
    join(stemmed.iter().map(String::as_str))
}

/// Anything that rewrites a document before tokenization.
pub trait TextFilter: Send + Sync {
    fn filter(&self, text: &str) -> String;
}

impl<F> TextFilter for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn filter(&self, text: &str) -> String {
        self(text)
    }
}

/// A named normalizer that can be parsed from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Filter {
    Lowercase,
    NormalizeUnicode,
    StripTags,
    StripNumeric,
    StripPunctuation,
    StripPunctuation2,
    StripNonAlphanum,
    SplitAlphanum,
    StripMultipleWhitespaces,
    StripShort(usize),
    RemoveStopwords,
    Stem,
}

impl Filter {
    /// Apply with explicit stemming and stopword capabilities.
    pub fn apply_with(
        &self,
        text: &str,
        stemmer: &dyn Stem,
        stopwords: &dyn StopwordSet,
    ) -> String {
        match self {
            Filter::Lowercase => lowercase(text),
            Filter::NormalizeUnicode => normalize_unicode(text),
            Filter::StripTags => strip_tags(text),
            Filter::StripNumeric => strip_numeric(text),
            Filter::StripPunctuation => strip_punctuation(text),
            Filter::StripPunctuation2 => strip_punctuation2(text),
            Filter::StripNonAlphanum => strip_non_alphanum(text),
            Filter::SplitAlphanum => split_alphanum(text),
            Filter::StripMultipleWhitespaces => strip_multiple_whitespaces(text),
            Filter::StripShort(min_len) => strip_short(text, *min_len),
            Filter::RemoveStopwords => remove_stopwords_with(text, stopwords),
            Filter::Stem => stem_text_with(text, stemmer),
        }
    }

    pub fn apply(&self, text: &str) -> String {
        self.apply_with(text, &*STEMMER, Stopwords::english())
    }
}

impl TextFilter for Filter {
    fn filter(&self, text: &str) -> String {
        self.apply(text)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Filter::Lowercase => "lowercase",
            Filter::NormalizeUnicode => "normalize_unicode",
            Filter::StripTags => "strip_tags",
            Filter::StripNumeric => "strip_numeric",
            Filter::StripPunctuation => "strip_punctuation",
            Filter::StripPunctuation2 => "strip_punctuation2",
            Filter::StripNonAlphanum => "strip_non_alphanum",
            Filter::SplitAlphanum => "split_alphanum",
            Filter::StripMultipleWhitespaces => "strip_multiple_whitespaces",
            Filter::StripShort(min_len) => return write!(f, "strip_short:{min_len}"),
            Filter::RemoveStopwords => "remove_stopwords",
            Filter::Stem => "stem",
        };
        f.write_str(name)
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, arg) = match s.trim().split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (s.trim(), None),
        };
        let filter = match name {
            "lowercase" => Filter::Lowercase,
            "normalize_unicode" => Filter::NormalizeUnicode,
            "strip_tags" => Filter::StripTags,
            "strip_numeric" => Filter::StripNumeric,
            "strip_punctuation" => Filter::StripPunctuation,
            "strip_punctuation2" => Filter::StripPunctuation2,
            "strip_non_alphanum" => Filter::StripNonAlphanum,
            "split_alphanum" => Filter::SplitAlphanum,
            "strip_multiple_whitespaces" => Filter::StripMultipleWhitespaces,
            "remove_stopwords" => Filter::RemoveStopwords,
            "stem" => Filter::Stem,
            "strip_short" => {
                let min_len = match arg {
                    Some(arg) => parse_min_len(arg)?,
                    None => DEFAULT_MIN_LEN,
                };
                return Ok(Filter::StripShort(min_len));
            }
            other => return Err(Error::invalid_input(format!("unknown filter {other:?}"))),
        };
        if arg.is_some() {
            return Err(Error::invalid_input(format!("filter {name:?} takes no argument")));
        }
        Ok(filter)
    }
}

fn parse_min_len(arg: &str) -> Result<usize> {
    let value: i64 = arg
        .parse()
        .map_err(|_| Error::invalid_input(format!("minimum length {arg:?} is not an integer")))?;
    if value < 0 {
        return Err(Error::invalid_input(format!(
            "minimum length must be non-negative, got {value}"
        )));
    }
    usize::try_from(value)
        .map_err(|_| Error::invalid_input(format!("minimum length {value} is too large")))
}

impl TryFrom<String> for Filter {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Filter> for String {
    fn from(filter: Filter) -> Self {
        filter.to_string()
    }
}

/// An ordered chain of filters sharing one stemmer and one stopword set.
pub struct Pipeline {
    filters: Vec<Filter>,
    stemmer: Box<dyn Stem>,
    stopwords: Box<dyn StopwordSet>,
}

impl Pipeline {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self {
            filters,
            stemmer: Box::new(SnowballStemmer::english()),
            stopwords: Box::new(Stopwords::english().clone()),
        }
    }

    pub fn with_stemmer<S: Stem + 'static>(mut self, stemmer: S) -> Self {
        self.stemmer = Box::new(stemmer);
        self
    }

    pub fn with_stopwords<S: StopwordSet + 'static>(mut self, stopwords: S) -> Self {
        self.stopwords = Box::new(stopwords);
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for filter in &self.filters {
            out = filter.apply_with(&out, self.stemmer.as_ref(), self.stopwords.as_ref());
        }
        out
    }

    pub fn apply_all<S: AsRef<str>>(&self, documents: &[S]) -> Vec<String> {
        documents.iter().map(|doc| self.apply(doc.as_ref())).collect()
    }

    /// Same as [`apply_all`](Self::apply_all), one rayon task per document.
    pub fn par_apply_all<S: AsRef<str> + Sync>(&self, documents: &[S]) -> Vec<String> {
        documents.par_iter().map(|doc| self.apply(doc.as_ref())).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(DEFAULT_FILTERS.to_vec())
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("filters", &self.filters)
            .field("stemmer", &self.stemmer.name())
            .field("stopwords", &"<stopwords>")
            .finish()
    }
}

impl TextFilter for Pipeline {
    fn filter(&self, text: &str) -> String {
        self.apply(text)
    }
}

/// Run [`DEFAULT_FILTERS`] over `text` and tokenize the result.
pub fn preprocess_string(text: &str) -> Vec<String> {
    tokenize(&DEFAULT_PIPELINE.apply(text))
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn preprocess_documents<S: AsRef<str>>(documents: &[S]) -> Vec<Vec<String>> {
    documents
        .iter()
        .map(|doc| preprocess_string(doc.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_numeric_keeps_spacing() {
        assert_eq!(strip_numeric("salut les amis du 59"), "salut les amis du ");
    }

    #[test]
    fn strip_short_drops_below_minimum() {
        assert_eq!(strip_short("salut les amis du 59", 3), "salut les amis");
        assert_eq!(strip_short("a bb ccc", 0), "a bb ccc");
        assert_eq!(strip_short("été où", 3), "été");
    }

    #[test]
    fn strip_tags_keeps_surrounding_text() {
        assert_eq!(strip_tags("<i>Hello</i> <b>World</b>!"), "Hello World!");
        assert_eq!(strip_tags("a <> b"), "a <> b");
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(
            strip_multiple_whitespaces("salut  les\r\nloulous!"),
            "salut les loulous!"
        );
        assert_eq!(strip_multiple_whitespaces("\t x \n"), " x ");
    }

    #[test]
    fn non_alphanumerics_become_spaces() {
        assert_eq!(strip_non_alphanum("toto nf-kappa titi"), "toto nf kappa titi");
        assert_eq!(strip_non_alphanum("été-là"), "été là");
    }

    #[test]
    fn split_alphanum_both_directions() {
        assert_eq!(split_alphanum("toto diet1 titi"), "toto diet 1 titi");
        assert_eq!(split_alphanum("toto 1diet titi"), "toto 1 diet titi");
        assert_eq!(split_alphanum("a1b2"), "a 1 b 2");
    }

    #[test]
    fn punctuation_variants() {
        assert_eq!(strip_punctuation("d'argent ; où"), "dargent  où");
        assert_eq!(strip_punctuation2("d'argent ; où"), "d argent   où");
        assert_eq!(strip_punctuation2("«oui»"), " oui ");
    }

    #[test]
    fn stopwords_default_and_injected() {
        assert_eq!(remove_stopwords("the world is square"), "world square");
        let french: Stopwords = ["les", "du"].into_iter().collect();
        assert_eq!(
            remove_stopwords_with("salut les amis du 59", &french),
            "salut amis 59"
        );
    }

    #[test]
    fn stem_text_lowercases_and_keeps_trailing_punctuation() {
        assert_eq!(
            stem_text("Searching  Documents, cats"),
            "search documents, cat"
        );
        let upper = |w: &str| w.to_uppercase();
        assert_eq!(stem_text_with("a b", &upper), "A B");
    }

    #[test]
    fn unicode_normalization_folds_compatibility_forms() {
        assert_eq!(normalize_unicode("ﬁne"), "fine");
        assert_eq!(lowercase("LES Amis"), "les amis");
    }

    #[test]
    fn filter_names_round_trip() {
        for filter in DEFAULT_FILTERS {
            assert_eq!(filter.to_string().parse::<Filter>(), Ok(*filter));
        }
        assert_eq!("strip_short".parse::<Filter>(), Ok(Filter::StripShort(3)));
        assert_eq!(" strip_short : 5 ".parse::<Filter>(), Ok(Filter::StripShort(5)));
    }

    #[test]
    fn bad_filter_specs_are_invalid_input() {
        assert!(matches!("strip_short:-1".parse::<Filter>(), Err(Error::InvalidInput(_))));
        assert!(matches!("strip_short:x".parse::<Filter>(), Err(Error::InvalidInput(_))));
        assert!(matches!("lowercase:1".parse::<Filter>(), Err(Error::InvalidInput(_))));
        assert!(matches!("shout".parse::<Filter>(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn filters_deserialize_from_names() {
        let filters: Vec<Filter> =
            serde_json::from_str(r#"["lowercase", "strip_short:4"]"#).unwrap();
        assert_eq!(filters, vec![Filter::Lowercase, Filter::StripShort(4)]);
        assert!(serde_json::from_str::<Vec<Filter>>(r#"["strip_short:-2"]"#).is_err());
        assert_eq!(serde_json::to_string(&filters).unwrap(), r#"["lowercase","strip_short:4"]"#);
    }

    #[test]
    fn pipeline_applies_filters_in_order() {
        let pipeline = Pipeline::new(vec![Filter::Lowercase, Filter::StripPunctuation2])
            .with_stemmer(crate::stem::IdentityStemmer);
        assert_eq!(pipeline.apply("Luit : c'est"), "luit   c est");

        let custom = Pipeline::new(vec![Filter::RemoveStopwords])
            .with_stopwords(|t: &str| t == "les");
        assert_eq!(custom.apply("salut les amis"), "salut amis");
        assert_eq!(
            custom.par_apply_all(&["les a", "b les"]),
            custom.apply_all(&["les a", "b les"])
        );
    }

    #[test]
    fn default_preprocessing() {
        assert_eq!(
            preprocess_string("<b>The</b> 42 cats, searching!"),
            vec!["cat", "search"]
        );
        assert_eq!(preprocess_documents(&["", "the"]), vec![Vec::<String>::new(), vec![]]);
    }
}

use rayon::prelude::*;
use tracing::debug;

use crate::index::{TermCounts, Vocabulary};
use crate::preprocessing::TextFilter;
use crate::tokenizer::tokenize;

fn count_tokens(text: &str) -> TermCounts {
    let mut counts = TermCounts::new();
    for token in tokenize(text) {
        counts.increment(token);
    }
    counts
}

fn build_vocabulary(term_counts: &[TermCounts]) -> Vocabulary {
    let mut vocabulary = Vocabulary::new();
    for counts in term_counts {
        vocabulary.extend_from(counts);
    }
    debug!(
        num_docs = term_counts.len(),
        num_terms = vocabulary.len(),
        "built vocabulary"
    );
    vocabulary
}

/// Count tokens of already-normalized documents.
///
/// Returns one [`TermCounts`] per document, in input order, and the union of
/// all tokens in first-seen order.
pub fn term_counts<S: AsRef<str>>(documents: &[S]) -> (Vec<TermCounts>, Vocabulary) {
    let counts: Vec<TermCounts> = documents
        .iter()
        .map(|doc| count_tokens(doc.as_ref()))
        .collect();
    let vocabulary = build_vocabulary(&counts);
    (counts, vocabulary)
}

/// Normalize every document with `normalizer`, then count.
pub fn term_counts_with<S, F>(documents: &[S], normalizer: &F) -> (Vec<TermCounts>, Vocabulary)
where
    S: AsRef<str>,
    F: TextFilter + ?Sized,
{
    let counts: Vec<TermCounts> = documents
        .iter()
        .map(|doc| count_tokens(&normalizer.filter(doc.as_ref())))
        .collect();
    let vocabulary = build_vocabulary(&counts);
    (counts, vocabulary)
}

/// Parallel [`term_counts_with`]. Documents are normalized and counted on the
/// rayon pool; the vocabulary is only built once every document is done, so
/// its order matches the sequential version.
pub fn par_term_counts_with<S, F>(documents: &[S], normalizer: &F) -> (Vec<TermCounts>, Vocabulary)
where
    S: AsRef<str> + Sync,
    F: TextFilter + ?Sized,
{
    let counts: Vec<TermCounts> = documents
        .par_iter()
        .map(|doc| count_tokens(&normalizer.filter(doc.as_ref())))
        .collect();
    let vocabulary = build_vocabulary(&counts);
    (counts, vocabulary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::preprocessing::{lowercase, strip_punctuation2};

    #[test]
    fn counts_sum_to_token_total() {
        let docs = ["a b a", "", "c ! c c"];
        let (counts, vocab) = term_counts(&docs);
        assert_eq!(counts.len(), docs.len());
        for (doc, tc) in docs.iter().zip(&counts) {
            assert_eq!(tc.total() as usize, tokenize(doc).len());
        }
        assert_eq!(counts[0].get("a"), Ok(2));
        assert_eq!(counts[2].get("!"), Ok(1));
        assert_eq!(counts[1].get("a"), Err(Error::missing_key("a")));
        assert_eq!(vocab.iter().collect::<Vec<_>>(), vec!["a", "b", "c", "!"]);
    }

    #[test]
    fn normalizer_runs_before_counting() {
        let normalize = |s: &str| strip_punctuation2(&lowercase(s));
        let (counts, vocab) = term_counts_with(&["La nue, LA nuit."], &normalize);
        assert_eq!(counts[0].get("la"), Ok(2));
        assert!(!vocab.contains("La"));
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn parallel_matches_sequential() {
        let docs: Vec<String> = (0..64)
            .map(|i| format!("doc{} shared term{} term{}", i, i % 5, i % 7))
            .collect();
        let normalize = |s: &str| s.to_string();
        let sequential = term_counts_with(&docs, &normalize);
        let parallel = par_term_counts_with(&docs, &normalize);
        assert_eq!(sequential, parallel);
        assert_eq!(
            sequential.1.iter().collect::<Vec<_>>(),
            parallel.1.iter().collect::<Vec<_>>()
        );
    }
}

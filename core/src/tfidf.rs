use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PipelineConfig;
use crate::counter::{par_term_counts_with, term_counts, term_counts_with};
use crate::error::{Error, Result};
use crate::frequency::{
    inverse_document_frequency_with, term_frequency_from_counts, to_vector, IdfFormula,
};
use crate::index::{TermCounts, TfIdfWeights, Vocabulary};

/// Per-document TF-IDF weights over one collection.
///
/// Only tokens present in a document carry a weight; the dense export fills
/// the gaps with zeros, one column per vocabulary token in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdf {
    weights: Vec<TfIdfWeights>,
    vocabulary: Vocabulary,
    formula: IdfFormula,
}

impl TfIdf {
    /// Build from documents that are already normalized.
    pub fn new<S: AsRef<str>>(documents: &[S]) -> Result<Self> {
        let (counts, vocabulary) = term_counts(documents);
        Self::from_counts(counts, vocabulary, IdfFormula::default())
    }

    /// Normalize with the configured filter chain, then build.
    pub fn with_config<S: AsRef<str> + Sync>(
        documents: &[S],
        config: &PipelineConfig,
    ) -> Result<Self> {
        let pipeline = config.pipeline();
        let (counts, vocabulary) = if config.parallel {
            par_term_counts_with(documents, &pipeline)
        } else {
            term_counts_with(documents, &pipeline)
        };
        Self::from_counts(counts, vocabulary, config.idf)
    }

    pub fn from_counts(
        term_counts: Vec<TermCounts>,
        vocabulary: Vocabulary,
        formula: IdfFormula,
    ) -> Result<Self> {
        if term_counts.is_empty() {
            return Err(Error::EmptyCollection);
        }
        let idf = inverse_document_frequency_with(&term_counts, formula)?;
        let weights = term_frequency_from_counts(&term_counts)
            .into_iter()
            .map(|tf| {
                tf.iter()
                    .map(|(token, freq)| idf.get(token).map(|w| (token.to_string(), freq * w)))
                    .collect::<Result<TfIdfWeights>>()
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(
            num_docs = weights.len(),
            num_terms = vocabulary.len(),
            %formula,
            "built tf-idf table"
        );
        Ok(Self { weights, vocabulary, formula })
    }

    /// Per-document weight mappings and the shared vocabulary.
    pub fn as_dict(&self) -> (&[TfIdfWeights], &Vocabulary) {
        (&self.weights, &self.vocabulary)
    }

    /// Dense `[documents x vocabulary]` matrix, zero where a token is absent.
    pub fn as_array(&self) -> (Vec<Vec<f64>>, &Vocabulary) {
        let rows = self
            .weights
            .iter()
            .map(|doc| to_vector(doc, &self.vocabulary))
            .collect();
        (rows, &self.vocabulary)
    }

    pub fn num_documents(&self) -> usize {
        self.weights.len()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn formula(&self) -> IdfFormula {
        self.formula
    }

    pub fn document(&self, index: usize) -> Option<&TfIdfWeights> {
        self.weights.get(index)
    }

    /// The `k` heaviest tokens of one document, ties broken by vocabulary order.
    pub fn top_terms(&self, index: usize, k: usize) -> Option<Vec<(&str, f64)>> {
        let doc = self.weights.get(index)?;
        let mut terms: Vec<(&str, f64)> = doc.iter().collect();
        terms.sort_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| self.vocabulary.index_of(a.0).cmp(&self.vocabulary.index_of(b.0)))
        });
        terms.truncate(k);
        Some(terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_are_tf_times_idf() {
        let table = TfIdf::new(&["a b", "a"]).unwrap();
        let (dict, vocab) = table.as_dict();
        let smooth = |n: f64, df: f64| (1.0 + n / df).ln();
        assert!((dict[0].get("a").unwrap() - 0.5 * smooth(2.0, 2.0)).abs() < 1e-12);
        assert!((dict[0].get("b").unwrap() - 0.5 * smooth(2.0, 1.0)).abs() < 1e-12);
        assert!((dict[1].get("a").unwrap() - smooth(2.0, 2.0)).abs() < 1e-12);
        assert!(matches!(dict[1].get("b"), Err(Error::MissingKey { .. })));
        assert_eq!(vocab.len(), 2);
    }

    #[test]
    fn dense_export_matches_mappings() {
        let table = TfIdf::new(&["x y y", "z", "y z"]).unwrap();
        let (rows, vocab) = table.as_array();
        let (dict, _) = table.as_dict();
        assert_eq!(rows.len(), 3);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), vocab.len());
            for (col, token) in vocab.iter().enumerate() {
                let expected = dict[i].get(token).unwrap_or(0.0);
                assert_eq!(row[col], expected);
            }
        }
    }

    #[test]
    fn empty_collection_is_rejected() {
        let docs: [&str; 0] = [];
        assert_eq!(TfIdf::new(&docs), Err(Error::EmptyCollection));
    }

    #[test]
    fn top_terms_orders_by_weight() {
        let table = TfIdf::new(&["common rare rare", "common"]).unwrap();
        let top = table.top_terms(0, 1).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].0, "rare");
        assert!(table.top_terms(5, 1).is_none());
    }

    #[test]
    fn config_controls_normalization_and_formula() {
        let config = PipelineConfig { idf: IdfFormula::Additive, ..PipelineConfig::default() };
        let table = TfIdf::with_config(&["Salut, les amis!", "LES amis"], &config).unwrap();
        assert_eq!(table.formula(), IdfFormula::Additive);
        assert!(table.vocabulary().contains("les"));
        assert!(!table.vocabulary().contains("amis!"));
        // "les" is in both documents, so its idf is exactly 1.
        assert_eq!(table.document(1).unwrap().get("les"), Ok(0.5));
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::index::{
    InverseDocumentCount, InverseDocumentFrequency, TermCounts, TermFrequency, TermMap, Vocabulary,
};

/// How document counts are turned into inverse document frequencies.
///
/// With `n` documents and a token found in `df` of them:
///
/// * `Smooth`: `ln(1 + n / df)`
/// * `Additive`: `ln((1 + n) / (1 + df)) + 1`
///
/// Both stay strictly positive, including for tokens present in every
/// document, and strictly decrease as `df` grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdfFormula {
    #[default]
    Smooth,
    Additive,
}

impl IdfFormula {
    pub fn weight(self, num_docs: usize, doc_count: u32) -> f64 {
        let n = num_docs as f64;
        let df = f64::from(doc_count);
        match self {
            IdfFormula::Smooth => (1.0 + n / df).ln(),
            IdfFormula::Additive => ((1.0 + n) / (1.0 + df)).ln() + 1.0,
        }
    }
}

impl fmt::Display for IdfFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdfFormula::Smooth => f.write_str("smooth"),
            IdfFormula::Additive => f.write_str("additive"),
        }
    }
}

impl FromStr for IdfFormula {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "smooth" => Ok(IdfFormula::Smooth),
            "additive" => Ok(IdfFormula::Additive),
            other => Err(Error::invalid_input(format!("unknown idf formula {other:?}"))),
        }
    }
}

/// Divide each count by its document's token total.
pub fn term_frequency_from_counts(term_counts: &[TermCounts]) -> Vec<TermFrequency> {
    term_counts
        .iter()
        .map(|counts| {
            let total = f64::from(counts.total());
            counts
                .iter()
                .map(|(token, count)| (token.to_string(), f64::from(count) / total))
                .collect::<TermFrequency>()
        })
        .collect()
}

/// Number of documents in which each token appears at least once.
pub fn inverse_document_count_from_counts(
    term_counts: &[TermCounts],
) -> Result<InverseDocumentCount> {
    if term_counts.is_empty() {
        return Err(Error::EmptyCollection);
    }
    let mut doc_counts = InverseDocumentCount::new();
    for counts in term_counts {
        for token in counts.keys() {
            doc_counts.increment(token);
        }
    }
    debug!(
        num_docs = term_counts.len(),
        num_terms = doc_counts.len(),
        "computed document counts"
    );
    Ok(doc_counts)
}

pub fn inverse_document_frequency_from_counts(
    term_counts: &[TermCounts],
) -> Result<InverseDocumentFrequency> {
    inverse_document_frequency_with(term_counts, IdfFormula::default())
}

pub fn inverse_document_frequency_with(
    term_counts: &[TermCounts],
    formula: IdfFormula,
) -> Result<InverseDocumentFrequency> {
    let doc_counts = inverse_document_count_from_counts(term_counts)?;
    let num_docs = term_counts.len();
    Ok(doc_counts
        .iter()
        .map(|(token, df)| (token.to_string(), formula.weight(num_docs, df)))
        .collect())
}

/// Project `mapping` onto the vocabulary order, 0.0 where a token is absent.
/// Keys outside the vocabulary are ignored.
pub fn to_vector<V>(mapping: &TermMap<V>, vocabulary: &Vocabulary) -> Vec<f64>
where
    V: Copy + Into<f64>,
{
    let mut vector = vec![0.0; vocabulary.len()];
    for (token, value) in mapping.iter() {
        if let Some(column) = vocabulary.index_of(token) {
            vector[column] = value.into();
        }
    }
    vector
}

/// `(column, value)` pairs for tokens present in both `mapping` and
/// `vocabulary`, sorted by column.
pub fn to_sparse_vector<V>(mapping: &TermMap<V>, vocabulary: &Vocabulary) -> Vec<(usize, f64)>
where
    V: Copy + Into<f64>,
{
    let mut entries: Vec<(usize, f64)> = mapping
        .iter()
        .filter_map(|(token, value)| vocabulary.index_of(token).map(|col| (col, value.into())))
        .collect();
    entries.sort_by_key(|&(col, _)| col);
    entries
}

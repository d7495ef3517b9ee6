use serde::{Deserialize, Serialize};

use crate::frequency::IdfFormula;
use crate::preprocessing::{Filter, Pipeline};
use crate::stopwords::Stopwords;

/// How a collection is normalized and weighted before TF-IDF export.
///
/// Every field has a default, so a partial JSON document such as
/// `{"idf": "additive"}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Filters applied to each document before tokenization, in order.
    pub filters: Vec<Filter>,
    pub idf: IdfFormula,
    /// Replaces the built-in English list for `remove_stopwords`.
    pub stopwords: Option<Vec<String>>,
    /// Normalize and count documents on the rayon pool.
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            filters: vec![Filter::Lowercase, Filter::StripPunctuation2],
            idf: IdfFormula::default(),
            stopwords: None,
            parallel: false,
        }
    }
}

impl PipelineConfig {
    pub fn pipeline(&self) -> Pipeline {
        let pipeline = Pipeline::new(self.filters.clone());
        match &self.stopwords {
            Some(words) => pipeline.with_stopwords(words.iter().cloned().collect::<Stopwords>()),
            None => pipeline,
        }
    }
}

//! Text preprocessing and TF-IDF scoring.
//!
//! Raw documents go through composable normalizers ([`preprocessing`]), are
//! split on whitespace ([`tokenizer`]), counted per document ([`counter`]),
//! turned into term and inverse document frequencies ([`frequency`]) and
//! finally combined into a [`TfIdf`] table that exports either per-document
//! mappings or a dense matrix aligned to the [`Vocabulary`].
//!
//! ```
//! use tfidf_core::preprocessing::{lowercase, strip_punctuation2};
//! use tfidf_core::{term_counts, TfIdf};
//!
//! let docs: Vec<String> = ["Le soleil, la main.", "La nuque"]
//!     .iter()
//!     .map(|d| strip_punctuation2(&lowercase(d)))
//!     .collect();
//! let (counts, vocab) = term_counts(&docs);
//! assert_eq!(counts[0].get("la"), Ok(1));
//! assert!(counts[1].get("soleil").is_err());
//!
//! let table = TfIdf::new(&docs).unwrap();
//! let (matrix, columns) = table.as_array();
//! assert_eq!(matrix[0].len(), columns.len());
//! assert_eq!(columns.len(), vocab.len());
//! ```

pub mod config;
pub mod counter;
pub mod error;
pub mod frequency;
pub mod index;
pub mod persist;
pub mod preprocessing;
pub mod stem;
pub mod stopwords;
pub mod tfidf;
pub mod tokenizer;

pub use config::PipelineConfig;
pub use counter::{par_term_counts_with, term_counts, term_counts_with};
pub use error::{Error, Result};
pub use frequency::{
    inverse_document_count_from_counts, inverse_document_frequency_from_counts,
    inverse_document_frequency_with, term_frequency_from_counts, to_sparse_vector, to_vector,
    IdfFormula,
};
pub use index::{
    InverseDocumentCount, InverseDocumentFrequency, TermCounts, TermFrequency, TermMap,
    TfIdfWeights, Vocabulary,
};
pub use preprocessing::{Filter, Pipeline, TextFilter};
pub use stem::Stem;
pub use stopwords::{StopwordSet, Stopwords};
pub use tfidf::TfIdf;
pub use tokenizer::tokenize;

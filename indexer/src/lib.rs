use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tfidf_core::persist::{load_all, save_doc_ids, save_meta, save_table, MetaFile, TablePaths};
use tfidf_core::{IdfFormula, PipelineConfig, TfIdf, TfIdfWeights};
use walkdir::WalkDir;

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// One input record. A title, when present, is indexed ahead of the body.
#[derive(Debug, Clone, Deserialize)]
pub struct InputDoc {
    pub id: String,
    pub body: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl InputDoc {
    pub fn text(&self) -> String {
        match &self.title {
            Some(title) => format!("{title}\n{}", self.body),
            None => self.body.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopTerm {
    pub term: String,
    pub weight: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DenseExport {
    pub doc_ids: Vec<String>,
    pub vocabulary: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
}

/// Sparse export row; rows keep the table's document order.
#[derive(Debug, Serialize, Deserialize)]
pub struct SparseRow {
    pub id: String,
    pub weights: TfIdfWeights,
}

/// Configuration file first, then flags: `--idf` replaces the file's formula
/// and `--parallel` can only switch parallelism on.
pub fn resolve_config(
    path: Option<&Path>,
    idf: Option<IdfFormula>,
    parallel: bool,
) -> Result<PipelineConfig> {
    let mut config = load_config(path)?;
    if let Some(idf) = idf {
        config.idf = idf;
    }
    config.parallel |= parallel;
    Ok(config)
}

pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

/// `.json` and `.jsonl` files under `input`, sorted by file name.
pub fn collect_files(input: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        let entries = WalkDir::new(input)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok());
        for entry in entries {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    } else {
        bail!("input {} does not exist", input.display());
    }
    Ok(files)
}

/// Reads every document under `input`. Ids must be unique across all files.
pub fn load_documents(input: &Path) -> Result<Vec<InputDoc>> {
    let mut docs: Vec<InputDoc> = Vec::new();
    for file in collect_files(input)? {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut docs)?;
        } else {
            read_json(&file, &mut docs)?;
        }
    }

    {
        let mut seen: HashSet<&str> = HashSet::with_capacity(docs.len());
        for doc in &docs {
            if !seen.insert(doc.id.as_str()) {
                bail!("duplicate document id {}", doc.id);
            }
        }
    }
    tracing::info!(num_docs = docs.len(), "loaded documents");
    Ok(docs)
}

fn read_jsonl(file: &Path, docs: &mut Vec<InputDoc>) -> Result<()> {
    let f = File::open(file)?;
    let reader = BufReader::new(f);
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: InputDoc = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}", file.display(), line_no + 1))?;
        docs.push(doc);
    }
    Ok(())
}

fn read_json(file: &Path, docs: &mut Vec<InputDoc>) -> Result<()> {
    let f = File::open(file)?;
    let reader = BufReader::new(f);
    let json: serde_json::Value = serde_json::from_reader(reader)
        .with_context(|| format!("parsing {}", file.display()))?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                docs.push(serde_json::from_value(v)?);
            }
        }
        serde_json::Value::Object(_) => {
            docs.push(serde_json::from_value(json)?);
        }
        _ => tracing::warn!(file = %file.display(), "skipping file without documents"),
    }
    Ok(())
}

/// Loads `input`, builds the table and writes it under `output`.
pub fn build_table(input: &Path, output: &Path, config: &PipelineConfig) -> Result<TfIdf> {
    let docs = load_documents(input)?;
    let texts: Vec<String> = docs.iter().map(InputDoc::text).collect();
    let table = TfIdf::with_config(&texts, config).context("building tf-idf table")?;
    tracing::info!(
        num_docs = table.num_documents(),
        num_terms = table.vocabulary().len(),
        idf = %table.formula(),
        "computed tf-idf"
    );

    let out_paths = TablePaths::new(output);
    let ids: Vec<String> = docs.into_iter().map(|d| d.id).collect();
    save_table(&out_paths, &table)?;
    save_doc_ids(&out_paths, &ids)?;
    save_meta(&out_paths, &MetaFile::for_table(&table))?;

    tracing::info!(output = %output.display(), "table build complete");
    Ok(table)
}

pub fn top_terms(index: &Path, doc: &str, k: usize) -> Result<Vec<TopTerm>> {
    let (table, ids, _) = load_all(&TablePaths::new(index))?;
    let row = ids
        .iter()
        .position(|id| id == doc)
        .with_context(|| format!("unknown document {doc}"))?;
    let terms = table
        .top_terms(row, k)
        .unwrap_or_default()
        .into_iter()
        .map(|(term, weight)| TopTerm { term: term.to_string(), weight })
        .collect();
    Ok(terms)
}

/// Writes the table as one JSON value followed by a newline.
pub fn write_export<W: Write>(index: &Path, dense: bool, writer: &mut W) -> Result<()> {
    let (table, ids, meta) = load_all(&TablePaths::new(index))?;
    tracing::debug!(num_docs = meta.num_docs, num_terms = meta.num_terms, "loaded table");

    if dense {
        let (matrix, vocab) = table.as_array();
        let vocabulary = vocab.iter().map(str::to_string).collect();
        let export = DenseExport { doc_ids: ids, vocabulary, matrix };
        serde_json::to_writer(&mut *writer, &export)?;
    } else {
        let (weights, _) = table.as_dict();
        let rows: Vec<SparseRow> = ids
            .into_iter()
            .zip(weights)
            .map(|(id, weights)| SparseRow { id, weights: weights.clone() })
            .collect();
        serde_json::to_writer(&mut *writer, &rows)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

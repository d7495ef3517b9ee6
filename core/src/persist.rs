use crate::frequency::IdfFormula;
use crate::tfidf::TfIdf;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: usize,
    pub num_terms: usize,
    pub idf: IdfFormula,
    pub created_at: String,
    pub version: u32,
}

impl MetaFile {
    pub fn for_table(table: &TfIdf) -> Self {
        Self {
            num_docs: table.num_documents(),
            num_terms: table.vocabulary().len(),
            idf: table.formula(),
            created_at: time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default(),
            version: FORMAT_VERSION,
        }
    }
}

/// Layout of a persisted table directory.
pub struct TablePaths {
    pub root: PathBuf,
}

impl TablePaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn table(&self) -> PathBuf { self.root.join("table.bin") }
    fn doc_ids(&self) -> PathBuf { self.root.join("doc_ids.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    f.write_all(bytes)?;
    Ok(())
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    let mut f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    Ok(buf)
}

pub fn save_table(paths: &TablePaths, table: &TfIdf) -> Result<()> {
    create_dir_all(&paths.root)?;
    let bytes = bincode::serialize(table)?;
    write_bytes(&paths.table(), &bytes)
}

pub fn load_table(paths: &TablePaths) -> Result<TfIdf> {
    let buf = read_bytes(&paths.table())?;
    let table = bincode::deserialize(&buf).context("decoding tf-idf table")?;
    Ok(table)
}

/// External document ids, one per table row.
pub fn save_doc_ids(paths: &TablePaths, ids: &[String]) -> Result<()> {
    create_dir_all(&paths.root)?;
    let bytes = bincode::serialize(ids)?;
    write_bytes(&paths.doc_ids(), &bytes)
}

pub fn load_doc_ids(paths: &TablePaths) -> Result<Vec<String>> {
    let buf = read_bytes(&paths.doc_ids())?;
    let ids = bincode::deserialize(&buf).context("decoding document ids")?;
    Ok(ids)
}

pub fn save_meta(paths: &TablePaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let json = serde_json::to_string_pretty(meta)?;
    write_bytes(&paths.meta(), json.as_bytes())
}

pub fn load_meta(paths: &TablePaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta()).context("opening meta.json")?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

/// Load the table and its row ids, checking that they line up.
pub fn load_all(paths: &TablePaths) -> Result<(TfIdf, Vec<String>, MetaFile)> {
    let table = load_table(paths)?;
    let ids = load_doc_ids(paths)?;
    let meta = load_meta(paths)?;
    anyhow::ensure!(
        ids.len() == table.num_documents(),
        "{} document ids for {} table rows",
        ids.len(),
        table.num_documents()
    );
    Ok((table, ids, meta))
}

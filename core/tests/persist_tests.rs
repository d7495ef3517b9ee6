use tempfile::tempdir;
use tfidf_core::persist::{
    load_all, load_meta, load_table, save_doc_ids, save_meta, save_table, MetaFile, TablePaths,
};
use tfidf_core::{IdfFormula, PipelineConfig, TfIdf};

fn tiny_table() -> TfIdf {
    let config = PipelineConfig { idf: IdfFormula::Additive, ..PipelineConfig::default() };
    TfIdf::with_config(&["Rust is great. Rust systems!", "Learning rust."], &config).unwrap()
}

#[test]
fn table_round_trips() {
    let dir = tempdir().unwrap();
    let paths = TablePaths::new(dir.path().join("idx"));
    let table = tiny_table();
    save_table(&paths, &table).unwrap();
    let loaded = load_table(&paths).unwrap();
    assert_eq!(loaded, table);
    assert_eq!(
        loaded.vocabulary().iter().collect::<Vec<_>>(),
        table.vocabulary().iter().collect::<Vec<_>>()
    );
    assert_eq!(loaded.as_array().0, table.as_array().0);
}

#[test]
fn meta_and_ids_load_together() {
    let dir = tempdir().unwrap();
    let paths = TablePaths::new(dir.path());
    let table = tiny_table();
    let meta = MetaFile::for_table(&table);
    save_table(&paths, &table).unwrap();
    save_doc_ids(&paths, &["a".to_string(), "b".to_string()]).unwrap();
    save_meta(&paths, &meta).unwrap();

    assert_eq!(load_meta(&paths).unwrap(), meta);
    let (loaded, ids, loaded_meta) = load_all(&paths).unwrap();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(loaded_meta.num_docs, 2);
    assert_eq!(loaded_meta.idf, IdfFormula::Additive);
    assert_eq!(loaded.num_documents(), 2);
}

#[test]
fn mismatched_ids_are_rejected() {
    let dir = tempdir().unwrap();
    let paths = TablePaths::new(dir.path());
    let table = tiny_table();
    save_table(&paths, &table).unwrap();
    save_doc_ids(&paths, &["only-one".to_string()]).unwrap();
    save_meta(&paths, &MetaFile::for_table(&table)).unwrap();
    assert!(load_all(&paths).is_err());
}

#[test]
fn missing_table_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(load_table(&TablePaths::new(dir.path())).is_err());
}

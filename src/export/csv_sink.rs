// src/export/csv_sink.rs
use std::path::PathBuf;

use super::TabularSink;
use crate::core::FsOps;
use crate::error::{ProspectorError, Result};

/// Local CSV file, rewritten on every export
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn encode(header: &[&str], rows: &[Vec<String>]) -> anyhow::Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(header)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e.error()))
    }
}

impl TabularSink for CsvSink {
    fn target(&self) -> String {
        self.path.display().to_string()
    }

    async fn write_table(&mut self, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
        let content = Self::encode(header, rows).map_err(ProspectorError::sink)?;

        FsOps::write_bytes_safe(&self.path, &content)
            .await
            .map_err(|e| ProspectorError::sink(format!("{:#}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::HEADER;
    use crate::store::ResultStore;
    use crate::types::SearchResult;

    fn store() -> ResultStore {
        let mut store = ResultStore::new();
        store.populate(vec![
            SearchResult::new("Ada", "CTO at Acme, Inc", "Acme, Inc", "https://x/in/ada"),
            SearchResult::new("Grace", "", "", "https://x/in/grace"),
        ]);
        store
    }

    #[tokio::test]
    async fn test_export_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("contacts.csv");
        let mut sink = CsvSink::new(path.clone());

        let written = store().export(&mut sink).await.unwrap();
        assert_eq!(written, 3);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(header, HEADER.map(String::from).to_vec());

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][1], "CTO at Acme, Inc");
        assert_eq!(&records[0][4], "Not Contacted");
        assert_eq!(&records[1][0], "Grace");
    }

    #[tokio::test]
    async fn test_repeated_export_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.csv");
        let mut sink = CsvSink::new(path.clone());
        let store = store();

        store.export(&mut sink).await.unwrap();
        let first = std::fs::read(&path).unwrap();
        store.export(&mut sink).await.unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_export_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.csv");
        std::fs::write(&path, "stale,data\n1,2\n3,4\n5,6\n7,8\n").unwrap();

        let mut empty = ResultStore::new();
        empty.populate(Vec::new());
        empty.export(&mut CsvSink::new(path.clone())).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Name,Role,Company,Profile URL,Contact Status,Message Date\n"
        );
    }

    #[tokio::test]
    async fn test_unwritable_target_is_sink_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let mut sink = CsvSink::new(blocker.join("contacts.csv"));
        let err = store().export(&mut sink).await.unwrap_err();
        assert!(matches!(err, ProspectorError::SinkUnavailable(_)));
    }
}

use crate::domain::documents::{DocumentSummary, SummaryMetadata};
use crate::domain::error::{AppError, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory of `{name}.json` document artifacts backing the mock
/// ingestion API. Names are accepted with or without the `.json`
/// suffix; non-JSON directory entries are ignored.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    fn file_path(&self, name: &str) -> PathBuf {
        let base = name.strip_suffix(".json").unwrap_or(name);
        self.root.join(format!("{}.json", base))
    }

    pub fn save(&self, name: &str, document: &Value) -> Result<PathBuf> {
        self.ensure()?;
        let path = self.file_path(name);
        fs::write(&path, serde_json::to_string_pretty(document)?)?;
        Ok(path)
    }

    pub fn read(&self, name: &str) -> Result<Value> {
        let path = self.file_path(name);
        if !path.exists() {
            return Err(AppError::NotFound(format!("document not found: {}", name)));
        }
        let raw = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.file_path(name);
        if !path.exists() {
            return Err(AppError::NotFound(format!("document not found: {}", name)));
        }
        fs::remove_file(&path)?;
        Ok(())
    }

    /// Build listing summaries the way the documents endpoint reports
    /// them: file name as id/name plus the metadata subset read out of
    /// each stored document. Unreadable entries are skipped, not fatal.
    pub fn list(&self) -> Result<Vec<DocumentSummary>> {
        let mut documents = Vec::new();
        if !self.root.exists() {
            return Ok(documents);
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
            .collect();
        paths.sort();

        for path in paths {
            let raw = match fs::read_to_string(&path) {
                Ok(raw) => raw,
                Err(_) => continue,
            };
            let doc: Value = match serde_json::from_str(&raw) {
                Ok(doc) => doc,
                Err(_) => continue,
            };
            let name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default()
                .to_string();

            documents.push(DocumentSummary {
                id: Some(name.clone()),
                name,
                doc_type: Some("loaded".to_string()),
                metadata: SummaryMetadata {
                    total_pages: doc.get("total_pages").and_then(Value::as_i64),
                    total_chunks: doc.get("total_chunks").and_then(Value::as_i64),
                    loading_method: doc
                        .get("loading_method")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    chunking_method: doc
                        .get("chunking_method")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    timestamp: doc
                        .get("timestamp")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                },
            });
        }

        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> (tempfile::TempDir, ArtifactStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_save_read_delete_cycle() {
        let (_dir, store) = store();
        let doc = json!({"total_pages": 2, "loading_method": "pymupdf", "chunks": []});

        store.save("report_pdf_pymupdf_1", &doc).unwrap();
        let read = store.read("report_pdf_pymupdf_1").unwrap();
        assert_eq!(read["total_pages"], 2);

        // Suffixed and bare names address the same artifact.
        let read = store.read("report_pdf_pymupdf_1.json").unwrap();
        assert_eq!(read["loading_method"], "pymupdf");

        store.delete("report_pdf_pymupdf_1.json").unwrap();
        assert!(matches!(
            store.read("report_pdf_pymupdf_1"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let (_dir, store) = store();
        assert!(matches!(store.delete("ghost"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_list_reads_metadata_subset_and_skips_non_json() {
        let (dir, store) = store();
        store
            .save(
                "a_doc",
                &json!({"total_pages": 3, "total_chunks": 5, "timestamp": "2024-01-01T00:00:00"}),
            )
            .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let documents = store.list().unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].name, "a_doc.json");
        assert_eq!(documents[0].metadata.total_pages, Some(3));
        assert_eq!(documents[0].metadata.total_chunks, Some(5));
        assert_eq!(documents[0].metadata.loading_method, None);
    }

    #[test]
    fn test_list_on_missing_root_is_empty() {
        let store = ArtifactStore::new("/nonexistent/docbridge-store");
        assert!(store.list().unwrap().is_empty());
    }
}

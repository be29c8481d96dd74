use crate::domain::documents::{DocumentSummary, LoadedDocument};
use crate::domain::error::Result;
use crate::infrastructure::api::IngestApi;
use std::sync::Arc;

struct CurrentDocument {
    name: String,
    document: LoadedDocument,
}

/// View state over the documents resource. The local list is a cache
/// that is discarded and re-fetched on every mutation, never spliced in
/// place, so the displayed list always matches server state.
pub struct DocumentManager {
    api: Arc<dyn IngestApi>,
    documents: Vec<DocumentSummary>,
    current: Option<CurrentDocument>,
}

impl DocumentManager {
    pub fn new(api: Arc<dyn IngestApi>) -> Self {
        Self {
            api,
            documents: Vec::new(),
            current: None,
        }
    }

    fn normalize(name: &str) -> String {
        name.strip_suffix(".json").unwrap_or(name).to_string()
    }

    /// Re-fetch the listing and replace the cache.
    pub async fn refresh(&mut self) -> Result<&[DocumentSummary]> {
        self.documents = self.api.list_documents().await?;
        Ok(&self.documents)
    }

    /// Fetch one document and make it the current view.
    pub async fn open(&mut self, name: &str) -> Result<&LoadedDocument> {
        let document = self.api.get_document(name).await?;
        tracing::info!("Fetched document: {}", name);
        let entry = self.current.insert(CurrentDocument {
            name: Self::normalize(name),
            document,
        });
        Ok(&entry.document)
    }

    /// Delete a document server-side, clear the preview when it was the
    /// one on display, then re-fetch the listing.
    pub async fn delete(&mut self, name: &str) -> Result<()> {
        self.api.delete_document(name).await?;
        tracing::info!("Deleted document: {}", name);

        let normalized = Self::normalize(name);
        if self
            .current
            .as_ref()
            .map(|current| current.name == normalized)
            .unwrap_or(false)
        {
            self.current = None;
        }

        self.refresh().await?;
        Ok(())
    }

    pub fn documents(&self) -> &[DocumentSummary] {
        &self.documents
    }

    pub fn current(&self) -> Option<&LoadedDocument> {
        self.current.as_ref().map(|current| &current.document)
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_ref().map(|current| current.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::documents::ParsedDocument;
    use crate::domain::error::AppError;
    use crate::domain::parsing::ParseRequest;
    use crate::domain::upload::UploadRequest;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory documents resource.
    struct FakeDocumentsApi {
        names: Mutex<Vec<String>>,
    }

    impl FakeDocumentsApi {
        fn with(names: &[&str]) -> Self {
            Self {
                names: Mutex::new(names.iter().map(|n| n.to_string()).collect()),
            }
        }
    }

    #[async_trait]
    impl IngestApi for FakeDocumentsApi {
        async fn load(&self, _request: &UploadRequest) -> Result<LoadedDocument> {
            Ok(LoadedDocument::default())
        }

        async fn parse(&self, _request: &ParseRequest) -> Result<ParsedDocument> {
            Ok(ParsedDocument::default())
        }

        async fn list_documents(&self) -> Result<Vec<DocumentSummary>> {
            Ok(self
                .names
                .lock()
                .unwrap()
                .iter()
                .map(|name| DocumentSummary {
                    id: Some(name.clone()),
                    name: name.clone(),
                    ..DocumentSummary::default()
                })
                .collect())
        }

        async fn get_document(&self, name: &str) -> Result<LoadedDocument> {
            let wanted = name.strip_suffix(".json").unwrap_or(name);
            let names = self.names.lock().unwrap();
            if !names.iter().any(|n| n.strip_suffix(".json").unwrap_or(n) == wanted) {
                return Err(AppError::Api(404, "Document not found".to_string()));
            }
            Ok(LoadedDocument {
                filename: Some(name.to_string()),
                ..LoadedDocument::default()
            })
        }

        async fn delete_document(&self, name: &str) -> Result<()> {
            let wanted = name.strip_suffix(".json").unwrap_or(name).to_string();
            let mut names = self.names.lock().unwrap();
            names.retain(|n| n.strip_suffix(".json").unwrap_or(n) != wanted);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_delete_clears_current_and_refetches() {
        let api = Arc::new(FakeDocumentsApi::with(&["a.json", "b.json"]));
        let mut manager = DocumentManager::new(api);

        manager.refresh().await.unwrap();
        assert_eq!(manager.documents().len(), 2);

        manager.open("a.json").await.unwrap();
        assert!(manager.current().is_some());

        manager.delete("a").await.unwrap();
        assert!(manager.current().is_none());
        let names: Vec<&str> = manager.documents().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["b.json"]);
    }

    #[tokio::test]
    async fn test_deleting_another_document_keeps_the_preview() {
        let api = Arc::new(FakeDocumentsApi::with(&["a.json", "b.json"]));
        let mut manager = DocumentManager::new(api);

        manager.open("a").await.unwrap();
        manager.delete("b.json").await.unwrap();

        assert_eq!(manager.current_name(), Some("a"));
        assert_eq!(manager.documents().len(), 1);
    }

    #[tokio::test]
    async fn test_open_missing_document_surfaces_the_status() {
        let api = Arc::new(FakeDocumentsApi::with(&[]));
        let mut manager = DocumentManager::new(api);

        let err = manager.open("ghost").await.unwrap_err();
        match err {
            AppError::Api(status, _) => assert_eq!(status, 404),
            other => panic!("expected api error, got {:?}", other),
        }
        assert!(manager.current().is_none());
    }
}

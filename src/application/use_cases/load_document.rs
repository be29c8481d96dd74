use crate::domain::documents::LoadedDocument;
use crate::domain::error::Result;
use crate::domain::upload::{LoaderOptions, UploadForm};
use crate::infrastructure::api::IngestApi;
use std::sync::Arc;

/// Load workflow: validate the form, build the multipart submission and
/// hand the response back for rendering. Exactly one request per
/// execute call, awaited to completion; taking `&mut self` rules out a
/// second submission from the same form while one is in flight.
pub struct LoadDocumentUseCase {
    api: Arc<dyn IngestApi>,
}

impl LoadDocumentUseCase {
    pub fn new(api: Arc<dyn IngestApi>) -> Self {
        Self { api }
    }

    pub async fn execute(
        &mut self,
        form: UploadForm,
        options: LoaderOptions,
    ) -> Result<LoadedDocument> {
        let request = form.into_request(options)?;

        tracing::info!(
            "Loading {} (type={}, method={})",
            request.file_name,
            request.file_type,
            request.method
        );

        let document = self.api.load(&request).await?;

        tracing::info!(
            "Loaded {} with {} chunks",
            request.file_name,
            document.chunks.len()
        );

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::documents::{DocumentSummary, ParsedDocument};
    use crate::domain::error::AppError;
    use crate::domain::parsing::ParseRequest;
    use crate::domain::upload::UploadRequest;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingApi {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IngestApi for CountingApi {
        async fn load(&self, _request: &UploadRequest) -> Result<LoadedDocument> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(LoadedDocument::default())
        }

        async fn parse(&self, _request: &ParseRequest) -> Result<ParsedDocument> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ParsedDocument::default())
        }

        async fn list_documents(&self) -> Result<Vec<DocumentSummary>> {
            Ok(Vec::new())
        }

        async fn get_document(&self, _name: &str) -> Result<LoadedDocument> {
            Ok(LoadedDocument::default())
        }

        async fn delete_document(&self, _name: &str) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_missing_file_never_touches_the_api() {
        let api = Arc::new(CountingApi::default());
        let mut use_case = LoadDocumentUseCase::new(api.clone());

        let err = use_case
            .execute(UploadForm::new(), LoaderOptions::Simple)
            .await
            .unwrap_err();

        match err {
            AppError::Validation(msg) => assert!(!msg.is_empty()),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_form_issues_exactly_one_request() {
        let api = Arc::new(CountingApi::default());
        let mut use_case = LoadDocumentUseCase::new(api.clone());

        let mut form = UploadForm::new();
        form.set_file("report.pdf", vec![1, 2, 3]);
        use_case
            .execute(form, LoaderOptions::Simple)
            .await
            .unwrap();

        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }
}

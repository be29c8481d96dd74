use crate::domain::documents::ParsedDocument;
use crate::domain::error::Result;
use crate::domain::parsing::ParsingOption;
use crate::domain::upload::UploadForm;
use crate::infrastructure::api::IngestApi;
use std::sync::Arc;

/// Parse workflow. Same shape as the load workflow but with the
/// extraction toggles and the parsing-option enumeration instead of
/// loader options.
pub struct ParseDocumentUseCase {
    api: Arc<dyn IngestApi>,
}

impl ParseDocumentUseCase {
    pub fn new(api: Arc<dyn IngestApi>) -> Self {
        Self { api }
    }

    pub async fn execute(
        &mut self,
        form: UploadForm,
        option: ParsingOption,
        extract_images: bool,
        extract_tables: bool,
    ) -> Result<ParsedDocument> {
        let request = form.into_parse_request(option, extract_images, extract_tables)?;

        tracing::info!(
            "Parsing {} (type={}, option={})",
            request.file_name,
            request.file_type,
            request.option
        );

        let document = self.api.parse(&request).await?;

        tracing::info!(
            "Parsed {} into {} content blocks",
            request.file_name,
            document.content.len()
        );

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::documents::{DocumentSummary, LoadedDocument};
    use crate::domain::error::AppError;
    use crate::domain::file_type::FileType;
    use crate::domain::parsing::ParseRequest;
    use crate::domain::upload::UploadRequest;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records the option of the last parse submission.
    #[derive(Default)]
    struct RecordingApi {
        seen: Mutex<Vec<ParsingOption>>,
    }

    #[async_trait]
    impl IngestApi for RecordingApi {
        async fn load(&self, _request: &UploadRequest) -> Result<LoadedDocument> {
            Ok(LoadedDocument::default())
        }

        async fn parse(&self, request: &ParseRequest) -> Result<ParsedDocument> {
            self.seen.lock().unwrap().push(request.option);
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
    async fn test_invalid_option_for_type_is_blocked_client_side() {
        let api = Arc::new(RecordingApi::default());
        let mut use_case = ParseDocumentUseCase::new(api.clone());

        let mut form = UploadForm::new();
        form.set_file("notes.txt", vec![0]);
        let err = use_case
            .execute(form, ParsingOption::ImagesOnly, true, true)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(api.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_option_defaults_follow_the_inferred_type() {
        let api = Arc::new(RecordingApi::default());
        let mut use_case = ParseDocumentUseCase::new(api.clone());

        let mut form = UploadForm::new();
        form.set_file("report.pdf", vec![0]);
        let option = ParsingOption::default_for(form.file_type().unwrap_or(FileType::Other))
            .expect("pdf has a default parsing option");
        use_case.execute(form, option, true, true).await.unwrap();

        assert_eq!(
            api.seen.lock().unwrap().as_slice(),
            &[ParsingOption::Comprehensive]
        );
    }
}

use crate::domain::documents::{
    DocumentList, DocumentSummary, LoadResponse, LoadedDocument, ParseResponse, ParsedDocument,
};
use crate::domain::error::{AppError, Result};
use crate::domain::parsing::ParseRequest;
use crate::domain::upload::{FormField, FormValue, UploadRequest};
use crate::infrastructure::config::ClientConfig;
use async_trait::async_trait;
use reqwest::multipart;
use serde::de::DeserializeOwned;

/// Seam between the workflows and the ingestion API. The HTTP client
/// below is the production implementation; tests substitute in-memory
/// fakes.
#[async_trait]
pub trait IngestApi: Send + Sync {
    async fn load(&self, request: &UploadRequest) -> Result<LoadedDocument>;
    async fn parse(&self, request: &ParseRequest) -> Result<ParsedDocument>;
    async fn list_documents(&self) -> Result<Vec<DocumentSummary>>;
    async fn get_document(&self, name: &str) -> Result<LoadedDocument>;
    async fn delete_document(&self, name: &str) -> Result<()>;
}

pub struct HttpIngestClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpIngestClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Document names are accepted with or without the `.json` suffix.
    fn normalize(name: &str) -> &str {
        name.strip_suffix(".json").unwrap_or(name)
    }

    fn multipart_form(fields: Vec<FormField>, bytes: &[u8]) -> multipart::Form {
        let mut form = multipart::Form::new();
        for field in fields {
            form = match field.value {
                FormValue::Text(value) => form.text(field.name, value),
                FormValue::File { file_name } => form.part(
                    field.name,
                    multipart::Part::bytes(bytes.to_vec()).file_name(file_name),
                ),
            };
        }
        form
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Api(status.as_u16(), text));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Decode(format!("Failed to parse JSON: {}", e)))
    }
}

#[async_trait]
impl IngestApi for HttpIngestClient {
    async fn load(&self, request: &UploadRequest) -> Result<LoadedDocument> {
        let form = Self::multipart_form(request.fields()?, &request.bytes);

        let response = self
            .client
            .post(self.endpoint("load"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Request failed: {}", e)))?;

        let body: LoadResponse = Self::decode(response).await?;
        Ok(body.loaded_content)
    }

    async fn parse(&self, request: &ParseRequest) -> Result<ParsedDocument> {
        let form = Self::multipart_form(request.fields(), &request.bytes);

        let response = self
            .client
            .post(self.endpoint("parse"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Request failed: {}", e)))?;

        let body: ParseResponse = Self::decode(response).await?;
        Ok(body.parsed_content)
    }

    async fn list_documents(&self) -> Result<Vec<DocumentSummary>> {
        let response = self
            .client
            .get(self.endpoint("documents"))
            .query(&[("type", "loaded")])
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Request failed: {}", e)))?;

        let body: DocumentList = Self::decode(response).await?;
        Ok(body.documents)
    }

    async fn get_document(&self, name: &str) -> Result<LoadedDocument> {
        let path = format!("documents/{}.json", Self::normalize(name));
        let response = self
            .client
            .get(self.endpoint(&path))
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Request failed: {}", e)))?;

        Self::decode(response).await
    }

    async fn delete_document(&self, name: &str) -> Result<()> {
        let path = format!("documents/{}", Self::normalize(name));
        let response = self
            .client
            .delete(self.endpoint(&path))
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Api(status.as_u16(), text));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = ClientConfig {
            base_url: "http://localhost:8000/".to_string(),
            timeout_secs: 1,
        };
        let client = HttpIngestClient::new(&config);
        assert_eq!(client.endpoint("load"), "http://localhost:8000/load");
        assert_eq!(
            client.endpoint("documents/a.json"),
            "http://localhost:8000/documents/a.json"
        );
    }

    #[test]
    fn test_normalize_strips_json_suffix_once() {
        assert_eq!(HttpIngestClient::normalize("doc.json"), "doc");
        assert_eq!(HttpIngestClient::normalize("doc"), "doc");
        assert_eq!(HttpIngestClient::normalize("doc.json.json"), "doc.json");
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response payloads of the ingestion API. Every metadata field is
/// individually optional: the renderer substitutes placeholders for
/// anything absent instead of failing the whole payload.

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoadedDocument {
    pub filename: Option<String>,
    pub document_type: Option<String>,
    pub total_chunks: Option<i64>,
    pub total_pages: Option<i64>,
    pub loading_method: Option<String>,
    pub loading_strategy: Option<String>,
    pub chunking_strategy: Option<String>,
    pub chunking_method: Option<String>,
    pub timestamp: Option<String>,
    pub delimiter: Option<String>,
    pub encoding: Option<String>,
    pub chunks: Vec<Chunk>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Chunk {
    pub content: String,
    pub metadata: ChunkMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChunkMetadata {
    pub chunk_id: Option<i64>,
    pub page_number: Option<i64>,
    pub word_count: Option<i64>,
    pub page_range: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DocumentSummary {
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    pub metadata: SummaryMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SummaryMetadata {
    pub total_pages: Option<i64>,
    pub total_chunks: Option<i64>,
    pub loading_method: Option<String>,
    pub chunking_method: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DocumentList {
    pub documents: Vec<DocumentSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParsedDocument {
    pub metadata: ParsedMetadata,
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParsedMetadata {
    pub filename: Option<String>,
    pub file_type: Option<String>,
    pub parsing_method: Option<String>,
    pub total_pages: Option<i64>,
    pub timestamp: Option<String>,
}

/// One typed unit of parsed output. The wire `type` is an open string;
/// the backend emits `text`/`table`/`image` but also `Text`, `Page`,
/// `section` and `code` depending on the parsing option, so the client
/// classifies rather than enumerating.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub content: String,
    pub page: Option<i64>,
    pub title: Option<String>,
    pub metadata: BlockMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BlockMetadata {
    pub content_type: Option<String>,
    pub image_id: Option<String>,
    pub extraction_method: Option<String>,
    pub table_id: Option<String>,
    pub rows: Option<i64>,
    pub columns: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Text,
    Table,
    Image,
    Other,
}

impl ContentBlock {
    pub fn kind(&self) -> BlockKind {
        if self.block_type.eq_ignore_ascii_case("text") {
            BlockKind::Text
        } else if self.block_type.eq_ignore_ascii_case("table") {
            BlockKind::Table
        } else if self.block_type.eq_ignore_ascii_case("image") {
            BlockKind::Image
        } else {
            BlockKind::Other
        }
    }
}

/// Wire envelopes.

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoadResponse {
    pub loaded_content: LoadedDocument,
    pub filepath: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParseResponse {
    pub parsed_content: ParsedDocument,
}

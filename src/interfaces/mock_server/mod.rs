//! Mock implementation of the document-ingestion API.
//!
//! Serves the five contract endpoints against a directory of JSON
//! artifacts so the client can be exercised end-to-end without the real
//! processing backend. Load and parse fabricate contract-shaped
//! responses from the submitted form fields; the actual text extraction
//! engines live server-side and are out of scope here.

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{delete, get, post, web, App, HttpResponse, HttpServer, Responder};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::error::AppError;
use crate::infrastructure::artifact_store::ArtifactStore;

#[derive(Debug, Clone)]
pub struct MockServerConfig {
    pub port: u16,
    pub store_dir: PathBuf,
}

impl Default for MockServerConfig {
    fn default() -> Self {
        Self {
            port: 4010,
            store_dir: PathBuf::from("01-loaded-docs"),
        }
    }
}

pub struct MockState {
    pub store: ArtifactStore,
}

// Text fields of a multipart body: the disposition names a field with
// no filename, the value follows the blank line. Good enough for mock
// traffic; the file payload itself is never interpreted.
static FORM_FIELD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"name="([a-z_]+)"\r\n\r\n([^\r]*)"#).unwrap());

static FILENAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r#"filename="([^"]+)""#).unwrap());

fn form_fields(body: &str) -> HashMap<String, String> {
    FORM_FIELD_PATTERN
        .captures_iter(body)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

fn uploaded_filename(body: &str) -> Option<String> {
    FILENAME_PATTERN
        .captures(body)
        .map(|caps| caps[1].to_string())
}

/// Artifact name in the original backend's shape:
/// `{base}_{type}_{method}[_{chunking}]_{timestamp}`.
fn document_name(
    filename: &str,
    file_type: &str,
    loading_method: &str,
    chunking_strategy: Option<&str>,
) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("document");
    let base = stem.split('_').next().unwrap_or(stem);
    let timestamp = Utc::now().format("%Y%m%d%H%M%S");

    match chunking_strategy {
        Some(chunking) => format!(
            "{}_{}_{}_{}_{}",
            base, file_type, loading_method, chunking, timestamp
        ),
        None => format!("{}_{}_{}_{}", base, file_type, loading_method, timestamp),
    }
}

fn fabricated_chunk(filename: &str) -> Value {
    let content = format!("Mock extracted content from {}", filename);
    let word_count = content.split_whitespace().count();
    json!({
        "content": content,
        "metadata": {
            "chunk_id": 1,
            "page_number": 1,
            "page_range": "1",
            "word_count": word_count
        }
    })
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(rename = "type", default = "default_list_type")]
    doc_type: String,
}

fn default_list_type() -> String {
    "all".to_string()
}

#[get("/documents")]
async fn list_documents(
    state: web::Data<MockState>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    // Only loaded documents exist in this store.
    if query.doc_type != "loaded" && query.doc_type != "all" {
        return HttpResponse::Ok().json(json!({ "documents": [] }));
    }

    match state.store.list() {
        Ok(documents) => HttpResponse::Ok().json(json!({ "documents": documents })),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

#[get("/documents/{name}")]
async fn get_document(state: web::Data<MockState>, path: web::Path<String>) -> impl Responder {
    match state.store.read(&path) {
        Ok(document) => HttpResponse::Ok().json(document),
        Err(AppError::NotFound(_)) => {
            HttpResponse::NotFound().json(json!({ "detail": "Document not found" }))
        }
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

#[delete("/documents/{name}")]
async fn delete_document(state: web::Data<MockState>, path: web::Path<String>) -> impl Responder {
    match state.store.delete(&path) {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": format!("Document {} deleted successfully", path.as_str())
        })),
        Err(AppError::NotFound(_)) => {
            HttpResponse::NotFound().json(json!({ "detail": "Document not found" }))
        }
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

#[post("/load")]
async fn load_file(state: web::Data<MockState>, body: web::Bytes) -> impl Responder {
    let text = String::from_utf8_lossy(&body);
    let fields = form_fields(&text);

    let loading_method = match fields.get("loading_method") {
        Some(method) => method.clone(),
        None => {
            return HttpResponse::UnprocessableEntity()
                .json(json!({ "detail": "Missing loading_method" }))
        }
    };
    let filename = uploaded_filename(&text).unwrap_or_else(|| "upload.bin".to_string());
    let file_type = fields
        .get("file_type")
        .cloned()
        .unwrap_or_else(|| "pdf".to_string());
    let chunking_strategy = fields.get("chunking_strategy").cloned();

    let name = document_name(
        &filename,
        &file_type,
        &loading_method,
        chunking_strategy.as_deref(),
    );
    let chunk = fabricated_chunk(&filename);

    let mut document = json!({
        "filename": filename,
        "document_type": file_type,
        "total_chunks": 1,
        "total_pages": 1,
        "loading_method": loading_method,
        "loading_strategy": fields.get("strategy"),
        "chunking_strategy": chunking_strategy,
        "chunking_method": "loaded",
        "timestamp": Utc::now().to_rfc3339(),
        "chunks": [chunk]
    });
    if let Some(delimiter) = fields.get("delimiter") {
        document["delimiter"] = json!(delimiter);
    }
    if let Some(encoding) = fields.get("encoding") {
        document["encoding"] = json!(encoding);
    }
    match state.store.save(&name, &document) {
        Ok(path) => HttpResponse::Ok().json(json!({
            "loaded_content": document,
            "filepath": path.to_string_lossy()
        })),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

#[post("/parse")]
async fn parse_file(body: web::Bytes) -> impl Responder {
    let text = String::from_utf8_lossy(&body);
    let fields = form_fields(&text);

    let parsing_option = match fields.get("parsing_option") {
        Some(option) => option.clone(),
        None => {
            return HttpResponse::UnprocessableEntity()
                .json(json!({ "detail": "Missing parsing_option" }))
        }
    };
    let filename = uploaded_filename(&text).unwrap_or_else(|| "upload.bin".to_string());
    let file_type = fields
        .get("file_type")
        .cloned()
        .unwrap_or_else(|| "pdf".to_string());
    let extract_images = fields
        .get("extract_images")
        .map(|value| value == "true")
        .unwrap_or(true);
    let extract_tables = fields
        .get("extract_tables")
        .map(|value| value == "true")
        .unwrap_or(true);

    let mut content = vec![json!({
        "type": "text",
        "content": format!("Mock extracted content from {}", filename),
        "page": 1,
        "metadata": { "content_type": "text", "page_number": 1 }
    })];
    if extract_tables {
        content.push(json!({
            "type": "table",
            "content": "| a | b |\n| --- | --- |\n| 1 | 2 |",
            "page": 1,
            "metadata": {
                "content_type": "table",
                "table_id": "mock_table_1",
                "rows": 1,
                "columns": 2,
                "extraction_method": "mock"
            }
        }));
    }
    if extract_images {
        content.push(json!({
            "type": "image",
            "content": "Mock OCR text",
            "page": 1,
            "metadata": {
                "content_type": "image",
                "image_id": "img_1",
                "extraction_method": "mock"
            }
        }));
    }

    HttpResponse::Ok().json(json!({
        "parsed_content": {
            "metadata": {
                "filename": filename,
                "file_type": file_type,
                "parsing_method": parsing_option,
                "total_pages": 1,
                "timestamp": Utc::now().to_rfc3339()
            },
            "content": content
        }
    }))
}

pub fn start_server(config: MockServerConfig) -> std::io::Result<Server> {
    let store = ArtifactStore::new(&config.store_dir);
    store
        .ensure()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let state = web::Data::new(MockState { store });

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .service(list_documents)
            .service(get_document)
            .service(delete_document)
            .service(load_file)
            .service(parse_file)
    })
    .bind(("127.0.0.1", config.port))?
    .run();

    Ok(server)
}

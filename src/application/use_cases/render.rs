use crate::domain::documents::{
    BlockKind, ContentBlock, DocumentSummary, LoadedDocument, ParsedDocument,
};

/// Pure projections from response payloads to display lines. Missing
/// metadata renders as a placeholder, never an error, and ordering is
/// preserved exactly as received.

const PLACEHOLDER: &str = "-";

fn show_count(value: Option<i64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn show_text(value: Option<&str>) -> &str {
    match value {
        Some(text) if !text.is_empty() => text,
        _ => PLACEHOLDER,
    }
}

/// Label of one parsed content block, e.g. `文本 - 页 1`. Unknown block
/// types fall back to the raw type string.
pub fn block_label(block: &ContentBlock) -> String {
    let kind = match block.kind() {
        BlockKind::Text => "文本",
        BlockKind::Table => "表格",
        BlockKind::Image => "图片",
        BlockKind::Other => show_text(Some(block.block_type.as_str())),
    };
    format!("{} - 页 {}", kind, show_count(block.page))
}

pub fn loaded_header_lines(document: &LoadedDocument) -> Vec<String> {
    vec![
        format!("文档: {}", show_text(document.filename.as_deref())),
        format!(
            "类型: {} · 加载方式: {} · 分块方式: {}",
            show_text(document.document_type.as_deref()),
            show_text(document.loading_method.as_deref()),
            show_text(document.chunking_method.as_deref()),
        ),
        format!(
            "总页数: {} · 总块数: {}",
            show_count(document.total_pages),
            show_count(document.total_chunks),
        ),
        format!("时间: {}", show_text(document.timestamp.as_deref())),
    ]
}

/// One rendered block per chunk, in response order.
pub fn chunk_blocks(document: &LoadedDocument) -> Vec<String> {
    document
        .chunks
        .iter()
        .map(|chunk| {
            let pages = chunk
                .metadata
                .page_range
                .clone()
                .or_else(|| chunk.metadata.page_number.map(|p| p.to_string()))
                .unwrap_or_else(|| PLACEHOLDER.to_string());
            format!(
                "块 {} · 页 {} · {} 词\n{}",
                show_count(chunk.metadata.chunk_id),
                pages,
                show_count(chunk.metadata.word_count),
                chunk.content,
            )
        })
        .collect()
}

pub fn parsed_header_lines(document: &ParsedDocument) -> Vec<String> {
    let metadata = &document.metadata;
    vec![
        format!("文档: {}", show_text(metadata.filename.as_deref())),
        format!(
            "类型: {} · 解析方式: {} · 总页数: {}",
            show_text(metadata.file_type.as_deref()),
            show_text(metadata.parsing_method.as_deref()),
            show_count(metadata.total_pages),
        ),
        format!("时间: {}", show_text(metadata.timestamp.as_deref())),
    ]
}

/// One rendered block per content item, in response order.
pub fn parsed_blocks(document: &ParsedDocument) -> Vec<String> {
    document
        .content
        .iter()
        .map(|block| {
            let mut lines = vec![block_label(block)];
            if let Some(title) = &block.title {
                lines.push(format!("标题: {}", title));
            }
            match block.kind() {
                BlockKind::Table => lines.push(format!(
                    "表格 {} · {} 行 × {} 列",
                    show_text(block.metadata.table_id.as_deref()),
                    show_count(block.metadata.rows),
                    show_count(block.metadata.columns),
                )),
                BlockKind::Image => lines.push(format!(
                    "图像 {} · 提取方式: {}",
                    show_text(block.metadata.image_id.as_deref()),
                    show_text(block.metadata.extraction_method.as_deref()),
                )),
                _ => {}
            }
            lines.push(block.content.clone());
            lines.join("\n")
        })
        .collect()
}

/// Listing view; one line per document.
pub fn summary_lines(documents: &[DocumentSummary]) -> Vec<String> {
    if documents.is_empty() {
        return vec!["暂无文档".to_string()];
    }
    documents
        .iter()
        .map(|doc| {
            format!(
                "{} · 页 {} · 块 {} · {} · {}",
                show_text(Some(doc.name.as_str())),
                show_count(doc.metadata.total_pages),
                show_count(doc.metadata.total_chunks),
                show_text(doc.metadata.loading_method.as_deref()),
                show_text(doc.metadata.timestamp.as_deref()),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::documents::{Chunk, ChunkMetadata, ParsedMetadata, SummaryMetadata};

    fn text_block(content: &str, page: Option<i64>) -> ContentBlock {
        ContentBlock {
            block_type: "text".to_string(),
            content: content.to_string(),
            page,
            ..ContentBlock::default()
        }
    }

    #[test]
    fn test_text_block_label_matches_ui_format() {
        assert_eq!(block_label(&text_block("...", Some(1))), "文本 - 页 1");
    }

    #[test]
    fn test_missing_page_renders_placeholder() {
        assert_eq!(block_label(&text_block("...", None)), "文本 - 页 -");
    }

    #[test]
    fn test_unknown_block_type_falls_back_to_raw_label() {
        let block = ContentBlock {
            block_type: "section".to_string(),
            page: Some(2),
            ..ContentBlock::default()
        };
        assert_eq!(block_label(&block), "section - 页 2");
    }

    #[test]
    fn test_n_chunks_render_as_n_blocks_in_order() {
        let document = LoadedDocument {
            chunks: (1..=3)
                .map(|i| Chunk {
                    content: format!("chunk {}", i),
                    metadata: ChunkMetadata {
                        chunk_id: Some(i),
                        page_number: Some(i),
                        ..ChunkMetadata::default()
                    },
                })
                .collect(),
            ..LoadedDocument::default()
        };

        let blocks = chunk_blocks(&document);
        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].contains("chunk 1"));
        assert!(blocks[2].contains("chunk 3"));
    }

    #[test]
    fn test_parsed_blocks_preserve_order_and_count() {
        let document = ParsedDocument {
            metadata: ParsedMetadata {
                file_type: Some("pdf".to_string()),
                ..ParsedMetadata::default()
            },
            content: vec![
                text_block("first", Some(1)),
                ContentBlock {
                    block_type: "table".to_string(),
                    content: "|a|b|".to_string(),
                    page: Some(2),
                    ..ContentBlock::default()
                },
            ],
        };

        let blocks = parsed_blocks(&document);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("文本 - 页 1"));
        assert!(blocks[1].starts_with("表格 - 页 2"));
    }

    #[test]
    fn test_header_substitutes_placeholders_for_missing_fields() {
        let lines = loaded_header_lines(&LoadedDocument::default());
        assert_eq!(lines[0], "文档: -");
        assert!(lines[2].contains("总页数: -"));
    }

    #[test]
    fn test_empty_listing_has_an_empty_state_line() {
        assert_eq!(summary_lines(&[]), vec!["暂无文档".to_string()]);
    }

    #[test]
    fn test_listing_line_carries_metadata_subset() {
        let docs = vec![DocumentSummary {
            id: Some("a.json".to_string()),
            name: "a.json".to_string(),
            doc_type: Some("loaded".to_string()),
            metadata: SummaryMetadata {
                total_pages: Some(4),
                total_chunks: Some(9),
                loading_method: Some("pymupdf".to_string()),
                chunking_method: None,
                timestamp: None,
            },
        }];
        let lines = summary_lines(&docs);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("a.json"));
        assert!(lines[0].contains("页 4"));
        assert!(lines[0].contains("块 9"));
        assert!(lines[0].contains("pymupdf"));
    }
}

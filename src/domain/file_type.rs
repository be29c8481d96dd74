use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Document type as understood by the ingestion API, derived from the
/// file extension. Unmatched extensions fall through to `Other` instead
/// of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Txt,
    Csv,
    Md,
    Other,
}

impl FileType {
    /// Infer the document type from a file name. Pure and synchronous;
    /// extension matching is case-insensitive with the precedence
    /// pdf -> txt -> csv -> md/markdown -> other.
    pub fn infer(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match ext.as_deref() {
            Some("pdf") => FileType::Pdf,
            Some("txt") => FileType::Txt,
            Some("csv") => FileType::Csv,
            Some("md") | Some("markdown") => FileType::Md,
            _ => FileType::Other,
        }
    }

    /// Wire name used by the `/load` endpoint.
    pub fn load_field(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Txt => "txt",
            FileType::Csv => "csv",
            FileType::Md => "md",
            FileType::Other => "other",
        }
    }

    /// Wire name used by the `/parse` endpoint. The parse side of the
    /// API spells markdown out in full.
    pub fn parse_field(&self) -> &'static str {
        match self {
            FileType::Md => "markdown",
            other => other.load_field(),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.load_field())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_known_extensions() {
        assert_eq!(FileType::infer("report.pdf"), FileType::Pdf);
        assert_eq!(FileType::infer("notes.txt"), FileType::Txt);
        assert_eq!(FileType::infer("data.csv"), FileType::Csv);
        assert_eq!(FileType::infer("readme.md"), FileType::Md);
        assert_eq!(FileType::infer("readme.markdown"), FileType::Md);
    }

    #[test]
    fn test_infer_is_case_insensitive() {
        assert_eq!(FileType::infer("REPORT.PDF"), FileType::Pdf);
        assert_eq!(FileType::infer("Data.Csv"), FileType::Csv);
    }

    #[test]
    fn test_infer_falls_through_to_other() {
        assert_eq!(FileType::infer("archive.zip"), FileType::Other);
        assert_eq!(FileType::infer("no_extension"), FileType::Other);
        assert_eq!(FileType::infer(""), FileType::Other);
    }

    #[test]
    fn test_infer_is_idempotent() {
        for name in ["report.pdf", "data.csv", "weird.bin"] {
            assert_eq!(FileType::infer(name), FileType::infer(name));
        }
    }

    #[test]
    fn test_parse_field_spells_markdown_out() {
        assert_eq!(FileType::Md.load_field(), "md");
        assert_eq!(FileType::Md.parse_field(), "markdown");
        assert_eq!(FileType::Pdf.parse_field(), "pdf");
    }
}

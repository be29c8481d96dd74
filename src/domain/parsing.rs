use crate::domain::error::{AppError, Result};
use crate::domain::file_type::FileType;
use crate::domain::upload::{FormField, LoadingMethod, UploadForm};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Extraction mode applied by the server after loading. The set of
/// valid options depends on the document type: PDF supports all seven,
/// markdown three, plain text only text_only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsingOption {
    Comprehensive,
    TextOnly,
    TablesOnly,
    ImagesOnly,
    ByPages,
    ByTitles,
    TextAndTables,
}

impl ParsingOption {
    pub fn field(&self) -> &'static str {
        match self {
            ParsingOption::Comprehensive => "comprehensive",
            ParsingOption::TextOnly => "text_only",
            ParsingOption::TablesOnly => "tables_only",
            ParsingOption::ImagesOnly => "images_only",
            ParsingOption::ByPages => "by_pages",
            ParsingOption::ByTitles => "by_titles",
            ParsingOption::TextAndTables => "text_and_tables",
        }
    }

    pub fn allowed_for(file_type: FileType) -> &'static [ParsingOption] {
        match file_type {
            FileType::Pdf => &[
                ParsingOption::Comprehensive,
                ParsingOption::TextOnly,
                ParsingOption::TablesOnly,
                ParsingOption::ImagesOnly,
                ParsingOption::ByPages,
                ParsingOption::ByTitles,
                ParsingOption::TextAndTables,
            ],
            FileType::Md => &[
                ParsingOption::Comprehensive,
                ParsingOption::TextOnly,
                ParsingOption::TablesOnly,
            ],
            FileType::Txt => &[ParsingOption::TextOnly],
            FileType::Csv | FileType::Other => &[],
        }
    }

    pub fn default_for(file_type: FileType) -> Option<ParsingOption> {
        ParsingOption::allowed_for(file_type).first().copied()
    }
}

impl fmt::Display for ParsingOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// A fully validated `/parse` submission.
#[derive(Debug, Clone)]
pub struct ParseRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub file_type: FileType,
    pub method: LoadingMethod,
    pub option: ParsingOption,
    pub extract_images: bool,
    pub extract_tables: bool,
}

impl ParseRequest {
    pub fn new(
        file_name: String,
        bytes: Vec<u8>,
        file_type: FileType,
        method: LoadingMethod,
        option: ParsingOption,
        extract_images: bool,
        extract_tables: bool,
    ) -> Result<Self> {
        if !LoadingMethod::allowed_for(file_type).contains(&method) {
            return Err(AppError::Validation(format!(
                "loading method '{}' is not valid for {} files",
                method, file_type
            )));
        }
        if !ParsingOption::allowed_for(file_type).contains(&option) {
            return Err(AppError::Validation(format!(
                "parsing option '{}' is not valid for {} files",
                option, file_type
            )));
        }

        Ok(Self {
            file_name,
            bytes,
            file_type,
            method,
            option,
            extract_images,
            extract_tables,
        })
    }

    /// Multipart field list. The parse endpoint takes no conditional
    /// branching beyond the option enumeration itself.
    pub fn fields(&self) -> Vec<FormField> {
        vec![
            FormField::file("file", self.file_name.clone()),
            FormField::text("loading_method", self.method.field()),
            FormField::text("parsing_option", self.option.field()),
            FormField::text("file_type", self.file_type.parse_field()),
            FormField::text(
                "extract_images",
                if self.extract_images { "true" } else { "false" },
            ),
            FormField::text(
                "extract_tables",
                if self.extract_tables { "true" } else { "false" },
            ),
        ]
    }
}

impl UploadForm {
    /// Turn the shared form state into a parse submission. Fails fast
    /// with a localized status message when no file or method has been
    /// selected, before anything touches the network.
    pub fn into_parse_request(
        self,
        option: ParsingOption,
        extract_images: bool,
        extract_tables: bool,
    ) -> Result<ParseRequest> {
        let (name, bytes, file_type, method) = self.take_parts()?;
        ParseRequest::new(
            name,
            bytes,
            file_type,
            method,
            option,
            extract_images,
            extract_tables,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_set_sizes_per_file_type() {
        assert_eq!(ParsingOption::allowed_for(FileType::Pdf).len(), 7);
        assert_eq!(ParsingOption::allowed_for(FileType::Md).len(), 3);
        assert_eq!(ParsingOption::allowed_for(FileType::Txt).len(), 1);
        assert!(ParsingOption::allowed_for(FileType::Csv).is_empty());
    }

    #[test]
    fn test_txt_only_supports_text_only() {
        assert_eq!(
            ParsingOption::default_for(FileType::Txt),
            Some(ParsingOption::TextOnly)
        );
        assert!(ParseRequest::new(
            "notes.txt".to_string(),
            vec![0],
            FileType::Txt,
            LoadingMethod::Basic,
            ParsingOption::TablesOnly,
            true,
            true,
        )
        .is_err());
    }

    #[test]
    fn test_parse_fields_are_complete_and_ordered() {
        let request = ParseRequest::new(
            "readme.md".to_string(),
            vec![0],
            FileType::Md,
            LoadingMethod::Basic,
            ParsingOption::TablesOnly,
            false,
            true,
        )
        .unwrap();

        let fields = request.fields();
        let names: Vec<&str> = fields.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec![
                "file",
                "loading_method",
                "parsing_option",
                "file_type",
                "extract_images",
                "extract_tables"
            ]
        );

        let file_type = fields.iter().find(|f| f.name == "file_type").unwrap();
        assert_eq!(file_type.text_value(), Some("markdown"));
        let images = fields.iter().find(|f| f.name == "extract_images").unwrap();
        assert_eq!(images.text_value(), Some("false"));
    }

    #[test]
    fn test_form_without_selection_never_builds_a_request() {
        let form = UploadForm::new();
        let err = form
            .into_parse_request(ParsingOption::TextOnly, true, true)
            .unwrap_err();
        assert!(matches!(err, crate::domain::error::AppError::Validation(_)));
    }
}

use crate::domain::error::{AppError, Result};
use crate::domain::file_type::FileType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-side backend used to read a raw file into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingMethod {
    PyMuPdf,
    PyPdf,
    Pdfplumber,
    Unstructured,
    Basic,
    Pandas,
    #[serde(rename = "csv")]
    CsvModule,
}

impl LoadingMethod {
    pub fn field(&self) -> &'static str {
        match self {
            LoadingMethod::PyMuPdf => "pymupdf",
            LoadingMethod::PyPdf => "pypdf",
            LoadingMethod::Pdfplumber => "pdfplumber",
            LoadingMethod::Unstructured => "unstructured",
            LoadingMethod::Basic => "basic",
            LoadingMethod::Pandas => "pandas",
            LoadingMethod::CsvModule => "csv",
        }
    }

    /// Methods the API accepts for a given document type.
    pub fn allowed_for(file_type: FileType) -> &'static [LoadingMethod] {
        match file_type {
            FileType::Pdf => &[
                LoadingMethod::PyMuPdf,
                LoadingMethod::PyPdf,
                LoadingMethod::Pdfplumber,
                LoadingMethod::Unstructured,
            ],
            FileType::Txt | FileType::Md => {
                &[LoadingMethod::Basic, LoadingMethod::Unstructured]
            }
            FileType::Csv => &[LoadingMethod::Pandas, LoadingMethod::CsvModule],
            FileType::Other => &[],
        }
    }

    /// Canonical default method for a document type. Changing the file
    /// type on a form must reset the method to this value.
    pub fn default_for(file_type: FileType) -> Option<LoadingMethod> {
        match file_type {
            FileType::Pdf => Some(LoadingMethod::PyMuPdf),
            FileType::Txt | FileType::Md => Some(LoadingMethod::Basic),
            FileType::Csv => Some(LoadingMethod::Pandas),
            FileType::Other => None,
        }
    }
}

impl fmt::Display for LoadingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// Partition strategy for the unstructured loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnstructuredStrategy {
    Fast,
    HiRes,
    OcrOnly,
}

impl UnstructuredStrategy {
    pub fn field(&self) -> &'static str {
        match self {
            UnstructuredStrategy::Fast => "fast",
            UnstructuredStrategy::HiRes => "hi_res",
            UnstructuredStrategy::OcrOnly => "ocr_only",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkingStrategy {
    Basic,
    ByTitle,
}

impl ChunkingStrategy {
    pub fn field(&self) -> &'static str {
        match self {
            ChunkingStrategy::Basic => "basic",
            ChunkingStrategy::ByTitle => "by_title",
        }
    }
}

/// Chunking knobs, serialized as a JSON string inside the multipart
/// body. Keys are camelCase on the wire. The `basic` strategy reads the
/// first five fields, `by_title` reads combineTextUnderNChars and
/// multiPageSections; the server picks the subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChunkingOptions {
    pub max_characters: u32,
    pub new_after_n_chars: u32,
    pub combine_text_under_n_chars: u32,
    pub overlap: u32,
    pub overlap_all: bool,
    pub multi_page_sections: bool,
}

impl Default for ChunkingOptions {
    fn default() -> Self {
        Self {
            max_characters: 4000,
            new_after_n_chars: 3000,
            combine_text_under_n_chars: 2000,
            overlap: 200,
            overlap_all: false,
            multi_page_sections: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkingSpec {
    pub strategy: ChunkingStrategy,
    pub options: ChunkingOptions,
}

/// Format-specific upload options. One variant per loading-method
/// family, so an option set that does not belong to the selected method
/// cannot be expressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderOptions {
    /// Plain PDF readers (pymupdf, pypdf, pdfplumber) take no options.
    Simple,
    Unstructured {
        strategy: UnstructuredStrategy,
        chunking: ChunkingSpec,
    },
    PlainText {
        encoding: String,
        chunking: Option<ChunkingSpec>,
    },
    Tabular {
        delimiter: String,
        encoding: String,
        use_pandas: bool,
    },
}

/// One field of the multipart body, before it is handed to the HTTP
/// layer. Keeping this projection separate from the transport makes the
/// exact field set inspectable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub value: FormValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File { file_name: String },
}

impl FormField {
    pub fn text(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: FormValue::Text(value.into()),
        }
    }

    pub fn file(name: &'static str, file_name: impl Into<String>) -> Self {
        Self {
            name,
            value: FormValue::File {
                file_name: file_name.into(),
            },
        }
    }

    pub fn text_value(&self) -> Option<&str> {
        match &self.value {
            FormValue::Text(value) => Some(value),
            FormValue::File { .. } => None,
        }
    }
}

fn bool_field(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn check_encoding(label: &str) -> Result<()> {
    if encoding_rs::Encoding::for_label(label.as_bytes()).is_none() {
        return Err(AppError::Validation(format!(
            "unknown encoding label: {}",
            label
        )));
    }
    Ok(())
}

/// A fully validated `/load` submission.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub file_type: FileType,
    pub method: LoadingMethod,
    pub options: LoaderOptions,
}

impl UploadRequest {
    pub fn new(
        file_name: String,
        bytes: Vec<u8>,
        file_type: FileType,
        method: LoadingMethod,
        options: LoaderOptions,
    ) -> Result<Self> {
        if !LoadingMethod::allowed_for(file_type).contains(&method) {
            return Err(AppError::Validation(format!(
                "loading method '{}' is not valid for {} files",
                method, file_type
            )));
        }

        match (&options, method) {
            (LoaderOptions::Unstructured { .. }, LoadingMethod::Unstructured)
                if file_type == FileType::Pdf => {}
            (
                LoaderOptions::Simple,
                LoadingMethod::PyMuPdf | LoadingMethod::PyPdf | LoadingMethod::Pdfplumber,
            ) if file_type == FileType::Pdf => {}
            (LoaderOptions::PlainText { encoding, .. }, _)
                if matches!(file_type, FileType::Txt | FileType::Md) =>
            {
                check_encoding(encoding)?;
            }
            (LoaderOptions::Tabular { encoding, .. }, _) if file_type == FileType::Csv => {
                check_encoding(encoding)?;
            }
            _ => {
                return Err(AppError::Validation(format!(
                    "option set does not match loading method '{}' for {} files",
                    method, file_type
                )));
            }
        }

        Ok(Self {
            file_name,
            bytes,
            file_type,
            method,
            options,
        })
    }

    /// Project the request into its multipart field list: file,
    /// file_type, loading_method, then exactly one conditional option
    /// set. `chunking_options` travels as a JSON-encoded string field
    /// and booleans as "true"/"false".
    pub fn fields(&self) -> Result<Vec<FormField>> {
        let mut fields = vec![
            FormField::file("file", self.file_name.clone()),
            FormField::text("file_type", self.file_type.load_field()),
            FormField::text("loading_method", self.method.field()),
        ];

        match &self.options {
            LoaderOptions::Simple => {}
            LoaderOptions::Unstructured { strategy, chunking } => {
                fields.push(FormField::text("strategy", strategy.field()));
                fields.push(FormField::text(
                    "chunking_strategy",
                    chunking.strategy.field(),
                ));
                fields.push(FormField::text(
                    "chunking_options",
                    serde_json::to_string(&chunking.options)?,
                ));
            }
            LoaderOptions::PlainText { encoding, chunking } => {
                fields.push(FormField::text("encoding", encoding.clone()));
                if let Some(chunking) = chunking {
                    fields.push(FormField::text(
                        "chunking_strategy",
                        chunking.strategy.field(),
                    ));
                    fields.push(FormField::text(
                        "chunking_options",
                        serde_json::to_string(&chunking.options)?,
                    ));
                }
            }
            LoaderOptions::Tabular {
                delimiter,
                encoding,
                use_pandas,
            } => {
                fields.push(FormField::text("delimiter", delimiter.clone()));
                fields.push(FormField::text("encoding", encoding.clone()));
                fields.push(FormField::text("use_pandas", bool_field(*use_pandas)));
            }
        }

        Ok(fields)
    }
}

/// Client-side form state for the load and parse workflows. Selecting a
/// file infers the document type and resets the loading method to the
/// type's default, so a stale method can never leak across a type
/// change.
#[derive(Debug, Default)]
pub struct UploadForm {
    file: Option<(String, Vec<u8>)>,
    file_type: Option<FileType>,
    loading_method: Option<LoadingMethod>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_file(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        let name = name.into();
        let file_type = FileType::infer(&name);
        self.file = Some((name, bytes));
        self.file_type = Some(file_type);
        self.loading_method = LoadingMethod::default_for(file_type);
    }

    /// Explicit type override; also resets the method to the new type's
    /// default.
    pub fn set_file_type(&mut self, file_type: FileType) {
        self.file_type = Some(file_type);
        self.loading_method = LoadingMethod::default_for(file_type);
    }

    pub fn set_loading_method(&mut self, method: LoadingMethod) -> Result<()> {
        let file_type = self.file_type.unwrap_or(FileType::Other);
        if !LoadingMethod::allowed_for(file_type).contains(&method) {
            return Err(AppError::Validation(format!(
                "loading method '{}' is not valid for {} files",
                method, file_type
            )));
        }
        self.loading_method = Some(method);
        Ok(())
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file.as_ref().map(|(name, _)| name.as_str())
    }

    pub fn file_type(&self) -> Option<FileType> {
        self.file_type
    }

    pub fn loading_method(&self) -> Option<LoadingMethod> {
        self.loading_method
    }

    pub(crate) fn take_parts(self) -> Result<(String, Vec<u8>, FileType, LoadingMethod)> {
        let (name, bytes) = self
            .file
            .ok_or_else(|| AppError::Validation("请先选择文件".to_string()))?;
        let file_type = self.file_type.unwrap_or(FileType::Other);
        let method = self
            .loading_method
            .ok_or_else(|| AppError::Validation("请选择加载方式".to_string()))?;
        Ok((name, bytes, file_type, method))
    }

    pub fn into_request(self, options: LoaderOptions) -> Result<UploadRequest> {
        let (name, bytes, file_type, method) = self.take_parts()?;
        UploadRequest::new(name, bytes, file_type, method, options)
    }
}

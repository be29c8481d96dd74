use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::domain::file_type::FileType;
use crate::domain::parsing::ParsingOption;
use crate::domain::upload::{ChunkingStrategy, LoadingMethod, UnstructuredStrategy};

/// Top-level CLI entry point.
#[derive(Debug, Parser)]
#[command(
    name = "docbridge",
    version,
    about = "Document ingestion workflow client"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Base URL of the ingestion API (overrides config file and env).
    #[arg(global = true, long)]
    pub base_url: Option<String>,
    /// Increase logging verbosity (-v, -vv).
    #[arg(global = true, short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload a file and render the returned chunk list.
    Load(LoadArgs),
    /// Upload a file and render the parsed content blocks.
    Parse(ParseArgs),
    /// List, view and delete previously loaded documents.
    Docs {
        #[command(subcommand)]
        command: DocsCommands,
    },
    /// Run a mock ingestion API for development and tests.
    Mock(MockArgs),
}

#[derive(Debug, Args)]
pub struct LoadArgs {
    /// File to upload.
    pub file: PathBuf,
    /// Override the document type inferred from the extension.
    #[arg(long, value_enum)]
    pub file_type: Option<FileTypeArg>,
    /// Override the type's default loading method.
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,
    /// Partition strategy (pdf with the unstructured method only).
    #[arg(long, value_enum, default_value = "fast")]
    pub strategy: StrategyArg,
    #[arg(long, value_enum)]
    pub chunking_strategy: Option<ChunkingStrategyArg>,
    #[arg(long, default_value_t = 4000)]
    pub max_characters: u32,
    #[arg(long, default_value_t = 3000)]
    pub new_after_n_chars: u32,
    #[arg(long, default_value_t = 2000)]
    pub combine_text_under_n_chars: u32,
    #[arg(long, default_value_t = 200)]
    pub overlap: u32,
    #[arg(long)]
    pub overlap_all: bool,
    #[arg(long)]
    pub multi_page_sections: bool,
    /// Text encoding for txt/md/csv uploads.
    #[arg(long, default_value = "utf-8")]
    pub encoding: String,
    /// Field delimiter for csv uploads.
    #[arg(long, default_value = ",")]
    pub delimiter: String,
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// File to upload.
    pub file: PathBuf,
    /// Override the document type inferred from the extension.
    #[arg(long, value_enum)]
    pub file_type: Option<FileTypeArg>,
    /// Override the type's default loading method.
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,
    /// Extraction mode; defaults to the type's first valid option.
    #[arg(long, value_enum)]
    pub parsing_option: Option<ParsingOptionArg>,
    /// Skip image extraction.
    #[arg(long)]
    pub no_images: bool,
    /// Skip table extraction.
    #[arg(long)]
    pub no_tables: bool,
}

#[derive(Debug, Subcommand)]
pub enum DocsCommands {
    /// List loaded documents.
    List,
    /// Fetch and render one document by name.
    Show { name: String },
    /// Delete a document by name.
    Delete { name: String },
}

#[derive(Debug, Args)]
pub struct MockArgs {
    #[arg(long, default_value_t = 4010)]
    pub port: u16,
    /// Directory holding the JSON document artifacts.
    #[arg(long, default_value = "01-loaded-docs")]
    pub store_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FileTypeArg {
    Pdf,
    Txt,
    Csv,
    Md,
    Other,
}

impl From<FileTypeArg> for FileType {
    fn from(value: FileTypeArg) -> Self {
        match value {
            FileTypeArg::Pdf => FileType::Pdf,
            FileTypeArg::Txt => FileType::Txt,
            FileTypeArg::Csv => FileType::Csv,
            FileTypeArg::Md => FileType::Md,
            FileTypeArg::Other => FileType::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    Pymupdf,
    Pypdf,
    Pdfplumber,
    Unstructured,
    Basic,
    Pandas,
    Csv,
}

impl From<MethodArg> for LoadingMethod {
    fn from(value: MethodArg) -> Self {
        match value {
            MethodArg::Pymupdf => LoadingMethod::PyMuPdf,
            MethodArg::Pypdf => LoadingMethod::PyPdf,
            MethodArg::Pdfplumber => LoadingMethod::Pdfplumber,
            MethodArg::Unstructured => LoadingMethod::Unstructured,
            MethodArg::Basic => LoadingMethod::Basic,
            MethodArg::Pandas => LoadingMethod::Pandas,
            MethodArg::Csv => LoadingMethod::CsvModule,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Fast,
    HiRes,
    OcrOnly,
}

impl From<StrategyArg> for UnstructuredStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Fast => UnstructuredStrategy::Fast,
            StrategyArg::HiRes => UnstructuredStrategy::HiRes,
            StrategyArg::OcrOnly => UnstructuredStrategy::OcrOnly,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ChunkingStrategyArg {
    Basic,
    ByTitle,
}

impl From<ChunkingStrategyArg> for ChunkingStrategy {
    fn from(value: ChunkingStrategyArg) -> Self {
        match value {
            ChunkingStrategyArg::Basic => ChunkingStrategy::Basic,
            ChunkingStrategyArg::ByTitle => ChunkingStrategy::ByTitle,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ParsingOptionArg {
    Comprehensive,
    TextOnly,
    TablesOnly,
    ImagesOnly,
    ByPages,
    ByTitles,
    TextAndTables,
}

impl From<ParsingOptionArg> for ParsingOption {
    fn from(value: ParsingOptionArg) -> Self {
        match value {
            ParsingOptionArg::Comprehensive => ParsingOption::Comprehensive,
            ParsingOptionArg::TextOnly => ParsingOption::TextOnly,
            ParsingOptionArg::TablesOnly => ParsingOption::TablesOnly,
            ParsingOptionArg::ImagesOnly => ParsingOption::ImagesOnly,
            ParsingOptionArg::ByPages => ParsingOption::ByPages,
            ParsingOptionArg::ByTitles => ParsingOption::ByTitles,
            ParsingOptionArg::TextAndTables => ParsingOption::TextAndTables,
        }
    }
}

use crate::application::use_cases::document_manager::DocumentManager;
use crate::application::use_cases::load_document::LoadDocumentUseCase;
use crate::application::use_cases::parse_document::ParseDocumentUseCase;
use crate::application::use_cases::render;
use crate::domain::error::{AppError, Result};
use crate::domain::file_type::FileType;
use crate::domain::parsing::ParsingOption;
use crate::domain::upload::{
    ChunkingOptions, ChunkingSpec, ChunkingStrategy, LoaderOptions, LoadingMethod, UploadForm,
};
use crate::infrastructure::api::HttpIngestClient;
use crate::infrastructure::config::ClientConfig;
use crate::interfaces::cli::{
    Cli, Commands, DocsCommands, FileTypeArg, LoadArgs, MethodArg, MockArgs, ParseArgs,
};
use crate::interfaces::mock_server::{self, MockServerConfig};
use std::path::Path;
use std::sync::Arc;

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let _ = dotenvy::dotenv();

    match cli.command {
        Commands::Load(args) => run_load(resolve_config(cli.base_url)?, args).await,
        Commands::Parse(args) => run_parse(resolve_config(cli.base_url)?, args).await,
        Commands::Docs { command } => run_docs(resolve_config(cli.base_url)?, command).await,
        Commands::Mock(args) => run_mock(args).await,
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn resolve_config(base_url: Option<String>) -> Result<ClientConfig> {
    let config = ClientConfig::load()?;
    match base_url {
        Some(url) => config.with_base_url(url),
        None => Ok(config),
    }
}

fn build_form(
    file: &Path,
    file_type: Option<FileTypeArg>,
    method: Option<MethodArg>,
) -> Result<UploadForm> {
    let bytes = std::fs::read(file)?;
    let name = file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .to_string();

    let mut form = UploadForm::new();
    form.set_file(name, bytes);
    if let Some(file_type) = file_type {
        form.set_file_type(file_type.into());
    }
    if let Some(method) = method {
        form.set_loading_method(method.into())?;
    }
    Ok(form)
}

fn chunking_options(args: &LoadArgs) -> ChunkingOptions {
    ChunkingOptions {
        max_characters: args.max_characters,
        new_after_n_chars: args.new_after_n_chars,
        combine_text_under_n_chars: args.combine_text_under_n_chars,
        overlap: args.overlap,
        overlap_all: args.overlap_all,
        multi_page_sections: args.multi_page_sections,
    }
}

fn loader_options(
    args: &LoadArgs,
    file_type: FileType,
    method: Option<LoadingMethod>,
) -> LoaderOptions {
    match file_type {
        FileType::Pdf if method == Some(LoadingMethod::Unstructured) => {
            LoaderOptions::Unstructured {
                strategy: args.strategy.into(),
                chunking: ChunkingSpec {
                    strategy: args
                        .chunking_strategy
                        .map(ChunkingStrategy::from)
                        .unwrap_or(ChunkingStrategy::Basic),
                    options: chunking_options(args),
                },
            }
        }
        FileType::Txt | FileType::Md => LoaderOptions::PlainText {
            encoding: args.encoding.clone(),
            chunking: args.chunking_strategy.map(|strategy| ChunkingSpec {
                strategy: strategy.into(),
                options: chunking_options(args),
            }),
        },
        FileType::Csv => LoaderOptions::Tabular {
            delimiter: args.delimiter.clone(),
            encoding: args.encoding.clone(),
            use_pandas: method != Some(LoadingMethod::CsvModule),
        },
        _ => LoaderOptions::Simple,
    }
}

async fn run_load(config: ClientConfig, args: LoadArgs) -> Result<()> {
    let form = build_form(&args.file, args.file_type, args.method)?;
    let options = loader_options(
        &args,
        form.file_type().unwrap_or(FileType::Other),
        form.loading_method(),
    );

    let api = Arc::new(HttpIngestClient::new(&config));
    let mut use_case = LoadDocumentUseCase::new(api);
    let document = use_case.execute(form, options).await?;

    for line in render::loaded_header_lines(&document) {
        println!("{}", line);
    }
    for block in render::chunk_blocks(&document) {
        println!("\n{}", block);
    }
    Ok(())
}

async fn run_parse(config: ClientConfig, args: ParseArgs) -> Result<()> {
    let form = build_form(&args.file, args.file_type, args.method)?;
    let file_type = form.file_type().unwrap_or(FileType::Other);
    let option = match args.parsing_option {
        Some(option) => option.into(),
        None => ParsingOption::default_for(file_type).ok_or_else(|| {
            AppError::Validation(format!("parsing is not supported for {} files", file_type))
        })?,
    };

    let api = Arc::new(HttpIngestClient::new(&config));
    let mut use_case = ParseDocumentUseCase::new(api);
    let document = use_case
        .execute(form, option, !args.no_images, !args.no_tables)
        .await?;

    for line in render::parsed_header_lines(&document) {
        println!("{}", line);
    }
    for block in render::parsed_blocks(&document) {
        println!("\n{}", block);
    }
    Ok(())
}

async fn run_docs(config: ClientConfig, command: DocsCommands) -> Result<()> {
    let api = Arc::new(HttpIngestClient::new(&config));
    let mut manager = DocumentManager::new(api);

    match command {
        DocsCommands::List => {
            manager.refresh().await?;
            for line in render::summary_lines(manager.documents()) {
                println!("{}", line);
            }
        }
        DocsCommands::Show { name } => {
            let document = manager.open(&name).await?;
            for line in render::loaded_header_lines(document) {
                println!("{}", line);
            }
            for block in render::chunk_blocks(document) {
                println!("\n{}", block);
            }
        }
        DocsCommands::Delete { name } => {
            manager.delete(&name).await?;
            println!("文档已删除: {}", name);
            for line in render::summary_lines(manager.documents()) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

async fn run_mock(args: MockArgs) -> Result<()> {
    let config = MockServerConfig {
        port: args.port,
        store_dir: args.store_dir,
    };
    tracing::info!(
        "Mock ingestion API listening on http://127.0.0.1:{} (store: {})",
        config.port,
        config.store_dir.display()
    );
    let server = mock_server::start_server(config)?;
    server.await?;
    Ok(())
}

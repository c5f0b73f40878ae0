//! docinsight CLI - terminal client for the document insight service
//!
//! Usage: docinsight-cli [OPTIONS] <COMMAND>
//!
//! Uploads PDFs, shows the AI summary as sections (or the keyword fallback),
//! and browses / prunes the upload history. Supports JSON output for scripting.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use docinsight_lib::error::ApiError;
use docinsight_lib::history::{render_table, HistoryPage, Pager};
use docinsight_lib::insight::{render_document, NO_INSIGHTS};
use docinsight_lib::models::Document;
use docinsight_lib::remote_client::RemoteClient;
use docinsight_lib::sections::{parse_sections, render_sections};
use docinsight_lib::settings;
use docinsight_lib::upload::{UploadProgress, PROGRESS_LINGER, PROGRESS_TICK};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const BAR_WIDTH: usize = 30;

// ============================================================================
// Main CLI Structure
// ============================================================================

#[derive(Parser)]
#[command(name = "docinsight-cli")]
#[command(version, about = "AI document insight client", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON for scripting
    #[arg(long, global = true)]
    json: bool,

    /// Suppress progress output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Detailed logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Backend base URL (overrides settings and DOCINSIGHT_API_BASE)
    #[arg(long, global = true)]
    api: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a PDF and show its insights
    Upload {
        /// Path to the PDF
        file: PathBuf,
    },
    /// List uploaded documents
    History {
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,
        /// Rows per page (default: settings page_size)
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show the insights of an uploaded document
    Show {
        id: i64,
        /// Rows fetched per history request while searching
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Delete an uploaded document
    Delete {
        id: i64,
    },
    /// Split a local summary text into sections (reads stdin without a file)
    Render {
        file: Option<PathBuf>,
    },
    /// Configuration settings
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Set the backend base URL
    SetApi { url: String },
    /// Set the history page size
    SetPageSize { size: u32 },
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    if let Err(e) = run_cli(cli).await {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_cli(cli: Cli) -> Result<(), String> {
    settings::init(settings::default_config_dir());

    match cli.command {
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "docinsight-cli", &mut std::io::stdout());
            Ok(())
        }
        Commands::Render { file } => handle_render(file.as_deref(), cli.json),
        Commands::Config { cmd } => handle_config(cmd, cli.json),
        Commands::Upload { file } => {
            let client = connect(cli.api.as_deref())?;
            handle_upload(&client, &file, cli.json, cli.quiet).await
        }
        Commands::History { page, limit } => {
            let client = connect(cli.api.as_deref())?;
            let limit = limit.unwrap_or_else(settings::get_page_size);
            handle_history(&client, Pager::new(page.saturating_sub(1), limit), cli.json).await
        }
        Commands::Show { id, limit } => {
            let client = connect(cli.api.as_deref())?;
            let limit = limit.unwrap_or_else(settings::get_page_size);
            handle_show(&client, id, limit, cli.json).await
        }
        Commands::Delete { id } => {
            let client = connect(cli.api.as_deref())?;
            handle_delete(&client, id, cli.json).await
        }
    }
}

fn connect(api_override: Option<&str>) -> Result<RemoteClient, String> {
    let base = match api_override {
        Some(url) => settings::validate_api_base(url).map_err(|e| e.to_string())?,
        None => settings::get_api_base(),
    };
    log::debug!("Using backend {}", base);
    RemoteClient::new(&base, settings::get_request_timeout()).map_err(|e| e.to_string())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize output: {}", e))?;
    println!("{}", out);
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

async fn handle_upload(client: &RemoteClient, file: &Path, json: bool, quiet: bool) -> Result<(), String> {
    let doc = upload_with_progress(client, file, settings::get_max_upload_bytes(), quiet)
        .await
        .map_err(|e| {
            log::debug!("Upload of {} failed: {:?}", file.display(), e);
            e.user_message()
        })?;

    if json {
        return print_json(&doc);
    }
    println!("{}", render_document(&doc));
    Ok(())
}

/// Runs the upload while a timer advances the simulated progress bar on stderr
async fn upload_with_progress(
    client: &RemoteClient,
    file: &Path,
    max_bytes: u64,
    quiet: bool,
) -> Result<Document, ApiError> {
    let mut progress = UploadProgress::new();
    let upload = client.upload_document(file, max_bytes);
    tokio::pin!(upload);

    let mut ticker = tokio::time::interval(PROGRESS_TICK);
    ticker.tick().await; // first tick fires immediately

    let result = loop {
        tokio::select! {
            result = &mut upload => break result,
            _ = ticker.tick() => {
                progress.tick();
                if !quiet {
                    draw_progress(&progress);
                }
            }
        }
    };

    // A fast upload may finish before the first tick; success still shows 100%
    if !quiet {
        if result.is_ok() {
            progress.complete();
            draw_progress(&progress);
            tokio::time::sleep(PROGRESS_LINGER).await;
        }
        eprint!("\r{}\r", " ".repeat(BAR_WIDTH + 8));
        let _ = std::io::stderr().flush();
    }
    progress.reset();

    result
}

fn draw_progress(progress: &UploadProgress) {
    eprint!("\r{}", progress.render_bar(BAR_WIDTH));
    let _ = std::io::stderr().flush();
}

async fn handle_history(client: &RemoteClient, pager: Pager, json: bool) -> Result<(), String> {
    let resp = client
        .fetch_insights(pager.limit, pager.offset())
        .await
        .map_err(|e| format!("Failed to load history: {}", e))?;
    let page = HistoryPage::from_response(resp);

    if json {
        return print_json(&serde_json::json!({
            "documents": page.items,
            "total": page.total,
            "page": pager.page + 1,
            "total_pages": pager.total_pages(page.total),
        }));
    }

    println!("{}", render_table(&page, &pager));
    Ok(())
}

/// The backend has no single-document endpoint, so walk history pages
async fn handle_show(client: &RemoteClient, id: i64, limit: u32, json: bool) -> Result<(), String> {
    let mut pager = Pager::new(0, limit);

    loop {
        let resp = client
            .fetch_insights(pager.limit, pager.offset())
            .await
            .map_err(|e| format!("Failed to load history: {}", e))?;
        let page = HistoryPage::from_response(resp);

        if let Some(doc) = page.find(id) {
            if json {
                return print_json(doc);
            }
            println!("{}", render_document(doc));
            return Ok(());
        }

        if page.items.is_empty() || !pager.has_next(page.total) {
            return Err(format!("Document {} not found", id));
        }
        pager.next(page.total);
    }
}

async fn handle_delete(client: &RemoteClient, id: i64, json: bool) -> Result<(), String> {
    let resp = client
        .delete_document(id)
        .await
        .map_err(|e| format!("Failed to delete document {}: {}", id, e))?;

    if json {
        return print_json(&resp);
    }
    println!("Deleted document {}", resp.id);
    Ok(())
}

fn handle_render(file: Option<&Path>, json: bool) -> Result<(), String> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            buf
        }
    };

    let sections = parse_sections(Some(&text));
    log::debug!("Parsed {} sections", sections.len());

    if json {
        return print_json(&sections);
    }
    if sections.is_empty() {
        println!("{}", NO_INSIGHTS);
    } else {
        println!("{}", render_sections(&sections));
    }
    Ok(())
}

fn handle_config(cmd: ConfigCommands, json: bool) -> Result<(), String> {
    match cmd {
        ConfigCommands::Show => {
            let current = settings::current();
            let effective_api = settings::get_api_base();
            let path = settings::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".to_string());

            if json {
                return print_json(&serde_json::json!({
                    "settings": current,
                    "effective_api_base": effective_api,
                    "config_path": path,
                }));
            }
            println!("Config file:      {}", path);
            println!("API base:         {}", effective_api);
            if effective_api != current.api_base {
                println!("  (stored: {}, overridden by {})", current.api_base, settings::API_BASE_ENV);
            }
            println!("Page size:        {}", current.page_size);
            println!("Max upload:       {} MB", current.max_upload_mb);
            println!("Request timeout:  {}s", current.request_timeout_secs);
            Ok(())
        }
        ConfigCommands::SetApi { url } => {
            let saved = settings::set_api_base(&url).map_err(|e| e.to_string())?;
            println!("API base set to {}", saved);
            Ok(())
        }
        ConfigCommands::SetPageSize { size } => {
            settings::set_page_size(size).map_err(|e| e.to_string())?;
            println!("Page size set to {}", size);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_history_flags() {
        let cli = Cli::try_parse_from(["docinsight-cli", "--json", "history", "--page", "3", "--limit", "5"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::History { page, limit } => {
                assert_eq!(page, 3);
                assert_eq!(limit, Some(5));
            }
            _ => panic!("expected history"),
        }
    }

    #[test]
    fn test_cli_global_api_after_subcommand() {
        let cli = Cli::try_parse_from(["docinsight-cli", "delete", "7", "--api", "http://10.0.0.2:8000"]).unwrap();
        assert_eq!(cli.api.as_deref(), Some("http://10.0.0.2:8000"));
        assert!(matches!(cli.command, Commands::Delete { id: 7 }));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_connect_rejects_bad_override() {
        assert!(connect(Some("ftp://example.com")).is_err());
        assert!(connect(Some("http://localhost:8000/")).is_ok());
    }

    #[tokio::test]
    async fn test_fast_upload_still_lingers_at_complete() {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let backend = std::thread::spawn(move || {
            let mut request = server.recv().unwrap();
            let mut body = Vec::new();
            request.as_reader().read_to_end(&mut body).unwrap();
            let content_type = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
            let reply = r#"{"id": 3, "filename": "cv.pdf", "ai_summary": "Gaps\n- none",
                "fallback_words": null, "status": "success"}"#;
            request
                .respond(tiny_http::Response::from_string(reply).with_header(content_type))
                .unwrap();
        });

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cv.pdf");
        std::fs::write(&path, b"%PDF-1.4 short").unwrap();

        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        let client = RemoteClient::with_client(&format!("http://127.0.0.1:{}", port), http).unwrap();

        let started = std::time::Instant::now();
        let doc = upload_with_progress(&client, &path, 10 * 1024 * 1024, false).await.unwrap();
        assert_eq!(doc.id, 3);
        assert!(started.elapsed() >= PROGRESS_LINGER);
        backend.join().unwrap();
    }
}

// src/cli/mod.rs
use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::config::Settings;
use crate::infrastructure::di::service_container::ServiceContainer;
use crate::infrastructure::repositories::sqlite::repository::SqliteDocumentStore;
use crate::remote::Method;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::instrument;

pub mod args;
pub mod error;
pub mod server;

pub async fn execute_command(cli: Cli, settings: &Settings) -> CliResult<()> {
    if cli.generate_config {
        println!("{}", crate::config::generate_default_config());
        return Ok(());
    }
    match cli.command {
        Some(Commands::Serve) => serve(settings).await,
        Some(Commands::Call { method, params }) => call(settings, &method, &params).await,
        Some(Commands::CreateDb { path }) => {
            create_db(path.as_deref().unwrap_or(&settings.db_url))
        }
        Some(Commands::Info) => {
            info(settings);
            Ok(())
        }
        None => Ok(()),
    }
}

#[instrument(skip_all)]
async fn serve(settings: &Settings) -> CliResult<()> {
    let services = ServiceContainer::new(settings).await?;
    let remote = services.remote();
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    server::serve(&remote, stdin, tokio::io::stdout()).await?;
    Ok(())
}

#[instrument(skip(settings))]
async fn call(settings: &Settings, method: &str, params: &str) -> CliResult<()> {
    let params: Value =
        serde_json::from_str(params).map_err(|e| CliError::InvalidInput(format!("params: {}", e)))?;
    let services = ServiceContainer::new(settings).await?;
    match services.remote().call(method, params).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            println!("{}", e.to_response());
            Err(e.into())
        }
    }
}

#[instrument]
pub fn create_db(path: &str) -> CliResult<()> {
    if Path::new(path).exists() {
        return Err(CliError::InvalidInput(format!(
            "Database already exists at: {}. Please choose a different path or delete the existing file.",
            path
        )));
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| CliError::Io(e).context("creating parent directories"))?;
        }
    }

    eprintln!("Creating new database at: {}", path);
    // opening the store runs the migrations
    SqliteDocumentStore::from_url(path)?;
    eprintln!("Database created successfully at: {}", path);
    Ok(())
}

fn info(settings: &Settings) {
    println!("Program Version: {}", env!("CARGO_PKG_VERSION"));

    println!("\nConfiguration:");
    println!("  Database URL: {}", settings.db_url);
    println!("  Index Links: {}", settings.index_links);
    println!("  Suggestion Limit: {}", settings.suggestion_limit);
    println!("  Fetch Timeout: {}s", settings.fetch_timeout_secs);
    if let Some(tabs_file) = &settings.tabs_file {
        println!("  Tabs File: {}", tabs_file);
    }

    println!("\nMethods:");
    for method in Method::ALL {
        println!("  {}", method);
    }
}

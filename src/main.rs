use std::{path::PathBuf, sync::Arc};

use ai_llm_service::{LlmServiceProfiles, telemetry};
use anyhow::{Context, Result};
use api::AppState;
use clap::{Parser, Subcommand};
use colored::Colorize;
use keyword_pipeline::{
    KeywordEmbedding, KeywordPipeline,
    batch::{append_from_file, ingest_file},
};
use query_history::{HistoryStore, HistoryStoreConfig, RecentWindow, open_store};
use tracing::{Level, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "keyword-backend")]
#[command(about = "Keyword extraction and embedding over per-user query history")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Listen address
        #[arg(long, env = "API_ADDRESS", default_value = "0.0.0.0:8000")]
        address: String,
    },
    /// Append a batch query file to the store and embed the updated window
    Ingest {
        /// JSON file with `user_id`, `query` and `indices`
        file: PathBuf,
    },
    /// Append a batch query file to the store without calling the models
    Append {
        /// JSON file with `user_id`, `query` and `indices`
        file: PathBuf,
    },
    /// Print a user's recent window
    Recent {
        user_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the process environment is used as is.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", Level::INFO))
        .with(telemetry::layer())
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or_else(|| Commands::Serve {
        address: std::env::var("API_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".into()),
    });

    let store = connect_store().await?;

    match command {
        Commands::Serve { address } => {
            let pipeline = build_pipeline()?;
            let state = Arc::new(AppState::new(pipeline, store));
            api::start(state, &address).await?;
        }
        Commands::Ingest { file } => {
            let pipeline = build_pipeline()?;
            let (window, out) = ingest_file(&file, store.as_ref(), &pipeline)
                .await
                .with_context(|| format!("ingest {}", file.display()))?;
            print_window(&window);
            print_embedding(&out)?;
        }
        Commands::Append { file } => {
            let (query, window) = append_from_file(&file, store.as_ref())
                .await
                .with_context(|| format!("append {}", file.display()))?;
            println!("{} {}", "user:".bold(), query.user_id.cyan());
            print_window(&window);
        }
        Commands::Recent { user_id } => {
            let window = store.recent(&user_id).await?;
            print_window(&window);
        }
    }

    Ok(())
}

/// Opens the configured store. A failed ping is only logged.
async fn connect_store() -> Result<Arc<dyn HistoryStore>> {
    let cfg = HistoryStoreConfig::from_env().context("history store configuration")?;
    let store = open_store(&cfg).await.context("open history store")?;
    match store.ping().await {
        Ok(()) => info!(backend = ?cfg.backend, "history store reachable"),
        Err(e) => warn!(backend = ?cfg.backend, error = %e, "history store ping failed"),
    }
    Ok(store)
}

fn build_pipeline() -> Result<KeywordPipeline> {
    let svc = LlmServiceProfiles::from_env().context("llm configuration")?;
    Ok(KeywordPipeline::from_llm(Arc::new(svc)))
}

fn print_window(window: &RecentWindow) {
    println!("{}", "Recent queries".bold().underline());
    for (n, (query, indices)) in window.slots().iter().enumerate() {
        let query = if query.is_empty() {
            "-".dimmed().to_string()
        } else {
            query.green().to_string()
        };
        println!("  {}. {}  [{}]", n + 1, query, indices.yellow());
    }
}

fn print_embedding(out: &KeywordEmbedding) -> Result<()> {
    println!("{}", "Result".bold().underline());
    println!("{}", serde_json::to_string_pretty(out)?);
    Ok(())
}

//! Tokenlist CLI
//!
//! Command-line interface for the token list synchronization layer.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokenlist_sync::{
    config::Config, GatewayClient, GatewayConfig, MutationError, MutationPipeline, Notifier,
    SyncConfig, TokenListSync,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tokenlist", version, about = "Token registry sync client")]
struct Cli {
    /// Path to a config file (defaults to the standard locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sync the registry and print the enriched token list
    List,
    /// Submit a token identifier to the registry
    Add { identifier: String },
    /// Submit a batch of token identifiers
    AddMany { identifiers: Vec<String> },
    /// Print a default config file to stdout
    InitConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("tokenlist_sync={}", config.logging.level)),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Command::InitConfig = cli.command {
        print!("{}", tokenlist_sync::config::generate_default_config());
        return Ok(());
    }

    tracing::info!("Tokenlist Sync v{}", env!("CARGO_PKG_VERSION"));

    let client = Arc::new(
        GatewayClient::new(GatewayConfig {
            base_url: config.gateway.base_url.clone(),
            registry_account: config.gateway.registry_account.clone(),
            request_timeout_ms: config.gateway.request_timeout_ms,
        })
        .context("Failed to build gateway client")?,
    );

    let sync = Arc::new(TokenListSync::new(
        client.clone(),
        config.gateway.viewer_account.clone(),
        SyncConfig {
            page_limit: config.sync.page_limit,
            enrich_concurrency: config.sync.enrich_concurrency,
        },
    ));

    let notifier = Arc::new(Notifier::with_clear_after(std::time::Duration::from_secs(
        config.notifications.clear_after_secs,
    )));
    let pipeline = MutationPipeline::new(client, sync.clone(), notifier.clone());

    match cli.command {
        Command::List => {
            sync.refresh().await.context("Sync failed")?;
            print_tokens(&sync).await;
        }
        Command::Add { identifier } => {
            match pipeline.submit(&identifier).await {
                Ok(_) => {}
                Err(MutationError::Unclassified(err)) => {
                    // Blocking-alert path: the session may be broken
                    eprintln!(
                        "Unexpected registry failure; check your session and the logs: {err}"
                    );
                    return Err(err.into());
                }
                Err(err) => return Err(err.into()),
            }

            let notification = notifier.current().await;
            if notification.visible {
                println!("{}", notification.message);
            }
            print_tokens(&sync).await;
        }
        Command::AddMany { identifiers } => {
            let added = pipeline.submit_many(&identifiers).await?;
            println!("Added {added} tokens");
            print_tokens(&sync).await;
        }
        Command::InitConfig => unreachable!(),
    }

    Ok(())
}

async fn print_tokens(sync: &TokenListSync) {
    let tokens = sync.tokens().await;
    if tokens.is_empty() {
        println!("Registry is empty");
        return;
    }

    println!("{:<32} {:<8} {:>20}", "TOKEN", "SYMBOL", "BALANCE");
    for token in tokens {
        println!(
            "{:<32} {:<8} {:>20}",
            token.identifier,
            token.metadata.symbol,
            token.display_balance()
        );
    }
}

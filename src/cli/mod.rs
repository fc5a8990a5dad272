use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::config::{AppConfig, StorageBackend};
use crate::database::DatabaseManager;

#[derive(Parser)]
#[command(name = "products-api")]
#[command(about = "Products API - CRUD HTTP service for products")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve(ServeArgs),

    #[command(about = "Create the products table if it is missing, then exit")]
    Migrate,
}

#[derive(Args, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Bind host (overrides HOST)")]
    pub host: Option<String>,

    #[arg(long, help = "Bind port (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, value_parser = parse_storage, help = "Storage backend: postgres or memory (overrides STORAGE_BACKEND)")]
    pub storage: Option<StorageBackend>,
}

impl ServeArgs {
    pub fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(storage) = self.storage {
            config.database.storage = storage;
        }
        config
    }
}

fn parse_storage(value: &str) -> Result<StorageBackend, String> {
    value.parse()
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => crate::app::serve(args.apply(config)).await,
        Commands::Migrate => {
            let pool = DatabaseManager::from_config(&config.database)
                .await
                .context("failed to connect to Postgres")?;
            DatabaseManager::migrate(&pool).await?;
            DatabaseManager::close(pool).await;
            Ok(())
        }
    }
}

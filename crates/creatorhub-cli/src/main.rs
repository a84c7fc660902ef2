mod sync;

use clap::{Parser, Subcommand};
use creatorhub_core::Platform;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "creatorhub-cli")]
#[command(about = "creatorhub platform metrics command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Pull account and content metrics from one platform for a user
    Sync {
        /// instagram, tiktok, or youtube
        #[arg(long)]
        platform: Platform,
        #[arg(long)]
        user_id: Uuid,
        /// Platform OAuth access token
        #[arg(long, env = "CREATORHUB_ACCESS_TOKEN", hide_env_values = true)]
        access_token: String,
        /// Run against an in-memory store instead of the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Print stored daily metrics snapshots for a user
    Metrics {
        #[arg(long)]
        user_id: Uuid,
        #[arg(long)]
        platform: Option<Platform>,
        /// Maximum number of snapshots to show
        #[arg(long, default_value = "30", value_parser = clap::value_parser!(i64).range(1..))]
        limit: i64,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("creatorhub-cli: run with --help to list commands");
        return Ok(());
    };

    let config = creatorhub_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Db { command } => {
            let pool = connect(&config).await?;
            match command {
                DbCommands::Ping => {
                    creatorhub_db::health_check(&pool).await?;
                    println!("database ok");
                }
                DbCommands::Migrate => {
                    let applied = creatorhub_db::run_migrations(&pool).await?;
                    println!("applied {applied} migration(s)");
                }
            }
        }
        Commands::Sync {
            platform,
            user_id,
            access_token,
            dry_run,
        } => {
            let pool = if dry_run {
                None
            } else {
                Some(connect(&config).await?)
            };
            sync::run_sync(&config, pool, platform, user_id, access_token).await?;
        }
        Commands::Metrics {
            user_id,
            platform,
            limit,
        } => {
            let pool = connect(&config).await?;
            sync::run_metrics(&pool, user_id, platform, limit).await?;
        }
    }

    Ok(())
}

async fn connect(config: &creatorhub_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = creatorhub_db::PoolConfig::from_app_config(config);
    Ok(creatorhub_db::connect_pool(&config.database_url, pool_config).await?)
}

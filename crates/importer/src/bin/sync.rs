use clap::{Parser, Subcommand};
use importer::{
    FfvbConfig, PageSource, SyncOrchestrator,
    config::{DEFAULT_CLUB_ID, REFRESH_INTERVAL},
    date::{DateLocale, DateParser},
    sources::ffvb::{CalendarDiscovery, FfvbClient, PageParser, RowExtractor},
};
use std::sync::Arc;
use std::time::Duration;
use storage::{Database, DocumentStore, MemoryDocumentStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ffvb-sync")]
#[command(about = "Synchronizes a club's FFVB competitions and matches into the document store", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline once
    Run {
        #[arg(long, env = "FFVB_CLUB_ID", default_value = DEFAULT_CLUB_ID)]
        club_id: String,

        /// Write to an in-memory store and print the resulting documents
        #[arg(long)]
        dry_run: bool,
    },
    /// Run the pipeline on a fixed interval until interrupted
    Schedule {
        #[arg(long, env = "FFVB_CLUB_ID", default_value = DEFAULT_CLUB_ID)]
        club_id: String,

        #[arg(long, default_value_t = REFRESH_INTERVAL.as_secs() / 60)]
        interval_minutes: u64,
    },
    /// List the competition URLs of a club calendar
    Discover {
        #[arg(long, env = "FFVB_CLUB_ID", default_value = DEFAULT_CLUB_ID)]
        club_id: String,
    },
    /// Parse one competition page and print it as JSON
    Parse { url: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "sync={},importer={},storage={}",
                    log_level, log_level, log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Run { club_id, dry_run } => {
            handle_run(club_id, dry_run, cli.database_url.as_deref()).await?;
        }
        Commands::Schedule {
            club_id,
            interval_minutes,
        } => {
            handle_schedule(club_id, interval_minutes, cli.database_url.as_deref()).await?;
        }
        Commands::Discover { club_id } => {
            handle_discover(club_id).await?;
        }
        Commands::Parse { url } => {
            handle_parse(&url).await?;
        }
    }

    Ok(())
}

fn page_parser() -> PageParser {
    PageParser::new(RowExtractor::new(DateParser::new(DateLocale::french())))
}

async fn connect(database_url: Option<&str>) -> Result<Database, Box<dyn std::error::Error>> {
    let database_url = database_url.ok_or("DATABASE_URL is required unless --dry-run is set")?;

    tracing::info!("Connecting to database...");
    let db = Database::new(database_url).await?;
    db.run_migrations().await?;

    Ok(db)
}

async fn handle_run(
    club_id: String,
    dry_run: bool,
    database_url: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let memory = Arc::new(MemoryDocumentStore::new());
    let store: Arc<dyn DocumentStore> = if dry_run {
        memory.clone() as Arc<dyn DocumentStore>
    } else {
        Arc::new(connect(database_url).await?)
    };

    let orchestrator = SyncOrchestrator::new(
        FfvbConfig::new(club_id),
        Arc::new(FfvbClient::new()?),
        store,
        page_parser(),
    );

    let report = orchestrator.run().await?;
    tracing::info!("✓ Sync completed: {:?}", report);

    if dry_run {
        for path in memory.paths() {
            if let Some(document) = memory.get(&path).await? {
                println!("{}", path);
                println!("{}", serde_json::to_string_pretty(&document.data)?);
            }
        }
    }

    Ok(())
}

async fn handle_schedule(
    club_id: String,
    interval_minutes: u64,
    database_url: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = connect(database_url).await?;

    let orchestrator = SyncOrchestrator::new(
        FfvbConfig::new(club_id),
        Arc::new(FfvbClient::new()?),
        Arc::new(db),
        page_parser(),
    );

    let mut interval = tokio::time::interval(Duration::from_secs(interval_minutes * 60));
    tracing::info!("Syncing every {} minute(s)", interval_minutes);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match orchestrator.run().await {
                    Ok(report) => tracing::info!("✓ Sync completed: {:?}", report),
                    Err(e) => tracing::error!("✗ Sync failed: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down scheduler");
                return Ok(());
            }
        }
    }
}

async fn handle_discover(club_id: String) -> Result<(), Box<dyn std::error::Error>> {
    let config = FfvbConfig::new(club_id);
    let client = FfvbClient::new()?;

    for url in CalendarDiscovery::new(&config).discover(&client).await? {
        println!("{}", url);
    }

    Ok(())
}

async fn handle_parse(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = FfvbClient::new()?;
    let html = client.fetch(url).await?;

    match page_parser().parse(&html, url)? {
        Some(parsed) => println!("{}", serde_json::to_string_pretty(&parsed)?),
        None => tracing::warn!("No competition could be read from {}", url),
    }

    Ok(())
}

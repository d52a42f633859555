/// Foliofy Server - portfolio tracking API
use clap::{Parser, Subcommand};
use foliofy_core::{PortfolioStore, PriceSource};
use foliofy_identity::CognitoClient;
use foliofy_market_data::YahooFinanceClient;
use foliofy_server::{create_router, AppState, ServerConfig};
use foliofy_storage::SqliteStore;
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "foliofy-server")]
#[command(about = "Foliofy portfolio tracking API server", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./config.toml when present)
    #[arg(short, long, global = true, env = "FOLIOFY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create or upgrade the database schema
    Migrate,
    /// List all users
    ListUsers,
    /// Print the live quote for a ticker symbol
    Quote {
        /// Ticker symbol, e.g. AAPL
        symbol: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foliofy_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::Migrate => migrate(&config).await?,
        Commands::ListUsers => list_users(&config).await?,
        Commands::Quote { symbol } => quote(&config, &symbol).await?,
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Foliofy Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let store = open_store(&config).await?;
    tracing::info!("Database connected");

    let identity = CognitoClient::new(config.cognito.clone())?;
    tracing::info!(
        region = %config.cognito.region,
        user_pool_id = %config.cognito.user_pool_id,
        "Identity provider initialized"
    );

    let prices = YahooFinanceClient::new(config.market_data.clone())?;
    tracing::info!(base_url = %prices.base_url(), "Price source initialized");

    let app_state = AppState::new(Arc::new(store), Arc::new(identity), Arc::new(prices));
    let app = create_router(app_state, &config.cors)?;

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn migrate(config: &ServerConfig) -> anyhow::Result<()> {
    open_store(config).await?;
    println!("Database is up to date: {}", config.storage.database_url);
    Ok(())
}

async fn list_users(config: &ServerConfig) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let users = store.get_all_users().await?;

    println!("Users:");
    for user in users {
        println!(
            "  {} - {} (since {})",
            user.id,
            user.email.as_deref().unwrap_or("<no email>"),
            user.created_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}

async fn quote(config: &ServerConfig, symbol: &str) -> anyhow::Result<()> {
    let symbol = foliofy_core::portfolio::normalize_symbol(symbol)?;
    let prices = YahooFinanceClient::new(config.market_data.clone())?;
    let quote = prices.fetch_quote(&symbol).await?;

    println!("{} - {}", quote.symbol, quote.name);
    println!("  Price:          {}", quote.current_price);
    println!("  Previous close: {}", quote.previous_close);
    println!("  Change:         {}%", quote.daily_change_pct);

    Ok(())
}

/// Open the database, creating its directory and applying migrations
async fn open_store(config: &ServerConfig) -> anyhow::Result<SqliteStore> {
    let url = &config.storage.database_url;

    if let Some(parent) = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .filter(|path| !path.starts_with(":memory:"))
        .map(|path| path.split('?').next().unwrap_or(path))
        .and_then(|path| Path::new(path).parent())
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let pool = foliofy_storage::create_pool(url).await?;
    foliofy_storage::run_migrations(&pool).await?;

    Ok(SqliteStore::new(pool))
}

//! Orgdoc API server binary.

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "orgdoc_server", about = "Orgdoc API server")]
struct Args {
    /// Address to bind the HTTP listener.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3200")]
    bind_addr: String,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/orgdoc"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// JWT signing secret.
    #[arg(long, env = "JWT_SECRET")]
    jwt_secret: String,

    /// HMAC key for password reset token digests.
    #[arg(long, env = "RESET_TOKEN_SECRET")]
    reset_secret: String,

    /// Access token lifetime in seconds.
    #[arg(long, default_value_t = orgdoc_core::auth::tokens::ACCESS_TOKEN_TTL_SECS)]
    access_token_ttl_secs: i64,

    /// Refresh token lifetime in seconds.
    #[arg(long, default_value_t = orgdoc_core::auth::tokens::REFRESH_TOKEN_TTL_SECS)]
    refresh_token_ttl_secs: i64,

    /// Seed demo roles, organisation structure, users, and documents
    /// after migrations.
    #[arg(long, default_value_t = false)]
    seed_demo: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,orgdoc_api=debug,orgdoc_core=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    info!(bind_addr = %args.bind_addr, "starting orgdoc_server");

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&args.database_url)
        .await?;

    info!("running database migrations");
    orgdoc_api::migrate(&pool).await?;

    if args.seed_demo {
        info!("seeding demo data");
        orgdoc_core::seed::seed_demo(&pool).await?;
    }

    let config = orgdoc_api::config::ApiConfig {
        bind_addr: args.bind_addr,
        database_url: args.database_url,
        jwt_secret: args.jwt_secret,
        reset_secret: args.reset_secret,
        access_token_ttl_secs: args.access_token_ttl_secs,
        refresh_token_ttl_secs: args.refresh_token_ttl_secs,
    };

    let state = orgdoc_api::AppState::new(pool, config.clone());
    let app = orgdoc_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app).await?;

    Ok(())
}

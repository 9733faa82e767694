use clap::Parser;
use foresight_http::{ServerConfig, build_state, router, shutdown};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "foresight-server", version)]
#[command(about = "Foresight - tenant-scoped predictive intelligence service")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "FORESIGHT_BIND", default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// Redis URL for the result cache (in-process cache when unset).
    #[arg(long, env = "FORESIGHT_REDIS_URL")]
    redis_url: Option<String>,

    /// SQLite database path for the audit trail (in-memory when unset).
    #[arg(long, env = "FORESIGHT_DATABASE")]
    database: Option<PathBuf>,

    /// Base URL of the remote ML predictor (fallback-only when unset).
    #[arg(long, env = "FORESIGHT_PREDICTOR_URL")]
    predictor_url: Option<String>,

    /// Base URL of the text-completion provider (augmentation disabled
    /// when unset).
    #[arg(long, env = "FORESIGHT_GENERATIVE_URL")]
    generative_url: Option<String>,

    /// Per-call timeout for the remote predictor, in seconds.
    #[arg(long, env = "FORESIGHT_PREDICTOR_TIMEOUT_SECS", default_value_t = 5)]
    predictor_timeout_secs: u64,

    /// Per-call timeout for the text provider, in seconds.
    #[arg(long, env = "FORESIGHT_GENERATIVE_TIMEOUT_SECS", default_value_t = 10)]
    generative_timeout_secs: u64,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            redis_url: self.redis_url,
            database_path: self.database,
            predictor_url: self.predictor_url,
            generative_url: self.generative_url,
            predictor_timeout: Duration::from_secs(self.predictor_timeout_secs),
            generative_timeout: Duration::from_secs(self.generative_timeout_secs),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("foresight=info,tower_http=info")),
        )
        .init();

    let config = Args::parse().into_config();
    tracing::info!(
        bind = %config.bind_addr,
        redis = config.redis_url.is_some(),
        sqlite = config.database_path.is_some(),
        predictor = config.predictor_url.is_some(),
        generative = config.generative_url.is_some(),
        "starting foresight-server"
    );

    let bind_addr = config.bind_addr;
    let state = build_state(&config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    Ok(())
}

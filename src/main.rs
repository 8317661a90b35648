//! Service entry point

use std::sync::Arc;

use anyhow::Context as _;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use product_scout::analysis::AnalysisClient;
use product_scout::api::{build_router, AppState};
use product_scout::config::Config;
use product_scout::search::{InFlightLoads, SearchClient};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,product_scout=debug"));

    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::load().context("failed to load configuration")?;

    let analysis = Arc::new(
        AnalysisClient::new(config.analysis.clone(), config.vocab.clone())
            .context("failed to construct analysis client")?,
    );

    // Boot without search credentials: analysis still works, product lists
    // degrade to empty until the operator configures the index.
    let search = match SearchClient::new(&config.search) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            warn!("Search index unavailable: {e}");
            None
        }
    };

    let state = AppState {
        analysis,
        search,
        in_flight: Arc::new(InFlightLoads::new()),
        expose_details: config.server.expose_details(),
    };

    let app = build_router(state, config.server.max_body_bytes);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Listening on {addr}");
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

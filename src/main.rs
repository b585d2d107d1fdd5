use countrydex::db::CountryStore;
use countrydex::estimator::RandomMultiplier;
use countrydex::providers::HttpGateway;
use countrydex::render::SummaryRenderer;
use countrydex::server::router::{AppState, countrydex_router};
use countrydex::service::CountryService;
use mimalloc::MiMalloc;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = &countrydex::config::CONFIG;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.basic.database_url,
        loglevel = %cfg.basic.loglevel,
        listen_addr = %cfg.basic.listen_addr,
        listen_port = cfg.basic.listen_port,
        countries_url = %cfg.upstream.countries_url,
        rates_url = %cfg.upstream.rates_url,
        timeout_secs = cfg.upstream.timeout_secs,
        proxy = %cfg.upstream.proxy.as_ref().map_or("<none>", |u| u.as_str()),
        cache_dir = %cfg.summary.cache_dir.display(),
    );

    let store = CountryStore::connect(&cfg.basic.database_url).await?;
    let renderer = SummaryRenderer::new(&cfg.summary.cache_dir, cfg.summary.font_dir.as_deref());
    let gateway = HttpGateway::new(cfg.gateway())?;

    let countries = CountryService::spawn(
        store,
        Arc::new(gateway),
        renderer,
        Arc::new(RandomMultiplier),
    )
    .await?;

    let state = AppState::new(countries, cfg.basic.enable_cors);
    let app = countrydex_router(state);

    let addr = SocketAddr::from((cfg.basic.listen_addr, cfg.basic.listen_port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server has shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

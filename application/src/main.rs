use std::{future::IntoFuture as _, io, sync::OnceLock};

use application::{config, seed, server, Args, Config, Service};
use service::{domain::tenant, infra::Memory};
use tokio::net::TcpListener;
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

/// Maximum [`log::Level`] to emit, set once the [`Config`] is loaded.
static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main]
async fn main() {
    init_logging();

    _ = run().await;
}

/// Routes `WARN` and `ERROR` events to stderr and the rest to stdout,
/// filtering both by the configured [`LOG_LEVEL`].
fn init_logging() {
    fn is_problem(level: log::Level) -> bool {
        level <= log::Level::WARN
    }
    fn enabled(level: log::Level) -> bool {
        LOG_LEVEL.get().copied().unwrap_or(log::Level::INFO) >= level
    }

    fn layer<S>() -> tracing_subscriber::fmt::Layer<
        S,
        tracing_subscriber::fmt::format::DefaultFields,
        tracing_subscriber::fmt::format::Format<
            tracing_subscriber::fmt::format::Compact,
        >,
    >
    where
        S: log::Subscriber
            + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_ansi(true)
            .with_thread_names(true)
    }

    tracing_subscriber::registry()
        .with(layer().with_writer(io::stdout).with_filter(filter_fn(
            |meta| {
                meta.is_span()
                    || !is_problem(*meta.level()) && enabled(*meta.level())
            },
        )))
        .with(layer().with_writer(io::stderr).with_filter(filter_fn(
            |meta| {
                meta.is_span()
                    || is_problem(*meta.level()) && enabled(*meta.level())
            },
        )))
        .init();
}

/// Loads the [`Config`], seeds the demo tenant if requested and serves the
/// GraphQL API until the server fails.
async fn run() -> Result<(), ()> {
    let Args {
        config,
        demo_tenant,
    } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;
    let Config {
        server: config::Server { host, port, cors },
        service,
        log,
        demo,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let service = Service::new(service.into(), Memory::new());
    if let Some(tenant_id) = demo_tenant.or(demo.tenant_id) {
        seed::demo(&service, tenant::Id::from(tenant_id))
            .await
            .map_err(|e| log::error!("failed to seed demo data: {e}"))?;
    }

    let cors = server::cors(cors.origins.iter().map(String::as_str))
        .map_err(|e| log::error!("invalid CORS origin: {e}"))?;
    let app = server::router(service, cors);

    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .map_err(|e| log::error!("failed to listen on `{host}:{port}`: {e}"))?;
    log::info!("listening on `{host}:{port}`");

    axum::serve(listener, app)
        .into_future()
        .await
        .map_err(|e| log::error!("webserver failed: {e}"))
}

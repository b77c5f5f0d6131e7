use std::{env, fs::OpenOptions, net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use cashflow_rs::{
    AppState, AuthMode, LedgerStore, build_router, graceful_shutdown, logging_middleware,
};

/// The REST API server for cashflow_rs.
///
/// Credential configuration comes from the environment: `CASHFLOW_PINS`
/// holds "pin:Program" entries separated by commas, semicolons, or newlines;
/// `CASHFLOW_PIN` holds a single shared secret. With neither set the server
/// runs open.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the ledger JSON file.
    #[arg(long, default_value = "data/ledger.json")]
    ledger_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 10000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let auth_mode = AuthMode::from_config(
        env::var("CASHFLOW_PINS").ok().as_deref(),
        env::var("CASHFLOW_PIN").ok().as_deref(),
    );
    tracing::info!("PIN auth mode: {}", auth_mode.wire_name());

    let store = LedgerStore::open(&args.ledger_path).expect("Could not open the ledger file.");
    tracing::info!("Ledger file: {:?}", store.path());

    let state = AppState::new(auth_mode, store);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_middleware(build_router(state));

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("Cash Flow server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .unwrap();
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_middleware(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    // The original UI may be embedded anywhere, so CORS stays permissive.
    router
        .layer(middleware::from_fn(logging_middleware))
        .layer(tracing_layer)
        .layer(CorsLayer::permissive())
}

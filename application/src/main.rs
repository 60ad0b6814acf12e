//! Back-office server of the hotel marketplace.

use std::{
    io,
    sync::{Arc, OnceLock},
    time,
};

use easystay::{api, graphql, health, Args, Config};
use axum::{
    extract::MatchedPath,
    routing::{get, on, MethodFilter},
    Extension, Router,
};
use axum_client_ip::InsecureClientIp;
use service::{
    infra::{postgres, Postgres},
    Service,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    fmt::MakeWriter,
    layer::{Layer, SubscriberExt as _},
    registry::LookupSpan,
    util::SubscriberInitExt as _,
};

/// [`log::Level`]s written to the standard error instead of the standard
/// output.
const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

/// Maximum [`log::Level`] to output, set once the [`Config`] is loaded.
static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

postgres::embed_migrations!("../migrations");

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(log_layer(io::stdout, false))
        .with(log_layer(io::stderr, true))
        .init();

    _ = start().await;
}

/// Builds a compact formatting layer outputting either the
/// [`STDERR_LEVELS`] events (if `errors` is `true`) or all the other ones to
/// the provided `writer`.
fn log_layer<S, W>(writer: W, errors: bool) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .compact()
        .with_ansi(true)
        .with_thread_names(true)
        .with_writer(writer)
        .with_filter(filter_fn(move |meta| {
            let max = LOG_LEVEL.get().copied().unwrap_or(log::Level::INFO);
            meta.is_span()
                || STDERR_LEVELS.contains(meta.level()) == errors
                    && max >= *meta.level()
        }))
}

/// Builds a [`CorsLayer`] allowing GraphQL requests from the provided
/// `origins`.
fn cors_layer(origins: Vec<String>) -> Result<CorsLayer, ()> {
    origins.into_iter().try_fold(
        CorsLayer::new()
            .allow_methods([
                http::Method::GET,
                http::Method::OPTIONS,
                http::Method::POST,
            ])
            .allow_headers([
                http::header::AUTHORIZATION,
                http::header::CONTENT_TYPE,
            ]),
        |cors, origin| {
            let value = origin.parse::<http::header::HeaderValue>().map_err(
                |e| log::error!("invalid CORS origin `{origin}`: {e}"),
            )?;
            Ok(cors.allow_origin(value))
        },
    )
}

/// Creates a [`tracing::Span`] for the provided incoming HTTP request.
fn http_span<B>(r: &http::Request<B>) -> tracing::Span {
    let client_ip = InsecureClientIp::from(r.headers(), r.extensions())
        .map(|ip| ip.0.to_string())
        .ok();
    let uri = r.uri();

    tracing::info_span!(
        "HTTP request",
        http.client_ip = client_ip,
        http.flavor = ?r.version(),
        http.host = uri.host(),
        http.method = r.method().as_str(),
        http.route = r
            .extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str),
        http.scheme = uri.scheme().map(http::uri::Scheme::as_str),
        http.target = uri
            .path_and_query()
            .map(http::uri::PathAndQuery::as_str),
        http.user_agent = r
            .headers()
            .get(http::header::USER_AGENT)
            .and_then(|h| h.to_str().ok()),
        http.status_code = tracing::field::Empty,
    )
}

/// Records the status code of the provided HTTP response into its `span`,
/// logging unsuccessful ones as errors.
fn record_response<B>(
    r: &http::Response<B>,
    elapsed: time::Duration,
    span: &tracing::Span,
) {
    let status = r.status();
    _ = span.record("http.status_code", status.as_u16());

    let duration = format!("{}ms", elapsed.as_millis());
    if status.is_client_error() || status.is_server_error() {
        log::error!(duration = %duration);
    } else {
        log::info!(duration = %duration);
    }
}

async fn start() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let Config {
        postgres,
        service,
        server,
        log,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let postgres_config = postgres.into();
    let mut postgres = Postgres::new(&postgres_config).map_err(|e| {
        log::error!("failed to initialize `Postgres` client: {e}");
    })?;

    migrations::runner()
        .run_async(&mut postgres)
        .await
        .map_err(|e| {
            log::error!("failed to run database migrations: {e}");
        })?;

    let service = Service::new(service.into(), postgres);

    let schema = api::Schema::new(
        api::Query,
        api::Mutation,
        juniper::EmptySubscription::new(),
    );

    let cors = cors_layer(server.cors.origins)?;

    let app = Router::new()
        .route(
            "/graphql",
            on(MethodFilter::GET.or(MethodFilter::POST), graphql),
        )
        .route("/health", get(health))
        .layer(Extension(Arc::new(schema)))
        .layer(Extension(service))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(http_span)
                .on_response(record_response),
        );

    let listener = TcpListener::bind((server.host.clone(), server.port))
        .await
        .map_err(|e| {
            log::error!(
                "failed to listen on `{}:{}`: {e}",
                server.host,
                server.port,
            );
        })?;

    log::info!("listening on `{}:{}`", server.host, server.port);

    axum::serve(listener, app)
        .await
        .map_err(|e| log::error!("webserver failed: {e}"))
}

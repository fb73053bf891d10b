mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::auth::routes as auth_routes;
use crate::features::auth::{AccountAuthenticator, AuthState, SessionService};
use crate::features::cases::{routes as cases_routes, CaseService};
use crate::features::customer_responses::routes as customer_responses_routes;
use crate::features::customer_responses::{
    CustomerLinkService, LinkTokenService, ResponseService,
};
use crate::features::customers::{routes as customers_routes, CustomerService};
use crate::features::dashboard::{routes as dashboard_routes, DashboardService};
use crate::features::reports::{routes as reports_routes, ReportService};
use crate::modules::store::InMemoryStore;
use axum::extract::DefaultBodyLimit;
use axum::{middleware::from_fn, Extension, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!(
        "Configuration loaded successfully (default locale: {})",
        config.app.default_locale.code()
    );

    // Case data lives in memory for the lifetime of the process
    let store = Arc::new(InMemoryStore::seeded());
    tracing::info!("In-memory case store seeded");

    // Staff sign-in
    let sessions = Arc::new(SessionService::new(config.session.clone()));
    let auth_state = AuthState {
        authenticator: Arc::new(AccountAuthenticator::new(&config.accounts)),
        sessions: Arc::clone(&sessions),
    };
    tracing::info!(
        "Auth initialized with {} staff account(s)",
        config.accounts.accounts.len()
    );

    let customer_service = Arc::new(CustomerService::new(Arc::clone(&store)));
    let case_service = Arc::new(CaseService::new(Arc::clone(&store), store.clone()));
    let report_service = Arc::new(ReportService::new(Arc::clone(&store), store.clone()));
    let dashboard_service = Arc::new(DashboardService::new(Arc::clone(&store)));
    tracing::info!("Case, report and dashboard services initialized");

    // Customer response links
    let link_tokens = Arc::new(LinkTokenService::new(config.customer_link.clone()));
    let customer_link_service = Arc::new(CustomerLinkService::new(
        Arc::clone(&store),
        Arc::clone(&link_tokens),
        config.app.frontend_url.clone(),
    ));
    let response_service = Arc::new(ResponseService::new(
        Arc::clone(&store),
        store.clone(),
        link_tokens,
    ));
    tracing::info!(
        "Customer response links initialized (frontend: {})",
        config.app.frontend_url
    );

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Protected routes (require a staff session)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(auth_state.clone()))
        .merge(customers_routes::routes(customer_service))
        .merge(cases_routes::routes(case_service))
        .merge(reports_routes::routes(report_service))
        .merge(customer_responses_routes::protected_routes(
            customer_link_service,
        ))
        .merge(dashboard_routes::routes(dashboard_service))
        .route_layer(axum::middleware::from_fn_with_state(
            sessions,
            middleware::auth_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    // Public routes; customer links carry their own token
    let public_routes = Router::new()
        .merge(auth_routes::public_routes(auth_state))
        .merge(customer_responses_routes::public_routes(response_service));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(Extension(config.app.default_locale))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}

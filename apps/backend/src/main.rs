use actix_web::{web, App, HttpServer};
use movieshub::config::AppConfig;
use movieshub::infra::state::build_state;
use movieshub::middleware::cors::cors_middleware;
use movieshub::middleware::request_trace::RequestTrace;
use movieshub::middleware::structured_logger::StructuredLogger;
use movieshub::middleware::trace_span::TraceSpan;
use movieshub::routes;
use tracing::{info, warn};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker --env-file, or `set -a; . ./.env; set +a` locally).
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    if !config.cookie.secure {
        warn!("COOKIE_SECURE is off; the token cookie will be sent over plain http");
    }

    let app_state = match build_state()
        .with_store(config.store.clone())
        .with_security(config.security.clone())
        .with_cookie(config.cookie.clone())
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    info!(
        host = %config.host,
        port = config.port,
        backend = %config.store.backend,
        guarded = ?config.access.guarded().collect::<Vec<_>>(),
        "Starting movieshub"
    );

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);
    let origins = config.cors_origins.clone();
    let policy = config.access.clone();

    HttpServer::new(move || {
        let policy = policy.clone();
        App::new()
            .wrap(cors_middleware(&origins))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(move |cfg| routes::configure(cfg, &policy))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

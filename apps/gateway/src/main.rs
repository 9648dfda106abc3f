use actix_web::{web, App, HttpServer};
use gateway::config::GatewayConfig;
use gateway::middleware::{RequestTrace, StructuredLogger};
use gateway::state::AppState;
use gateway::routes;
use tracing::info;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker-compose env_file, or sourced manually for local runs).
    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let app_state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    for route in app_state.routes.entries() {
        info!(
            prefix = route.prefix(),
            backend = %route.backend(),
            requires_auth = route.requires_auth(),
            "Route registered"
        );
    }

    println!(
        "🚀 Starting API gateway on http://{}:{}",
        config.host, config.port
    );

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

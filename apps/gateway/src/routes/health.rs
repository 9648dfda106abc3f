use actix_web::{web, HttpResponse};

/// Liveness only: no routing, no auth, no backend calls.
async fn health() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("ok")
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::route().to(health));
}

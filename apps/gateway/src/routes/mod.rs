use actix_web::web;

pub mod dispatch;
pub mod health;

/// Register the gateway's own endpoint, then the dispatcher for everything
/// else. `/health` is matched exactly; other paths, including `/health/...`,
/// go through the route table.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .default_service(web::to(dispatch::dispatch));
}

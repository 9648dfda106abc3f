pub mod gateway;
pub mod routes;

pub use gateway::GatewayConfig;
pub use routes::{default_routes, parse_routes};

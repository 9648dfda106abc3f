pub mod route_table;

pub use route_table::{RouteEntry, RouteTable};

/// Prefix of the route a request resolved to, stored in request extensions
/// for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRoute(pub String);

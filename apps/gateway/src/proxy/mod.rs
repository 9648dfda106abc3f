pub mod context;
pub mod error;
pub mod forwarder;
pub mod headers;
pub mod identity;

pub use context::ForwardContext;
pub use error::UpstreamError;
pub use forwarder::Forwarder;
pub use identity::TrustedIdentityHeaders;

pub mod request_trace;
pub mod structured_logger;

pub use request_trace::{current_request_id, RequestId, RequestTrace};
pub use structured_logger::StructuredLogger;

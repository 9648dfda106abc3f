//! Gateway test support utilities
//!
//! Shared by the gateway's integration tests and by the service contract's
//! unit tests: idempotent logging setup, a recording mock backend, and
//! assertions for the gateway's problem-details error contract.

pub mod logging;
pub mod mock_backend;
pub mod problem_details;

pub use mock_backend::{unused_local_url, MockBackend, RecordedRequest};
pub use problem_details::{
    assert_problem_details, assert_problem_details_from_parts, ProblemDetailsLike,
};

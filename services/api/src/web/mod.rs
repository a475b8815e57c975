pub mod protocol;
pub mod rest;
pub mod router;
pub mod state;

// Re-export the router builder so the binary and the integration tests
// construct the exact same application.
pub use router::build_router;
pub use state::{AppState, SessionStore};

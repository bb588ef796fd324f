pub mod auth;
pub mod middleware;
pub mod rest;
pub mod router;
pub mod state;

// Re-export the handlers and router builder so the binary can stay small.
pub use auth::issue_token_handler;
pub use rest::questions_handler;
pub use router::build_router;

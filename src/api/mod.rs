//! REST API over the feedback store and analytics

pub mod handlers;
pub mod routes;
pub mod server;
pub mod timing;
pub mod types;

pub use server::build_app;
pub use server::build_state;
pub use server::serve;
pub use server::serve_api;

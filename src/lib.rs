//! Feedback analytics: sentiment scoring, keyword extraction and aggregate
//! statistics over stored customer feedback, with a REST API and CLI.

pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod errors;
pub mod logging;
pub mod models;
pub mod store;


pub use config::AppConfig;
pub use errors::*;

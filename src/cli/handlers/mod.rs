//! CLI command handlers module
//!
//! This module is organized by functional domains:
//! - init: Schema creation and document import
//! - analysis: Store-backed analytics (global, per service, warm-up, listing)
//! - text: Ad-hoc sentiment and keyword analysis of a single text
//! - serve: API server
//! - info: Configuration display

pub mod analysis;
pub mod info;
pub mod init;
pub mod serve;
pub mod text;

// Re-export all public handlers
pub use analysis::*;
pub use info::*;
pub use init::*;
pub use serve::*;
pub use text::*;

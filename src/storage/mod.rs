//! Local persistence for session state.
//!
//! The only thing the client keeps on disk besides its configuration is the
//! session token. Feed pages, department options and report listings are
//! fetched fresh per activation and never cached across runs.
//!
//! ## Directory Structure
//!
//! ```text
//! {root}/
//! ├── config.toml           # Client configuration
//! └── token                 # Stored session token
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use local::LocalSessionStore;

/// Trait for session token storage backends.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist the session token, replacing any previous one.
    async fn store_token(&self, token: &str) -> Result<()>;

    /// Load the stored token; `None` when no session has been saved.
    async fn load_token(&self) -> Result<Option<String>>;

    /// Remove the stored token, ending the local session.
    async fn clear_token(&self) -> Result<()>;
}

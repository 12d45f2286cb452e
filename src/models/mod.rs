// src/models/mod.rs

//! Domain models for the afiliado client.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod post;
mod report;
mod session;

// Re-export all public types
pub use config::{ApiConfig, Config, DeviceConfig, FeedConfig};
pub use post::{FeedPage, PagePayload, Post};
pub use report::{Coordinates, DepartmentOption, DepartmentRow, ReportDraft, SubmittedReport};
pub use session::{SessionContext, TokenClaims};

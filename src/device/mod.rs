// src/device/mod.rs

//! Device capability seams.
//!
//! Location and photo acquisition sit behind traits so the submission
//! workflow is a single path parameterized by strategy: coordinates come
//! either from typed manual entry or from a geolocation helper, photos from
//! an existing file or a capture helper. A refused capability surfaces as
//! [`AppError::PermissionDenied`](crate::error::AppError) and leaves the
//! draft untouched.

pub mod location;
pub mod photo;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Coordinates, ReportDraft};

pub use location::{HelperCommand, ManualEntry};
pub use photo::{CameraCapture, GalleryFile};

/// Strategy for acquiring a single coordinate pair.
///
/// Exactly one source is used per submission attempt.
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Perform one position acquisition.
    async fn acquire(&self) -> Result<Coordinates>;
}

/// Strategy for acquiring a single local image file.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// Perform one photo acquisition, returning the local path.
    async fn acquire(&self) -> Result<PathBuf>;
}

/// Acquire a location and store it into the draft.
///
/// On any failure (including a permission refusal) the draft keeps its
/// previous location.
pub async fn acquire_location(draft: &mut ReportDraft, source: &dyn LocationSource) -> Result<()> {
    let coords = source.acquire().await?;
    draft.set_location(coords);
    Ok(())
}

/// Acquire a photo and attach it to the draft, replacing any previous one.
///
/// On any failure the previously attached photo is kept.
pub async fn attach_photo(draft: &mut ReportDraft, source: &dyn PhotoSource) -> Result<()> {
    let path = source.acquire().await?;
    draft.set_photo(path);
    Ok(())
}

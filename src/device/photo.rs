// src/device/photo.rs

//! Photo acquisition strategies.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::device::PhotoSource;
use crate::error::{AppError, Result};

/// An existing image picked from local storage.
#[derive(Debug, Clone)]
pub struct GalleryFile {
    path: PathBuf,
}

impl GalleryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn check(&self) -> Result<PathBuf> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) if meta.is_file() => Ok(self.path.clone()),
            Ok(_) => Err(AppError::validation(format!(
                "{} is not a file",
                self.path.display()
            ))),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                Err(AppError::permission_denied(format!(
                    "storage access to {} was refused",
                    self.path.display()
                )))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::validation(
                format!("photo {} does not exist", self.path.display()),
            )),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl PhotoSource for GalleryFile {
    async fn acquire(&self) -> Result<PathBuf> {
        self.check().await
    }
}

/// Capture helper command: invoked with the target path as its final
/// argument, expected to leave an image there.
///
/// The helper owns the platform permission prompt; a non-zero exit is
/// treated as the user refusing camera access.
#[derive(Debug, Clone)]
pub struct CameraCapture {
    command: String,
    target: PathBuf,
    timeout: Duration,
}

impl CameraCapture {
    pub fn new(command: impl Into<String>, target: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            target: target.into(),
            timeout,
        }
    }

    async fn run(&self) -> Result<PathBuf> {
        let mut words = self.command.split_whitespace();
        let program = words
            .next()
            .ok_or_else(|| AppError::config("camera helper command is empty"))?;

        let status = tokio::time::timeout(
            self.timeout,
            Command::new(program)
                .args(words)
                .arg(&self.target)
                .status(),
        )
        .await
        .map_err(|_| {
            AppError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("camera helper '{}' timed out", self.command),
            ))
        })??;

        if !status.success() {
            return Err(AppError::permission_denied(format!(
                "camera helper '{}' exited with {status}",
                self.command
            )));
        }

        // The helper reported success; the capture must exist.
        GalleryFile::new(&self.target).acquire().await
    }
}

#[async_trait]
impl PhotoSource for CameraCapture {
    async fn acquire(&self) -> Result<PathBuf> {
        self.run().await
    }
}

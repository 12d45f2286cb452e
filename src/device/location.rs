// src/device/location.rs

//! Location acquisition strategies.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::device::LocationSource;
use crate::error::{AppError, Result};
use crate::models::Coordinates;

/// Manually entered coordinates: two independently typed numeric strings.
#[derive(Debug, Clone)]
pub struct ManualEntry {
    pub latitude: String,
    pub longitude: String,
}

impl ManualEntry {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }

    fn parse(&self) -> Result<Coordinates> {
        let latitude: f64 = self
            .latitude
            .trim()
            .parse()
            .map_err(|_| AppError::validation(format!("latitude '{}' is not a number", self.latitude)))?;
        let longitude: f64 = self
            .longitude
            .trim()
            .parse()
            .map_err(|_| AppError::validation(format!("longitude '{}' is not a number", self.longitude)))?;

        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(AppError::validation(format!(
                "latitude {latitude} is out of range"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::validation(format!(
                "longitude {longitude} is out of range"
            )));
        }

        Ok(Coordinates {
            latitude,
            longitude,
        })
    }
}

#[async_trait]
impl LocationSource for ManualEntry {
    async fn acquire(&self) -> Result<Coordinates> {
        self.parse()
    }
}

/// Position as printed by geolocation helpers (termux-location and the
/// geoclue demo agree on these keys).
#[derive(Debug, Deserialize)]
struct HelperPosition {
    latitude: f64,
    longitude: f64,
}

/// Geolocation helper command: one high-accuracy fix per acquisition.
///
/// The helper owns the platform permission prompt; a non-zero exit is
/// treated as the user refusing access.
#[derive(Debug, Clone)]
pub struct HelperCommand {
    command: String,
    timeout: Duration,
}

impl HelperCommand {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }

    async fn run(&self) -> Result<Coordinates> {
        let mut words = self.command.split_whitespace();
        let program = words
            .next()
            .ok_or_else(|| AppError::config("location helper command is empty"))?;

        let output = tokio::time::timeout(
            self.timeout,
            Command::new(program).args(words).output(),
        )
        .await
        .map_err(|_| {
            AppError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("location helper '{}' timed out", self.command),
            ))
        })??;

        if !output.status.success() {
            return Err(AppError::permission_denied(format!(
                "location helper '{}' exited with {}",
                self.command, output.status
            )));
        }

        let position: HelperPosition = serde_json::from_slice(&output.stdout)
            .map_err(|e| AppError::parse("location helper", e))?;

        Ok(Coordinates {
            latitude: position.latitude,
            longitude: position.longitude,
        })
    }
}

#[async_trait]
impl LocationSource for HelperCommand {
    async fn acquire(&self) -> Result<Coordinates> {
        self.run().await
    }
}

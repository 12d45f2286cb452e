//! Citizen report data structures.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A coordinate pair attached to a report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Wire shape of one department row from the directory endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentRow {
    pub id_dependencia: i64,
    pub nombre: String,
}

/// A selectable department, as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentOption {
    /// Stringified department id, submitted with the report
    pub value: String,
    /// Human-readable department name
    pub label: String,
}

impl From<DepartmentRow> for DepartmentOption {
    fn from(row: DepartmentRow) -> Self {
        Self {
            value: row.id_dependencia.to_string(),
            label: row.nombre,
        }
    }
}

/// An in-progress report being composed by the user.
///
/// Created empty when composition starts, cleared on successful submission,
/// and retained unchanged on failure so the user can correct and resubmit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportDraft {
    pub title: String,
    pub description: String,
    /// Must match one of the currently loaded department options
    pub department_id: String,
    /// Optional local image file
    pub photo: Option<PathBuf>,
    /// Present once a location has been acquired, by either mode
    pub location: Option<Coordinates>,
}

impl ReportDraft {
    /// Check the required-field invariant: title, description, department
    /// and location must all be present; the photo is optional.
    ///
    /// When department options are loaded, the selected department must be
    /// one of them. Runs entirely locally; no network is involved.
    pub fn validate(&self, departments: &[DepartmentOption]) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::validation("title is required"));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::validation("description is required"));
        }
        if self.department_id.trim().is_empty() {
            return Err(AppError::validation("department is required"));
        }
        if !departments.is_empty() && !departments.iter().any(|d| d.value == self.department_id) {
            return Err(AppError::validation(format!(
                "unknown department '{}'",
                self.department_id
            )));
        }
        if self.location.is_none() {
            return Err(AppError::validation("location is required"));
        }
        Ok(())
    }

    /// Attach a photo, discarding any previously attached one.
    pub fn set_photo(&mut self, path: impl Into<PathBuf>) {
        self.photo = Some(path.into());
    }

    /// Store an acquired coordinate pair.
    pub fn set_location(&mut self, location: Coordinates) {
        self.location = Some(location);
    }

    /// Reset every field, returning the draft to its freshly opened state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Multipart filename and MIME subtype for the attached photo.
    ///
    /// Both derive from the local file name; the extension defaults to
    /// `jpg` when absent.
    pub fn photo_parts(path: &Path) -> (String, String) {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image.jpg".to_string());
        let ext = Path::new(&file_name)
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "jpg".to_string());
        (file_name, format!("image/{ext}"))
    }
}

/// An already-filed report as listed by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmittedReport {
    #[serde(rename = "titulo")]
    pub title: String,

    #[serde(rename = "descripcion")]
    pub description: String,

    /// URL of the attached photo, if any
    #[serde(rename = "foto", default)]
    pub photo_url: String,

    #[serde(rename = "fecha_reporte")]
    pub reported_at: String,

    /// Review status assigned by the server (e.g. "pendiente")
    #[serde(rename = "estatus")]
    pub status: String,

    /// Department the report was routed to
    #[serde(rename = "dependencia")]
    pub department: String,
}

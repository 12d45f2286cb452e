//! Authenticated session data.

use serde::Deserialize;

/// Claims carried in the session token payload, exactly as issued.
///
/// Everything except the two identifiers is optional; the platform has
/// issued tokens with partial profile data.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default)]
    pub id_partido: Option<i64>,

    #[serde(default)]
    pub nombre: Option<String>,

    #[serde(default)]
    pub a_paterno: Option<String>,

    #[serde(default)]
    pub a_materno: Option<String>,

    #[serde(default)]
    pub telefono: Option<String>,

    #[serde(default)]
    pub foto_perfil: Option<String>,
}

/// The authenticated user's identity and organizational context.
///
/// Built from decoded token claims; construction fails upstream when either
/// identifier is absent, so both are always present here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// User identifier
    pub user_id: i64,

    /// Organizational context scoping feed and report data
    pub party_id: i64,

    /// Given name
    pub first_name: String,

    /// Paternal surname
    pub paternal_surname: String,

    /// Maternal surname
    pub maternal_surname: String,

    /// Contact phone number
    pub phone: String,

    /// Profile photo URL
    pub avatar_url: String,
}

impl SessionContext {
    /// Full display name in the platform's customary order.
    pub fn full_name(&self) -> String {
        [
            self.first_name.as_str(),
            self.paternal_surname.as_str(),
            self.maternal_surname.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

//! Feed post data structures.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

/// A single feed entry, created server-side and read-only on the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Unique identifier within a feed
    #[serde(rename = "id_contenido")]
    pub id: i64,

    /// Display name of the author
    #[serde(rename = "autor")]
    pub author: String,

    /// Post caption text
    #[serde(rename = "descripcion")]
    pub caption: String,

    /// Publication timestamp, as supplied by the server
    #[serde(rename = "fecha_publicacion")]
    pub published_at: String,

    /// URL of the author's avatar image
    #[serde(rename = "foto_perfil")]
    pub author_avatar_url: String,

    /// Organization display name
    #[serde(rename = "nombre_partido", default)]
    pub party_name: String,

    /// URL of the post image
    #[serde(rename = "ruta_imagen")]
    pub image_url: String,

    /// Local-only flag, never sent back to the server
    #[serde(skip)]
    pub liked: bool,

    /// Local-only flag, never sent back to the server
    #[serde(skip)]
    pub saved: bool,
}

/// Raw feed page response: `{ posts, totalPages?, total? }`.
///
/// `totalPages` and `total` are kept untyped because the server is not
/// consistent about them; [`PagePayload::resolve_total_pages`] applies the
/// fallback policy.
#[derive(Debug, Clone, Deserialize)]
pub struct PagePayload {
    #[serde(default)]
    pub posts: Option<Value>,

    #[serde(rename = "totalPages", default)]
    pub total_pages: Option<Value>,

    #[serde(default)]
    pub total: Option<Value>,
}

impl PagePayload {
    /// Decode the `posts` field, rejecting payloads where it is missing or
    /// not an array.
    pub fn decode_posts(&self, context: &str) -> Result<Vec<Post>> {
        let Some(Value::Array(rows)) = &self.posts else {
            return Err(AppError::parse(context, "posts missing or not an array"));
        };

        rows.iter()
            .map(|row| {
                serde_json::from_value(row.clone())
                    .map_err(|e| AppError::parse(context, format!("bad post entry: {e}")))
            })
            .collect()
    }

    /// Resolve the page count with the three-tier fallback policy:
    /// a numeric `totalPages` is used verbatim; otherwise a numeric `total`
    /// divided by `page_size`, rounded up; otherwise 1.
    ///
    /// Zero counts as absent, matching how the server's consumers have
    /// always read these fields.
    pub fn resolve_total_pages(&self, page_size: u32) -> u32 {
        if let Some(pages) = self.total_pages.as_ref().and_then(as_count).filter(|p| *p > 0) {
            return pages;
        }
        if let Some(total) = self.total.as_ref().and_then(as_count).filter(|t| *t > 0) {
            return total.div_ceil(page_size.max(1));
        }
        1
    }
}

/// Interpret a JSON value as a count. The server has been observed to send
/// both numbers and numeric strings here.
fn as_count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .map(|n| n as u32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// One fetched batch of feed items with its pagination bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPage {
    /// Server-provided item order is preserved
    pub items: Vec<Post>,

    /// 1-indexed page number this batch corresponds to
    pub page_number: u32,

    /// Total page count resolved from the payload
    pub total_pages: u32,
}

impl FeedPage {
    /// Build a page from a raw payload.
    pub fn from_payload(payload: &PagePayload, page_number: u32, page_size: u32) -> Result<Self> {
        let items = payload.decode_posts("feed page")?;
        Ok(Self {
            items,
            page_number,
            total_pages: payload.resolve_total_pages(page_size),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> PagePayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_total_pages_verbatim_when_numeric() {
        let p = payload(json!({"posts": [], "totalPages": 7, "total": 900}));
        assert_eq!(p.resolve_total_pages(10), 7);
    }

    #[test]
    fn test_total_pages_accepts_numeric_string() {
        let p = payload(json!({"posts": [], "totalPages": "4"}));
        assert_eq!(p.resolve_total_pages(10), 4);
    }

    #[test]
    fn test_total_pages_derived_from_total() {
        // 25 items at 10 per page round up to 3 pages
        let p = payload(json!({"posts": [], "total": 25}));
        assert_eq!(p.resolve_total_pages(10), 3);
    }

    #[test]
    fn test_total_pages_defaults_to_one() {
        let p = payload(json!({"posts": []}));
        assert_eq!(p.resolve_total_pages(10), 1);

        let p = payload(json!({"posts": [], "totalPages": "soon", "total": null}));
        assert_eq!(p.resolve_total_pages(10), 1);
    }

    #[test]
    fn test_zero_counts_fall_through_the_tiers() {
        let p = payload(json!({"posts": [], "totalPages": 0, "total": 25}));
        assert_eq!(p.resolve_total_pages(10), 3);

        let p = payload(json!({"posts": [], "totalPages": 0, "total": 0}));
        assert_eq!(p.resolve_total_pages(10), 1);
    }

    #[test]
    fn test_decode_posts_rejects_missing_or_non_array() {
        let p = payload(json!({"total": 3}));
        assert!(matches!(
            p.decode_posts("feed page"),
            Err(AppError::Parse { .. })
        ));

        let p = payload(json!({"posts": "nope"}));
        assert!(p.decode_posts("feed page").is_err());
    }

    #[test]
    fn test_decode_posts_maps_wire_names() {
        let p = payload(json!({
            "posts": [{
                "id_contenido": 12,
                "autor": "Comité Municipal",
                "descripcion": "Jornada de afiliación",
                "fecha_publicacion": "2025-03-02T10:00:00Z",
                "foto_perfil": "https://cdn.example.com/avatar.png",
                "nombre_partido": "PT",
                "ruta_imagen": "https://cdn.example.com/post.jpg"
            }]
        }));

        let posts = p.decode_posts("feed page").unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, 12);
        assert_eq!(posts[0].author, "Comité Municipal");
        assert!(!posts[0].liked);
        assert!(!posts[0].saved);
    }
}

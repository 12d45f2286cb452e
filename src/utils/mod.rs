//! Utility functions and helpers.

pub mod http;
pub mod validate;

use url::Url;

use crate::error::Result;

/// Join an API path onto the configured base URL.
///
/// The base is treated as a directory; a missing trailing slash is
/// tolerated.
pub fn endpoint(base_url: &str, path: &str) -> Result<Url> {
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };
    let base = Url::parse(&normalized)?;
    Ok(base.join(path.trim_start_matches('/'))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_with_and_without_trailing_slash() {
        assert_eq!(
            endpoint("https://api.example.com", "api/post/3").unwrap().as_str(),
            "https://api.example.com/api/post/3"
        );
        assert_eq!(
            endpoint("https://api.example.com/", "/api/post/3").unwrap().as_str(),
            "https://api.example.com/api/post/3"
        );
    }

    #[test]
    fn test_endpoint_rejects_invalid_base() {
        assert!(endpoint("not a url", "api/post/3").is_err());
    }
}

// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::ApiConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &ApiConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// GET a URL and decode its JSON body.
///
/// Non-success statuses become [`AppError::Rejected`] with the server's
/// `message` field when one is present.
pub async fn get_json<T: DeserializeOwned>(client: &reqwest::Client, url: Url) -> Result<T> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| server_message(&body))
            .unwrap_or_else(|| status.to_string());
        return Err(AppError::rejected(status.as_u16(), message));
    }
    Ok(response.json().await?)
}

/// Extract the optional `message` field from an error body.
pub fn server_message(body: &serde_json::Value) -> Option<String> {
    body.get("message")
        .and_then(|m| m.as_str())
        .map(|m| m.to_string())
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_async_client() {
        assert!(create_async_client(&ApiConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_get_json_maps_rejection_message() {
        let (base, _server) =
            testing::spawn_one_shot("422 Unprocessable Entity", r#"{"message":"Campos incompletos"}"#.into())
                .await;
        let client = create_async_client(&ApiConfig::default()).unwrap();
        let url = crate::utils::endpoint(&base, "api/reportes/crear").unwrap();

        let err = get_json::<serde_json::Value>(&client, url).await.unwrap_err();
        match err {
            AppError::Rejected { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Campos incompletos");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_server_message_extraction() {
        assert_eq!(
            server_message(&json!({"message": "Reporte duplicado"})),
            Some("Reporte duplicado".to_string())
        );
        assert_eq!(server_message(&json!({"error": 1})), None);
        assert_eq!(server_message(&json!({"message": 5})), None);
    }
}

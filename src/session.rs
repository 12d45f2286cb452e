// src/session.rs

//! Session token decoding.
//!
//! The platform issues an opaque bearer token whose payload segment carries
//! the user's identity and organizational context. The client decodes it
//! locally; it never verifies the signature, which belongs to the server.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};

use crate::error::{AppError, Result};
use crate::models::{SessionContext, TokenClaims};

/// Decode a bearer token into a session context.
///
/// The payload segment is base64-decoded and JSON-parsed. A token whose
/// payload lacks the user id or the organization id is unusable: every
/// screen-level operation is scoped by both, so this is a fatal session
/// error and the caller must not proceed.
pub fn decode_token(token: &str) -> Result<SessionContext> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| AppError::session("token has no payload segment"))?;

    // Tokens in the wild carry both base64url and standard alphabets.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD.decode(payload))
        .map_err(|e| AppError::session(format!("token payload is not base64: {e}")))?;

    let claims: TokenClaims = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::session(format!("token payload is not valid JSON: {e}")))?;

    let user_id = claims
        .id
        .ok_or_else(|| AppError::session("token payload is missing the user id"))?;
    let party_id = claims
        .id_partido
        .ok_or_else(|| AppError::session("token payload is missing the organization id"))?;

    Ok(SessionContext {
        user_id,
        party_id,
        first_name: claims.nombre.unwrap_or_default(),
        paternal_surname: claims.a_paterno.unwrap_or_default(),
        maternal_surname: claims.a_materno.unwrap_or_default(),
        phone: claims.telefono.unwrap_or_default(),
        avatar_url: claims.foto_perfil.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token_with_payload(payload: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).unwrap());
        format!("{header}.{body}.sig")
    }

    #[test]
    fn test_decode_full_payload() {
        let token = token_with_payload(json!({
            "id": 42,
            "id_partido": 7,
            "nombre": "María",
            "a_paterno": "López",
            "a_materno": "Hernández",
            "telefono": "5512345678",
            "foto_perfil": "https://cdn.example.com/maria.png"
        }));

        let ctx = decode_token(&token).unwrap();
        assert_eq!(ctx.user_id, 42);
        assert_eq!(ctx.party_id, 7);
        assert_eq!(ctx.full_name(), "María López Hernández");
        assert_eq!(ctx.phone, "5512345678");
    }

    #[test]
    fn test_decode_tolerates_partial_profile() {
        let token = token_with_payload(json!({"id": 1, "id_partido": 2}));
        let ctx = decode_token(&token).unwrap();
        assert_eq!(ctx.full_name(), "");
        assert_eq!(ctx.avatar_url, "");
    }

    #[test]
    fn test_missing_identifiers_are_fatal() {
        let no_user = token_with_payload(json!({"id_partido": 2}));
        let err = decode_token(&no_user).unwrap_err();
        assert!(err.is_fatal());

        let no_party = token_with_payload(json!({"id": 1}));
        let err = decode_token(&no_party).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        assert!(decode_token("").is_err());
        assert!(decode_token("onlyonesegment").is_err());
        assert!(decode_token("a.!!!.c").is_err());

        let not_json = format!("h.{}.s", URL_SAFE_NO_PAD.encode(b"plain text"));
        assert!(decode_token(&not_json).is_err());
    }

    #[test]
    fn test_standard_alphabet_accepted() {
        let body = STANDARD.encode(serde_json::to_vec(&json!({"id": 9, "id_partido": 3})).unwrap());
        let token = format!("h.{body}.s");
        assert_eq!(decode_token(&token).unwrap().user_id, 9);
    }
}

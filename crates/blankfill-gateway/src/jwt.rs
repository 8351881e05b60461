// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HS256 JSON Web Tokens.
//!
//! [`JwtFactory`] mints tokens for clients and [`JwtVerifier`] checks them on
//! every authenticated route. Only HMAC SHA-256 signatures are accepted.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_json::{Map, Value, json};
use thiserror::Error;

/// The only signing algorithm accepted.
pub const HS256: &str = "HS256";

/// Claim names that callers may not set through extra fields.
pub const REGISTERED_CLAIMS: [&str; 5] = ["exp", "nbf", "iss", "aud", "iat"];

/// Reasons a token is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("malformed token")]
    Malformed,

    #[error("unsupported algorithm")]
    Algorithm,

    #[error("invalid signature")]
    Signature,

    #[error("token has expired")]
    Expired,

    #[error("token is not yet valid")]
    NotYetValid,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => Self::Signature,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::NotYetValid,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => Self::Algorithm,
            _ => Self::Malformed,
        }
    }
}

/// Mints signed tokens that expire after a fixed duration.
pub struct JwtFactory {
    key: EncodingKey,
    duration_secs: u64,
}

impl JwtFactory {
    pub fn new(secret: impl AsRef<[u8]>, duration_secs: u64) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_ref()),
            duration_secs,
        }
    }

    /// Create a token valid from now for the configured duration.
    ///
    /// Extra fields named like a registered claim are dropped.
    pub fn create_token(&self, extra: &Map<String, Value>) -> Result<String, JwtError> {
        self.create_token_at(chrono::Utc::now().timestamp(), extra)
    }

    fn create_token_at(&self, now: i64, extra: &Map<String, Value>) -> Result<String, JwtError> {
        let exp = now.saturating_add(i64::try_from(self.duration_secs).unwrap_or(i64::MAX));
        let mut claims = Map::new();
        claims.insert("exp".into(), json!(exp));
        claims.insert("iat".into(), json!(now));
        claims.insert("alg".into(), json!(HS256));
        for (key, value) in extra {
            if !REGISTERED_CLAIMS.contains(&key.as_str()) {
                claims.insert(key.clone(), value.clone());
            }
        }

        encode(&Header::new(Algorithm::HS256), &claims, &self.key)
            .map_err(|e| JwtError::Signing(e.to_string()))
    }
}

impl std::fmt::Debug for JwtFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtFactory")
            .field("secret", &"[redacted]")
            .field("duration_secs", &self.duration_secs)
            .finish()
    }
}

/// Checks token signatures and time claims.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        Self {
            key: DecodingKey::from_secret(secret.as_ref()),
            validation,
        }
    }

    /// Verify `token` and return its claims.
    pub fn verify(&self, token: &str) -> Result<Map<String, Value>, JwtError> {
        let data = decode::<Map<String, Value>>(token, &self.key, &self.validation)?;
        Ok(data.claims)
    }
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("secret", &"[redacted]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    fn factory() -> JwtFactory {
        JwtFactory::new("secret", 3600)
    }

    fn sign(header: Header, claims: Value) -> String {
        encode(&header, &claims, &EncodingKey::from_secret(b"secret")).unwrap()
    }

    #[test]
    fn minted_token_verifies() {
        let token = factory().create_token(&Map::new()).unwrap();
        let claims = JwtVerifier::new("secret").verify(&token).unwrap();
        assert_eq!(claims["alg"], HS256);
        let exp = claims["exp"].as_i64().unwrap();
        let iat = claims["iat"].as_i64().unwrap();
        assert_eq!(exp - iat, 3600);
    }

    #[test]
    fn extra_fields_cannot_override_registered_claims() {
        let mut extra = Map::new();
        extra.insert("exp".into(), json!(0));
        extra.insert("iss".into(), json!("mallory"));
        extra.insert("client".into(), json!("ioanna"));

        let now = now();
        let token = factory().create_token_at(now, &extra).unwrap();
        let claims = JwtVerifier::new("secret").verify(&token).unwrap();
        assert_eq!(claims["exp"], json!(now + 3600));
        assert_eq!(claims["client"], "ioanna");
        assert!(!claims.contains_key("iss"));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = factory().create_token(&Map::new()).unwrap();
        assert_eq!(
            JwtVerifier::new("other").verify(&token),
            Err(JwtError::Signature)
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = factory().create_token_at(now() - 7200, &Map::new()).unwrap();
        assert_eq!(
            JwtVerifier::new("secret").verify(&token),
            Err(JwtError::Expired)
        );
    }

    #[test]
    fn future_nbf_is_rejected() {
        let token = sign(
            Header::new(Algorithm::HS256),
            json!({ "exp": now() + 3600, "nbf": now() + 600 }),
        );
        assert_eq!(
            JwtVerifier::new("secret").verify(&token),
            Err(JwtError::NotYetValid)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let verifier = JwtVerifier::new("secret");
        assert_eq!(verifier.verify("token"), Err(JwtError::Malformed));
        assert_eq!(verifier.verify("!!.!!.!!"), Err(JwtError::Malformed));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let token = factory().create_token(&Map::new()).unwrap();
        let forged = sign(Header::new(Algorithm::HS256), json!({ "exp": now() + 999_999 }));
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = forged.split('.').nth(1).unwrap();
        assert_eq!(
            JwtVerifier::new("secret").verify(&parts.join(".")),
            Err(JwtError::Signature)
        );
    }

    #[test]
    fn other_algorithms_are_rejected() {
        let hs384 = sign(Header::new(Algorithm::HS384), json!({ "exp": now() + 60 }));
        assert_eq!(
            JwtVerifier::new("secret").verify(&hs384),
            Err(JwtError::Algorithm)
        );

        // {"alg":"none","typ":"JWT"}.{"exp":4102444800}
        let unsigned = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.eyJleHAiOjQxMDI0NDQ4MDB9.";
        assert!(JwtVerifier::new("secret").verify(unsigned).is_err());
    }

    #[test]
    fn debug_redacts_secret() {
        let debug = format!("{:?} {:?}", factory(), JwtVerifier::new("secret"));
        assert!(!debug.contains("\"secret\""));
        assert!(debug.contains("[redacted]"));
    }
}

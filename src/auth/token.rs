//! Bearer token issue and verification
//!
//! Tokens are HS256 JWTs carrying the admin id, issue time and expiry. There
//! is no server-side session store and no revocation: a token stays usable
//! until `exp`, and liveness of the admin is re-checked on every validation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use tracing::warn;

use super::models::Claims;
use crate::common::ApiError;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token is malformed or its signature does not match")]
    Invalid,

    #[error("failed to encode token: {0}")]
    Encoding(String),
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired | TokenError::Invalid => {
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
            TokenError::Encoding(msg) => ApiError::InternalServer(msg),
        }
    }
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, user_id: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: &str, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token.trim(), &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => {
                    warn!(error = %e, "Token validation failed");
                    TokenError::Invalid
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(secret, Duration::hours(24))
    }

    #[test]
    fn test_issue_and_decode() {
        let issued_at = Utc::now();
        let token = codec("secret").issue_at("42", issued_at).unwrap();
        let claims = codec("secret").decode(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.iat, issued_at.timestamp());
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = codec("secret")
            .issue_at("42", Utc::now() - Duration::hours(25))
            .unwrap();
        assert!(matches!(codec("secret").decode(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = codec("secret").issue("42").unwrap();
        assert!(matches!(codec("other").decode(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(codec("secret").decode("not-a-token"), Err(TokenError::Invalid)));
        // the unsigned base64 JSON placeholder format is not accepted
        let unsigned = "eyJ1c2VySWQiOiIxIiwidGltZXN0YW1wIjowLCJleHAiOjk5OTk5OTk5OTk5OTl9";
        assert!(matches!(codec("secret").decode(unsigned), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_token_errors_map_to_unauthorized() {
        assert!(matches!(ApiError::from(TokenError::Expired), ApiError::Unauthorized(_)));
        assert!(matches!(ApiError::from(TokenError::Invalid), ApiError::Unauthorized(_)));
        assert!(matches!(
            ApiError::from(TokenError::Encoding("x".into())),
            ApiError::InternalServer(_)
        ));
    }
}

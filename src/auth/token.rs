use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::utils::error::AppError;

/// JWT claims carried by a bearer token. `sub` is the account email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// Issues and resolves bearer tokens. HS256 with a shared secret; the
/// token lifetime comes from configuration.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::default(),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn issue(&self, subject: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("token issuance failed: {e}")))
    }

    /// Resolve a token back to its subject. Expired, tampered and
    /// malformed tokens all fail the same way.
    pub fn resolve(&self, token: &str) -> Result<String, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|_| AppError::Unauthenticated("Invalid authentication credentials".to_string()))
    }
}

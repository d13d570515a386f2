use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config;

/// Claims carried by an identity token. Stateless: the subject id is the
/// only link back to a user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Claims expiring `security.jwt_expiry_hours` from now (24h default).
    pub fn new(user_id: i64) -> Self {
        let expiry_hours = config::config().security.jwt_expiry_hours;
        Self::with_expiry(user_id, Utc::now() + Duration::hours(expiry_hours as i64))
    }

    pub fn with_expiry(user_id: i64, expires_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            exp: expires_at.timestamp(),
            iat: Utc::now().timestamp(),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("JWT generation error: {0}")]
    Generation(String),

    // Invalid signature, malformed payload, and expiry all collapse into
    // this one kind so the failure cause is not observable from outside.
    #[error("invalid token")]
    Decode,
}

pub fn generate(claims: &Claims) -> Result<String, TokenError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| TokenError::Generation(e.to_string()))
}

/// Verify signature and expiry, returning the embedded claims.
pub fn verify(token: &str) -> Result<Claims, TokenError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| TokenError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_claims_with_expiry() {
        let claims = Claims::new(42);
        let token = generate(&claims).unwrap();
        let decoded = verify(&token).unwrap();

        assert_eq!(decoded.user_id, 42);
        assert_eq!(decoded.exp, claims.exp);
    }

    #[test]
    fn default_expiry_is_roughly_24_hours_out() {
        let claims = Claims::new(1);
        let lifetime = claims.exp - Utc::now().timestamp();
        assert!(lifetime > 23 * 3600 && lifetime <= 24 * 3600 + 60);
    }

    #[test]
    fn expired_token_fails_verification() {
        let claims = Claims::with_expiry(7, Utc::now() - Duration::hours(1));
        let token = generate(&claims).unwrap();
        assert!(matches!(verify(&token), Err(TokenError::Decode)));
    }

    #[test]
    fn tampered_token_fails_verification() {
        let token = generate(&Claims::new(7)).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('a') { 'b' } else { 'a' });
        assert!(matches!(verify(&tampered), Err(TokenError::Decode)));
    }

    #[test]
    fn garbage_input_fails_verification() {
        assert!(matches!(verify("not-a-token"), Err(TokenError::Decode)));
    }
}

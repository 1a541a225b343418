//! JWT issuance and verification for bearer tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, GatewayResult};

/// JWT claims for an authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username).
    pub sub: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at time (Unix timestamp).
    pub iat: i64,
    /// Issuer.
    pub iss: String,
}

/// JWT token manager.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    token_ttl: Duration,
}

impl JwtManager {
    /// Create a new JWT manager with the given secret.
    pub fn new(secret: &str, issuer: String, token_ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            token_ttl: Duration::seconds(token_ttl_secs),
        }
    }

    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl.num_seconds()
    }

    /// Issue a token for `subject`, valid from now.
    pub fn generate_token(&self, subject: &str) -> GatewayResult<String> {
        self.generate_token_at(subject, Utc::now())
    }

    /// Issue a token as if it had been minted at `issued_at`.
    pub fn generate_token_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> GatewayResult<String> {
        let exp = issued_at + self.token_ttl;

        let claims = Claims {
            sub: subject.to_string(),
            exp: exp.timestamp(),
            iat: issued_at.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| GatewayError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate signature, issuer and expiry, then return the claims.
    pub fn validate_token(&self, token: &str) -> GatewayResult<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        // Reject at `exp`, not a minute later.
        validation.leeway = 0;

        let token_data: TokenData<Claims> = decode(token, &self.decoding_key, &validation)
            .map_err(|e| GatewayError::Unauthorized(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn manager() -> JwtManager {
        JwtManager::new("test-secret-key-12345", "historial-gateway".to_string(), 3600)
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = manager();
        let token = manager.generate_token("doctor").unwrap();

        let claims = manager.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "doctor");
        assert_eq!(claims.iss, "historial-gateway");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        let manager = manager();
        let token = manager
            .generate_token_at("doctor", Utc::now() - Duration::hours(2))
            .unwrap();

        assert!(matches!(
            manager.validate_token(&token),
            Err(GatewayError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_token_just_past_expiry_rejected() {
        let manager = manager();
        let token = manager
            .generate_token_at(
                "doctor",
                Utc::now() - Duration::seconds(manager.token_ttl_secs() + 5),
            )
            .unwrap();

        assert!(matches!(
            manager.validate_token(&token),
            Err(GatewayError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_token_still_valid_inside_window() {
        let manager = manager();
        let token = manager
            .generate_token_at("doctor", Utc::now() - Duration::minutes(50))
            .unwrap();

        assert_ok!(manager.validate_token(&token));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = manager().generate_token("doctor").unwrap();
        let other = JwtManager::new("another-secret", "historial-gateway".to_string(), 3600);

        assert_err!(other.validate_token(&token));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let token = manager().generate_token("doctor").unwrap();
        let other = JwtManager::new("test-secret-key-12345", "someone-else".to_string(), 3600);

        assert_err!(other.validate_token(&token));
    }

    #[test]
    fn test_garbage_rejected() {
        assert_err!(manager().validate_token("not-a-jwt"));
        assert_err!(manager().validate_token(""));
    }
}

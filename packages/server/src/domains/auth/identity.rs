//! Identity verification.
//!
//! The HTTP layer never trusts a wallet address from the request body. Every
//! authenticated request carries a bearer token; the provider verifies it and
//! yields the caller's stable subject and wallet address, which the player
//! record is keyed on.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid or expired token: {0}")]
    InvalidToken(String),
}

/// The outcome of verifying a bearer token.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    /// Stable subject claim, unique per account.
    pub subject: String,
    pub wallet_address: String,
}

/// Verifies bearer tokens into identities.
pub trait IdentityProvider: Send + Sync {
    fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError>;
}

/// Claims carried by our signed tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub wallet_address: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub jti: String,
}

/// HS256 token provider.
#[derive(Clone)]
pub struct JwtIdentityProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Issue a token for a subject. Expires after 24 hours.
    pub fn create_token(&self, subject: &str, wallet_address: &str) -> anyhow::Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(24);

        let claims = Claims {
            sub: subject.to_string(),
            wallet_address: wallet_address.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }
}

impl IdentityProvider for JwtIdentityProvider {
    fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(VerifiedIdentity {
            subject: claims.sub,
            wallet_address: claims.wallet_address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> JwtIdentityProvider {
        JwtIdentityProvider::new("test_secret_key", "test_issuer".to_string())
    }

    #[test]
    fn test_create_and_verify_token() {
        let provider = provider();
        let token = provider.create_token("did:test:alice", "0xabc123").unwrap();

        let identity = provider.verify(&token).unwrap();
        assert_eq!(identity.subject, "did:test:alice");
        assert_eq!(identity.wallet_address, "0xabc123");
    }

    #[test]
    fn test_invalid_token() {
        assert!(provider().verify("not_a_token").is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let provider1 = JwtIdentityProvider::new("secret1", "test_issuer".to_string());
        let provider2 = JwtIdentityProvider::new("secret2", "test_issuer".to_string());

        let token = provider1.create_token("did:test:bob", "0xdef").unwrap();
        assert!(provider2.verify(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer() {
        let provider1 = JwtIdentityProvider::new("secret", "issuer_a".to_string());
        let provider2 = JwtIdentityProvider::new("secret", "issuer_b".to_string());

        let token = provider1.create_token("did:test:carol", "0x123").unwrap();
        assert!(provider2.verify(&token).is_err());
    }

    #[test]
    fn test_token_expiry_window() {
        let provider = provider();
        let token = provider.create_token("did:test:dave", "0x456").unwrap();

        let mut validation = Validation::default();
        validation.set_issuer(&["test_issuer"]);
        let claims = decode::<Claims>(&token, &provider.decoding_key, &validation)
            .unwrap()
            .claims;

        let expires_in = claims.exp - chrono::Utc::now().timestamp();
        assert!(expires_in > 23 * 3600);
        assert!(expires_in <= 24 * 3600);
    }
}

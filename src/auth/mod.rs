use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::config::SecurityConfig;
use crate::context::CallerContext;
use crate::database::{DatabaseError, DealershipStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub dealership_id: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(dealership_id: String, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            dealership_id,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    MissingToken(String),

    #[error(transparent)]
    Jwt(#[from] JwtError),

    #[error("dealership '{0}' not found")]
    UnknownDealership(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Signs and verifies HS256 tokens with the configured shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    expiry_hours: u64,
}

impl TokenIssuer {
    pub fn new(security: &SecurityConfig) -> Self {
        Self {
            secret: security.jwt_secret.clone(),
            expiry_hours: security.jwt_expiry_hours,
        }
    }

    pub fn issue(&self, dealership_id: &str) -> Result<String, JwtError> {
        if self.secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        let claims = Claims::new(dealership_id.to_string(), self.expiry_hours);
        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());

        encode(&Header::default(), &claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        if self.secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
            .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

        Ok(token_data.claims)
    }
}

/// Turns dealership ids into tokens and tokens back into callers. Both
/// directions require the dealership to exist at the time of the call.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn DealershipStore>,
    issuer: TokenIssuer,
}

impl AuthService {
    pub fn new(store: Arc<dyn DealershipStore>, issuer: TokenIssuer) -> Self {
        Self { store, issuer }
    }

    pub async fn issue_token(&self, dealership_id: &str) -> Result<String, AuthError> {
        tracing::info!("Generating token for dealership ID: {}", dealership_id);
        if self.store.get_by_id(dealership_id).await?.is_none() {
            return Err(AuthError::UnknownDealership(dealership_id.to_string()));
        }
        Ok(self.issuer.issue(dealership_id)?)
    }

    pub async fn authenticate(&self, token: &str) -> Result<CallerContext, AuthError> {
        let claims = self.issuer.verify(token)?;
        match self.store.get_by_id(&claims.dealership_id).await? {
            Some(dealership) => Ok(CallerContext::new(dealership.dealership_id)),
            None => Err(AuthError::UnknownDealership(claims.dealership_id)),
        }
    }
}

use crate::config::JwtConfig;
use crate::error::AppError;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims encoded within both access and refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's unique identifier.
    pub sub: Uuid,
    /// Email of the user at issuance time.
    pub email: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// A freshly minted access/refresh token pair.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl KeyPair {
    fn from_secret(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }
}

/// Issues and verifies signed claim sets. Stateless: validity derives entirely
/// from signature and expiry. Access and refresh tokens are signed with
/// distinct secrets, so a token can never be accepted on the other path.
pub struct TokenService {
    access: KeyPair,
    refresh: KeyPair,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            access: KeyPair::from_secret(&config.access_secret, config.access_ttl_secs),
            refresh: KeyPair::from_secret(&config.refresh_secret, config.refresh_ttl_secs),
        }
    }

    /// Mints an access/refresh pair for the given identity. Pure function of
    /// the inputs and the configured secrets and expiry windows.
    pub fn issue_pair(&self, user_id: Uuid, email: &str) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.sign(&self.access, user_id, email)?,
            refresh_token: self.sign(&self.refresh, user_id, email)?,
        })
    }

    /// Verifies an access token, rejecting refresh tokens by construction
    /// (distinct signing secrets). Expired tokens fail with "Token expired",
    /// everything else with "Invalid token".
    pub fn verify_access(&self, token: &str) -> Result<Claims, AppError> {
        Self::verify(&self.access, token)
    }

    /// Verifies a refresh token. The caller must re-check that the referenced
    /// user still exists before trusting the claims.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AppError> {
        Self::verify(&self.refresh, token)
    }

    fn sign(&self, keys: &KeyPair, user_id: Uuid, email: &str) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now,
            exp: now + keys.ttl_secs,
        };
        encode(&Header::default(), &claims, &keys.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    fn verify(keys: &KeyPair, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &keys.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(AppError::from)
    }
}

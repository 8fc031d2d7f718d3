//! services/api/src/adapters/token.rs
//!
//! HS256 JSON Web Tokens implementing the `TokenService` port.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use reading_tracker_core::domain::{AccessToken, TokenClaims, User};
use reading_tracker_core::ports::{PortError, PortResult, TokenService};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// The claim set carried by every token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    role: String,
    iat: i64,
    exp: i64,
}

/// An adapter that signs and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expires_in: i64,
}

impl JwtTokenService {
    /// `expires_in` is the token lifetime in seconds.
    pub fn new(secret: &str, expires_in: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expires_in,
        }
    }

    fn sign(&self, claims: &Claims) -> PortResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| PortError::Unexpected(format!("Failed to sign token: {}", e)))
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &User) -> PortResult<AccessToken> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id,
            role: user.role.to_string(),
            iat: now,
            exp: now + self.expires_in,
        };
        Ok(AccessToken {
            access_token: self.sign(&claims)?,
            expires_in: self.expires_in,
        })
    }

    fn verify(&self, token: &str) -> PortResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!("Token rejected: {}", e);
            PortError::Unauthorized
        })?;
        let role = data.claims.role.parse().map_err(|_| PortError::Unauthorized)?;
        Ok(TokenClaims {
            subject: data.claims.sub,
            role,
        })
    }
}

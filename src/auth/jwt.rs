//! Signed session tokens

use crate::auth::session::Session;
use crate::error::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried in the session cookie
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Logged in user id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<i64>,
    /// Flash messages waiting to be shown
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flashes: Vec<String>,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

impl Claims {
    /// Create claims from session state
    pub fn from_session(session: &Session, lifetime: chrono::Duration) -> Self {
        let now = chrono::Utc::now();
        Self {
            uid: session.user_id(),
            flashes: session.pending_flashes().to_vec(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }
}

/// Signs and verifies session tokens with the configured secret key
#[derive(Clone)]
pub struct SessionSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: chrono::Duration,
}

impl SessionSigner {
    pub fn new(secret_key: &str, lifetime_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret_key.as_bytes()),
            lifetime: chrono::Duration::days(lifetime_days),
        }
    }

    /// How long a signed session stays valid
    pub fn lifetime(&self) -> chrono::Duration {
        self.lifetime
    }

    /// Create a token for the session
    pub fn sign(&self, session: &Session) -> Result<String> {
        let claims = Claims::from_session(session, self.lifetime);
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Validate and decode a token
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }
}

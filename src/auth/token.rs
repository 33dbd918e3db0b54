use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Claims carried by the access token. Tokens do not expire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub id: i64,
    pub iat: i64,
}

pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Sign a token for `user_id`.
    pub fn issue(&self, user_id: i64) -> AppResult<String> {
        let claims = Claims {
            id: user_id,
            iat: chrono::Utc::now().timestamp(),
        };
        Ok(jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &self.encoding,
        )?)
    }

    /// Check the signature and return the embedded claims.
    pub fn decode(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected access token: {}", e);
                AppError::Unauthorized
            })
    }
}

/// Random 32-byte hex secret, used when none is configured.
pub fn generate_secret() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// `Set-Cookie` value carrying the access token.
pub fn access_cookie(name: &str, token: &str) -> String {
    format!("{}={}; HttpOnly; Path=/", name, token)
}

use anyhow::{Result, anyhow};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Username
    pub uid: i32,    // User ID
    pub iat: i64,    // Issued-at timestamp
    pub exp: i64,    // Expiration timestamp
}

/// Sign a new JWT token for a user, valid for `ttl` from now.
pub fn sign(user_id: i32, username: &str, secret: &str, ttl: Duration) -> Result<String> {
    sign_at(user_id, username, secret, ttl, Utc::now())
}

/// Sign a token as if it had been issued at `issued_at`.
pub fn sign_at(
    user_id: i32,
    username: &str,
    secret: &str,
    ttl: Duration,
    issued_at: DateTime<Utc>,
) -> Result<String> {
    let expiration = issued_at
        .checked_add_signed(ttl)
        .ok_or_else(|| anyhow!("token expiry out of range"))?;

    let claims = Claims {
        sub: username.to_owned(),
        uid: user_id,
        iat: issued_at.timestamp(),
        exp: expiration.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify signature and expiry, then decode the claims.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

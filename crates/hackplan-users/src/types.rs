use serde::{Deserialize, Serialize};

/// A registered account. The password hash never leaves this crate's
/// serialization boundary — `skip_serializing` keeps it out of API bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// UUIDv7 string — primary key.
    pub id: String,
    pub email: String,
    pub display_name: String,
    /// Argon2id PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// ISO-8601 timestamps.
    pub created_at: String,
    pub updated_at: String,
}

/// Claims embedded in a signed bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id the token was minted for.
    pub sub: String,
    /// Expiry as Unix seconds.
    pub exp: i64,
}

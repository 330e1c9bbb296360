//! Password hashing and bearer token signing.
//!
//! Passwords use argon2id with a per-user random salt (PHC string storage).
//! Tokens are self-contained: `hex(claims_json) . hex(hmac_sha256(secret, claims_hex))`.
//! Verification is constant-time via `Mac::verify_slice`.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{Result, UserError};
use crate::types::TokenClaims;

type HmacSha256 = Hmac<Sha256>;

/// Hash a plaintext password into an argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| UserError::Hashing(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a plaintext password against a stored PHC string.
pub fn verify_password(password: &str, phc: &str) -> Result<bool> {
    let parsed = PasswordHash::new(phc).map_err(|e| UserError::Hashing(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Mint a signed token for `user_id`, valid for `ttl_hours` from now.
pub fn mint_token(secret: &str, user_id: &str, ttl_hours: u32) -> Result<String> {
    let claims = TokenClaims {
        sub: user_id.to_string(),
        exp: chrono::Utc::now().timestamp() + i64::from(ttl_hours) * 3600,
    };
    let payload = serde_json::to_string(&claims)
        .map_err(|e| UserError::InvalidToken(e.to_string()))?;
    let payload_hex = hex::encode(payload.as_bytes());
    let sig = sign(secret, payload_hex.as_bytes());
    Ok(format!("{payload_hex}.{sig}"))
}

/// Verify a token's signature and expiry, returning the subject user id.
pub fn verify_token(secret: &str, token: &str) -> Result<String> {
    let (payload_hex, sig_hex) = token
        .split_once('.')
        .ok_or_else(|| UserError::InvalidToken("missing signature segment".into()))?;

    let sig = hex::decode(sig_hex)
        .map_err(|_| UserError::InvalidToken("signature is not valid hex".into()))?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| UserError::InvalidToken(e.to_string()))?;
    mac.update(payload_hex.as_bytes());
    mac.verify_slice(&sig)
        .map_err(|_| UserError::InvalidToken("signature mismatch".into()))?;

    let payload = hex::decode(payload_hex)
        .map_err(|_| UserError::InvalidToken("payload is not valid hex".into()))?;
    let claims: TokenClaims = serde_json::from_slice(&payload)
        .map_err(|e| UserError::InvalidToken(e.to_string()))?;

    if claims.exp < chrono::Utc::now().timestamp() {
        return Err(UserError::TokenExpired);
    }
    Ok(claims.sub)
}

fn sign(secret: &str, data: &[u8]) -> String {
    // new_from_slice only fails on zero-length output sizes, which HmacSha256
    // never produces.
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(data);
    hex::encode(mac.finalize().into_bytes())
}

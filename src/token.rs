//! Short-lived admin tokens.
//!
//! Every request carries a freshly minted HS256 JWT signed with the Admin API
//! key secret. Tokens are valid for five minutes and are never cached.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::apikey::ApiKey;
use crate::error::CredentialError;

type HmacSha256 = Hmac<Sha256>;

/// Audience claim expected by the Admin API
pub const AUDIENCE: &str = "/admin/";

/// Token lifetime in seconds
pub const TOKEN_TTL_SECS: i64 = 300;

/// Mint a token for `api_key` issued at `now`.
///
/// The output is a pure function of the key and the timestamp: minting twice
/// with the same inputs yields identical tokens.
pub fn mint(api_key: &str, now: DateTime<Utc>) -> Result<String, CredentialError> {
    let key = ApiKey::parse(api_key)?;

    // Object keys serialize in sorted order, which keeps the output stable
    let iat = now.timestamp();
    let header = json!({
        "alg": "HS256",
        "kid": key.id.as_str(),
        "typ": "JWT",
    });
    let claims = json!({
        "aud": AUDIENCE,
        "exp": iat + TOKEN_TTL_SECS,
        "iat": iat,
    });

    let mut signing_input = URL_SAFE_NO_PAD.encode(header.to_string());
    signing_input.push('.');
    signing_input.push_str(&URL_SAFE_NO_PAD.encode(claims.to_string()));

    let mut mac =
        HmacSha256::new_from_slice(key.secret()).map_err(|_| CredentialError::SigningKey)?;
    mac.update(signing_input.as_bytes());
    let signature = mac.finalize().into_bytes();

    signing_input.push('.');
    signing_input.push_str(&URL_SAFE_NO_PAD.encode(signature));
    Ok(signing_input)
}

/// Mint a token for `api_key` issued at the current wall-clock time
pub fn generate(api_key: &str) -> Result<String, CredentialError> {
    mint(api_key, Utc::now())
}

use crate::error::CredentialError;

/// ApiKey is a parsed Admin API key: the key id and its decoded HMAC secret.
///
/// Keys are supplied as `"{id}:{hex secret}"`. A key is parsed again for every
/// token that is minted, so nothing here outlives a single request.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    /// Key identifier, stamped into the token's `kid` header
    pub id: String,
    /// Raw signing secret
    secret: Vec<u8>,
}

impl ApiKey {
    /// Parse an `id:secret` Admin API key.
    ///
    /// Fails when there is not exactly one `:`, when either half is empty,
    /// or when the secret is not valid hexadecimal.
    pub fn parse(raw: &str) -> Result<Self, CredentialError> {
        let mut parts = raw.split(':');
        let (id, secret) = match (parts.next(), parts.next(), parts.next()) {
            (Some(id), Some(secret), None) => (id, secret),
            _ => return Err(CredentialError::Format),
        };

        if id.is_empty() {
            return Err(CredentialError::EmptyId);
        }
        if secret.is_empty() {
            return Err(CredentialError::EmptySecret);
        }

        let secret = hex::decode(secret)?;
        Ok(ApiKey {
            id: id.to_string(),
            secret,
        })
    }

    /// Decoded secret bytes
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }
}

// Implement Debug manually to avoid exposing the secret
impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

//! Password credentials and signed bearer tokens.
//!
//! Tokens are `<username>.<hex HMAC-SHA256(username)>` under a server secret.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{GameError, GameResult};
use crate::player::Credential;

type HmacSha256 = Hmac<Sha256>;

/// Resolves an opaque bearer token to a player identity.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> GameResult<String>;
}

/// Issues and verifies HMAC-signed tokens.
#[derive(Clone)]
pub struct TokenSigner {
    key: Vec<u8>,
}

impl TokenSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            key: secret.as_ref().to_vec(),
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.key).expect("HMAC accepts keys of any length")
    }

    pub fn issue(&self, username: &str) -> String {
        let mut mac = self.mac();
        mac.update(username.as_bytes());
        let signature = mac.finalize().into_bytes();
        format!("{}.{}", username, to_hex(&signature))
    }
}

impl TokenVerifier for TokenSigner {
    fn verify(&self, token: &str) -> GameResult<String> {
        let (username, signature) = token.rsplit_once('.').ok_or(GameError::Unauthorized)?;
        let signature = from_hex(signature).ok_or(GameError::Unauthorized)?;
        if username.is_empty() {
            return Err(GameError::Unauthorized);
        }

        let mut mac = self.mac();
        mac.update(username.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| GameError::Unauthorized)?;
        Ok(username.to_string())
    }
}

/// Salts and hashes a new password.
pub fn hash_password(password: &str) -> Credential {
    let salt = Uuid::new_v4().simple().to_string();
    let hash = digest_password(&salt, password);
    Credential { salt, hash }
}

pub fn verify_password(credential: &Credential, password: &str) -> bool {
    !credential.hash.is_empty() && digest_password(&credential.salt, password) == credential.hash
}

fn digest_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    to_hex(&hasher.finalize())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn from_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 || !s.is_ascii() {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}

use anyhow::Context;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;

/// Token payload: the user id rendered as a string plus an absolute
/// expiry instant in unix seconds.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Returned for every rejected token. Expired, malformed and
/// wrong-signature tokens are deliberately indistinguishable to callers.
#[derive(Debug, Error)]
#[error("invalid or expired token")]
pub struct InvalidToken;

/// RS256 signing key pair, loaded once at startup and shared read-only
/// across request handlers.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8]) -> anyhow::Result<Self> {
        let encoding =
            EncodingKey::from_rsa_pem(private_pem).context("parse RSA private key")?;
        let decoding = DecodingKey::from_rsa_pem(public_pem).context("parse RSA public key")?;
        Ok(Self { encoding, decoding })
    }

    pub fn from_pem_files(private_path: &str, public_path: &str) -> anyhow::Result<Self> {
        let private_pem = std::fs::read(private_path)
            .with_context(|| format!("read private key file {private_path}"))?;
        let public_pem = std::fs::read(public_path)
            .with_context(|| format!("read public key file {public_path}"))?;
        Self::from_pem(&private_pem, &public_pem)
    }

    /// Signs a token for `user_id` expiring `ttl` from now.
    pub fn issue(&self, user_id: i64, ttl: Duration) -> anyhow::Result<String> {
        let exp = OffsetDateTime::now_utc() + ttl;
        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.unix_timestamp(),
        };
        let token = encode(&Header::new(Algorithm::RS256), &claims, &self.encoding)?;
        debug!(user_id, "token issued");
        Ok(token)
    }

    /// Verifies signature and expiry and returns the embedded user id.
    /// Only RS256 is accepted; tokens signed under any other algorithm
    /// family fail verification.
    pub fn verify(&self, token: &str) -> Result<i64, InvalidToken> {
        let validation = Validation::new(Algorithm::RS256);
        let data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|_| InvalidToken)?;
        data.claims.sub.parse::<i64>().map_err(|_| InvalidToken)
    }
}

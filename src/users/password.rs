use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use tracing::error;

/// Argon2id password hasher with a configurable work factor.
///
/// The produced PHC string embeds the salt and cost parameters, so
/// verification recovers them from the digest itself.
#[derive(Clone)]
pub struct Hasher {
    argon2: Argon2<'static>,
}

impl Hasher {
    pub fn new(memory_kib: u32, iterations: u32) -> anyhow::Result<Self> {
        let params = Params::new(memory_kib, iterations, Params::DEFAULT_P_COST, None)
            .map_err(|e| anyhow::anyhow!("invalid argon2 params: {e}"))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Minimum-cost hasher, the default work factor of the service.
    pub fn min_cost() -> Self {
        Self::new(Params::MIN_M_COST, Params::MIN_T_COST)
            .expect("minimum argon2 params are valid")
    }

    pub fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                anyhow::anyhow!(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    pub fn verify(&self, plain: &str, hash: &str) -> anyhow::Result<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            anyhow::anyhow!(e.to_string())
        })?;
        Ok(self
            .argon2
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hasher = Hasher::min_cost();
        let password = "P@ssw0rd";
        let hash = hasher.hash(password).expect("hashing should succeed");
        assert!(hasher.verify(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = Hasher::min_cost();
        let hash = hasher.hash("P@ssw0rd").expect("hashing should succeed");
        assert!(!hasher
            .verify("P@ssw0rdx", &hash)
            .expect("verify should not error"));
    }

    #[test]
    fn digest_embeds_salt_and_params() {
        let hasher = Hasher::min_cost();
        let hash = hasher.hash("P@ssw0rd").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));

        // A hasher built with a different cost still verifies: parameters
        // come from the digest, not the verifier.
        let other = Hasher::new(Params::MIN_M_COST * 2, Params::MIN_T_COST)
            .expect("params should be valid");
        assert!(other.verify("P@ssw0rd", &hash).expect("verify should succeed"));
    }

    #[test]
    fn same_password_hashes_differently() {
        let hasher = Hasher::min_cost();
        let a = hasher.hash("P@ssw0rd").expect("hash");
        let b = hasher.hash("P@ssw0rd").expect("hash");
        assert_ne!(a, b);
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let hasher = Hasher::min_cost();
        let err = hasher.verify("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}

use argon2::Params;
use serde::Deserialize;

/// Paths to the PEM-encoded RSA key pair used for token signing.
/// Both files must exist at startup; the service refuses to boot without them.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyConfig {
    pub private_key_path: String,
    pub public_key_path: String,
}

/// Argon2 work factor. The minimum-cost defaults keep request latency low
/// at the expense of brute-force resistance; production deployments are
/// expected to raise them via `ARGON2_MEMORY_KIB` / `ARGON2_ITERATIONS`.
#[derive(Debug, Clone, Deserialize)]
pub struct HashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub keys: KeyConfig,
    pub hash: HashConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL is not set"))?;
        let keys = KeyConfig {
            private_key_path: std::env::var("JWT_PRIVATE_KEY_PATH")
                .unwrap_or_else(|_| "cert/id_rsa".into()),
            public_key_path: std::env::var("JWT_PUBLIC_KEY_PATH")
                .unwrap_or_else(|_| "cert/id_rsa.pub".into()),
        };
        let hash = HashConfig {
            memory_kib: std::env::var("ARGON2_MEMORY_KIB")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(Params::MIN_M_COST),
            iterations: std::env::var("ARGON2_ITERATIONS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(Params::MIN_T_COST),
        };
        Ok(Self {
            database_url,
            keys,
            hash,
        })
    }
}

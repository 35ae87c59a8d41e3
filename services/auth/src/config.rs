use serde::Deserialize;

use warden_auth_types::token::{ACCESS_TOKEN_TTL_SECS, DEFAULT_LEEWAY_SECS, REFRESH_TOKEN_TTL_SECS};
use warden_core::config::Config;

/// Auth service configuration loaded from environment variables.
#[derive(Deserialize)]
pub struct AuthConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret for signing access and refresh tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// TCP port to listen on (default 3112). Env var: `AUTH_PORT`.
    #[serde(default = "default_auth_port")]
    pub auth_port: u16,
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_secs: u64,
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_secs: u64,
    /// Clock-skew tolerance applied to `exp`.
    #[serde(default = "default_leeway")]
    pub token_leeway_secs: u64,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_auth_port() -> u16 {
    3112
}

fn default_access_ttl() -> u64 {
    ACCESS_TOKEN_TTL_SECS
}

fn default_refresh_ttl() -> u64 {
    REFRESH_TOKEN_TTL_SECS
}

fn default_leeway() -> u64 {
    DEFAULT_LEEWAY_SECS
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Config for AuthConfig {}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("auth_port", &self.auth_port)
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .field("refresh_token_ttl_secs", &self.refresh_token_ttl_secs)
            .field("token_leeway_secs", &self.token_leeway_secs)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}

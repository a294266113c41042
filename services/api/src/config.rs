//! Environment-variable configuration for the API service.

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    /// Redis URL (`redis://host:port`). Absent means run purely in-memory.
    pub redis_url: Option<String>,
    /// Namespace prefix for store keys and the execution stream.
    pub key_prefix: String,
}

pub fn load() -> ApiConfig {
    ApiConfig {
        port: env_u16("PORT", 8081),
        redis_url: std::env::var("REDIS_URL").ok().filter(|v| !v.is_empty()),
        key_prefix: env_string("KEY_PREFIX", "exchange:v1"),
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_u16(key: &str, default: u16) -> u16 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(default)
}

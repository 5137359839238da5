use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    /// Absent or empty means no store is configured; the public intake
    /// then degrades per `strict_intake` and admin data routes answer 503.
    pub database_url: Option<String>,
    /// Comma-separated `token:subject` pairs accepted on admin routes.
    pub admin_tokens: String,
    /// When true, reject submissions outright instead of accepting them
    /// unpersisted while no store is configured.
    pub strict_intake: bool,
    pub log_buffer_size: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            admin_tokens: env::var("ADMIN_TOKENS").unwrap_or_else(|_| "changeme:admin".to_string()),
            strict_intake: env::var("STRICT_INTAKE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            log_buffer_size: env::var("LOG_BUFFER_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(200),
        }
    }
}

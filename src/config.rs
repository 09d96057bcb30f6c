use std::env;

/// JWT signing configuration. Access and refresh tokens use separate secrets
/// so a refresh token can never pass access-token verification.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub cors_origin: String,
    pub jwt: JwtConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let access_ttl_mins: i64 = env::var("JWT_EXPIRES_IN_MINUTES")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .expect("JWT_EXPIRES_IN_MINUTES must be a number");
        let refresh_ttl_days: i64 = env::var("REFRESH_TOKEN_EXPIRES_IN_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .expect("REFRESH_TOKEN_EXPIRES_IN_DAYS must be a number");

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            jwt: JwtConfig {
                access_secret: env::var("JWT_SECRET")
                    .unwrap_or_else(|_| "default-secret-change-me".to_string()),
                refresh_secret: env::var("REFRESH_TOKEN_SECRET")
                    .unwrap_or_else(|_| "default-refresh-secret-change-me".to_string()),
                access_ttl_secs: access_ttl_mins * 60,
                refresh_ttl_secs: refresh_ttl_days * 24 * 60 * 60,
            },
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

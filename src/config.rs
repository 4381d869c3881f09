use std::env;

use anyhow::Context;

const DEV_JWT_SECRET: &str = "gymtrack-development-secret";
const MAX_JWT_TTL_DAYS: i64 = 3650;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_days: i64,
    pub frontend_url: Option<String>,
    pub app_env: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if app_env == "development" => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
            _ => anyhow::bail!("JWT_SECRET must be set when APP_ENV={}", app_env),
        };

        let port = match env::var("PORT") {
            Ok(port) => port
                .parse()
                .with_context(|| format!("Invalid PORT: {}", port))?,
            Err(_) => 3000,
        };

        let jwt_ttl_days = match env::var("JWT_TTL_DAYS") {
            Ok(days) => parse_ttl_days(&days)?,
            Err(_) => 7,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:gymtrack.db?mode=rwc".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            jwt_secret,
            jwt_ttl_days,
            frontend_url: env::var("FRONTEND_URL").ok().filter(|url| !url.is_empty()),
            app_env,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_ttl_days(raw: &str) -> anyhow::Result<i64> {
    let days: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("Invalid JWT_TTL_DAYS: {}", raw))?;
    if !(1..=MAX_JWT_TTL_DAYS).contains(&days) {
        anyhow::bail!(
            "JWT_TTL_DAYS must be between 1 and {}, got {}",
            MAX_JWT_TTL_DAYS,
            days
        );
    }
    Ok(days)
}

use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub openrouter_api_key: String,
    pub adjudicator_model: String,
    pub escrow_relay_url: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openrouter_api_key: env::var("OPENROUTER_API_KEY")
                .context("OPENROUTER_API_KEY must be set")?,
            adjudicator_model: env::var("ADJUDICATOR_MODEL")
                .unwrap_or_else(|_| "arcee-ai/trinity-mini:free".to_string()),
            escrow_relay_url: env::var("ESCROW_RELAY_URL")
                .context("ESCROW_RELAY_URL must be set")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "courtclash".to_string()),
        })
    }
}

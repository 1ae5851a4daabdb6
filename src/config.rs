use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub mongo_uri: String,
    pub mongo_db: String,
    pub jwt_secret: String,
    pub jwt_expires_in: i64,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            mongo_uri: env::var("MONGO_URI").context("MONGO_URI must be set")?,
            mongo_db: env::var("MONGO_DB").unwrap_or_else(|_| "taskboard".to_string()),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_expires_in: env::var("JWT_EXPIRES_IN")
                .unwrap_or_else(|_| "900".to_string()) // 15 minutes
                .parse()?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
        })
    }
}

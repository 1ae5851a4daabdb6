use anyhow::Context;
use mongodb::{Client, Database};

use crate::config::Config;

/// Connects the pooled client and selects the application database. The
/// client is returned alongside the database handle so the caller owns the
/// shutdown of the connection pool.
pub async fn connect(config: &Config) -> anyhow::Result<(Client, Database)> {
    let client = Client::with_uri_str(&config.mongo_uri)
        .await
        .context("failed to connect to MongoDB")?;
    let database = client.database(&config.mongo_db);
    Ok((client, database))
}

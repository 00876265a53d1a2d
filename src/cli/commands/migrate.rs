use anyhow::bail;

use crate::config::{config, StorageBackend};
use crate::database::DatabaseManager;

pub async fn handle() -> anyhow::Result<()> {
    let config = config();
    if config.database.backend != StorageBackend::Postgres {
        bail!("migrations only apply to the postgres backend");
    }

    let pool = DatabaseManager::connect(&config.database)?;
    DatabaseManager::migrate(&pool).await?;
    pool.close().await;
    Ok(())
}

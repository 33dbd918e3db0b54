pub mod models;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

use crate::state::DbPool;

pub const SCHEMA: &str = include_str!("schema.sql");

pub fn create_pool(db_path: &Path) -> anyhow::Result<DbPool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 5000;
            ",
        )
    });
    let pool = Pool::builder().max_size(8).build(manager)?;

    let conn = pool.get()?;
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        ",
    )?;

    Ok(pool)
}

/// Create the tables if they are missing. Safe to run on every start.
pub fn init_schema(pool: &DbPool) -> anyhow::Result<()> {
    let conn = pool.get()?;
    conn.execute_batch(SCHEMA)?;
    tracing::info!("Database schema ready");
    Ok(())
}

use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::auth::token::TokenKeys;
use crate::config::Config;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Everything a handler needs, built once at start-up.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub keys: Arc<TokenKeys>,
}

impl AppState {
    pub fn new(db: DbPool, config: Config, keys: TokenKeys) -> Self {
        Self {
            db,
            config,
            keys: Arc::new(keys),
        }
    }
}

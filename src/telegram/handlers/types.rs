//! Handler types and shared dependencies

use std::sync::Arc;

use crate::instagram::InstagramClient;
use crate::storage::db::DbPool;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub db_pool: Arc<DbPool>,
    pub instagram: Arc<InstagramClient>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(db_pool: Arc<DbPool>, instagram: Arc<InstagramClient>) -> Self {
        Self { db_pool, instagram }
    }
}

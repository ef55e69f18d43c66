use crate::db::{DbPool, OrmConn};

/// Shared handler state. The raw sqlx pool serves the auth and audit
/// queries; SeaORM carries everything that goes through the entities.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
}

impl AppState {
    pub fn new(pool: DbPool, orm: OrmConn) -> Self {
        Self { pool, orm }
    }
}

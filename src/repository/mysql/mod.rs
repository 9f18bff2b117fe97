//! MySQL implementation of the repository ports.

use sqlx::MySqlPool;

mod catalog;
mod role;
mod stats;
mod user;

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

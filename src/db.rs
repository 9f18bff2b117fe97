use sqlx::MySqlPool;
use sqlx::migrate::MigrateError;
use sqlx::mysql::MySqlPoolOptions;

pub async fn init_db(database_url: &str, max_connections: u32) -> Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &MySqlPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

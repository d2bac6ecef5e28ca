//! Database initialization
//!
//! Opens (or creates) the SQLite database, creates every table the raflift
//! services use and seeds the coefficient reference data. All steps are
//! idempotent and safe to run on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Reference coefficients seeded on first run (CMS-HCC V28 model)
pub const DEFAULT_COEFFICIENTS: &[(&str, f64)] = &[
    ("HCC85", 0.455),
    ("HCC18", 0.163),
    ("HCC19", 0.342),
];

/// How long a connection waits on a locked database before failing
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Initialize database connection and create tables if needed
///
/// Connection settings (foreign keys, WAL, busy timeout) are applied to
/// every connection the pool opens.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;
    seed_coefficients(&pool, DEFAULT_COEFFICIENTS).await?;

    Ok(pool)
}

/// Create all tables and indexes (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_users_table(pool).await?;
    create_items_table(pool).await?;
    create_coefficients_table(pool).await?;
    create_audit_log_table(pool).await?;
    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            username TEXT UNIQUE,
            email TEXT UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_username ON users(username)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_items_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY,
            title TEXT,
            owner_id INTEGER REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_items_title ON items(title)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_items_owner_id ON items(owner_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_coefficients_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS hcc_coefficients (
            hcc_code TEXT PRIMARY KEY,
            coefficient REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Audit rows hold structured fields only. There is deliberately no column
/// that could receive note text.
async fn create_audit_log_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS audit_log (
            audit_uuid TEXT PRIMARY KEY,
            chart_id TEXT NOT NULL,
            hcc_code TEXT NOT NULL,
            raf_lift REAL NOT NULL,
            integrity_hash TEXT NOT NULL,
            recorded_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_audit_log_chart_id ON audit_log(chart_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Insert reference coefficients without overwriting existing rows
pub async fn seed_coefficients(pool: &SqlitePool, entries: &[(&str, f64)]) -> Result<()> {
    let mut inserted = 0u64;
    for (code, coefficient) in entries {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO hcc_coefficients (hcc_code, coefficient) VALUES (?, ?)",
        )
        .bind(code)
        .bind(coefficient)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }

    if inserted > 0 {
        info!("Seeded {} HCC coefficient(s)", inserted);
    }

    Ok(())
}

//! Activity log storage.
//!
//! Append-only `logs` table over SQLite: one row per successfully resolved
//! submission. Rows are never updated or deleted; admin queries aggregate
//! over them.

use anyhow::{Context, Result as AnyResult};
use chrono::Utc;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Result;

use crate::storage::migrations::run_migrations;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// A single activity log row.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub first_name: String,
    pub link: String,
    /// Resolver-assigned media identifier, empty when unknown.
    pub media_pk: String,
    pub created_at: String,
}

/// One row of the top-submitters ranking.
#[derive(Debug, Clone)]
pub struct TopSubmitter {
    pub user_id: i64,
    pub username: String,
    pub first_name: String,
    pub count: i64,
}

/// Aggregate usage statistics for the admin /stats command.
#[derive(Debug, Clone)]
pub struct Stats {
    pub total_links: i64,
    pub unique_users: i64,
    pub top_submitters: Vec<TopSubmitter>,
}

/// Create a new database connection pool
///
/// Initializes a connection pool with up to 10 connections and applies
/// pending schema migrations on the first connection.
pub fn create_pool(database_path: &str) -> AnyResult<DbPool> {
    let manager = SqliteConnectionManager::file(database_path);
    let pool = Pool::builder()
        .max_size(10)
        .build(manager)
        .context("build database pool")?;

    let mut conn = pool.get().context("get migration connection")?;
    run_migrations(&mut conn)?;

    Ok(pool)
}

/// Get a connection from the pool
///
/// The connection is automatically returned to the pool when dropped.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, r2d2::Error> {
    pool.get()
}

/// Appends one activity log row for a successfully resolved submission.
///
/// `created_at` is stamped in UTC at insert time.
pub fn add_log(
    conn: &DbConnection,
    user_id: i64,
    username: &str,
    first_name: &str,
    link: &str,
    media_pk: &str,
) -> Result<()> {
    let created_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    conn.execute(
        "INSERT INTO logs (user_id, username, first_name, link, media_pk, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![user_id, username, first_name, link, media_pk, created_at],
    )?;
    Ok(())
}

/// Aggregate statistics: total rows, distinct users, top-10 submitters.
pub fn get_stats(conn: &DbConnection) -> Result<Stats> {
    let total_links: i64 = conn.query_row("SELECT COUNT(*) FROM logs", [], |row| row.get(0))?;
    let unique_users: i64 = conn.query_row("SELECT COUNT(DISTINCT user_id) FROM logs", [], |row| row.get(0))?;

    let mut stmt = conn.prepare(
        "SELECT user_id, username, first_name, COUNT(*) as cnt
         FROM logs
         GROUP BY user_id, username, first_name
         ORDER BY cnt DESC LIMIT 10",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(TopSubmitter {
            user_id: row.get(0)?,
            username: row.get(1)?,
            first_name: row.get(2)?,
            count: row.get(3)?,
        })
    })?;

    let mut top_submitters = Vec::new();
    for row in rows {
        top_submitters.push(row?);
    }

    Ok(Stats {
        total_links,
        unique_users,
        top_submitters,
    })
}

/// Returns the newest `limit` log rows, most recent first.
pub fn get_logs(conn: &DbConnection, limit: i64) -> Result<Vec<LogEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, username, first_name, link, media_pk, created_at
         FROM logs ORDER BY id DESC LIMIT ?",
    )?;
    let rows = stmt.query_map([limit], |row| {
        Ok(LogEntry {
            id: row.get(0)?,
            user_id: row.get(1)?,
            username: row.get(2)?,
            first_name: row.get(3)?,
            link: row.get(4)?,
            media_pk: row.get(5)?,
            created_at: row.get(6)?,
        })
    })?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?);
    }
    Ok(entries)
}

/// Returns the most recently submitted distinct links.
pub fn get_links(conn: &DbConnection, limit: i64) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT link FROM logs
         GROUP BY link
         ORDER BY MAX(id) DESC
         LIMIT ?",
    )?;
    let rows = stmt.query_map([limit], |row| row.get::<_, String>(0))?;

    let mut links = Vec::new();
    for row in rows {
        links.push(row?);
    }
    Ok(links)
}

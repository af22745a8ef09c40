use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::{Post, PostId, Timestamp};

const MEMORY_DATABASE_URL: &str = "sqlite::memory:";

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        // Every connection to an in-memory database sees its own empty database.
        let max_connections = if database_url.starts_with(MEMORY_DATABASE_URL) {
            1
        } else {
            5
        };

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Stores a new post and returns it with its assigned id and timestamp.
    ///
    /// The timestamp is clamped to the newest stored one so it never goes
    /// backwards when the wall clock does.
    pub async fn insert_post(&self, title: &str, body: &str, author: &str) -> Result<Post> {
        let now = Timestamp::from_datetime(Utc::now());
        let row = sqlx::query(
            "INSERT INTO posts (title, body, author, timestamp)
             SELECT ?, ?, ?, MAX(?, COALESCE((SELECT MAX(timestamp) FROM posts), 0))
             RETURNING id, title, body, author, timestamp",
        )
        .bind(title)
        .bind(body)
        .bind(author)
        .bind(now.0)
        .fetch_one(&self.pool)
        .await
        .context("failed to insert post")?;
        Ok(post_from_row(&row))
    }

    /// Lists every post, newest first.
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        let rows = sqlx::query(
            "SELECT id, title, body, author, timestamp FROM posts
             ORDER BY timestamp DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list posts")?;
        Ok(rows.iter().map(post_from_row).collect())
    }
}

fn post_from_row(row: &SqliteRow) -> Post {
    Post {
        id: PostId(row.get::<i64, _>(0)),
        title: row.get::<String, _>(1),
        body: row.get::<String, _>(2),
        author: row.get::<String, _>(3),
        timestamp: Timestamp(row.get::<i64, _>(4)),
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with(MEMORY_DATABASE_URL) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

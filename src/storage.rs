use crate::{
    data::{Student, StudentPatch},
    error::{CreateSchemaSnafu, MakeQuerySnafu, MissingStudentSnafu, OpenDatabaseSnafu,
        RollbookError, RollbookResult},
};
use async_trait::async_trait;
use snafu::ResultExt;
use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;

/// Capability set of the student store. Kept behind a trait so the SQLite
/// backend can be swapped out (e.g. for an in-memory fake in tests).
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Inserts a new student and returns the assigned id.
    async fn create(&self, name: &str, email: &str, age: i64) -> RollbookResult<i64>;

    /// Returns every student in insertion order.
    async fn all(&self) -> RollbookResult<Vec<Student>>;

    async fn by_id(&self, id: i64) -> RollbookResult<Student>;

    /// Applies the present fields of `patch` as a single statement. An empty
    /// patch is a no-op that still returns the id.
    async fn update(&self, id: i64, patch: &StudentPatch) -> RollbookResult<i64>;

    async fn delete(&self, id: i64) -> RollbookResult<()>;
}

#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `path` and ensures the
    /// schema exists.
    pub async fn connect(path: &str) -> RollbookResult<Self> {
        let options = SqliteConnectOptions::from_str(path)
            .context(OpenDatabaseSnafu)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(if path.contains(":memory:") { 1 } else { 5 })
            .connect_with(options)
            .await
            .context(OpenDatabaseSnafu)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS student (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT,
                age INTEGER,
                email TEXT UNIQUE
            )",
        )
        .execute(&pool)
        .await
        .context(CreateSchemaSnafu)?;

        Ok(Self { pool })
    }
}

/// Maps a unique-constraint violation on the email column to its dedicated
/// error, leaving everything else as a plain query failure.
fn map_insert_error(source: sqlx::Error, email: &str) -> RollbookError {
    match &source {
        sqlx::Error::Database(db) if db.is_unique_violation() => RollbookError::DuplicateEmail {
            email: email.to_string(),
        },
        _ => RollbookError::MakeQuery { source },
    }
}

#[async_trait]
impl StudentStore for SqliteStore {
    async fn create(&self, name: &str, email: &str, age: i64) -> RollbookResult<i64> {
        let done = sqlx::query("INSERT INTO student (name, email, age) VALUES (?, ?, ?)")
            .bind(name)
            .bind(email)
            .bind(age)
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, email))?;

        Ok(done.last_insert_rowid())
    }

    async fn all(&self) -> RollbookResult<Vec<Student>> {
        sqlx::query_as::<_, Student>("SELECT id, name, email, age FROM student")
            .fetch_all(&self.pool)
            .await
            .context(MakeQuerySnafu)
    }

    async fn by_id(&self, id: i64) -> RollbookResult<Student> {
        sqlx::query_as::<_, Student>("SELECT id, name, email, age FROM student WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context(MakeQuerySnafu)?
            .ok_or(RollbookError::MissingStudent { id })
    }

    async fn update(&self, id: i64, patch: &StudentPatch) -> RollbookResult<i64> {
        // The SET clause is the only dynamically assembled SQL in the crate
        // and is built strictly from this fixed column list.
        let mut assignments = Vec::new();
        if patch.name.is_some() {
            assignments.push("name = ?");
        }
        if patch.email.is_some() {
            assignments.push("email = ?");
        }
        if patch.age.is_some() {
            assignments.push("age = ?");
        }

        if assignments.is_empty() {
            info!(id, "no fields to update");
            return Ok(id);
        }

        let sql = format!("UPDATE student SET {} WHERE id = ?", assignments.join(", "));
        let mut query = sqlx::query(&sql);
        if let Some(name) = &patch.name {
            query = query.bind(name);
        }
        if let Some(email) = &patch.email {
            query = query.bind(email);
        }
        if let Some(age) = patch.age {
            query = query.bind(age);
        }

        let done = query.bind(id).execute(&self.pool).await.map_err(|e| {
            map_insert_error(e, patch.email.as_deref().unwrap_or_default())
        })?;
        snafu::ensure!(done.rows_affected() > 0, MissingStudentSnafu { id });

        Ok(id)
    }

    async fn delete(&self, id: i64) -> RollbookResult<()> {
        let done = sqlx::query("DELETE FROM student WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context(MakeQuerySnafu)?;
        snafu::ensure!(done.rows_affected() > 0, MissingStudentSnafu { id });

        Ok(())
    }
}

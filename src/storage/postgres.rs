//! Postgres storage

use std::time::Duration;

use anyhow::Context;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use crate::notes::Note;

use super::CreateNoteValues;
use super::Error;
use super::NoteFilter;
use super::Result;
use super::Storage;
use super::connection_error;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

/// Postgres storage
#[derive(Clone)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage from a connection string
    ///
    /// Migrations will be run
    pub async fn connect(database_connection_string: &str) -> anyhow::Result<Self> {
        let connection_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_connection_string)
            .await
            .context("Could not connect to the database")?;

        Self::new_with_pool(connection_pool).await
    }

    /// Create Postgres storage with existing pool
    ///
    /// Migrations will be run
    pub async fn new_with_pool(connection_pool: PgPool) -> anyhow::Result<Self> {
        MIGRATOR
            .run(&connection_pool)
            .await
            .context("Migrations could not run")?;

        Ok(Self { connection_pool })
    }
}

impl Storage for Postgres {
    async fn find_single_note_by_id(&self, id: i64) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(
            r"
            SELECT *
            FROM notes
            WHERE deleted_at IS NULL AND id = $1
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(note)
    }

    async fn find_single_note_by_title(&self, title: &str) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(
            r"
            SELECT *
            FROM notes
            WHERE deleted_at IS NULL AND title = $1
            LIMIT 1
            ",
        )
        .bind(title)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(note)
    }

    async fn find_all_notes(&self) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            r"
            SELECT *
            FROM notes
            WHERE deleted_at IS NULL
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(notes)
    }

    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Note> {
        let note = sqlx::query_as::<_, Note>(
            r"
            INSERT INTO notes (title, is_completed)
            VALUES ($1, $2)
            RETURNING *
            ",
        )
        .bind(values.title)
        .bind(values.is_completed)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(write_error)?;

        Ok(note)
    }

    async fn update_note(&self, id: i64, note: &Note) -> Result<Note> {
        let updated_note = sqlx::query_as::<_, Note>(
            r"
            UPDATE notes
            SET title = $1, is_completed = $2, updated_at = CURRENT_TIMESTAMP
            WHERE deleted_at IS NULL AND id = $3
            RETURNING *
            ",
        )
        .bind(&note.title)
        .bind(note.is_completed)
        .bind(id)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(write_error)?;

        Ok(updated_note)
    }

    async fn delete_note(&self, note: &Note) -> Result<()> {
        sqlx::query(
            r"
            UPDATE notes
            SET deleted_at = CURRENT_TIMESTAMP
            WHERE deleted_at IS NULL AND id = $1
            ",
        )
        .bind(note.id)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(())
    }

    async fn count_notes(&self, filter: NoteFilter<'_>) -> Result<i64> {
        let query = match filter {
            NoteFilter::Id(id) => sqlx::query_scalar::<_, i64>(
                r"
                SELECT COUNT(*)
                FROM notes
                WHERE deleted_at IS NULL AND id = $1
                ",
            )
            .bind(id),
            NoteFilter::Title(title) => sqlx::query_scalar::<_, i64>(
                r"
                SELECT COUNT(*)
                FROM notes
                WHERE deleted_at IS NULL AND title = $1
                ",
            )
            .bind(title),
        };

        let count = query
            .fetch_one(&self.connection_pool)
            .await
            .map_err(connection_error)?;

        Ok(count)
    }
}

/// Convert `SQLx` errors of inserts and updates, unique title violations are kept apart
fn write_error(err: sqlx::Error) -> Error {
    match err {
        sqlx::Error::Database(database_error) if database_error.is_unique_violation() => {
            Error::UniqueViolation(database_error.to_string())
        }
        err => connection_error(err),
    }
}

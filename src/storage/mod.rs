//! All things related to the storage of notes

use core::fmt;
use std::future::Future;

use sqlx::PgPool;

pub use Config as StorageConfig;
#[cfg(test)]
pub use failing::Failing;
pub use memory::Memory;
pub use postgres::Postgres;

use crate::notes::Note;

#[cfg(test)]
mod failing;
mod memory;
mod postgres;

/// Storage errors
#[derive(Debug)]
pub enum Error {
    /// A connection error with the storage
    Connection(String),

    /// The storage refused a second note with the same title
    UniqueViolation(String),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Connection(error) => write!(f, "Connection error: {error}"),
            Error::UniqueViolation(error) => write!(f, "Unique violation: {error}"),
        }
    }
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Storage configuration
pub enum Config {
    /// Keep everything in memory, gone on shutdown
    Memory,

    /// Connect to Postgres with a connection string
    Postgres(String),

    /// Use existing Postgres connection
    #[cfg_attr(not(test), expect(dead_code))] // only tests bring their own pool
    ExistingConnection(PgPool),
}

/// Values to create a Note
pub struct CreateNoteValues<'a> {
    /// Title of the note, already validated
    pub title: &'a str,

    /// Is the note completed?
    pub is_completed: bool,
}

/// Field a note can be counted by
#[derive(Clone, Copy, Debug)]
pub enum NoteFilter<'a> {
    /// Match on ID
    Id(i64),

    /// Match on the exact title
    Title(&'a str),
}

/// Storage with all supported operations
///
/// Finding nothing is not an error, it is `None`
pub trait Storage: Clone + Send + Sync + 'static {
    /// Find a single note by its ID
    ///
    /// Respects the soft-delete
    fn find_single_note_by_id(&self, id: i64) -> impl Future<Output = Result<Option<Note>>> + Send;

    /// Find a single note by its title
    ///
    /// Respects the soft-delete
    fn find_single_note_by_title(
        &self,
        title: &str,
    ) -> impl Future<Output = Result<Option<Note>>> + Send;

    /// Find all notes, oldest first
    ///
    /// Respects the soft-delete
    fn find_all_notes(&self) -> impl Future<Output = Result<Vec<Note>>> + Send;

    /// Create a note
    ///
    /// The ID and timestamps are assigned by the storage
    fn create_note(
        &self,
        values: &CreateNoteValues<'_>,
    ) -> impl Future<Output = Result<Note>> + Send;

    /// Overwrite the title and completion state of a note with the given note
    fn update_note(&self, id: i64, note: &Note) -> impl Future<Output = Result<Note>> + Send;

    /// Soft-delete a note
    fn delete_note(&self, note: &Note) -> impl Future<Output = Result<()>> + Send;

    /// Count the notes matching the filter
    ///
    /// Respects the soft-delete
    fn count_notes(&self, filter: NoteFilter<'_>) -> impl Future<Output = Result<i64>> + Send;
}

/// Convert any storage backend error to storage connection error
fn connection_error<E>(err: E) -> Error
where
    E: std::error::Error,
{
    Error::Connection(err.to_string())
}

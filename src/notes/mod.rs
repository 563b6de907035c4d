//! Notes
//!
//! The one record this service keeps, the rules a note has to follow and the business logic
//! around its lifecycle

use core::fmt;

use chrono::naive::NaiveDateTime;
use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;

use crate::storage;

pub use service::NoteService;

mod service;

/// Maximum length of a title, in characters (not bytes)
pub const MAX_TITLE_LENGTH: usize = 80;

/// Message when a title is missing or empty
pub const TITLE_REQUIRED: &str = "Title is required";

/// Message when a title is too long
pub const TITLE_TOO_LONG: &str = "Title can not be longer than 80 characters";

/// Message when a title contains a NUL character
pub const TITLE_CONTAINS_NUL: &str = "Title can not contain NUL characters";

/// Message when a title is already taken by another note
pub const TITLE_ALREADY_EXISTS: &str = "Title already exists";

/// Message when a note can not be found
pub const NOTE_DOES_NOT_EXIST: &str = "Note does not exist";

/// A note
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Note {
    /// Note ID, assigned by the storage
    pub id: i64,

    /// Title, unique among the notes that are not deleted
    pub title: String,

    /// Is the note completed?
    pub is_completed: bool,

    /// Creation date
    pub created_at: NaiveDateTime,

    /// Last updated at
    pub updated_at: NaiveDateTime,

    /// Soft-deleted at
    pub deleted_at: Option<NaiveDateTime>,
}

impl Note {
    /// Is the note soft-deleted?
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Request to create or (partially) update a note
///
/// Fields that are absent are left alone on update
#[derive(Debug, Default, Deserialize)]
pub struct NoteUpdateRequest {
    /// New title
    pub title: Option<String>,

    /// New completion state
    pub is_completed: Option<bool>,
}

/// Everything that can go wrong while handling notes
///
/// Each variant is a classification of the outcome, the transport decides what to make of it
#[derive(Debug)]
pub enum Error {
    /// The input is not acceptable, the storage has not been touched
    Validation(String),

    /// There is no note for the given key
    NotFound(String),

    /// The title is already used by another note
    Conflict(String),

    /// The storage failed
    Internal(storage::Error),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Validation(message) | Error::NotFound(message) | Error::Conflict(message) => {
                write!(f, "{message}")
            }
            Error::Internal(error) => write!(f, "{error}"),
        }
    }
}

/// Normalize a title to its NFC form
///
/// Titles that look the same should compare the same
pub fn normalize_title(title: &str) -> String {
    title.nfc().collect()
}

/// Normalize and validate a title
///
/// A title has between 1 and [`MAX_TITLE_LENGTH`] characters, none of them NUL
pub fn validate_title(title: &str) -> Result<String, Error> {
    let title = normalize_title(title);

    // Postgres text can not hold NUL
    if title.contains('\0') {
        return Err(Error::Validation(TITLE_CONTAINS_NUL.to_string()));
    }

    match title.chars().count() {
        0 => Err(Error::Validation(TITLE_REQUIRED.to_string())),
        length if length > MAX_TITLE_LENGTH => {
            Err(Error::Validation(TITLE_TOO_LONG.to_string()))
        }
        _ => Ok(title),
    }
}

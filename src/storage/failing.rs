//! Storage that fails on every interaction

use crate::notes::Note;

use super::CreateNoteValues;
use super::Error;
use super::NoteFilter;
use super::Result;
use super::Storage;

/// Message of every error of the failing storage
const FAILURE: &str = "database is gone";

/// Storage that fails on every interaction, as if the database is gone
#[derive(Clone, Debug, Default)]
pub struct Failing;

fn gone() -> Error {
    Error::Connection(FAILURE.to_string())
}

impl Storage for Failing {
    async fn find_single_note_by_id(&self, _id: i64) -> Result<Option<Note>> {
        Err(gone())
    }

    async fn find_single_note_by_title(&self, _title: &str) -> Result<Option<Note>> {
        Err(gone())
    }

    async fn find_all_notes(&self) -> Result<Vec<Note>> {
        Err(gone())
    }

    async fn create_note(&self, _values: &CreateNoteValues<'_>) -> Result<Note> {
        Err(gone())
    }

    async fn update_note(&self, _id: i64, _note: &Note) -> Result<Note> {
        Err(gone())
    }

    async fn delete_note(&self, _note: &Note) -> Result<()> {
        Err(gone())
    }

    async fn count_notes(&self, _filter: NoteFilter<'_>) -> Result<i64> {
        Err(gone())
    }
}

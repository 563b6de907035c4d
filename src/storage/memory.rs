//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::notes::Note;

use super::CreateNoteValues;
use super::Error;
use super::NoteFilter;
use super::Result;
use super::Storage;

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// All notes in storage, soft-deleted ones included, keyed and ordered by ID
    notes: Arc<Mutex<BTreeMap<i64, Note>>>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self::default()
    }
}

/// Is the title used by any other note that is not deleted?
fn title_taken(notes: &BTreeMap<i64, Note>, title: &str, except_id: Option<i64>) -> bool {
    notes
        .values()
        .any(|note| note.title == title && !note.is_deleted() && Some(note.id) != except_id)
}

impl Storage for Memory {
    async fn find_single_note_by_id(&self, id: i64) -> Result<Option<Note>> {
        Ok(self
            .notes
            .lock()
            .await
            .get(&id)
            .filter(|note| !note.is_deleted())
            .cloned())
    }

    async fn find_single_note_by_title(&self, title: &str) -> Result<Option<Note>> {
        Ok(self
            .notes
            .lock()
            .await
            .values()
            .find(|note| note.title == title && !note.is_deleted())
            .cloned())
    }

    async fn find_all_notes(&self) -> Result<Vec<Note>> {
        Ok(self
            .notes
            .lock()
            .await
            .values()
            .filter(|note| !note.is_deleted())
            .cloned()
            .collect())
    }

    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Note> {
        let mut notes = self.notes.lock().await;

        if title_taken(&notes, values.title, None) {
            return Err(Error::UniqueViolation(format!(
                r#"Title "{}" is already in use"#,
                values.title
            )));
        }

        // soft-deleted notes are never removed, so the last ID is always the highest one
        let id = notes.last_key_value().map_or(1, |(id, _)| id + 1);

        let now = Utc::now().naive_utc();
        let note = Note {
            id,
            title: values.title.to_string(),
            is_completed: values.is_completed,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        notes.insert(note.id, note.clone());

        Ok(note)
    }

    async fn update_note(&self, id: i64, note: &Note) -> Result<Note> {
        let mut notes = self.notes.lock().await;

        if title_taken(&notes, &note.title, Some(id)) {
            return Err(Error::UniqueViolation(format!(
                r#"Title "{}" is already in use"#,
                note.title
            )));
        }

        let stored_note = notes
            .get_mut(&id)
            .filter(|stored_note| !stored_note.is_deleted())
            .ok_or_else(|| Error::Connection(format!("Note {id} is gone")))?;

        stored_note.title.clone_from(&note.title);
        stored_note.is_completed = note.is_completed;
        stored_note.updated_at = Utc::now().naive_utc();

        Ok(stored_note.clone())
    }

    async fn delete_note(&self, note: &Note) -> Result<()> {
        if let Some(note) = self.notes.lock().await.get_mut(&note.id) {
            note.deleted_at = Some(Utc::now().naive_utc());
        }

        Ok(())
    }

    async fn count_notes(&self, filter: NoteFilter<'_>) -> Result<i64> {
        let notes = self.notes.lock().await;

        let count = notes
            .values()
            .filter(|note| !note.is_deleted())
            .filter(|note| match filter {
                NoteFilter::Id(id) => note.id == id,
                NoteFilter::Title(title) => note.title == title,
            })
            .count();

        i64::try_from(count).map_err(|err| Error::Connection(err.to_string()))
    }
}

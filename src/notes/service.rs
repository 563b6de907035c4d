//! Note service
//!
//! Existence checks, title uniqueness and partial updates, on top of any [`Storage`]

use crate::storage;
use crate::storage::CreateNoteValues;
use crate::storage::NoteFilter;
use crate::storage::Storage;

use super::Error;
use super::NOTE_DOES_NOT_EXIST;
use super::Note;
use super::NoteUpdateRequest;
use super::TITLE_ALREADY_EXISTS;
use super::TITLE_REQUIRED;
use super::normalize_title;
use super::validate_title;

/// Note service
///
/// Holds no state of its own, everything lives in the storage
#[derive(Clone)]
pub struct NoteService<S: Storage> {
    /// Storage where the notes live
    storage: S,
}

impl<S: Storage> NoteService<S> {
    /// Create the service on top of a storage
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Get a single note
    ///
    /// A failing storage is reported as not found as well, with the message of the storage
    pub async fn get_by_id(&self, id: i64) -> Result<Note, Error> {
        match self.storage.find_single_note_by_id(id).await {
            Ok(Some(note)) => Ok(note),
            Ok(None) => Err(not_found()),
            Err(err) => {
                tracing::error!("Could not fetch note {id}: {err}");

                Err(Error::NotFound(err.to_string()))
            }
        }
    }

    /// Get all notes, oldest first
    pub async fn list_all(&self) -> Result<Vec<Note>, Error> {
        self.storage.find_all_notes().await.map_err(internal_error)
    }

    /// Is there a note with this title?
    pub async fn exists_by_title(&self, title: &str) -> Result<bool, Error> {
        let title = normalize_title(title);

        let count = self
            .storage
            .count_notes(NoteFilter::Title(&title))
            .await
            .map_err(internal_error)?;

        Ok(count > 0)
    }

    /// Is there a note with this ID?
    pub async fn exists_by_id(&self, id: i64) -> Result<bool, Error> {
        let count = self
            .storage
            .count_notes(NoteFilter::Id(id))
            .await
            .map_err(internal_error)?;

        Ok(count > 0)
    }

    /// Create a note
    ///
    /// The title is required and has to be unique, the note is not completed unless asked for
    pub async fn create(&self, request: &NoteUpdateRequest) -> Result<Note, Error> {
        let Some(title) = request.title.as_deref() else {
            return Err(Error::Validation(TITLE_REQUIRED.to_string()));
        };

        let title = validate_title(title)?;

        let existing_note = self
            .storage
            .find_single_note_by_title(&title)
            .await
            .map_err(internal_error)?;

        if existing_note.is_some() {
            return Err(conflict());
        }

        let values = CreateNoteValues {
            title: &title,
            is_completed: request.is_completed.unwrap_or(false),
        };

        let note = self
            .storage
            .create_note(&values)
            .await
            .map_err(write_error)?;

        tracing::debug!(r#"Created note {} with title "{}""#, note.id, note.title);

        Ok(note)
    }

    /// Update a note
    ///
    /// Only the fields present in the request are changed, a new title has to be unique
    pub async fn update(&self, id: i64, request: &NoteUpdateRequest) -> Result<Note, Error> {
        let title = request.title.as_deref().map(validate_title).transpose()?;

        let mut note = self
            .storage
            .find_single_note_by_id(id)
            .await
            .map_err(internal_error)?
            .ok_or_else(not_found)?;

        if let Some(title) = title {
            if title != note.title && self.exists_by_title(&title).await? {
                return Err(conflict());
            }

            note.title = title;
        }

        if let Some(is_completed) = request.is_completed {
            note.is_completed = is_completed;
        }

        let note = self
            .storage
            .update_note(id, &note)
            .await
            .map_err(write_error)?;

        tracing::debug!("Updated note {}", note.id);

        Ok(note)
    }

    /// Delete a note
    ///
    /// Returns the ID of the deleted note
    pub async fn delete(&self, id: i64) -> Result<i64, Error> {
        let note = self
            .storage
            .find_single_note_by_id(id)
            .await
            .map_err(internal_error)?
            .ok_or_else(not_found)?;

        self.storage
            .delete_note(&note)
            .await
            .map_err(internal_error)?;

        tracing::debug!("Deleted note {}", note.id);

        Ok(note.id)
    }
}

/// Note does not exist
fn not_found() -> Error {
    Error::NotFound(NOTE_DOES_NOT_EXIST.to_string())
}

/// Title is already in use
fn conflict() -> Error {
    Error::Conflict(TITLE_ALREADY_EXISTS.to_string())
}

/// Storage failed, keep a trace of it
fn internal_error(err: storage::Error) -> Error {
    tracing::error!("Storage failure: {err}");

    Error::Internal(err)
}

/// Storage failed while writing, it might have caught a duplicate title we missed
fn write_error(err: storage::Error) -> Error {
    match err {
        storage::Error::UniqueViolation(_) => conflict(),
        err @ storage::Error::Connection(_) => internal_error(err),
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::Failing;
    use crate::storage::Memory;
    use crate::storage::Result;

    use super::*;

    /// Storage that sees no notes, but refuses every write because another one got there first
    #[derive(Clone)]
    struct RacingStorage;

    impl Storage for RacingStorage {
        async fn find_single_note_by_id(&self, _id: i64) -> Result<Option<Note>> {
            Ok(None)
        }

        async fn find_single_note_by_title(&self, _title: &str) -> Result<Option<Note>> {
            Ok(None)
        }

        async fn find_all_notes(&self) -> Result<Vec<Note>> {
            Ok(Vec::new())
        }

        async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Note> {
            Err(storage::Error::UniqueViolation(values.title.to_string()))
        }

        async fn update_note(&self, _id: i64, note: &Note) -> Result<Note> {
            Err(storage::Error::UniqueViolation(note.title.clone()))
        }

        async fn delete_note(&self, _note: &Note) -> Result<()> {
            Ok(())
        }

        async fn count_notes(&self, _filter: NoteFilter<'_>) -> Result<i64> {
            Ok(0)
        }
    }

    fn request(title: Option<&str>, is_completed: Option<bool>) -> NoteUpdateRequest {
        NoteUpdateRequest {
            title: title.map(ToString::to_string),
            is_completed,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = NoteService::new(Memory::new());

        for (title, is_completed) in [("Buy milk", false), ("Walk the llama 🦙", true)] {
            let note = service
                .create(&request(Some(title), Some(is_completed)))
                .await
                .unwrap();

            let fetched = service.get_by_id(note.id).await.unwrap();
            assert_eq!(title, fetched.title);
            assert_eq!(is_completed, fetched.is_completed);
        }
    }

    #[tokio::test]
    async fn test_create_defaults_to_not_completed() {
        let service = NoteService::new(Memory::new());

        let note = service.create(&request(Some("Buy milk"), None)).await.unwrap();
        assert!(!note.is_completed);
    }

    #[tokio::test]
    async fn test_create_without_title_never_reaches_storage() {
        // any storage interaction would end up as an internal error
        let service = NoteService::new(Failing);

        let error = service.create(&request(None, Some(true))).await.unwrap_err();
        assert!(matches!(error, Error::Validation(ref message) if message == TITLE_REQUIRED));

        let error = service.create(&request(Some(""), None)).await.unwrap_err();
        assert!(matches!(error, Error::Validation(_)));

        let long_title = "x".repeat(81);
        let error = service
            .update(1, &request(Some(long_title.as_str()), None))
            .await
            .unwrap_err();
        assert!(matches!(error, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_duplicate_title() {
        let service = NoteService::new(Memory::new());

        service
            .create(&request(Some("Buy milk"), Some(false)))
            .await
            .unwrap();

        let error = service
            .create(&request(Some("Buy milk"), Some(true)))
            .await
            .unwrap_err();
        assert!(matches!(error, Error::Conflict(ref message) if message == TITLE_ALREADY_EXISTS));
    }

    #[tokio::test]
    async fn test_create_duplicate_title_caught_by_storage() {
        let service = NoteService::new(RacingStorage);

        let error = service
            .create(&request(Some("Buy milk"), None))
            .await
            .unwrap_err();
        assert!(matches!(error, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn test_failing_storage() {
        let service = NoteService::new(Failing);

        let error = service
            .create(&request(Some("Buy milk"), None))
            .await
            .unwrap_err();
        assert!(matches!(error, Error::Internal(_)));

        let error = service.update(1, &request(None, Some(true))).await.unwrap_err();
        assert!(matches!(error, Error::Internal(_)));

        let error = service.delete(1).await.unwrap_err();
        assert!(matches!(error, Error::Internal(_)));

        let error = service.list_all().await.unwrap_err();
        assert!(matches!(error, Error::Internal(_)));

        let error = service.exists_by_title("Buy milk").await.unwrap_err();
        assert!(matches!(error, Error::Internal(_)));

        // fetching a single note always ends up as not found
        let error = service.get_by_id(1).await.unwrap_err();
        assert!(
            matches!(error, Error::NotFound(ref message) if message == "Connection error: database is gone")
        );
    }

    #[tokio::test]
    async fn test_partial_update() {
        let service = NoteService::new(Memory::new());

        let note = service
            .create(&request(Some("Buy milk"), Some(false)))
            .await
            .unwrap();

        let note = service
            .update(note.id, &request(Some("Buy oat milk"), None))
            .await
            .unwrap();
        assert_eq!("Buy oat milk", note.title);
        assert!(!note.is_completed);

        let note = service
            .update(note.id, &request(None, Some(true)))
            .await
            .unwrap();
        assert_eq!("Buy oat milk", note.title);
        assert!(note.is_completed);

        let note = service
            .update(note.id, &NoteUpdateRequest::default())
            .await
            .unwrap();
        assert_eq!("Buy oat milk", note.title);
        assert!(note.is_completed);
    }

    #[tokio::test]
    async fn test_update_title_stays_unique() {
        let service = NoteService::new(Memory::new());

        let milk = service.create(&request(Some("Buy milk"), None)).await.unwrap();
        service.create(&request(Some("Buy eggs"), None)).await.unwrap();

        let error = service
            .update(milk.id, &request(Some("Buy eggs"), None))
            .await
            .unwrap_err();
        assert!(matches!(error, Error::Conflict(_)));

        // keeping its own title is fine
        let note = service
            .update(milk.id, &request(Some("Buy milk"), Some(true)))
            .await
            .unwrap();
        assert_eq!("Buy milk", note.title);
        assert!(note.is_completed);
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let service = NoteService::new(Memory::new());

        let error = service.get_by_id(42).await.unwrap_err();
        assert!(matches!(error, Error::NotFound(ref message) if message == NOTE_DOES_NOT_EXIST));

        let error = service.update(42, &request(None, Some(true))).await.unwrap_err();
        assert!(matches!(error, Error::NotFound(_)));

        let error = service.delete(42).await.unwrap_err();
        assert!(matches!(error, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let service = NoteService::new(Memory::new());

        let note = service.create(&request(Some("Buy milk"), None)).await.unwrap();

        assert_eq!(note.id, service.delete(note.id).await.unwrap());

        let error = service.get_by_id(note.id).await.unwrap_err();
        assert!(matches!(error, Error::NotFound(_)));

        // the title is free again
        assert!(!service.exists_by_title("Buy milk").await.unwrap());
        service.create(&request(Some("Buy milk"), None)).await.unwrap();
    }

    #[tokio::test]
    async fn test_exists() {
        let service = NoteService::new(Memory::new());

        assert!(!service.exists_by_id(1).await.unwrap());
        assert!(!service.exists_by_title("Buy milk").await.unwrap());

        let note = service.create(&request(Some("Buy milk"), None)).await.unwrap();

        assert!(service.exists_by_id(note.id).await.unwrap());
        assert!(service.exists_by_title("Buy milk").await.unwrap());
        assert!(!service.exists_by_title("Buy eggs").await.unwrap());
    }
}

//! Notes API endpoints

use axum::Extension;
use axum::http::StatusCode;
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::notes::Note;
use crate::notes::NoteService;
use crate::notes::NoteUpdateRequest;
use crate::storage::Storage;

use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;
use super::parse_note_id;

/// Note response going to the user
///
/// Basically filtering which fields are shown to the user
#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub id: i64,
    pub title: String,
    pub is_completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NoteResponse {
    fn from_note(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            is_completed: note.is_completed,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }

    fn from_note_multiple(notes: Vec<Note>) -> Vec<Self> {
        notes.into_iter().map(Self::from_note).collect::<Vec<Self>>()
    }
}

/// List all notes
///
/// Request:
/// ```sh
/// curl -v http://localhost:8080/notes/
/// ```
///
/// Response:
/// ```json
/// { "code": 200, "data": [ { "id": 1, "title": "Buy milk" ... } ] }
/// ```
pub async fn list<S: Storage>(
    Extension(notes): Extension<NoteService<S>>,
) -> Result<Success<Vec<NoteResponse>>, Error> {
    let notes = notes.list_all().await.map_err(Error::forbidden)?;

    Ok(Success::ok(NoteResponse::from_note_multiple(notes)))
}

/// Get a single note
///
/// Request:
/// ```sh
/// curl -v http://localhost:8080/notes/1
/// ```
///
/// Response:
/// ```json
/// { "code": 200, "data": { "id": 1, "title": "Buy milk" ... } }
/// ```
pub async fn single<S: Storage>(
    Extension(notes): Extension<NoteService<S>>,
    PathParameters(id): PathParameters<i64>,
) -> Result<Success<NoteResponse>, Error> {
    let id = parse_note_id(id)?;

    let note = notes.get_by_id(id).await?;

    Ok(Success::ok(NoteResponse::from_note(note)))
}

/// Does a note exist?
///
/// Answers with just a status code
pub async fn exists<S: Storage>(
    Extension(notes): Extension<NoteService<S>>,
    PathParameters(id): PathParameters<i64>,
) -> Result<StatusCode, Error> {
    let id = parse_note_id(id)?;

    if notes.exists_by_id(id).await? {
        Ok(StatusCode::OK)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

/// Create a note
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "title": "Buy milk", "is_completed": false }' \
///     http://localhost:8080/notes/
/// ```
///
/// Response:
/// ```json
/// { "code": 200, "data": { "id": 1, "title": "Buy milk" ... } }
/// ```
pub async fn create<S: Storage>(
    Extension(notes): Extension<NoteService<S>>,
    Form(form): Form<NoteUpdateRequest>,
) -> Result<Success<NoteResponse>, Error> {
    let note = notes.create(&form).await?;

    Ok(Success::ok(NoteResponse::from_note(note)))
}

/// Update a note, only the given fields are changed
///
/// Request:
/// ```sh
/// curl -v -X PUT -H 'Content-Type: application/json' \
///     -d '{ "is_completed": true }' \
///     http://localhost:8080/notes/1
/// ```
///
/// Response:
/// ```json
/// { "code": 200, "data": { "id": 1, "title": "Buy milk", "is_completed": true ... } }
/// ```
pub async fn update<S: Storage>(
    Extension(notes): Extension<NoteService<S>>,
    PathParameters(id): PathParameters<i64>,
    Form(form): Form<NoteUpdateRequest>,
) -> Result<Success<NoteResponse>, Error> {
    let id = parse_note_id(id)?;

    let note = notes.update(id, &form).await?;

    Ok(Success::ok(NoteResponse::from_note(note)))
}

/// Delete a note
///
/// Request:
/// ```sh
/// curl -v -X DELETE http://localhost:8080/notes/1
/// ```
///
/// Response:
/// ```json
/// { "code": 200, "data": 1 }
/// ```
pub async fn delete<S: Storage>(
    Extension(notes): Extension<NoteService<S>>,
    PathParameters(id): PathParameters<i64>,
) -> Result<Success<i64>, Error> {
    let id = parse_note_id(id)?;

    let id = notes.delete(id).await?;

    Ok(Success::ok(id))
}

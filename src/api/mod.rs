//! All API endpoint setup

use axum::Router;
use axum::routing::get;
use axum::routing::post;

pub use request::Form;
pub use request::PathParameters;
pub use request::parse_note_id;
pub use response::Error;
pub use response::Success;

use crate::storage::Storage;

mod notes;
mod request;
mod response;

/// Get the Axum router for all API routes
pub fn router<S: Storage>() -> Router {
    // with and without trailing slash, both are in use
    let collection = get(notes::list::<S>).post(notes::create::<S>);

    Router::new()
        .route("/notes", collection.clone())
        .route("/notes/", collection)
        .route(
            "/notes/{note}",
            get(notes::single::<S>)
                .head(notes::exists::<S>)
                .put(notes::update::<S>)
                .delete(notes::delete::<S>),
        )
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(fallback)
}

/// Anything we do not know about
async fn fallback() -> Error {
    Error::not_found("Route not found")
}

/// Known route, unknown method
async fn method_not_allowed() -> Error {
    Error::method_not_allowed("Method not allowed")
}

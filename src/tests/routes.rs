use axum::http::Method;
use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_unknown_route() {
    let mut app = helper::setup_test_app().await;

    let (status_code, data, message) = helper::call(&mut app, Method::GET, "/", None).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert!(data.is_none());
    assert_eq!(Some("Route not found".to_string()), message);

    let (status_code, _, message) =
        helper::call(&mut app, Method::GET, "/notes/1/comments", None).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(Some("Route not found".to_string()), message);
}

#[tokio::test]
async fn test_method_not_allowed() {
    let mut app = helper::setup_test_app().await;

    let note = helper::create_note(&mut app, "Buy milk", false).await;
    let uri = format!("/notes/{}", note.id);

    let (status_code, data, message) = helper::call(&mut app, Method::PATCH, &uri, None).await;
    assert_eq!(StatusCode::METHOD_NOT_ALLOWED, status_code);
    assert!(data.is_none());
    assert_eq!(Some("Method not allowed".to_string()), message);

    let (status_code, _, message) = helper::call(&mut app, Method::DELETE, "/notes/", None).await;
    assert_eq!(StatusCode::METHOD_NOT_ALLOWED, status_code);
    assert_eq!(Some("Method not allowed".to_string()), message);

    // the note is still there
    let (status_code, fetched, _) = helper::single_note(&mut app, &note.id.to_string()).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some(note), fetched);
}

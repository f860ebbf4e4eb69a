use axum::http::StatusCode;

use crate::bookmarks::BOOKMARKS_KEY;
use crate::persistence::KeyValuePersistence;
use crate::persistence::Memory;
use crate::store::NOTES_KEY;
use crate::tests::helper;

#[tokio::test]
async fn test_notes() {
    let mut app = helper::setup_test_app().await;

    // verify empty note list
    let (status_code, notes, _) = helper::list_notes(&mut app, None, None).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some(Vec::<helper::Note>::new()), notes);

    // create note
    let (status_code, note, _) = helper::maybe_create_note(&mut app, "Buy milk", "", None).await;
    assert_eq!(StatusCode::CREATED, status_code);
    assert!(note.is_some());
    let note = note.unwrap();
    assert_eq!("Buy milk".to_string(), note.title);
    assert_eq!("No description".to_string(), note.content);
    assert_eq!("1".to_string(), note.category);
    assert!(!note.id.is_empty());
    assert!(chrono::DateTime::parse_from_rfc3339(&note.date).is_ok());
    assert!(note.display_date.contains(", "));

    // verify note
    let (status_code, single, _) = helper::single_note(&mut app, &note.id).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some(&note), single.as_ref());

    // update note
    let (status_code, updated, _) =
        helper::maybe_update_note(&mut app, &note.id, "Buy oat milk", "Two liters").await;
    assert_eq!(StatusCode::OK, status_code);
    assert!(updated.is_some());
    let updated = updated.unwrap();
    assert_eq!(note.id, updated.id);
    assert_eq!("Buy oat milk".to_string(), updated.title);
    assert_eq!("Two liters".to_string(), updated.content);
    assert!(updated.date >= note.date);

    // move note, it leaves its old category
    let (status_code, moved, _) = helper::maybe_move_note(&mut app, &note.id, "2").await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!("2".to_string(), moved.unwrap().category);

    let (_, notes, _) = helper::list_notes(&mut app, Some("1"), None).await;
    assert_eq!(Some(0), notes.map(|notes| notes.len()));

    let (_, notes, _) = helper::list_notes(&mut app, Some("2"), None).await;
    let notes = notes.unwrap();
    assert_eq!(1, notes.len());
    assert_eq!(note.id, notes[0].id);

    // delete note
    let status_code = helper::maybe_delete_note(&mut app, &note.id).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    // verify note
    let (status_code, _, error) = helper::single_note(&mut app, &note.id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(Some("Note not found".to_string()), error);

    // deleting again is fine
    let status_code = helper::maybe_delete_note(&mut app, &note.id).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);
}

#[tokio::test]
async fn test_note_validation() {
    let mut app = helper::setup_test_app().await;

    let (status_code, _, error) = helper::maybe_create_note(&mut app, "   ", "", None).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Title required".to_string()), error);

    let title = "x".repeat(81);
    let (status_code, _, error) = helper::maybe_create_note(&mut app, &title, "", None).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Max 80 chars".to_string()), error);

    let note = helper::create_note(&mut app, "Valid", "1").await;

    let (status_code, _, error) = helper::maybe_update_note(&mut app, &note.id, "", "").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Title required".to_string()), error);

    let (status_code, _, error) =
        helper::maybe_update_note(&mut app, "missing", "Title", "").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(Some("Note not found".to_string()), error);

    let (status_code, _, error) = helper::maybe_move_note(&mut app, "missing", "3").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(Some("Note not found".to_string()), error);

    let (status_code, _, error) = helper::maybe_move_note(&mut app, &note.id, "4").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Data error".to_string()), error);

    let (_, notes, _) = helper::list_notes(&mut app, None, None).await;
    assert_eq!(Some(vec![note]), notes);
}

#[tokio::test]
async fn test_note_sorting() {
    let mut app = helper::setup_test_app().await;

    for title in ["banana", "Apple", "cherry"] {
        helper::create_note(&mut app, title, "1").await;
    }
    helper::create_note(&mut app, "Other", "3").await;

    let titles = |notes: Option<Vec<helper::Note>>| {
        notes
            .unwrap()
            .into_iter()
            .map(|note| note.title)
            .collect::<Vec<_>>()
    };

    let (_, notes, _) = helper::list_notes(&mut app, Some("1"), Some("a-z")).await;
    assert_eq!(vec!["Apple", "banana", "cherry"], titles(notes));

    let (_, notes, _) = helper::list_notes(&mut app, Some("1"), Some("z-a")).await;
    assert_eq!(vec!["cherry", "banana", "Apple"], titles(notes));

    let (_, notes, _) = helper::list_notes(&mut app, Some("1"), Some("newest")).await;
    let notes = notes.unwrap();
    assert!(notes.windows(2).all(|pair| pair[0].date >= pair[1].date));

    let (_, notes, _) = helper::list_notes(&mut app, Some("1"), Some("oldest")).await;
    let notes = notes.unwrap();
    assert!(notes.windows(2).all(|pair| pair[0].date <= pair[1].date));

    let (_, notes, _) = helper::list_notes(&mut app, Some("3"), None).await;
    assert_eq!(vec!["Other"], titles(notes));

    let (status_code, _, error) = helper::list_notes(&mut app, None, Some("sideways")).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Invalid query parameter".to_string(), error.unwrap().error);
}

#[tokio::test]
async fn test_categories() {
    let mut app = helper::setup_test_app().await;

    let (status_code, categories) = helper::list_categories(&mut app).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(
        vec![
            ("1".to_string(), "In Progress".to_string()),
            ("2".to_string(), "Completed".to_string()),
            ("3".to_string(), "Cancelled".to_string()),
        ],
        categories
    );
}

#[tokio::test]
async fn test_clear_and_reload() {
    let persistence = helper::Flaky::default();
    let mut app = helper::setup_test_app_with(persistence.clone()).await;

    let note = helper::create_note(&mut app, "Keep me", "1").await;
    helper::create_note(&mut app, "Me too", "2").await;

    // reload reads what is persisted
    let (status_code, notes) = helper::maybe_reload_notes(&mut app).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(2, notes.unwrap().len());

    // failed reload keeps what was there
    persistence.fail_reads(true);
    let (status_code, _) = helper::maybe_reload_notes(&mut app).await;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status_code);
    persistence.fail_reads(false);

    // failed write keeps what was there
    persistence.fail_writes(true);
    let (status_code, _, error) =
        helper::maybe_update_note(&mut app, &note.id, "Changed", "").await;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status_code);
    assert_eq!(Some("Storage failure".to_string()), error);
    assert_eq!(
        StatusCode::INTERNAL_SERVER_ERROR,
        helper::maybe_clear_notes(&mut app).await
    );
    persistence.fail_writes(false);

    let (_, single, _) = helper::single_note(&mut app, &note.id).await;
    assert_eq!(Some(note), single);

    // clear everything
    assert_eq!(
        StatusCode::NO_CONTENT,
        helper::maybe_clear_notes(&mut app).await
    );

    let (_, notes) = helper::maybe_reload_notes(&mut app).await;
    assert_eq!(Some(Vec::new()), notes);
}

#[tokio::test]
async fn test_note_ids_do_not_clash_with_routes() {
    let persistence = Memory::new();
    persistence
        .set(
            NOTES_KEY,
            r#"[{"id":"reload","title":"Odd ID","content":"a","date":"2024-06-01T14:30:00.000Z","category":"1"}]"#,
        )
        .await
        .unwrap();

    let mut app = helper::setup_test_app_with(persistence).await;

    let (status_code, note, _) = helper::single_note(&mut app, "reload").await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!("Odd ID".to_string(), note.unwrap().title);

    let (status_code, updated, _) =
        helper::maybe_update_note(&mut app, "reload", "Still odd", "").await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!("Still odd".to_string(), updated.unwrap().title);

    let (status_code, notes) = helper::maybe_reload_notes(&mut app).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(1, notes.unwrap().len());

    assert_eq!(
        StatusCode::NO_CONTENT,
        helper::maybe_delete_note(&mut app, "reload").await
    );
    let (status_code, _, _) = helper::single_note(&mut app, "reload").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
}

#[tokio::test]
async fn test_unreadable_notes_are_not_overwritten() {
    let persistence = Memory::new();
    let unreadable = r#"[
        {"id":"1","title":"Keep","content":"a","date":"2024-06-01T14:30:00.000Z, 00:00","category":"1"},
        {"id":"2","title":"Broken","content":"b","date":"someday","category":"2"}
    ]"#;
    persistence.set(NOTES_KEY, unreadable).await.unwrap();
    persistence.set(BOOKMARKS_KEY, "not json").await.unwrap();

    let mut app = helper::setup_test_app_with(persistence.clone()).await;

    let (_, notes, _) = helper::list_notes(&mut app, None, None).await;
    assert_eq!(Some(0), notes.map(|notes| notes.len()));

    let (status_code, _, error) = helper::maybe_create_note(&mut app, "New", "", None).await;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status_code);
    assert_eq!(Some("Storage failure".to_string()), error);
    assert_eq!(
        StatusCode::NO_CONTENT,
        helper::maybe_delete_note(&mut app, "1").await
    );

    let (status_code, _, _) = helper::maybe_create_bookmark(&mut app, "Rust book", "").await;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status_code);

    assert_eq!(
        Some(unreadable.to_string()),
        persistence.get(NOTES_KEY).await.unwrap()
    );
    assert_eq!(
        Some("not json".to_string()),
        persistence.get(BOOKMARKS_KEY).await.unwrap()
    );

    // once the document reads fine, writes keep what was stored
    persistence
        .set(
            NOTES_KEY,
            r#"[
                {"id":"1","title":"Keep","content":"a","date":"2024-06-01T14:30:00.000Z, 00:00","category":"1"},
                {"id":"2","title":"Legacy","content":"b","date":"6/1/2024, 2:30:45 PM","category":"2"}
            ]"#,
        )
        .await
        .unwrap();

    let (status_code, notes) = helper::maybe_reload_notes(&mut app).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(2, notes.unwrap().len());

    helper::create_note(&mut app, "New", "1").await;

    let document = persistence.get(NOTES_KEY).await.unwrap().unwrap();
    assert!(document.contains(r#""title":"Keep""#));
    assert!(document.contains(r#""title":"Legacy""#));
    assert!(document.contains(r#""title":"New""#));
}

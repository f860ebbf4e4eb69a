use axum::Extension;
use serde::Deserialize;
use serde::Serialize;

use crate::notes::Category;
use crate::notes::Intent;
use crate::notes::Note;
use crate::notes::SortKey;
use crate::persistence::KeyValuePersistence;
use crate::store::SharedNoteStore;

use super::Error;
use super::Form;
use super::PathParameters;
use super::QueryParameters;
use super::Success;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date: String,
    pub display_date: String,
    pub category: Category,
}

impl NoteResponse {
    fn from_note(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            content: note.content.clone(),
            date: note.iso_date(),
            display_date: note.display_date(),
            category: note.category,
        }
    }

    fn from_note_multiple<'a, I>(notes: I) -> Vec<Self>
    where
        I: IntoIterator<Item = &'a Note>,
    {
        notes.into_iter().map(Self::from_note).collect::<Vec<Self>>()
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: &'static str,
    pub title: &'static str,
}

pub async fn categories() -> Success<Vec<CategoryResponse>> {
    Success::ok(
        Category::ALL
            .iter()
            .map(|category| CategoryResponse {
                id: category.id(),
                title: category.title(),
            })
            .collect(),
    )
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ViewQuery {
    category: Category,
    sort: SortKey,
}

pub async fn list<P: KeyValuePersistence>(
    Extension(store): Extension<SharedNoteStore<P>>,
    QueryParameters(query): QueryParameters<ViewQuery>,
) -> Result<Success<Vec<NoteResponse>>, Error> {
    let store = store.lock().await;

    Ok(Success::ok(NoteResponse::from_note_multiple(
        store.view(query.category, query.sort),
    )))
}

pub async fn single<P: KeyValuePersistence>(
    Extension(store): Extension<SharedNoteStore<P>>,
    PathParameters(note_id): PathParameters<String>,
) -> Result<Success<NoteResponse>, Error> {
    let store = store.lock().await;

    store
        .get(&note_id)
        .map(|note| Success::ok(NoteResponse::from_note(note)))
        .ok_or_else(|| Error::not_found("Note not found"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteForm {
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    category: Category,
}

pub async fn create<P: KeyValuePersistence>(
    Extension(store): Extension<SharedNoteStore<P>>,
    Form(form): Form<CreateNoteForm>,
) -> Result<Success<NoteResponse>, Error> {
    let intent = Intent::Create {
        category: form.category,
    };

    let note = store
        .lock()
        .await
        .save(intent, &form.title, &form.content)
        .await?;

    Ok(Success::created(NoteResponse::from_note(&note)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteForm {
    title: String,
    #[serde(default)]
    content: String,
}

pub async fn update<P: KeyValuePersistence>(
    Extension(store): Extension<SharedNoteStore<P>>,
    PathParameters(note_id): PathParameters<String>,
    Form(form): Form<UpdateNoteForm>,
) -> Result<Success<NoteResponse>, Error> {
    let intent = Intent::Edit { id: note_id };

    let note = store
        .lock()
        .await
        .save(intent, &form.title, &form.content)
        .await?;

    Ok(Success::ok(NoteResponse::from_note(&note)))
}

#[derive(Debug, Deserialize)]
pub struct MoveNoteForm {
    category: Category,
}

pub async fn move_category<P: KeyValuePersistence>(
    Extension(store): Extension<SharedNoteStore<P>>,
    PathParameters(note_id): PathParameters<String>,
    Form(form): Form<MoveNoteForm>,
) -> Result<Success<NoteResponse>, Error> {
    let note = store
        .lock()
        .await
        .move_category(&note_id, form.category)
        .await?;

    Ok(Success::ok(NoteResponse::from_note(&note)))
}

pub async fn delete<P: KeyValuePersistence>(
    Extension(store): Extension<SharedNoteStore<P>>,
    PathParameters(note_id): PathParameters<String>,
) -> Result<Success<&'static str>, Error> {
    store.lock().await.delete(&note_id).await?;

    Ok(Success::<&'static str>::no_content())
}

pub async fn clear<P: KeyValuePersistence>(
    Extension(store): Extension<SharedNoteStore<P>>,
) -> Result<Success<&'static str>, Error> {
    store.lock().await.clear().await?;

    Ok(Success::<&'static str>::no_content())
}

pub async fn reload<P: KeyValuePersistence>(
    Extension(store): Extension<SharedNoteStore<P>>,
) -> Result<Success<Vec<NoteResponse>>, Error> {
    let mut store = store.lock().await;

    let notes = store.load().await.map_err(|err| {
        tracing::warn!("Failed to load notes: {err}");

        Error::internal_server_error("Failed to load notes").with_description(err)
    })?;

    Ok(Success::ok(NoteResponse::from_note_multiple(notes)))
}

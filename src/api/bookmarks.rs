use axum::Extension;
use serde::Deserialize;

use crate::bookmarks::Bookmark;
use crate::bookmarks::SharedBookmarkStore;
use crate::persistence::KeyValuePersistence;

use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;

pub async fn list<P: KeyValuePersistence>(
    Extension(store): Extension<SharedBookmarkStore<P>>,
) -> Result<Success<Vec<Bookmark>>, Error> {
    Ok(Success::ok(store.lock().await.bookmarks().to_vec()))
}

#[derive(Debug, Deserialize)]
pub struct CreateBookmarkForm {
    title: String,
    #[serde(default)]
    content: String,
}

pub async fn create<P: KeyValuePersistence>(
    Extension(store): Extension<SharedBookmarkStore<P>>,
    Form(form): Form<CreateBookmarkForm>,
) -> Result<Success<Bookmark>, Error> {
    let bookmark = store
        .lock()
        .await
        .add(&form.title, &form.content)
        .await?;

    Ok(Success::created(bookmark))
}

pub async fn delete<P: KeyValuePersistence>(
    Extension(store): Extension<SharedBookmarkStore<P>>,
    PathParameters(bookmark_id): PathParameters<String>,
) -> Result<Success<&'static str>, Error> {
    store.lock().await.remove(&bookmark_id).await?;

    Ok(Success::<&'static str>::no_content())
}

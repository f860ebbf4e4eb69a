//! Bookmarks, kept the same way as notes: one document under one key

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::document;
use crate::document::StorageError;
use crate::notes::IdGenerator;
use crate::notes::now;
use crate::notes::validate_title;
use crate::persistence::KeyValuePersistence;
use crate::store::Error;
use crate::store::Result;

/// Key of the bookmark collection
pub const BOOKMARKS_KEY: &str = "BOOKMARKS_DATA";

/// A single bookmark
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Bookmark {
    pub id: String,
    pub title: String,
    pub content: String,
}

/// Bookmark store shared between request handlers
pub type SharedBookmarkStore<P> = Arc<Mutex<BookmarkStore<P>>>;

/// The bookmark store
#[derive(Debug)]
pub struct BookmarkStore<P: KeyValuePersistence> {
    persistence: P,
    bookmarks: Vec<Bookmark>,
    ids: IdGenerator,
    loaded: bool,
}

impl<P: KeyValuePersistence> BookmarkStore<P> {
    /// Create an empty store, call [`BookmarkStore::load`] to read what is persisted
    pub fn new(persistence: P) -> Self {
        Self {
            persistence,
            bookmarks: Vec::new(),
            ids: IdGenerator::default(),
            loaded: false,
        }
    }

    /// Share this store between handlers
    pub fn shared(self) -> SharedBookmarkStore<P> {
        Arc::new(Mutex::new(self))
    }

    /// Read the collection from persistence
    ///
    /// On failure the cache is left unchanged and writes are refused until a
    /// load succeeds
    pub async fn load(&mut self) -> core::result::Result<&[Bookmark], StorageError> {
        let bookmarks = match document::read::<_, Bookmark>(&self.persistence, BOOKMARKS_KEY).await {
            Ok(bookmarks) => bookmarks,
            Err(err) => {
                self.loaded = false;

                return Err(err);
            }
        };

        self.ids.observe(bookmarks.iter().map(|bookmark| bookmark.id.as_str()));
        self.bookmarks = bookmarks;
        self.loaded = true;

        Ok(&self.bookmarks)
    }

    /// All bookmarks, in insertion order
    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    /// Add a bookmark and persist the collection
    pub async fn add(&mut self, title: &str, content: &str) -> Result<Bookmark> {
        let title = validate_title(title)?;

        let bookmark = Bookmark {
            id: self.ids.next_id(now()),
            title,
            content: content.trim().to_string(),
        };

        let mut bookmarks = self.bookmarks.clone();
        bookmarks.push(bookmark.clone());

        self.save_all(bookmarks).await?;

        tracing::info!(r#"Added bookmark "{}""#, bookmark.id);

        Ok(bookmark)
    }

    /// Remove a bookmark and persist the collection
    ///
    /// Removing a missing bookmark does nothing
    pub async fn remove(&mut self, id: &str) -> Result<()> {
        if !self.bookmarks.iter().any(|bookmark| bookmark.id == id) {
            return Ok(());
        }

        let bookmarks = self
            .bookmarks
            .iter()
            .filter(|bookmark| bookmark.id != id)
            .cloned()
            .collect();

        self.save_all(bookmarks).await?;

        tracing::info!(r#"Removed bookmark "{id}""#);

        Ok(())
    }

    /// Replace the whole collection
    pub async fn save_all(&mut self, bookmarks: Vec<Bookmark>) -> Result<()> {
        if !self.loaded {
            tracing::warn!("Bookmarks were not loaded, not saving them");

            return Err(Error::Storage(StorageError::NotLoaded(BOOKMARKS_KEY)));
        }

        document::write(&self.persistence, BOOKMARKS_KEY, &bookmarks)
            .await
            .map_err(Error::Storage)?;

        self.ids.observe(bookmarks.iter().map(|bookmark| bookmark.id.as_str()));
        self.bookmarks = bookmarks;

        Ok(())
    }
}

//! The note store
//!
//! Owns the canonical collection of notes. Every mutation builds the complete
//! new collection, writes it as one document and only then replaces the
//! cache, so a failed write leaves the cache as it was.
//!
//! Until a load succeeds nothing is written, a document that could not be read
//! is never replaced by a partial collection.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::collation::locale_compare;
use crate::document;
use crate::document::StorageError;
use crate::notes::Category;
use crate::notes::IdGenerator;
use crate::notes::Intent;
use crate::notes::Note;
use crate::notes::SortKey;
use crate::notes::StoredNote;
use crate::notes::ValidationError;
use crate::notes::normalize_content;
use crate::notes::now;
use crate::notes::validate_title;
use crate::persistence::KeyValuePersistence;

/// Key of the note collection
pub const NOTES_KEY: &str = "USER_NOTES";

/// Note store errors
#[derive(Debug, Error)]
pub enum Error {
    /// Input was rejected, nothing was persisted
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No note with this ID
    #[error(r#"Note "{0}" not found"#)]
    NotFound(String),

    /// Reading or writing the collection failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for all note store interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Note store shared between request handlers
pub type SharedNoteStore<P> = Arc<Mutex<NoteStore<P>>>;

/// The note store
#[derive(Debug)]
pub struct NoteStore<P: KeyValuePersistence> {
    /// Where the collection is persisted
    persistence: P,

    /// Last successfully read or written collection, in insertion order
    notes: Vec<Note>,

    ids: IdGenerator,

    /// Whether the last load succeeded
    loaded: bool,
}

impl<P: KeyValuePersistence> NoteStore<P> {
    /// Create an empty store, call [`NoteStore::load`] to read what is persisted
    ///
    /// Writes are refused until then
    pub fn new(persistence: P) -> Self {
        Self {
            persistence,
            notes: Vec::new(),
            ids: IdGenerator::default(),
            loaded: false,
        }
    }

    /// Create a store and load what is persisted
    pub async fn open(persistence: P) -> core::result::Result<Self, StorageError> {
        let mut store = Self::new(persistence);
        store.load().await?;

        Ok(store)
    }

    /// Share this store between handlers
    pub fn shared(self) -> SharedNoteStore<P> {
        Arc::new(Mutex::new(self))
    }

    /// Read the collection from persistence
    ///
    /// Legacy dates are migrated. On failure the cache is left unchanged and
    /// writes are refused until a load succeeds
    pub async fn load(&mut self) -> core::result::Result<&[Note], StorageError> {
        let notes = match self.read().await {
            Ok(notes) => notes,
            Err(err) => {
                self.loaded = false;

                return Err(err);
            }
        };

        self.ids.observe(notes.iter().map(|note| note.id.as_str()));
        self.notes = notes;
        self.loaded = true;

        tracing::debug!("Loaded {} note(s)", self.notes.len());

        Ok(&self.notes)
    }

    async fn read(&self) -> core::result::Result<Vec<Note>, StorageError> {
        document::read::<_, StoredNote>(&self.persistence, NOTES_KEY)
            .await?
            .into_iter()
            .map(StoredNote::migrate)
            .collect()
    }

    /// All notes, in insertion order
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Find a single note by its ID
    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Create or edit a note, depending on the intent
    pub async fn save(&mut self, intent: Intent, title: &str, content: &str) -> Result<Note> {
        match intent {
            Intent::Create { category } => self.create(title, content, category).await,
            Intent::Edit { id } => self.update(&id, title, content).await,
        }
    }

    /// Create a note and persist the collection
    pub async fn create(&mut self, title: &str, content: &str, category: Category) -> Result<Note> {
        let title = validate_title(title)?;
        let date = now();

        let note = Note {
            id: self.ids.next_id(date),
            title,
            content: normalize_content(content),
            date,
            category,
        };

        let mut notes = self.notes.clone();
        notes.push(note.clone());

        self.persist(notes).await?;

        tracing::info!(r#"Created note "{}" in {:?}"#, note.id, category);

        Ok(note)
    }

    /// Replace title and content of a note and persist the collection
    pub async fn update(&mut self, id: &str, title: &str, content: &str) -> Result<Note> {
        let title = validate_title(title)?;
        let content = normalize_content(content);

        self.modify(id, |note| {
            note.title = title;
            note.content = content;
        })
        .await
    }

    /// Move a note to another category and persist the collection
    pub async fn move_category(&mut self, id: &str, category: Category) -> Result<Note> {
        self.modify(id, |note| note.category = category).await
    }

    /// Remove a note and persist the collection
    ///
    /// Removing a missing note does nothing
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        if self.get(id).is_none() {
            tracing::debug!(r#"Note "{id}" does not exist, nothing to delete"#);

            return Ok(());
        }

        let notes = self
            .notes
            .iter()
            .filter(|note| note.id != id)
            .cloned()
            .collect();

        self.persist(notes).await?;

        tracing::info!(r#"Deleted note "{id}""#);

        Ok(())
    }

    /// Remove all notes from persistence
    ///
    /// Also works when the stored document could not be loaded
    pub async fn clear(&mut self) -> Result<()> {
        self.persistence
            .remove(NOTES_KEY)
            .await
            .map_err(StorageError::from)?;

        self.notes.clear();
        self.loaded = true;

        tracing::info!("Deleted all notes");

        Ok(())
    }

    /// Notes of a category in the requested order
    ///
    /// Notes that compare equal keep their insertion order
    pub fn view(&self, category: Category, sort_key: SortKey) -> impl Iterator<Item = &Note> {
        let mut notes = self
            .notes
            .iter()
            .filter(|note| note.category == category)
            .collect::<Vec<_>>();

        notes.sort_by(|a, b| match sort_key {
            SortKey::Newest => b.date.cmp(&a.date),
            SortKey::Oldest => a.date.cmp(&b.date),
            SortKey::TitleAscending => locale_compare(&a.title, &b.title),
            SortKey::TitleDescending => locale_compare(&b.title, &a.title),
        });

        notes.into_iter()
    }

    /// Apply a change to a single note, refresh its date and persist
    async fn modify<F>(&mut self, id: &str, change: F) -> Result<Note>
    where
        F: FnOnce(&mut Note),
    {
        let mut notes = self.notes.clone();

        let Some(note) = notes.iter_mut().find(|note| note.id == id) else {
            return Err(Error::NotFound(id.to_string()));
        };

        change(note);
        // never move back in time, even when the clock does
        note.date = now().max(note.date);

        let note = note.clone();

        self.persist(notes).await?;

        tracing::info!(r#"Updated note "{}""#, note.id);

        Ok(note)
    }

    /// Write the complete collection, replace the cache when that worked
    async fn persist(&mut self, notes: Vec<Note>) -> core::result::Result<(), StorageError> {
        if !self.loaded {
            tracing::warn!("Notes were not loaded, not saving them");

            return Err(StorageError::NotLoaded(NOTES_KEY));
        }

        if let Err(err) = document::write(&self.persistence, NOTES_KEY, &notes).await {
            tracing::warn!("Failed to save notes: {err}");

            return Err(err);
        }

        self.notes = notes;

        Ok(())
    }
}

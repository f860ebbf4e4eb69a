//! Notes, their categories and the rules for their fields

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveTime;
use chrono::SubsecRound;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::document::StorageError;

/// Maximum length of a title, in characters, after trimming
pub const TITLE_MAX_LENGTH: usize = 80;

/// Content used when a note is saved without any
pub const DEFAULT_CONTENT: &str = "No description";

/// Time appended to legacy dates without a time component
const DEFAULT_TIME_SUFFIX: &str = ", 00:00";

const LEGACY_DAY_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];
const LEGACY_TIME_FORMATS: [&str; 4] = ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M:%S %p"];

/// A single note
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(with = "iso_date")]
    pub date: DateTime<Utc>,
    pub category: Category,
}

impl Note {
    /// Date as persisted, like `2024-06-01T14:30:00.000Z`
    pub fn iso_date(&self) -> String {
        iso_date::format(&self.date)
    }

    /// Date as shown to people, like `6/1/2024, 02:30 PM`
    pub fn display_date(&self) -> String {
        self.date.format("%-m/%-d/%Y, %I:%M %p").to_string()
    }
}

/// Category of a note, serialized by its ID
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Category {
    /// Work that is still going on
    #[default]
    #[serde(rename = "1")]
    InProgress,

    /// Work that is done
    #[serde(rename = "2")]
    Completed,

    /// Work that will not be done
    #[serde(rename = "3")]
    Cancelled,
}

impl Category {
    /// All categories, in the order the tabs show them
    pub const ALL: [Category; 3] = [Self::InProgress, Self::Completed, Self::Cancelled];

    /// Stable ID of the category, as persisted
    pub fn id(self) -> &'static str {
        match self {
            Self::InProgress => "1",
            Self::Completed => "2",
            Self::Cancelled => "3",
        }
    }

    /// Human label of the category
    pub fn title(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Order of a note view
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum SortKey {
    /// Most recent date first
    #[default]
    #[serde(rename = "newest")]
    Newest,

    /// Oldest date first
    #[serde(rename = "oldest")]
    Oldest,

    /// Title, alphabetical
    #[serde(rename = "a-z")]
    TitleAscending,

    /// Title, reverse alphabetical
    #[serde(rename = "z-a")]
    TitleDescending,
}

/// What a save should do
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Create a new note in a category
    Create { category: Category },

    /// Edit the note with this ID
    Edit { id: String },
}

/// Invalid input for a note or bookmark
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is empty after trimming
    #[error("Title required")]
    EmptyTitle,

    /// Title is longer than allowed after trimming
    #[error("Max {} chars", TITLE_MAX_LENGTH)]
    TitleTooLong,
}

/// Trim and validate a title
pub fn validate_title(title: &str) -> Result<String, ValidationError> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    if title.chars().count() > TITLE_MAX_LENGTH {
        return Err(ValidationError::TitleTooLong);
    }

    Ok(title.to_string())
}

/// Trim content, falling back to the placeholder when nothing is left
pub fn normalize_content(content: &str) -> String {
    let content = content.trim();

    if content.is_empty() {
        DEFAULT_CONTENT.to_string()
    } else {
        content.to_string()
    }
}

/// Current time, at the precision dates are persisted with
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Generator of unique, increasing IDs based on the clock
///
/// IDs are millisecond timestamps as decimal strings, bumped when the clock
/// did not move since the previous one
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Make sure every next ID is larger than any of the given ones
    pub fn observe<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in ids {
            if let Ok(id) = id.parse::<i64>() {
                self.last = self.last.max(id);
            }
        }
    }

    /// Next unique ID
    pub fn next_id(&mut self, now: DateTime<Utc>) -> String {
        let id = now.timestamp_millis().max(self.last.saturating_add(1));
        self.last = id;

        id.to_string()
    }
}

/// A note as found in a persisted document, before its date is migrated
#[derive(Debug, Deserialize)]
pub(crate) struct StoredNote {
    id: String,
    title: String,
    content: String,
    date: String,
    category: Category,
}

impl StoredNote {
    /// Turn into a note, reading legacy date formats
    pub(crate) fn migrate(self) -> Result<Note, StorageError> {
        let Some(date) = parse_date(&self.date) else {
            return Err(StorageError::InvalidDate {
                id: self.id,
                date: self.date,
            });
        };

        Ok(Note {
            id: self.id,
            title: self.title,
            content: self.content,
            date,
            category: self.category,
        })
    }
}

/// Parse a persisted date, ISO or one of the legacy formats
fn parse_date(date: &str) -> Option<DateTime<Utc>> {
    if let Some(date) = parse_iso(date) {
        return Some(date);
    }

    let date = if date.contains(',') {
        date.to_string()
    } else {
        format!("{date}{DEFAULT_TIME_SUFFIX}")
    };

    let (day, time) = date.split_once(", ")?;

    // older releases appended the default time to ISO dates as well
    if let Some(date) = parse_iso(day) {
        return Some(date);
    }

    let day = LEGACY_DAY_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(day.trim(), format).ok())?;
    let time = LEGACY_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(time.trim(), format).ok())?;

    Some(day.and_time(time).and_utc())
}

fn parse_iso(date: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date.trim())
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

/// Dates as ISO strings with milliseconds, like `2024-06-01T14:30:00.000Z`
mod iso_date {
    use chrono::DateTime;
    use chrono::SecondsFormat;
    use chrono::Utc;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;
    use serde::de::Error;

    pub fn format(date: &DateTime<Utc>) -> String {
        date.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let date = String::deserialize(deserializer)?;

        DateTime::parse_from_rfc3339(&date)
            .map(|date| date.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}

//! Quote repository contract with SQLite and in-memory implementations.
//!
//! # Responsibility
//! - Persist the ordered quote collection as one atomic snapshot.
//! - Persist small UI state: selected filter and last shown quote line.
//!
//! # Invariants
//! - `save_quotes` replaces the previous snapshot entirely or not at all.
//! - Loaded quotes come back in the order they were saved.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::quote::{Quote, QuoteValidationError};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

const KEY_QUOTES_SAVED: &str = "quotes_saved";
const KEY_SELECTED_CATEGORY: &str = "selected_category";
const KEY_LAST_SHOWN: &str = "last_shown";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for quote persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted quote data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract used by `QuoteService`.
pub trait QuoteRepository {
    /// Returns `None` when no snapshot was ever saved.
    fn load_quotes(&self) -> RepoResult<Option<Vec<Quote>>>;
    fn save_quotes(&self, quotes: &[Quote]) -> RepoResult<()>;
    fn load_filter(&self) -> RepoResult<Option<String>>;
    fn save_filter(&self, filter: &str) -> RepoResult<()>;
    fn load_last_shown(&self) -> RepoResult<Option<String>>;
    fn save_last_shown(&self, line: &str) -> RepoResult<()>;
}

/// SQLite-backed repository owning its connection.
pub struct SqliteQuoteRepository {
    conn: Connection,
}

impl SqliteQuoteRepository {
    /// Wraps a connection that already has migrations applied.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (or creates) a database file.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn in_memory() -> RepoResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn get_setting(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put_setting(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![key, value],
        )?;
        Ok(())
    }
}

impl QuoteRepository for SqliteQuoteRepository {
    fn load_quotes(&self) -> RepoResult<Option<Vec<Quote>>> {
        if self.get_setting(KEY_QUOTES_SAVED)?.is_none() {
            return Ok(None);
        }

        let mut stmt = self
            .conn
            .prepare("SELECT position, text, category FROM quotes ORDER BY position ASC;")?;
        let mut rows = stmt.query([])?;
        let mut quotes = Vec::new();
        while let Some(row) = rows.next()? {
            let position: i64 = row.get("position")?;
            let quote = Quote {
                text: row.get("text")?,
                category: row.get("category")?,
            };
            quote
                .validate()
                .map_err(|err| invalid_row(position, err))?;
            quotes.push(quote);
        }

        Ok(Some(quotes))
    }

    fn save_quotes(&self, quotes: &[Quote]) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM quotes;", [])?;
        {
            let mut insert =
                tx.prepare("INSERT INTO quotes (position, text, category) VALUES (?1, ?2, ?3);")?;
            for (position, quote) in quotes.iter().enumerate() {
                insert.execute(params![
                    position as i64,
                    quote.text.as_str(),
                    quote.category.as_str()
                ])?;
            }
        }
        tx.execute(
            "INSERT INTO settings (key, value) VALUES (?1, '1')
             ON CONFLICT(key) DO NOTHING;",
            [KEY_QUOTES_SAVED],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn load_filter(&self) -> RepoResult<Option<String>> {
        self.get_setting(KEY_SELECTED_CATEGORY)
    }

    fn save_filter(&self, filter: &str) -> RepoResult<()> {
        self.put_setting(KEY_SELECTED_CATEGORY, filter)
    }

    fn load_last_shown(&self) -> RepoResult<Option<String>> {
        self.get_setting(KEY_LAST_SHOWN)
    }

    fn save_last_shown(&self, line: &str) -> RepoResult<()> {
        self.put_setting(KEY_LAST_SHOWN, line)
    }
}

/// Process-local repository; nothing survives the instance.
#[derive(Debug, Default)]
pub struct MemoryQuoteRepository {
    quotes: RefCell<Option<Vec<Quote>>>,
    filter: RefCell<Option<String>>,
    last_shown: RefCell<Option<String>>,
}

impl MemoryQuoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository that already holds a saved snapshot.
    pub fn with_quotes(quotes: Vec<Quote>) -> Self {
        Self {
            quotes: RefCell::new(Some(quotes)),
            ..Self::default()
        }
    }
}

impl QuoteRepository for MemoryQuoteRepository {
    fn load_quotes(&self) -> RepoResult<Option<Vec<Quote>>> {
        Ok(self.quotes.borrow().clone())
    }

    fn save_quotes(&self, quotes: &[Quote]) -> RepoResult<()> {
        *self.quotes.borrow_mut() = Some(quotes.to_vec());
        Ok(())
    }

    fn load_filter(&self) -> RepoResult<Option<String>> {
        Ok(self.filter.borrow().clone())
    }

    fn save_filter(&self, filter: &str) -> RepoResult<()> {
        *self.filter.borrow_mut() = Some(filter.to_string());
        Ok(())
    }

    fn load_last_shown(&self) -> RepoResult<Option<String>> {
        Ok(self.last_shown.borrow().clone())
    }

    fn save_last_shown(&self, line: &str) -> RepoResult<()> {
        *self.last_shown.borrow_mut() = Some(line.to_string());
        Ok(())
    }
}

fn invalid_row(position: i64, err: QuoteValidationError) -> RepoError {
    RepoError::InvalidData(format!("quotes row at position {position}: {err}"))
}

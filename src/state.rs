use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::Result;

/// Durable per-chat record of the last user who left.
#[derive(Clone, Debug)]
pub struct ChatStateStore {
    conn: Arc<Mutex<Connection>>,
}

impl ChatStateStore {
    /// Open or create the SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        // journal_mode PRAGMA always returns the resulting mode, so use query_row
        let _: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
        Self::run_migrations(&conn)?;

        info!("Chat state store initialized at: {}", path.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn run_migrations(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS chat_state (
                chat_id INTEGER PRIMARY KEY,
                last_departed TEXT,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            ",
        )?;
        Ok(())
    }

    /// Overwrite the stored name for a chat, creating the record if absent.
    pub async fn record_departure(&self, chat_id: i64, name: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO chat_state (chat_id, last_departed) VALUES (?1, ?2)
             ON CONFLICT(chat_id) DO UPDATE SET
                last_departed = excluded.last_departed,
                updated_at = datetime('now')",
            rusqlite::params![chat_id, name],
        )?;
        Ok(())
    }

    /// Last departed user for a chat, `None` if nobody left yet.
    /// First lookup of an unknown chat creates its empty record.
    pub async fn last_departure(&self, chat_id: i64) -> Result<Option<String>> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT OR IGNORE INTO chat_state (chat_id) VALUES (?1)",
            rusqlite::params![chat_id],
        )?;

        let name: Option<String> = conn
            .query_row(
                "SELECT last_departed FROM chat_state WHERE chat_id = ?1",
                rusqlite::params![chat_id],
                |row| row.get(0),
            )
            .optional()?
            .flatten();

        Ok(name.filter(|n| !n.is_empty()))
    }

    /// Run raw SQL against the store (for testing)
    #[cfg(test)]
    pub async fn execute_batch(&self, sql: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute_batch(sql)?;
        Ok(())
    }

    #[cfg(test)]
    pub async fn record_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        Ok(conn.query_row("SELECT count(*) FROM chat_state", [], |row| row.get(0))?)
    }
}

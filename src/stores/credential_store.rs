use crate::core::error::StoreError;
use crate::models::user::User;
use crate::security::password::PasswordHash;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT    NOT NULL,
    password_hash TEXT    NOT NULL,
    salt          TEXT    NOT NULL,
    iterations    INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_users_name ON users (name);
";

/// Relational store of user credentials
///
/// Every call runs one statement on the blocking pool; PBKDF2 verification
/// happens there too so request tasks never block the runtime.
pub struct CredentialStore {
    conn: Arc<Mutex<Connection>>,
    iterations: u32,
}

impl CredentialStore {
    /// Open (or create) a SQLite database file and ensure the schema exists
    pub fn open(path: &Path, iterations: u32) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn, iterations)
    }

    pub fn open_in_memory(iterations: u32) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, iterations)
    }

    fn with_connection(conn: Connection, iterations: u32) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            iterations,
        })
    }

    /// Find the user whose name matches and whose stored hash verifies
    /// against `password`. Names are not unique; the first verifying row in
    /// insertion order wins.
    pub async fn lookup(&self, name: &str, password: &str) -> Result<Option<User>, StoreError> {
        let conn = Arc::clone(&self.conn);
        let name = name.to_string();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || -> Result<Option<User>, StoreError> {
            let candidates = {
                let conn = conn.lock().map_err(|_| StoreError::LockPoisoned)?;
                Self::candidates(&conn, &name)?
            };

            // Hashing runs after the connection is released
            Ok(candidates
                .into_iter()
                .find(|(_, stored)| stored.verify(&password))
                .map(|(user, _)| user))
        })
        .await?
    }

    fn candidates(conn: &Connection, name: &str) -> Result<Vec<(User, PasswordHash)>, StoreError> {
        let mut stmt = conn.prepare_cached(
            "SELECT id, name, password_hash, salt, iterations
             FROM users WHERE name = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![name], |row| {
            Ok((
                User {
                    id: row.get(0)?,
                    name: row.get(1)?,
                },
                PasswordHash {
                    hash: row.get(2)?,
                    salt: row.get(3)?,
                    iterations: row.get(4)?,
                },
            ))
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Insert a new user unconditionally and return the persisted record
    pub async fn create(&self, name: &str, password: &str) -> Result<User, StoreError> {
        let conn = Arc::clone(&self.conn);
        let name = name.to_string();
        let password = password.to_string();
        let iterations = self.iterations;

        tokio::task::spawn_blocking(move || -> Result<User, StoreError> {
            let stored = PasswordHash::generate(&password, iterations);

            let conn = conn.lock().map_err(|_| StoreError::LockPoisoned)?;
            conn.execute(
                "INSERT INTO users (name, password_hash, salt, iterations)
                 VALUES (?1, ?2, ?3, ?4)",
                params![name, stored.hash, stored.salt, stored.iterations],
            )?;

            Ok(User {
                id: conn.last_insert_rowid(),
                name,
            })
        })
        .await?
    }

    pub async fn count(&self) -> Result<usize, StoreError> {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || -> Result<usize, StoreError> {
            let conn = conn.lock().map_err(|_| StoreError::LockPoisoned)?;
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(count as usize)
        })
        .await?
    }
}

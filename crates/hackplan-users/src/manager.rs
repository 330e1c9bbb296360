use std::sync::Mutex;

use rusqlite::Connection;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth;
use crate::db::{row_to_user, USER_COLUMNS};
use crate::error::{Result, UserError};
use crate::types::User;

/// Thread-safe account store.
///
/// Wraps a single SQLite connection in a `Mutex`. Sufficient for the
/// single-node target; swap in a pool if write contention ever shows up.
pub struct UserManager {
    db: Mutex<Connection>,
    token_secret: String,
    token_ttl_hours: u32,
}

impl UserManager {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(conn: Connection, token_secret: String, token_ttl_hours: u32) -> Self {
        Self {
            db: Mutex::new(conn),
            token_secret,
            token_ttl_hours,
        }
    }

    /// Create an account. Fails with `EmailTaken` on a duplicate email.
    #[instrument(skip(self, password), fields(email))]
    pub fn register(&self, email: &str, display_name: &str, password: &str) -> Result<User> {
        let email = email.trim().to_ascii_lowercase();
        let password_hash = auth::hash_password(password)?;
        let now = chrono::Utc::now().to_rfc3339();
        let id = Uuid::now_v7().to_string();

        let db = self.db.lock().unwrap();
        let inserted = db.execute(
            "INSERT OR IGNORE INTO users
             (id, email, display_name, password_hash, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            rusqlite::params![id, email, display_name, password_hash, now],
        )?;
        if inserted == 0 {
            return Err(UserError::EmailTaken(email));
        }

        info!(user_id = %id, "user registered");
        Ok(User {
            id,
            email,
            display_name: display_name.to_string(),
            password_hash,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Verify credentials and mint a bearer token.
    ///
    /// Unknown email and wrong password return the same `InvalidCredentials`.
    #[instrument(skip(self, password), fields(email))]
    pub fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let email = email.trim().to_ascii_lowercase();
        let user = {
            let db = self.db.lock().unwrap();
            match db.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                rusqlite::params![email],
                row_to_user,
            ) {
                Ok(u) => u,
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    return Err(UserError::InvalidCredentials)
                }
                Err(e) => return Err(UserError::Database(e)),
            }
        };

        if !auth::verify_password(password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        let token = auth::mint_token(&self.token_secret, &user.id, self.token_ttl_hours)?;
        info!(user_id = %user.id, "login succeeded");
        Ok((user, token))
    }

    /// Resolve a bearer token to the user id it was minted for.
    pub fn verify_token(&self, token: &str) -> Result<String> {
        auth::verify_token(&self.token_secret, token)
    }

    /// Fetch a user by id.
    #[instrument(skip(self))]
    pub fn get(&self, user_id: &str) -> Result<User> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            rusqlite::params![user_id],
            row_to_user,
        ) {
            Ok(u) => Ok(u),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(UserError::NotFound(user_id.to_string()))
            }
            Err(e) => Err(UserError::Database(e)),
        }
    }

    /// Delete an account. Hackathons owned by the user are left in place;
    /// the gateway decides whether to cascade.
    #[instrument(skip(self))]
    pub fn delete(&self, user_id: &str) -> Result<()> {
        let db = self.db.lock().unwrap();
        let n = db.execute(
            "DELETE FROM users WHERE id = ?1",
            rusqlite::params![user_id],
        )?;
        if n == 0 {
            return Err(UserError::NotFound(user_id.to_string()));
        }
        info!(user_id, "user deleted");
        Ok(())
    }
}

//! User accounts.
//!
//! Passwords are stored as Argon2 PHC strings in the `password` column and
//! are never serialized. Deleting a user removes that user's favorites
//! through `ON DELETE CASCADE` on both join tables.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use starlog_types::{
    Record, EMAIL_MAX_LEN, PASSWORD_MAX_LEN, PERSON_NAME_MAX_LEN, USERNAME_MAX_LEN,
};

use crate::error::ModelError;
use crate::sql::{check_optional, check_required, write_error, Assignments};

const USER_COLUMNS: &str = "id, email, password, username, first_name, last_name, \
                            subscription_date, is_active";

/// A registered user.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct User {
    /// Internal database ID.
    pub id: i64,
    /// Unique email address.
    pub email: String,
    /// Argon2 PHC hash of the password.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Unique login handle.
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// When the account was created (UTC).
    pub subscription_date: NaiveDateTime,
    /// Inactive accounts cannot authenticate.
    pub is_active: bool,
}

impl Record for User {
    const TABLE: &'static str = "user";
}

/// Parameters for signing up a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    /// Plaintext password; hashed before it is stored.
    pub password: String,
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Parameters for updating an existing user. `None` fields are left as-is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    /// New plaintext password.
    pub password: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
}

fn check_email(email: &str) -> Result<(), ModelError> {
    check_required("email", email, EMAIL_MAX_LEN)?;
    if !email.contains('@') {
        return Err(ModelError::invalid("email", "must contain '@'"));
    }
    Ok(())
}

fn check_password(password: &str) -> Result<(), ModelError> {
    check_required("password", password, PASSWORD_MAX_LEN)
}

impl NewUser {
    fn validate(&self) -> Result<(), ModelError> {
        check_email(&self.email)?;
        check_password(&self.password)?;
        check_required("username", &self.username, USERNAME_MAX_LEN)?;
        check_optional("first_name", self.first_name.as_deref(), PERSON_NAME_MAX_LEN)?;
        check_optional("last_name", self.last_name.as_deref(), PERSON_NAME_MAX_LEN)
    }
}

impl UpdateUser {
    fn validate(&self) -> Result<(), ModelError> {
        if let Some(email) = &self.email {
            check_email(email)?;
        }
        if let Some(password) = &self.password {
            check_password(password)?;
        }
        if let Some(username) = &self.username {
            check_required("username", username, USERNAME_MAX_LEN)?;
        }
        check_optional("first_name", self.first_name.as_deref(), PERSON_NAME_MAX_LEN)?;
        check_optional("last_name", self.last_name.as_deref(), PERSON_NAME_MAX_LEN)
    }
}

/// Hashes a plaintext password into an Argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ModelError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ModelError::PasswordHash(e.to_string()))
}

/// Checks a plaintext password against a stored PHC string.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, ModelError> {
    let parsed =
        PasswordHash::new(password_hash).map_err(|e| ModelError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Creates a new user. The subscription date and active flag take their
/// column defaults.
///
/// # Errors
///
/// `Validation` for empty or over-long fields, `Conflict` when the email or
/// username is already taken.
pub fn create_user(conn: &Connection, new: &NewUser) -> Result<User, ModelError> {
    new.validate()?;
    let password_hash = hash_password(&new.password)?;

    let user = conn
        .query_row(
            &format!(
                "INSERT INTO user (email, password, username, first_name, last_name)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING {USER_COLUMNS}"
            ),
            params![
                new.email,
                password_hash,
                new.username,
                new.first_name,
                new.last_name,
            ],
            map_row_to_user,
        )
        .map_err(|e| write_error("user", e))?;

    tracing::info!(user_id = user.id, username = %user.username, "user created");
    Ok(user)
}

/// Retrieves a user by ID.
pub fn get_user(conn: &Connection, id: i64) -> Result<User, ModelError> {
    find_user(conn, "id", &id)?.ok_or_else(|| ModelError::not_found("user", id))
}

/// Retrieves a user by email address.
pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<User, ModelError> {
    find_user(conn, "email", &email)?.ok_or_else(|| ModelError::not_found("user", email))
}

/// Retrieves a user by username.
pub fn get_user_by_username(conn: &Connection, username: &str) -> Result<User, ModelError> {
    find_user(conn, "username", &username)?
        .ok_or_else(|| ModelError::not_found("user", username))
}

fn find_user(
    conn: &Connection,
    column: &str,
    key: &dyn rusqlite::ToSql,
) -> Result<Option<User>, ModelError> {
    Ok(conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM user WHERE {column} = ?1"),
            [key],
            map_row_to_user,
        )
        .optional()?)
}

/// Lists all users ordered by ID.
pub fn list_users(conn: &Connection) -> Result<Vec<User>, ModelError> {
    let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM user ORDER BY id ASC"))?;
    let rows = stmt.query_map([], map_row_to_user)?;
    let mut users = Vec::new();
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}

/// Updates an existing user and returns the stored row.
///
/// A new password is re-hashed before it is written.
pub fn update_user(conn: &Connection, id: i64, updates: &UpdateUser) -> Result<User, ModelError> {
    updates.validate()?;

    let mut set = Assignments::new();
    set.set_opt("email", updates.email.clone());
    if let Some(password) = &updates.password {
        set.set("password", hash_password(password)?);
    }
    set.set_opt("username", updates.username.clone());
    set.set_opt("first_name", updates.first_name.clone());
    set.set_opt("last_name", updates.last_name.clone());
    set.set_opt("is_active", updates.is_active);

    if set.is_empty() {
        return get_user(conn, id);
    }

    let count = set
        .execute(conn, "user", id)
        .map_err(|e| write_error("user", e))?;
    if count == 0 {
        return Err(ModelError::not_found("user", id));
    }
    get_user(conn, id)
}

/// Activates or deactivates an account.
pub fn set_user_active(conn: &Connection, id: i64, active: bool) -> Result<(), ModelError> {
    let count = conn.execute(
        "UPDATE user SET is_active = ?1 WHERE id = ?2",
        params![active, id],
    )?;
    if count == 0 {
        return Err(ModelError::not_found("user", id));
    }
    Ok(())
}

/// Deletes a user together with all of that user's favorites.
pub fn delete_user(conn: &Connection, id: i64) -> Result<(), ModelError> {
    let count = conn.execute("DELETE FROM user WHERE id = ?1", [id])?;
    if count == 0 {
        return Err(ModelError::not_found("user", id));
    }
    tracing::info!(user_id = id, "user deleted");
    Ok(())
}

/// Returns the active user whose email and password match.
///
/// Unknown emails, wrong passwords and inactive accounts all yield
/// `InvalidCredentials` so callers cannot tell which one failed.
pub fn authenticate(conn: &Connection, email: &str, password: &str) -> Result<User, ModelError> {
    let user = match find_user(conn, "email", &email)? {
        Some(user) => user,
        None => return Err(ModelError::InvalidCredentials),
    };
    if !user.is_active || !verify_password(password, &user.password_hash)? {
        return Err(ModelError::InvalidCredentials);
    }
    Ok(user)
}

fn map_row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        username: row.get(3)?,
        first_name: row.get(4)?,
        last_name: row.get(5)?,
        subscription_date: row.get(6)?,
        is_active: row.get(7)?,
    })
}

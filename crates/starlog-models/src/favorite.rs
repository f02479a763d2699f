//! Favorites: join rows linking a user to a planet or a character.
//!
//! Both join tables share one shape, so the SQL is driven by
//! [`FavoriteKind`] and the typed wrappers (`add_favorite_planet`,
//! `list_favorite_characters`, ...) only pick the row type.
//!
//! A (user, target) pair is stored at most once. Adding an existing pair is
//! a `Conflict`; removing a missing pair is `NotFound`. Use the toggle
//! operations when the caller does not care which state it starts from.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use starlog_types::{FavoriteKind, Record};

use crate::character::character_exists;
use crate::error::ModelError;
use crate::planet::planet_exists;
use crate::sql::{immediate_transaction, write_error};
use crate::user::get_user;

/// A user's favorite planet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoritePlanet {
    pub id: i64,
    pub user_id: i64,
    pub planet_id: i64,
    /// Name of the favorited planet, resolved at read time.
    pub planet_name: Option<String>,
    pub added_date: NaiveDateTime,
}

impl Record for FavoritePlanet {
    const TABLE: &'static str = "favorite_planet";
}

/// A user's favorite character.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteCharacter {
    pub id: i64,
    pub user_id: i64,
    pub character_id: i64,
    /// Name of the favorited character, resolved at read time.
    pub character_name: Option<String>,
    pub added_date: NaiveDateTime,
}

impl Record for FavoriteCharacter {
    const TABLE: &'static str = "favorite_character";
}

/// A favorite of either kind.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Favorite {
    Planet(FavoritePlanet),
    Character(FavoriteCharacter),
}

impl Favorite {
    pub fn kind(&self) -> FavoriteKind {
        match self {
            Self::Planet(_) => FavoriteKind::Planet,
            Self::Character(_) => FavoriteKind::Character,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::Planet(f) => f.id,
            Self::Character(f) => f.id,
        }
    }
}

/// Outcome of a toggle.
#[derive(Debug, Clone, PartialEq)]
pub enum Toggle<T> {
    /// The pair was absent and has been stored.
    Added(T),
    /// The pair was present and has been removed.
    Removed,
}

impl<T> Toggle<T> {
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added(_))
    }

    fn map<U>(self, f: impl FnOnce(T) -> U) -> Toggle<U> {
        match self {
            Self::Added(value) => Toggle::Added(f(value)),
            Self::Removed => Toggle::Removed,
        }
    }
}

/// Both favorite lists of one user.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct UserFavorites {
    pub planets: Vec<FavoritePlanet>,
    pub characters: Vec<FavoriteCharacter>,
}

/// Per-kind table and column names.
struct JoinShape {
    table: &'static str,
    target_column: &'static str,
    target_table: &'static str,
}

fn join_shape(kind: FavoriteKind) -> JoinShape {
    match kind {
        FavoriteKind::Planet => JoinShape {
            table: kind.join_table(),
            target_column: "planet_id",
            target_table: "planet",
        },
        FavoriteKind::Character => JoinShape {
            table: kind.join_table(),
            target_column: "character_id",
            target_table: "character",
        },
    }
}

/// A join row type, tied to its kind.
///
/// Rows are read from [`select_sql`] columns: id, user id, target id,
/// target name, added date.
trait FavoriteRow: Sized {
    const KIND: FavoriteKind;

    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

impl FavoriteRow for FavoritePlanet {
    const KIND: FavoriteKind = FavoriteKind::Planet;

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            planet_id: row.get(2)?,
            planet_name: row.get(3)?,
            added_date: row.get(4)?,
        })
    }
}

impl FavoriteRow for FavoriteCharacter {
    const KIND: FavoriteKind = FavoriteKind::Character;

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            character_id: row.get(2)?,
            character_name: row.get(3)?,
            added_date: row.get(4)?,
        })
    }
}

fn select_sql(shape: &JoinShape) -> String {
    format!(
        "SELECT f.id, f.user_id, f.{col}, t.name, f.added_date
         FROM {table} f
         LEFT JOIN {target} t ON t.id = f.{col}",
        col = shape.target_column,
        table = shape.table,
        target = shape.target_table,
    )
}

fn ensure_target(conn: &Connection, kind: FavoriteKind, target_id: i64) -> Result<(), ModelError> {
    let exists = match kind {
        FavoriteKind::Planet => planet_exists(conn, target_id)?,
        FavoriteKind::Character => character_exists(conn, target_id)?,
    };
    if !exists {
        return Err(ModelError::not_found(kind.as_str(), target_id));
    }
    Ok(())
}

fn find_favorite_id(
    conn: &Connection,
    kind: FavoriteKind,
    user_id: i64,
    target_id: i64,
) -> Result<Option<i64>, ModelError> {
    let shape = join_shape(kind);
    Ok(conn
        .query_row(
            &format!(
                "SELECT id FROM {} WHERE user_id = ?1 AND {} = ?2",
                shape.table, shape.target_column
            ),
            params![user_id, target_id],
            |row| row.get(0),
        )
        .optional()?)
}

fn get_favorite<F: FavoriteRow>(conn: &Connection, id: i64) -> Result<F, ModelError> {
    let shape = join_shape(F::KIND);
    conn.query_row(
        &format!("{} WHERE f.id = ?1", select_sql(&shape)),
        [id],
        F::from_row,
    )
    .optional()?
    .ok_or_else(|| ModelError::not_found(shape.table, id))
}

fn insert_favorite<F: FavoriteRow>(
    conn: &Connection,
    user_id: i64,
    target_id: i64,
) -> Result<F, ModelError> {
    let kind = F::KIND;
    get_user(conn, user_id)?;
    ensure_target(conn, kind, target_id)?;

    let shape = join_shape(kind);
    let id: i64 = conn
        .query_row(
            &format!(
                "INSERT INTO {} (user_id, {}) VALUES (?1, ?2) RETURNING id",
                shape.table, shape.target_column
            ),
            params![user_id, target_id],
            |row| row.get(0),
        )
        .map_err(|e| match write_error(shape.table, e) {
            ModelError::Conflict(_) => ModelError::Conflict(format!(
                "user {user_id} already favorited {kind} {target_id}"
            )),
            other => other,
        })?;

    tracing::debug!(user_id, target_id, kind = kind.as_str(), "favorite added");
    get_favorite(conn, id)
}

fn toggle_row<F: FavoriteRow>(
    conn: &Connection,
    user_id: i64,
    target_id: i64,
) -> Result<Toggle<F>, ModelError> {
    let tx = immediate_transaction(conn)?;
    let outcome = match find_favorite_id(&tx, F::KIND, user_id, target_id)? {
        Some(_) => {
            remove_favorite(&tx, F::KIND, user_id, target_id)?;
            Toggle::Removed
        }
        None => Toggle::Added(insert_favorite(&tx, user_id, target_id)?),
    };
    tx.commit()?;
    Ok(outcome)
}

fn list_where<F: FavoriteRow>(
    conn: &Connection,
    column: &str,
    key: i64,
) -> Result<Vec<F>, ModelError> {
    let shape = join_shape(F::KIND);
    let mut stmt = conn.prepare(&format!(
        "{} WHERE f.{column} = ?1 ORDER BY f.added_date ASC, f.id ASC",
        select_sql(&shape)
    ))?;
    let rows = stmt.query_map([key], F::from_row)?;
    let mut favorites = Vec::new();
    for row in rows {
        favorites.push(row?);
    }
    Ok(favorites)
}

/// Stores a favorite and returns it with the target name resolved.
///
/// # Errors
///
/// `NotFound` if the user or the target does not exist, `Conflict` if the
/// pair is already a favorite.
pub fn add_favorite(
    conn: &Connection,
    kind: FavoriteKind,
    user_id: i64,
    target_id: i64,
) -> Result<Favorite, ModelError> {
    Ok(match kind {
        FavoriteKind::Planet => Favorite::Planet(insert_favorite(conn, user_id, target_id)?),
        FavoriteKind::Character => {
            Favorite::Character(insert_favorite(conn, user_id, target_id)?)
        }
    })
}

/// Removes a favorite.
///
/// # Errors
///
/// `NotFound` if the pair is not a favorite.
pub fn remove_favorite(
    conn: &Connection,
    kind: FavoriteKind,
    user_id: i64,
    target_id: i64,
) -> Result<(), ModelError> {
    let shape = join_shape(kind);
    let count = conn.execute(
        &format!(
            "DELETE FROM {} WHERE user_id = ?1 AND {} = ?2",
            shape.table, shape.target_column
        ),
        params![user_id, target_id],
    )?;
    if count == 0 {
        return Err(ModelError::not_found(
            shape.table,
            format!("user {user_id}, {kind} {target_id}"),
        ));
    }
    tracing::debug!(user_id, target_id, kind = kind.as_str(), "favorite removed");
    Ok(())
}

/// Adds the favorite if absent, removes it if present.
///
/// The check and the write run in one `IMMEDIATE` transaction, so concurrent
/// toggles of the same pair serialize on the write lock.
pub fn toggle_favorite(
    conn: &Connection,
    kind: FavoriteKind,
    user_id: i64,
    target_id: i64,
) -> Result<Toggle<Favorite>, ModelError> {
    Ok(match kind {
        FavoriteKind::Planet => {
            toggle_row::<FavoritePlanet>(conn, user_id, target_id)?.map(Favorite::Planet)
        }
        FavoriteKind::Character => {
            toggle_row::<FavoriteCharacter>(conn, user_id, target_id)?.map(Favorite::Character)
        }
    })
}

/// Returns whether the user has favorited the target.
pub fn is_favorite(
    conn: &Connection,
    kind: FavoriteKind,
    user_id: i64,
    target_id: i64,
) -> Result<bool, ModelError> {
    Ok(find_favorite_id(conn, kind, user_id, target_id)?.is_some())
}

/// Favorites `planet_id` for `user_id`.
pub fn add_favorite_planet(
    conn: &Connection,
    user_id: i64,
    planet_id: i64,
) -> Result<FavoritePlanet, ModelError> {
    insert_favorite(conn, user_id, planet_id)
}

/// Unfavorites `planet_id` for `user_id`.
pub fn remove_favorite_planet(
    conn: &Connection,
    user_id: i64,
    planet_id: i64,
) -> Result<(), ModelError> {
    remove_favorite(conn, FavoriteKind::Planet, user_id, planet_id)
}

pub fn toggle_favorite_planet(
    conn: &Connection,
    user_id: i64,
    planet_id: i64,
) -> Result<Toggle<FavoritePlanet>, ModelError> {
    toggle_row(conn, user_id, planet_id)
}

/// Lists a user's favorite planets, oldest first.
pub fn list_favorite_planets(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<FavoritePlanet>, ModelError> {
    get_user(conn, user_id)?;
    list_where(conn, "user_id", user_id)
}

/// Lists every favorite row pointing at a planet.
pub fn list_planet_favorited_by(
    conn: &Connection,
    planet_id: i64,
) -> Result<Vec<FavoritePlanet>, ModelError> {
    ensure_target(conn, FavoriteKind::Planet, planet_id)?;
    list_where(conn, "planet_id", planet_id)
}

/// Favorites `character_id` for `user_id`.
pub fn add_favorite_character(
    conn: &Connection,
    user_id: i64,
    character_id: i64,
) -> Result<FavoriteCharacter, ModelError> {
    insert_favorite(conn, user_id, character_id)
}

/// Unfavorites `character_id` for `user_id`.
pub fn remove_favorite_character(
    conn: &Connection,
    user_id: i64,
    character_id: i64,
) -> Result<(), ModelError> {
    remove_favorite(conn, FavoriteKind::Character, user_id, character_id)
}

pub fn toggle_favorite_character(
    conn: &Connection,
    user_id: i64,
    character_id: i64,
) -> Result<Toggle<FavoriteCharacter>, ModelError> {
    toggle_row(conn, user_id, character_id)
}

/// Lists a user's favorite characters, oldest first.
pub fn list_favorite_characters(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<FavoriteCharacter>, ModelError> {
    get_user(conn, user_id)?;
    list_where(conn, "user_id", user_id)
}

/// Lists every favorite row pointing at a character.
pub fn list_character_favorited_by(
    conn: &Connection,
    character_id: i64,
) -> Result<Vec<FavoriteCharacter>, ModelError> {
    ensure_target(conn, FavoriteKind::Character, character_id)?;
    list_where(conn, "character_id", character_id)
}

/// Lists both kinds of favorite for a user.
pub fn list_favorites(conn: &Connection, user_id: i64) -> Result<UserFavorites, ModelError> {
    Ok(UserFavorites {
        planets: list_favorite_planets(conn, user_id)?,
        characters: list_favorite_characters(conn, user_id)?,
    })
}

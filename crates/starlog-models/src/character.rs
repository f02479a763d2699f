//! Characters from the reference dataset.
//!
//! A character optionally belongs to a homeworld planet. Reads join the
//! planet so the serialized form carries `homeworld_name` alongside
//! `homeworld_id`.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use starlog_types::{Record, ATTRIBUTE_MAX_LEN, NAME_MAX_LEN};

use crate::error::ModelError;
use crate::planet::planet_exists;
use crate::sql::{check_optional, check_required, write_error, Assignments};

const CHARACTER_SELECT: &str = "SELECT
        c.id, c.name, c.height, c.mass, c.hair_color, c.skin_color, c.eye_color,
        c.birth_year, c.gender, c.homeworld_id, p.name, c.description
    FROM character c
    LEFT JOIN planet p ON p.id = c.homeworld_id";

/// A character.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Character {
    pub id: i64,
    pub name: String,
    pub height: Option<String>,
    pub mass: Option<String>,
    pub hair_color: Option<String>,
    pub skin_color: Option<String>,
    pub eye_color: Option<String>,
    pub birth_year: Option<String>,
    pub gender: Option<String>,
    /// ID of the homeworld planet, if known.
    pub homeworld_id: Option<i64>,
    /// Name of the homeworld planet. Derived from the join, not stored.
    pub homeworld_name: Option<String>,
    pub description: Option<String>,
}

impl Record for Character {
    const TABLE: &'static str = "character";
}

/// Parameters for creating a character.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCharacter {
    pub name: String,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub mass: Option<String>,
    #[serde(default)]
    pub hair_color: Option<String>,
    #[serde(default)]
    pub skin_color: Option<String>,
    #[serde(default)]
    pub eye_color: Option<String>,
    #[serde(default)]
    pub birth_year: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub homeworld_id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Parameters for updating a character. `None` fields are left untouched.
///
/// `homeworld_id: Some(None)` clears the homeworld.
#[derive(Debug, Clone, Default)]
pub struct UpdateCharacter {
    pub name: Option<String>,
    pub height: Option<String>,
    pub mass: Option<String>,
    pub hair_color: Option<String>,
    pub skin_color: Option<String>,
    pub eye_color: Option<String>,
    pub birth_year: Option<String>,
    pub gender: Option<String>,
    pub homeworld_id: Option<Option<i64>>,
    pub description: Option<String>,
}

impl NewCharacter {
    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        check_required("name", &self.name, NAME_MAX_LEN)?;
        for (field, value) in [
            ("height", &self.height),
            ("mass", &self.mass),
            ("hair_color", &self.hair_color),
            ("skin_color", &self.skin_color),
            ("eye_color", &self.eye_color),
            ("birth_year", &self.birth_year),
            ("gender", &self.gender),
        ] {
            check_optional(field, value.as_deref(), ATTRIBUTE_MAX_LEN)?;
        }
        Ok(())
    }
}

impl UpdateCharacter {
    fn validate(&self) -> Result<(), ModelError> {
        if let Some(name) = &self.name {
            check_required("name", name, NAME_MAX_LEN)?;
        }
        for (field, value) in [
            ("height", &self.height),
            ("mass", &self.mass),
            ("hair_color", &self.hair_color),
            ("skin_color", &self.skin_color),
            ("eye_color", &self.eye_color),
            ("birth_year", &self.birth_year),
            ("gender", &self.gender),
        ] {
            check_optional(field, value.as_deref(), ATTRIBUTE_MAX_LEN)?;
        }
        Ok(())
    }
}

fn ensure_homeworld(conn: &Connection, homeworld_id: Option<i64>) -> Result<(), ModelError> {
    match homeworld_id {
        Some(planet_id) if !planet_exists(conn, planet_id)? => {
            Err(ModelError::not_found("planet", planet_id))
        }
        _ => Ok(()),
    }
}

/// Creates a character.
///
/// # Errors
///
/// `Validation` for empty or over-long fields, `NotFound` if the homeworld
/// planet does not exist, `Conflict` if the name is taken.
pub fn create_character(conn: &Connection, new: &NewCharacter) -> Result<Character, ModelError> {
    new.validate()?;
    ensure_homeworld(conn, new.homeworld_id)?;

    let id: i64 = conn
        .query_row(
            "INSERT INTO character (
                name, height, mass, hair_color, skin_color, eye_color,
                birth_year, gender, homeworld_id, description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            RETURNING id",
            params![
                new.name,
                new.height,
                new.mass,
                new.hair_color,
                new.skin_color,
                new.eye_color,
                new.birth_year,
                new.gender,
                new.homeworld_id,
                new.description,
            ],
            |row| row.get(0),
        )
        .map_err(|e| write_error("character", e))?;

    get_character(conn, id)
}

/// Retrieves a character by ID.
pub fn get_character(conn: &Connection, id: i64) -> Result<Character, ModelError> {
    conn.query_row(
        &format!("{CHARACTER_SELECT} WHERE c.id = ?1"),
        [id],
        map_row_to_character,
    )
    .optional()?
    .ok_or_else(|| ModelError::not_found("character", id))
}

/// Retrieves a character by its unique name.
pub fn get_character_by_name(conn: &Connection, name: &str) -> Result<Character, ModelError> {
    find_character_by_name(conn, name)?.ok_or_else(|| ModelError::not_found("character", name))
}

pub(crate) fn find_character_by_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<Character>, ModelError> {
    Ok(conn
        .query_row(
            &format!("{CHARACTER_SELECT} WHERE c.name = ?1"),
            [name],
            map_row_to_character,
        )
        .optional()?)
}

/// Returns whether a character with this ID exists.
pub fn character_exists(conn: &Connection, id: i64) -> Result<bool, ModelError> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM character WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?)
}

/// Lists all characters ordered by ID.
pub fn list_characters(conn: &Connection) -> Result<Vec<Character>, ModelError> {
    let mut stmt = conn.prepare(&format!("{CHARACTER_SELECT} ORDER BY c.id ASC"))?;
    let rows = stmt.query_map([], map_row_to_character)?;
    let mut characters = Vec::new();
    for row in rows {
        characters.push(row?);
    }
    Ok(characters)
}

pub(crate) fn list_characters_by_homeworld(
    conn: &Connection,
    planet_id: i64,
) -> Result<Vec<Character>, ModelError> {
    let mut stmt = conn.prepare(&format!(
        "{CHARACTER_SELECT} WHERE c.homeworld_id = ?1 ORDER BY c.id ASC"
    ))?;
    let rows = stmt.query_map([planet_id], map_row_to_character)?;
    let mut characters = Vec::new();
    for row in rows {
        characters.push(row?);
    }
    Ok(characters)
}

/// Updates a character and returns the stored row.
pub fn update_character(
    conn: &Connection,
    id: i64,
    updates: &UpdateCharacter,
) -> Result<Character, ModelError> {
    updates.validate()?;
    if let Some(homeworld_id) = updates.homeworld_id {
        ensure_homeworld(conn, homeworld_id)?;
    }

    let mut set = Assignments::new();
    set.set_opt("name", updates.name.clone());
    set.set_opt("height", updates.height.clone());
    set.set_opt("mass", updates.mass.clone());
    set.set_opt("hair_color", updates.hair_color.clone());
    set.set_opt("skin_color", updates.skin_color.clone());
    set.set_opt("eye_color", updates.eye_color.clone());
    set.set_opt("birth_year", updates.birth_year.clone());
    set.set_opt("gender", updates.gender.clone());
    set.set_opt("homeworld_id", updates.homeworld_id);
    set.set_opt("description", updates.description.clone());

    if set.is_empty() {
        return get_character(conn, id);
    }

    let count = set
        .execute(conn, "character", id)
        .map_err(|e| write_error("character", e))?;
    if count == 0 {
        return Err(ModelError::not_found("character", id));
    }
    get_character(conn, id)
}

/// Deletes a character and every favorite pointing at it.
pub fn delete_character(conn: &Connection, id: i64) -> Result<(), ModelError> {
    let count = conn.execute("DELETE FROM character WHERE id = ?1", [id])?;
    if count == 0 {
        return Err(ModelError::not_found("character", id));
    }
    Ok(())
}

fn map_row_to_character(row: &Row) -> rusqlite::Result<Character> {
    Ok(Character {
        id: row.get(0)?,
        name: row.get(1)?,
        height: row.get(2)?,
        mass: row.get(3)?,
        hair_color: row.get(4)?,
        skin_color: row.get(5)?,
        eye_color: row.get(6)?,
        birth_year: row.get(7)?,
        gender: row.get(8)?,
        homeworld_id: row.get(9)?,
        homeworld_name: row.get(10)?,
        description: row.get(11)?,
    })
}

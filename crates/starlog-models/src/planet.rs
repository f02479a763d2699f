//! Planets from the reference dataset.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use starlog_types::{Record, ATTRIBUTE_MAX_LEN, NAME_MAX_LEN};

use crate::character::{list_characters_by_homeworld, Character};
use crate::error::ModelError;
use crate::sql::{check_optional, check_required, write_error, Assignments};

const PLANET_COLUMNS: &str = "id, name, climate, terrain, population, diameter, gravity, \
                              orbital_period, rotation_period, surface_water, description";

/// A planet.
///
/// Physical attributes are free-form text because the reference dataset
/// mixes numbers with values such as `"unknown"` or `"1 standard"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Planet {
    pub id: i64,
    pub name: String,
    pub climate: Option<String>,
    pub terrain: Option<String>,
    pub population: Option<String>,
    pub diameter: Option<String>,
    pub gravity: Option<String>,
    pub orbital_period: Option<String>,
    pub rotation_period: Option<String>,
    pub surface_water: Option<String>,
    pub description: Option<String>,
}

impl Record for Planet {
    const TABLE: &'static str = "planet";
}

/// Parameters for creating a planet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewPlanet {
    pub name: String,
    #[serde(default)]
    pub climate: Option<String>,
    #[serde(default)]
    pub terrain: Option<String>,
    #[serde(default)]
    pub population: Option<String>,
    #[serde(default)]
    pub diameter: Option<String>,
    #[serde(default)]
    pub gravity: Option<String>,
    #[serde(default)]
    pub orbital_period: Option<String>,
    #[serde(default)]
    pub rotation_period: Option<String>,
    #[serde(default)]
    pub surface_water: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Parameters for updating a planet. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlanet {
    pub name: Option<String>,
    pub climate: Option<String>,
    pub terrain: Option<String>,
    pub population: Option<String>,
    pub diameter: Option<String>,
    pub gravity: Option<String>,
    pub orbital_period: Option<String>,
    pub rotation_period: Option<String>,
    pub surface_water: Option<String>,
    pub description: Option<String>,
}

impl NewPlanet {
    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        check_required("name", &self.name, NAME_MAX_LEN)?;
        for (field, value) in self.attributes() {
            check_optional(field, value, ATTRIBUTE_MAX_LEN)?;
        }
        Ok(())
    }

    fn attributes(&self) -> [(&'static str, Option<&str>); 8] {
        [
            ("climate", self.climate.as_deref()),
            ("terrain", self.terrain.as_deref()),
            ("population", self.population.as_deref()),
            ("diameter", self.diameter.as_deref()),
            ("gravity", self.gravity.as_deref()),
            ("orbital_period", self.orbital_period.as_deref()),
            ("rotation_period", self.rotation_period.as_deref()),
            ("surface_water", self.surface_water.as_deref()),
        ]
    }
}

impl UpdatePlanet {
    fn validate(&self) -> Result<(), ModelError> {
        if let Some(name) = &self.name {
            check_required("name", name, NAME_MAX_LEN)?;
        }
        for (field, value) in [
            ("climate", &self.climate),
            ("terrain", &self.terrain),
            ("population", &self.population),
            ("diameter", &self.diameter),
            ("gravity", &self.gravity),
            ("orbital_period", &self.orbital_period),
            ("rotation_period", &self.rotation_period),
            ("surface_water", &self.surface_water),
        ] {
            check_optional(field, value.as_deref(), ATTRIBUTE_MAX_LEN)?;
        }
        Ok(())
    }
}

impl From<NewPlanet> for UpdatePlanet {
    /// Every attribute of `new` is written, except absent ones which keep
    /// their stored value.
    fn from(new: NewPlanet) -> Self {
        Self {
            name: Some(new.name),
            climate: new.climate,
            terrain: new.terrain,
            population: new.population,
            diameter: new.diameter,
            gravity: new.gravity,
            orbital_period: new.orbital_period,
            rotation_period: new.rotation_period,
            surface_water: new.surface_water,
            description: new.description,
        }
    }
}

/// Creates a planet.
///
/// # Errors
///
/// `Validation` for empty or over-long fields, `Conflict` if the name is
/// taken.
pub fn create_planet(conn: &Connection, new: &NewPlanet) -> Result<Planet, ModelError> {
    new.validate()?;
    conn.query_row(
        &format!(
            "INSERT INTO planet (
                name, climate, terrain, population, diameter, gravity,
                orbital_period, rotation_period, surface_water, description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            RETURNING {PLANET_COLUMNS}"
        ),
        params![
            new.name,
            new.climate,
            new.terrain,
            new.population,
            new.diameter,
            new.gravity,
            new.orbital_period,
            new.rotation_period,
            new.surface_water,
            new.description,
        ],
        map_row_to_planet,
    )
    .map_err(|e| write_error("planet", e))
}

/// Retrieves a planet by ID.
pub fn get_planet(conn: &Connection, id: i64) -> Result<Planet, ModelError> {
    conn.query_row(
        &format!("SELECT {PLANET_COLUMNS} FROM planet WHERE id = ?1"),
        [id],
        map_row_to_planet,
    )
    .optional()?
    .ok_or_else(|| ModelError::not_found("planet", id))
}

/// Retrieves a planet by its unique name.
pub fn get_planet_by_name(conn: &Connection, name: &str) -> Result<Planet, ModelError> {
    find_planet_by_name(conn, name)?.ok_or_else(|| ModelError::not_found("planet", name))
}

pub(crate) fn find_planet_by_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<Planet>, ModelError> {
    Ok(conn
        .query_row(
            &format!("SELECT {PLANET_COLUMNS} FROM planet WHERE name = ?1"),
            [name],
            map_row_to_planet,
        )
        .optional()?)
}

/// Returns whether a planet with this ID exists.
pub fn planet_exists(conn: &Connection, id: i64) -> Result<bool, ModelError> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM planet WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?)
}

/// Lists all planets ordered by ID.
pub fn list_planets(conn: &Connection) -> Result<Vec<Planet>, ModelError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {PLANET_COLUMNS} FROM planet ORDER BY id ASC"))?;
    let rows = stmt.query_map([], map_row_to_planet)?;
    let mut planets = Vec::new();
    for row in rows {
        planets.push(row?);
    }
    Ok(planets)
}

/// Updates a planet and returns the stored row.
pub fn update_planet(
    conn: &Connection,
    id: i64,
    updates: &UpdatePlanet,
) -> Result<Planet, ModelError> {
    updates.validate()?;

    let mut set = Assignments::new();
    set.set_opt("name", updates.name.clone());
    set.set_opt("climate", updates.climate.clone());
    set.set_opt("terrain", updates.terrain.clone());
    set.set_opt("population", updates.population.clone());
    set.set_opt("diameter", updates.diameter.clone());
    set.set_opt("gravity", updates.gravity.clone());
    set.set_opt("orbital_period", updates.orbital_period.clone());
    set.set_opt("rotation_period", updates.rotation_period.clone());
    set.set_opt("surface_water", updates.surface_water.clone());
    set.set_opt("description", updates.description.clone());

    if set.is_empty() {
        return get_planet(conn, id);
    }

    let count = set
        .execute(conn, "planet", id)
        .map_err(|e| write_error("planet", e))?;
    if count == 0 {
        return Err(ModelError::not_found("planet", id));
    }
    get_planet(conn, id)
}

/// Deletes a planet.
///
/// Favorites of the planet are removed; characters native to it keep
/// existing with their homeworld cleared.
pub fn delete_planet(conn: &Connection, id: i64) -> Result<(), ModelError> {
    let count = conn.execute("DELETE FROM planet WHERE id = ?1", [id])?;
    if count == 0 {
        return Err(ModelError::not_found("planet", id));
    }
    Ok(())
}

/// Lists the characters whose homeworld is this planet.
pub fn list_native_characters(
    conn: &Connection,
    planet_id: i64,
) -> Result<Vec<Character>, ModelError> {
    if !planet_exists(conn, planet_id)? {
        return Err(ModelError::not_found("planet", planet_id));
    }
    list_characters_by_homeworld(conn, planet_id)
}

fn map_row_to_planet(row: &Row) -> rusqlite::Result<Planet> {
    Ok(Planet {
        id: row.get(0)?,
        name: row.get(1)?,
        climate: row.get(2)?,
        terrain: row.get(3)?,
        population: row.get(4)?,
        diameter: row.get(5)?,
        gravity: row.get(6)?,
        orbital_period: row.get(7)?,
        rotation_period: row.get(8)?,
        surface_water: row.get(9)?,
        description: row.get(10)?,
    })
}

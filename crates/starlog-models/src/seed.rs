//! Reference dataset loading.
//!
//! The dataset is a JSON document listing planets and characters.
//! Characters name their homeworld by planet name rather than by ID, so a
//! dataset can be written by hand and loaded into any database. Rows are
//! matched by their unique name: existing rows are updated in place, new
//! ones are inserted. The whole load runs in one transaction.

use std::path::Path;

use rusqlite::Connection;
use serde::Deserialize;

use crate::character::{
    create_character, find_character_by_name, update_character, NewCharacter, UpdateCharacter,
};
use crate::error::ModelError;
use crate::planet::{create_planet, find_planet_by_name, update_planet, NewPlanet, UpdatePlanet};
use crate::sql::immediate_transaction;

/// A reference dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub planets: Vec<NewPlanet>,
    #[serde(default)]
    pub characters: Vec<SeedCharacter>,
}

/// A character entry in a reference dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedCharacter {
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
    /// Name of the homeworld planet.
    #[serde(default)]
    pub homeworld: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Row counts produced by a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub planets_inserted: usize,
    pub planets_updated: usize,
    pub characters_inserted: usize,
    pub characters_updated: usize,
}

/// Reads and loads a JSON reference dataset from disk.
pub fn load_reference_file(conn: &Connection, path: &Path) -> Result<SeedReport, ModelError> {
    let contents = std::fs::read_to_string(path)?;
    let data: ReferenceData = serde_json::from_str(&contents)?;
    let report = load_reference_data(conn, &data)?;
    tracing::info!(
        path = %path.display(),
        planets_inserted = report.planets_inserted,
        planets_updated = report.planets_updated,
        characters_inserted = report.characters_inserted,
        characters_updated = report.characters_updated,
        "reference data loaded"
    );
    Ok(report)
}

/// Upserts every planet, then every character, by name.
///
/// # Errors
///
/// `Validation` if a character names a homeworld that is neither in the
/// dataset nor already stored, or if any field is invalid. Nothing is
/// written when an error is returned.
pub fn load_reference_data(
    conn: &Connection,
    data: &ReferenceData,
) -> Result<SeedReport, ModelError> {
    let tx = immediate_transaction(conn)?;
    let mut report = SeedReport::default();

    for planet in &data.planets {
        match find_planet_by_name(&tx, &planet.name)? {
            Some(existing) => {
                update_planet(&tx, existing.id, &UpdatePlanet::from(planet.clone()))?;
                report.planets_updated += 1;
            }
            None => {
                create_planet(&tx, planet)?;
                report.planets_inserted += 1;
            }
        }
    }

    for character in &data.characters {
        let homeworld_id = match &character.homeworld {
            Some(name) => match find_planet_by_name(&tx, name)? {
                Some(planet) => Some(planet.id),
                None => {
                    return Err(ModelError::invalid(
                        "homeworld",
                        format!("{} names unknown planet '{name}'", character.name),
                    ))
                }
            },
            None => None,
        };

        let new = NewCharacter {
            name: character.name.clone(),
            height: character.height.clone(),
            mass: character.mass.clone(),
            hair_color: character.hair_color.clone(),
            skin_color: character.skin_color.clone(),
            eye_color: character.eye_color.clone(),
            birth_year: character.birth_year.clone(),
            gender: character.gender.clone(),
            homeworld_id,
            description: character.description.clone(),
        };

        match find_character_by_name(&tx, &new.name)? {
            Some(existing) => {
                new.validate()?;
                let updates = UpdateCharacter {
                    name: None,
                    height: new.height,
                    mass: new.mass,
                    hair_color: new.hair_color,
                    skin_color: new.skin_color,
                    eye_color: new.eye_color,
                    birth_year: new.birth_year,
                    gender: new.gender,
                    homeworld_id: character.homeworld.as_ref().map(|_| homeworld_id),
                    description: new.description,
                };
                update_character(&tx, existing.id, &updates)?;
                report.characters_updated += 1;
            }
            None => {
                create_character(&tx, &new)?;
                report.characters_inserted += 1;
            }
        }
    }

    tx.commit()?;
    Ok(report)
}

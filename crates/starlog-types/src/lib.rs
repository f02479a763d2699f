//! Shared types and constants for the Starlog workspace.
//!
//! This crate provides the foundational types used across all Starlog
//! crates: the kinds of thing a user can favorite, the [`Record`]
//! serialization contract every persisted model implements, and the column
//! length limits the schema declares.
//!
//! It depends only on `serde` and `serde_json`, so the database, model, and
//! server crates can all share it.

use serde::{Deserialize, Serialize};

mod limits;
mod record;

pub use limits::{
    ATTRIBUTE_MAX_LEN, EMAIL_MAX_LEN, NAME_MAX_LEN, PERSON_NAME_MAX_LEN, PASSWORD_MAX_LEN,
    USERNAME_MAX_LEN,
};
pub use record::Record;

/// The kinds of reference entity a user can favorite.
///
/// Each kind has its own join table (`favorite_planet`,
/// `favorite_character`) and its own URL segment in the HTTP surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteKind {
    /// A planet from the reference dataset.
    Planet,
    /// A character from the reference dataset.
    Character,
}

impl FavoriteKind {
    /// Every kind, in URL listing order.
    pub const ALL: [FavoriteKind; 2] = [Self::Planet, Self::Character];

    /// Returns the singular label for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planet => "planet",
            Self::Character => "character",
        }
    }

    /// Returns the plural form used in URL paths (`planets`, `characters`).
    pub fn plural(self) -> &'static str {
        match self {
            Self::Planet => "planets",
            Self::Character => "characters",
        }
    }

    /// Returns the join table holding favorites of this kind.
    pub fn join_table(self) -> &'static str {
        match self {
            Self::Planet => "favorite_planet",
            Self::Character => "favorite_character",
        }
    }
}

impl std::fmt::Display for FavoriteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FavoriteKind {
    type Err = ParseFavoriteKindError;

    /// Accepts either the singular or the plural form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planet" | "planets" => Ok(Self::Planet),
            "character" | "characters" => Ok(Self::Character),
            _ => Err(ParseFavoriteKindError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown favorite kind string.
#[derive(Debug, Clone)]
pub struct ParseFavoriteKindError(pub String);

impl std::fmt::Display for ParseFavoriteKindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown favorite kind: {}", self.0)
    }
}

impl std::error::Error for ParseFavoriteKindError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn favorite_kind_parses_singular_and_plural() {
        assert_eq!("planet".parse::<FavoriteKind>().ok(), Some(FavoriteKind::Planet));
        assert_eq!("planets".parse::<FavoriteKind>().ok(), Some(FavoriteKind::Planet));
        assert_eq!(
            "character".parse::<FavoriteKind>().ok(),
            Some(FavoriteKind::Character)
        );
        assert_eq!(
            "characters".parse::<FavoriteKind>().ok(),
            Some(FavoriteKind::Character)
        );
    }

    #[test]
    fn favorite_kind_rejects_unknown() {
        let err = "starships".parse::<FavoriteKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown favorite kind: starships");
        assert!("Planet".parse::<FavoriteKind>().is_err());
    }

    #[test]
    fn favorite_kind_labels() {
        assert_eq!(FavoriteKind::Planet.as_str(), "planet");
        assert_eq!(FavoriteKind::Character.plural(), "characters");
        assert_eq!(FavoriteKind::Planet.join_table(), "favorite_planet");
        assert_eq!(FavoriteKind::Character.join_table(), "favorite_character");
        assert_eq!(
            serde_json::to_string(&FavoriteKind::Character).unwrap(),
            "\"character\""
        );
    }

    #[test]
    fn plural_forms_parse_back() {
        for kind in FavoriteKind::ALL {
            assert_eq!(kind.plural().parse::<FavoriteKind>().ok(), Some(kind));
        }
    }
}

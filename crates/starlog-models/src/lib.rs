//! Record types and persistence operations for Starlog.
//!
//! Five record types live in the schema created by `starlog-db`:
//!
//! | Record | Table | Notes |
//! |--------|-------|-------|
//! | [`User`] | `user` | unique email and username, Argon2 password hash |
//! | [`Planet`] | `planet` | unique name |
//! | [`Character`] | `character` | unique name, optional homeworld planet |
//! | [`FavoritePlanet`] | `favorite_planet` | user × planet |
//! | [`FavoriteCharacter`] | `favorite_character` | user × character |
//!
//! Every operation takes a plain `&rusqlite::Connection`, so callers can pass
//! a pooled connection or a transaction. Uniqueness, foreign keys and
//! cascades are enforced by the schema; this crate validates field widths up
//! front and turns constraint failures into [`ModelError`] variants.
//!
//! Every record implements [`starlog_types::Record`], whose `to_map`
//! produces the plain key/value form used for transport.

mod character;
mod error;
mod favorite;
mod planet;
pub mod seed;
mod sql;
mod user;

pub use character::{
    character_exists, create_character, delete_character, get_character, get_character_by_name,
    list_characters, update_character, Character, NewCharacter, UpdateCharacter,
};
pub use error::ModelError;
pub use favorite::{
    add_favorite, add_favorite_character, add_favorite_planet, is_favorite,
    list_character_favorited_by, list_favorite_characters, list_favorite_planets,
    list_favorites, list_planet_favorited_by, remove_favorite, remove_favorite_character,
    remove_favorite_planet, toggle_favorite, toggle_favorite_character, toggle_favorite_planet,
    Favorite, FavoriteCharacter, FavoritePlanet, Toggle, UserFavorites,
};
pub use planet::{
    create_planet, delete_planet, get_planet, get_planet_by_name, list_native_characters,
    list_planets, planet_exists, update_planet, NewPlanet, Planet, UpdatePlanet,
};
pub use user::{
    authenticate, create_user, delete_user, get_user, get_user_by_email, get_user_by_username,
    hash_password, list_users, set_user_active, update_user, verify_password, NewUser,
    UpdateUser, User,
};

/// Opens an in-memory database with foreign keys on and migrations applied.
#[cfg(test)]
pub(crate) fn test_db() -> rusqlite::Connection {
    let conn = rusqlite::Connection::open_in_memory().expect("should open in-memory db");
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .expect("should enable foreign keys");
    starlog_db::run_migrations(&conn).expect("migrations should succeed");
    conn
}

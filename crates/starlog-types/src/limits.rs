//! Column length limits.
//!
//! SQLite does not enforce `VARCHAR(n)` widths, so the model layer checks
//! these before writing.

/// Maximum length of a user's email address.
pub const EMAIL_MAX_LEN: usize = 120;

/// Maximum length of a stored password hash.
pub const PASSWORD_MAX_LEN: usize = 200;

/// Maximum length of a username.
pub const USERNAME_MAX_LEN: usize = 80;

/// Maximum length of a user's first or last name.
pub const PERSON_NAME_MAX_LEN: usize = 100;

/// Maximum length of a planet or character name.
pub const NAME_MAX_LEN: usize = 100;

/// Maximum length of a descriptive planet or character attribute
/// (climate, terrain, height, eye color, ...).
pub const ATTRIBUTE_MAX_LEN: usize = 100;

//! Query helpers shared by the record modules.

use rusqlite::types::ToSql;
use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior};

use crate::error::ModelError;

/// Translates a failed write into a domain error.
///
/// Constraint failures are classified by SQLite's extended result code:
/// `UNIQUE` becomes [`ModelError::Conflict`], `FOREIGN KEY` becomes
/// [`ModelError::NotFound`], `CHECK` becomes [`ModelError::Validation`].
/// Anything else stays a database error.
pub(crate) fn write_error(entity: &'static str, err: rusqlite::Error) -> ModelError {
    let rusqlite::Error::SqliteFailure(failure, message) = &err else {
        return ModelError::Database(err);
    };
    if failure.code != ErrorCode::ConstraintViolation {
        return ModelError::Database(err);
    }

    let detail = message
        .clone()
        .unwrap_or_else(|| "constraint failed".to_string());
    match failure.extended_code {
        rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
            ModelError::Conflict(format!("{entity} already exists ({detail})"))
        }
        rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
            ModelError::not_found("referenced row", detail)
        }
        rusqlite::ffi::SQLITE_CONSTRAINT_CHECK | rusqlite::ffi::SQLITE_CONSTRAINT_NOTNULL => {
            ModelError::invalid("column", detail)
        }
        _ => ModelError::Database(err),
    }
}

/// Opens an `IMMEDIATE` transaction on a shared connection.
///
/// Read-then-write sequences take the write lock up front. A deferred
/// transaction that reads first cannot upgrade while another connection
/// writes, and fails with `SQLITE_BUSY` without honoring the busy timeout.
pub(crate) fn immediate_transaction(conn: &Connection) -> rusqlite::Result<Transaction<'_>> {
    Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
}

/// Checks a required text column against its declared width.
pub(crate) fn check_required(
    field: &'static str,
    value: &str,
    max_len: usize,
) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::invalid(field, "must not be empty"));
    }
    check_len(field, value, max_len)
}

/// Checks an optional text column against its declared width.
pub(crate) fn check_optional(
    field: &'static str,
    value: Option<&str>,
    max_len: usize,
) -> Result<(), ModelError> {
    match value {
        Some(v) => check_len(field, v, max_len),
        None => Ok(()),
    }
}

fn check_len(field: &'static str, value: &str, max_len: usize) -> Result<(), ModelError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(ModelError::invalid(
            field,
            format!("must be at most {max_len} characters, got {len}"),
        ));
    }
    Ok(())
}

/// Accumulates `column = ?n` assignments for a partial `UPDATE`.
///
/// Only supplied fields are written, in one statement, so concurrent
/// updates to different columns never overwrite each other.
#[derive(Default)]
pub(crate) struct Assignments {
    columns: Vec<&'static str>,
    values: Vec<Box<dyn ToSql>>,
}

impl Assignments {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set<T: ToSql + 'static>(&mut self, column: &'static str, value: T) {
        self.columns.push(column);
        self.values.push(Box::new(value));
    }

    pub(crate) fn set_opt<T: ToSql + 'static>(&mut self, column: &'static str, value: Option<T>) {
        if let Some(v) = value {
            self.set(column, v);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Runs `UPDATE {table} SET ... WHERE id = ?` and returns the number of
    /// rows touched.
    pub(crate) fn execute(
        mut self,
        conn: &Connection,
        table: &str,
        id: i64,
    ) -> rusqlite::Result<usize> {
        let set_clause = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{column} = ?{}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {table} SET {set_clause} WHERE id = ?{}",
            self.columns.len() + 1
        );
        self.values.push(Box::new(id));

        let params: Vec<&dyn ToSql> = self.values.iter().map(|v| v.as_ref()).collect();
        conn.execute(&sql, params.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_db() -> Connection {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        conn.execute_batch(
            "CREATE TABLE scratch (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                note TEXT,
                size INTEGER CHECK (size < 10)
            );
            INSERT INTO scratch (id, name, note, size) VALUES (1, 'a', 'x', 1);
            INSERT INTO scratch (id, name, note, size) VALUES (2, 'b', NULL, 2);",
        )
        .expect("should create scratch table");
        conn
    }

    #[test]
    fn assignments_update_only_supplied_columns() {
        let conn = scratch_db();
        let mut set = Assignments::new();
        set.set_opt::<String>("name", None);
        set.set("note", "y".to_string());
        set.set("size", 5_i64);
        assert!(!set.is_empty());
        assert_eq!(set.execute(&conn, "scratch", 1).expect("update should run"), 1);

        let row: (String, String, i64) = conn
            .query_row("SELECT name, note, size FROM scratch WHERE id = 1", [], |r| {
                Ok((r.get(0)?, r.get(1)?, r.get(2)?))
            })
            .expect("should read scratch");
        assert_eq!(row, ("a".to_string(), "y".to_string(), 5));
    }

    #[test]
    fn assignments_report_missing_row() {
        let conn = scratch_db();
        let mut set = Assignments::new();
        set.set("note", "z".to_string());
        assert_eq!(set.execute(&conn, "scratch", 99).expect("update should run"), 0);
    }

    #[test]
    fn write_error_classifies_constraints() {
        let conn = scratch_db();

        let dup = conn
            .execute("INSERT INTO scratch (name) VALUES ('a')", [])
            .expect_err("duplicate name should fail");
        assert!(matches!(write_error("scratch", dup), ModelError::Conflict(_)));

        let check = conn
            .execute("INSERT INTO scratch (name, size) VALUES ('c', 50)", [])
            .expect_err("check should fail");
        assert!(matches!(
            write_error("scratch", check),
            ModelError::Validation { .. }
        ));

        let syntax = conn
            .execute("INSERT INTO nowhere VALUES (1)", [])
            .expect_err("missing table should fail");
        assert!(matches!(write_error("scratch", syntax), ModelError::Database(_)));
    }

    #[test]
    fn length_checks() {
        assert!(check_required("name", "Tatooine", 100).is_ok());
        assert!(check_required("name", "   ", 100).is_err());
        assert!(check_required("name", &"x".repeat(101), 100).is_err());
        assert!(check_optional("climate", None, 100).is_ok());
        assert!(check_optional("climate", Some(&"é".repeat(100)), 100).is_ok());
        assert!(check_optional("climate", Some(&"é".repeat(101)), 100).is_err());
    }
}

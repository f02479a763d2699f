//! Plain key/value serialization for persisted records.

use serde::ser::Error as _;
use serde::Serialize;
use serde_json::{Map, Value};

/// A row type that can be flattened into a plain key/value mapping for
/// transport.
///
/// The mapping is whatever the type's `serde::Serialize` impl produces, so
/// field names and omissions (e.g. password hashes) are controlled with
/// ordinary serde attributes on the struct.
pub trait Record: Serialize {
    /// Name of the table the record is stored in.
    const TABLE: &'static str;

    /// Converts the record into a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if the serde impl fails or does not produce an
    /// object.
    fn to_map(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(serde_json::Error::custom(format!(
                "{} record serialized to a non-object value: {other}",
                Self::TABLE
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        id: i64,
        label: Option<String>,
        #[serde(skip_serializing)]
        secret: String,
    }

    impl Record for Sample {
        const TABLE: &'static str = "sample";
    }

    #[derive(Serialize)]
    struct Bare(i64);

    impl Record for Bare {
        const TABLE: &'static str = "bare";
    }

    #[test]
    fn serialize_produces_object_with_nulls_and_skips() {
        let sample = Sample {
            id: 7,
            label: None,
            secret: "hunter2".to_string(),
        };
        let map = sample.to_map().expect("sample should serialize");
        assert_eq!(map.get("id"), Some(&Value::from(7)));
        assert_eq!(map.get("label"), Some(&Value::Null));
        assert!(!map.contains_key("secret"));
        assert_eq!(sample.secret, "hunter2");
    }

    #[test]
    fn serialize_rejects_non_object() {
        let err = Bare(3).to_map().expect_err("newtype should not be an object");
        assert!(err.to_string().contains("bare record"));
    }
}

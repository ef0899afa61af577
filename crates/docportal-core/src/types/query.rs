//! Query-string helpers.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, de};

/// Deserialize an optional query parameter, treating an empty value as absent.
///
/// HTML forms submit `?folder_id=` for an unset select, which must mean
/// "not given" rather than a parse failure. Use with `#[serde(default)]`.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "empty_as_none")]
        page: Option<i64>,
    }

    fn parse(json: &str) -> Result<Params, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_missing_and_empty_are_none() {
        assert_eq!(parse("{}").unwrap().page, None);
        assert_eq!(parse(r#"{"page": ""}"#).unwrap().page, None);
        assert_eq!(parse(r#"{"page": "  "}"#).unwrap().page, None);
    }

    #[test]
    fn test_value_is_parsed() {
        assert_eq!(parse(r#"{"page": "3"}"#).unwrap().page, Some(3));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse(r#"{"page": "three"}"#).is_err());
    }
}

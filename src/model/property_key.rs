// src/model/property_key.rs

//! Decomposition of compound property names.
//!
//! Several sources encode a parameter in the property name itself:
//!
//! | Source     | Example          | Field       | Parameter        |
//! |------------|------------------|-------------|------------------|
//! | embeddings | `"embedding 3"`  | `embedding` | vector index `3` |
//! | optical    | `"R_400.0"`      | `R`         | wavelength (nm)  |
//! | transport  | `"sigma_p"`      | `sigma`     | carrier `p`      |
//! | Deml       | `"valence_s"`    | `valence`   | shell `s`        |
//!
//! The parameter is always the text after the *last* delimiter, so field names
//! may contain the delimiter themselves.

use crate::error::{DataError, DataResult};

/// Delimiter used by embedding keys (`"embedding 3"`).
pub const SPACE: char = ' ';
/// Delimiter used by optical, transport and Deml keys (`"R_400.0"`).
pub const UNDERSCORE: char = '_';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyKey<'a> {
  name: &'a str,
  field: &'a str,
  parameter: &'a str,
}

impl<'a> PropertyKey<'a> {
  /// Splits `name` at the last `delimiter`. Fails when either side is empty.
  pub fn parse(name: &'a str, delimiter: char) -> DataResult<Self> {
    match name.rsplit_once(delimiter) {
      Some((field, parameter)) if !field.is_empty() && !parameter.is_empty() => Ok(Self {
        name,
        field,
        parameter,
      }),
      _ => Err(DataError::InvalidKey(name.to_string())),
    }
  }

  pub fn name(&self) -> &'a str {
    self.name
  }

  pub fn field(&self) -> &'a str {
    self.field
  }

  pub fn parameter(&self) -> &'a str {
    self.parameter
  }

  /// Parameter as a (possibly negative) vector index. Range checking is left to
  /// the table, which knows its length and index base.
  pub fn index(&self) -> DataResult<i64> {
    self
      .parameter
      .parse()
      .map_err(|_| DataError::InvalidKey(self.name.to_string()))
  }

  /// Parameter as a physical value (wavelength, temperature, ...).
  pub fn value(&self) -> DataResult<f64> {
    match self.parameter.parse::<f64>() {
      Ok(v) if v.is_finite() => Ok(v),
      _ => Err(DataError::InvalidKey(self.name.to_string())),
    }
  }
}

/// Hashable form of a grid coordinate. Exact-match semantics: `400`, `400.0`
/// and `4e2` collapse to the same key, `400.5` does not.
pub fn grid_key(value: f64) -> u64 {
  // -0.0 and 0.0 must hash alike
  (value + 0.0).to_bits()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_split_embedding_key() {
    let key = PropertyKey::parse("embedding 3", SPACE).unwrap();
    assert_eq!(key.field(), "embedding");
    assert_eq!(key.index().unwrap(), 3);
  }

  #[test]
  fn test_split_uses_last_delimiter() {
    let key = PropertyKey::parse("some_field_400.0", UNDERSCORE).unwrap();
    assert_eq!(key.field(), "some_field");
    assert!((key.value().unwrap() - 400.0).abs() < 1e-12);
  }

  #[test]
  fn test_rejects_incomplete_keys() {
    for bad in ["embedding", "embedding ", " 3", ""] {
      assert!(
        matches!(PropertyKey::parse(bad, SPACE), Err(DataError::InvalidKey(_))),
        "{:?}",
        bad
      );
    }
    let key = PropertyKey::parse("R_abc", UNDERSCORE).unwrap();
    assert!(key.value().is_err());
    assert!(PropertyKey::parse("R_inf", UNDERSCORE).unwrap().value().is_err());
  }

  #[test]
  fn test_grid_key_exact_match() {
    assert_eq!(grid_key(400.0), grid_key("4e2".parse().unwrap()));
    assert_eq!(grid_key(0.0), grid_key(-0.0));
    assert_ne!(grid_key(400.0), grid_key(400.5));
  }
}

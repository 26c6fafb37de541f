// src/error.rs

use thiserror::Error;

/// Result type alias using `DataError`.
pub type DataResult<T> = std::result::Result<T, DataError>;

/// Errors raised by data-source construction and lookups.
///
/// A value that is known but scientifically undefined is never an error; it
/// comes back as `NaN`. Everything here means the query itself could not be
/// answered.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DataError {
  /// Element (or embedding key) not present in the source.
  #[error("unknown element '{element}' in {source_name}")]
  UnknownElement {
    element: String,
    source_name: &'static str,
  },

  /// Property not present in the source's schema, or not present on the
  /// element's record for open-schema sources.
  #[error("unknown property '{property}' for {element} in {source_name}")]
  UnknownProperty {
    element: String,
    property: String,
    source_name: &'static str,
  },

  /// Field exists but holds a list, map or string where a number was asked for.
  #[error("'{property}' of {element} is not a scalar")]
  NotScalar { element: String, property: String },

  /// No record for this exact (element, charge) combination.
  #[error("no '{property}' value for {element} at charge {charge:+}")]
  UnknownCharge {
    element: String,
    charge: i32,
    property: String,
  },

  /// Vector index outside the embedding length.
  #[error("index {index} out of range for '{property}' (valid {min}..={max})")]
  IndexOutOfRange {
    property: String,
    index: i64,
    min: usize,
    max: usize,
  },

  /// Property name that cannot be decomposed into field and parameter.
  #[error("malformed property key '{0}'")]
  InvalidKey(String),

  /// Charge outside the domain of a property (e.g. negative for ionization).
  #[error("'{property}' is undefined at charge {charge:+}")]
  InvalidCharge { property: String, charge: i32 },

  /// No bond valence record for the ion pair at any charge.
  #[error("no bond valence parameters for {cation}-{anion}")]
  NoBondValence { cation: String, anion: String },

  /// Malformed species identifier such as "Fe3+".
  #[error("invalid species '{0}'")]
  InvalidSpecie(String),

  /// Malformed packaged or override data file.
  #[error("failed to parse {file}: {reason}")]
  Parse { file: String, reason: String },

  #[error("IoError: {0}")]
  Io(#[from] std::io::Error),

  #[error("JsonError: {0}")]
  Json(#[from] serde_json::Error),
}

impl DataError {
  pub(crate) fn parse(file: &str, reason: impl Into<String>) -> Self {
    DataError::Parse {
      file: file.to_string(),
      reason: reason.into(),
    }
  }

  /// True for the "queried something the source does not know" family,
  /// malformed keys and out-of-range indexes included.
  pub fn is_unknown_key(&self) -> bool {
    matches!(
      self,
      DataError::UnknownElement { .. }
        | DataError::UnknownProperty { .. }
        | DataError::UnknownCharge { .. }
        | DataError::NoBondValence { .. }
        | DataError::InvalidKey(_)
        | DataError::IndexOutOfRange { .. }
    )
  }

  /// Narrower than `is_unknown_key`: only a vector index outside the table.
  pub fn is_range_error(&self) -> bool {
    matches!(self, DataError::IndexOutOfRange { .. })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_unknown_key_family() {
    let err = DataError::UnknownCharge {
      element: "V".into(),
      charge: 7,
      property: "xtal_field_split".into(),
    };
    assert!(err.is_unknown_key());
    assert_eq!(err.to_string(), "no 'xtal_field_split' value for V at charge +7");

    let err = DataError::IndexOutOfRange {
      property: "embedding 17".into(),
      index: 17,
      min: 1,
      max: 16,
    };
    assert!(err.is_unknown_key());
    assert!(err.is_range_error());

    let err = DataError::InvalidKey("sigma".into());
    assert!(err.is_unknown_key());
    assert!(!err.is_range_error());
    assert!(!DataError::parse("t", "bad").is_unknown_key());
  }
}

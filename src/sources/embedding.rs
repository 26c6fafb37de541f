// src/sources/embedding.rs

//! Learned element embeddings.
//!
//! Components are requested as `"embedding <i>"`. Both packaged sources number
//! components from 1, so `"embedding 1"` is the first entry of the vector.
//!
//! Coverage policy differs per source and is explicit:
//! - [`MatscholarElementData`]: no fallback. Elements outside the vocabulary
//!   are unknown-key errors.
//! - [`MegnetElementData`]: elements outside the training set resolve to the
//!   `"Dummy"` vector (the embedding of atomic number 0).

use nalgebra::DVector;
use std::collections::HashMap;

use super::ElementalProperty;
use crate::config::Config;
use crate::error::{DataError, DataResult};
use crate::io::{packaged, read_data_file};
use crate::model::property_key::{PropertyKey, SPACE};
use crate::model::{Element, DUMMY_SYMBOL};

const EMBEDDING_FIELD: &str = "embedding";

/// Fixed-length vectors keyed by element symbol (or `"Dummy"`).
#[derive(Debug, Clone)]
pub struct EmbeddingTable {
  source_name: &'static str,
  vectors: HashMap<String, DVector<f64>>,
  length: usize,
  index_base: usize,
}

impl EmbeddingTable {
  /// Fails unless every vector has the same, non-zero length.
  pub fn new(source_name: &'static str, file: &str, vectors: HashMap<String, Vec<f64>>, index_base: usize) -> DataResult<Self> {
    let length = vectors.values().map(Vec::len).next().unwrap_or(0);
    if length == 0 {
      return Err(DataError::parse(file, "no embedding vectors"));
    }
    if let Some((key, v)) = vectors.iter().find(|(_, v)| v.len() != length) {
      return Err(DataError::parse(
        file,
        format!("'{}' has {} components, expected {}", key, v.len(), length),
      ));
    }

    let vectors = vectors
      .into_iter()
      .map(|(k, v)| (k, DVector::from_vec(v)))
      .collect();

    Ok(Self {
      source_name,
      vectors,
      length,
      index_base,
    })
  }

  pub fn embedding_length(&self) -> usize {
    self.length
  }

  /// Index of the first component in `"embedding <i>"` keys (0 or 1).
  pub fn index_base(&self) -> usize {
    self.index_base
  }

  pub fn get(&self, key: &str) -> Option<&DVector<f64>> {
    self.vectors.get(key)
  }

  pub fn contains(&self, key: &str) -> bool {
    self.vectors.contains_key(key)
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.vectors.keys().map(String::as_str)
  }

  /// Resolves `"embedding <i>"` against the vector stored under `key`.
  pub fn component(&self, key: &str, property_name: &str) -> DataResult<f64> {
    let parsed = PropertyKey::parse(property_name, SPACE)?;
    if parsed.field() != EMBEDDING_FIELD {
      return Err(DataError::UnknownProperty {
        element: key.to_string(),
        property: property_name.to_string(),
        source_name: self.source_name,
      });
    }
    let index = parsed.index()?;

    let vector = self.get(key).ok_or_else(|| DataError::UnknownElement {
      element: key.to_string(),
      source_name: self.source_name,
    })?;

    let out_of_range = || DataError::IndexOutOfRange {
      property: property_name.to_string(),
      index,
      min: self.index_base,
      max: self.index_base + self.length - 1,
    };
    let offset = index
      .checked_sub(self.index_base as i64)
      .filter(|&o| o >= 0 && o < self.length as i64)
      .ok_or_else(out_of_range)?;
    Ok(vector[offset as usize])
  }
}

// ============================================================================
// MATSCHOLAR
// ============================================================================

/// 200-dimensional word embeddings trained on materials-science abstracts.
///
/// **Reference**: Tshitoyan et al., Nature 571, 95-98 (2019).
#[derive(Debug, Clone)]
pub struct MatscholarElementData {
  table: EmbeddingTable,
}

impl MatscholarElementData {
  const FILE: &'static str = "matscholar_embedding.json";

  pub fn new() -> DataResult<Self> {
    Self::with_config(&Config::default())
  }

  pub fn with_config(config: &Config) -> DataResult<Self> {
    let text = read_data_file(config, Self::FILE, packaged::MATSCHOLAR)?;
    let vectors: HashMap<String, Vec<f64>> = serde_json::from_str(&text)?;
    let table = EmbeddingTable::new("Matscholar", Self::FILE, vectors, 1)?;
    log::debug!(
      "Matscholar: {} embeddings of length {}",
      table.vectors.len(),
      table.embedding_length()
    );
    Ok(Self { table })
  }

  pub fn table(&self) -> &EmbeddingTable {
    &self.table
  }

  pub fn embedding(&self, key: &str) -> Option<&DVector<f64>> {
    self.table.get(key)
  }
}

impl ElementalProperty for MatscholarElementData {
  fn get_elemental_property(&self, elem: Element, property_name: &str) -> DataResult<f64> {
    self.table.component(elem.symbol(), property_name)
  }
}

// ============================================================================
// MEGNET
// ============================================================================

/// 16-dimensional element embeddings from a MEGNet formation-energy model.
///
/// The file is keyed by atomic number; key `"0"` is the placeholder species
/// and is exposed as `"Dummy"`.
///
/// **Reference**: Chen et al., Chem. Mater. 31, 3564-3572 (2019).
#[derive(Debug, Clone)]
pub struct MegnetElementData {
  table: EmbeddingTable,
}

impl MegnetElementData {
  const FILE: &'static str = "megnet_embedding.json";

  pub fn new() -> DataResult<Self> {
    Self::with_config(&Config::default())
  }

  pub fn with_config(config: &Config) -> DataResult<Self> {
    let text = read_data_file(config, Self::FILE, packaged::MEGNET)?;
    let by_number: HashMap<String, Vec<f64>> = serde_json::from_str(&text)?;

    let mut vectors = HashMap::new();
    for (number, vector) in by_number {
      let z: u8 = number
        .parse()
        .map_err(|_| DataError::parse(Self::FILE, format!("key '{}' is not an atomic number", number)))?;
      let key = if z == 0 {
        DUMMY_SYMBOL.to_string()
      } else {
        Element::from_z(z)
          .ok_or_else(|| DataError::parse(Self::FILE, format!("no element with Z = {}", z)))?
          .symbol()
          .to_string()
      };
      vectors.insert(key, vector);
    }

    let table = EmbeddingTable::new("MEGNet", Self::FILE, vectors, 1)?;
    if !table.contains(DUMMY_SYMBOL) {
      return Err(DataError::parse(Self::FILE, "missing Dummy embedding (key \"0\")"));
    }
    log::debug!(
      "MEGNet: {} embeddings of length {}",
      table.vectors.len(),
      table.embedding_length()
    );
    Ok(Self { table })
  }

  pub fn table(&self) -> &EmbeddingTable {
    &self.table
  }

  /// Full vector for `key`, which may be an element symbol or `"Dummy"`.
  /// No fallback is applied here.
  pub fn embedding(&self, key: &str) -> Option<&DVector<f64>> {
    self.table.get(key)
  }

  /// Key actually used for `elem`: its symbol when trained, `"Dummy"` otherwise.
  pub fn resolve_key(&self, elem: Element) -> &'static str {
    if self.table.contains(elem.symbol()) {
      elem.symbol()
    } else {
      DUMMY_SYMBOL
    }
  }
}

impl ElementalProperty for MegnetElementData {
  fn get_elemental_property(&self, elem: Element, property_name: &str) -> DataResult<f64> {
    self.table.component(self.resolve_key(elem), property_name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn el(symbol: &str) -> Element {
    symbol.parse().unwrap()
  }

  #[test]
  fn test_matscholar_property() {
    let ms = MatscholarElementData::new().unwrap();
    let cu = ms.get_elemental_property(el("Cu"), "embedding 3").unwrap();
    assert!((cu - 0.028666902333498).abs() < 1e-12);
    assert_eq!(ms.table().embedding_length(), 200);
    assert_eq!(ms.embedding("Cu").unwrap()[2], cu);
  }

  #[test]
  fn test_matscholar_has_no_fallback() {
    let ms = MatscholarElementData::new().unwrap();
    let err = ms.get_elemental_property(el("Db"), "embedding 9").unwrap_err();
    assert!(err.is_unknown_key());
    assert!(ms.embedding(DUMMY_SYMBOL).is_none());
  }

  #[test]
  fn test_megnet_property_and_dummy() {
    let megnet = MegnetElementData::new().unwrap();
    let cu = megnet.get_elemental_property(el("Cu"), "embedding 1").unwrap();
    assert!((cu - 0.18259364366531372).abs() < 1e-12);

    // trained on Z = 1..=94; Md falls back to the Dummy vector
    let md = megnet.get_elemental_property(el("Md"), "embedding 1").unwrap();
    assert!((md - -0.044910576194524765).abs() < 1e-12);
    let dummy = megnet.embedding(DUMMY_SYMBOL).unwrap();
    assert!((dummy[0] - -0.044910576194524765).abs() < 1e-12);
    assert_eq!(megnet.resolve_key(el("Md")), DUMMY_SYMBOL);
    assert_eq!(megnet.resolve_key(el("Pu")), "Pu");
  }

  #[test]
  fn test_fallback_matches_dummy_for_every_component() {
    let megnet = MegnetElementData::new().unwrap();
    let dummy = megnet.embedding(DUMMY_SYMBOL).unwrap();
    for i in 1..=megnet.table().embedding_length() {
      let v = megnet
        .get_elemental_property(el("Og"), &format!("embedding {}", i))
        .unwrap();
      assert_eq!(v, dummy[i - 1]);
    }
  }

  #[test]
  fn test_index_range() {
    let megnet = MegnetElementData::new().unwrap();
    assert_eq!(megnet.table().embedding_length(), 16);
    assert!(megnet.get_elemental_property(el("Cu"), "embedding 16").is_ok());
    for bad in [
      "embedding 0",
      "embedding 17",
      "embedding -1",
      "embedding -9223372036854775808",
      "embedding 9223372036854775807",
    ] {
      let err = megnet.get_elemental_property(el("Cu"), bad).unwrap_err();
      assert!(err.is_range_error(), "{}: {}", bad, err);
    }
    let err = megnet.get_elemental_property(el("Cu"), "embedding x").unwrap_err();
    assert!(matches!(err, DataError::InvalidKey(_)));
    assert!(err.is_unknown_key());
    assert!(megnet
      .get_elemental_property(el("Cu"), "weights 1")
      .unwrap_err()
      .is_unknown_key());
  }

  #[test]
  fn test_table_rejects_ragged_vectors() {
    let mut vectors = HashMap::new();
    vectors.insert("H".to_string(), vec![0.1, 0.2]);
    vectors.insert("He".to_string(), vec![0.3]);
    assert!(EmbeddingTable::new("test", "test.json", vectors, 0).is_err());
    assert!(EmbeddingTable::new("test", "test.json", HashMap::new(), 0).is_err());
  }

  #[test]
  fn test_zero_based_table() {
    let mut vectors = HashMap::new();
    vectors.insert("H".to_string(), vec![0.1, 0.2]);
    let table = EmbeddingTable::new("test", "test.json", vectors, 0).unwrap();
    assert_eq!(table.component("H", "embedding 0").unwrap(), 0.1);
    assert!(table.component("H", "embedding 2").unwrap_err().is_range_error());
  }
}

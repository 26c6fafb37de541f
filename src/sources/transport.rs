// src/sources/transport.rs

//! Computed electronic transport of elemental solids.
//!
//! Column headers are compound keys `"<quantity>_<carrier>"`, with carrier
//! `n` (electrons) or `p` (holes): `m_n`, `sigma_p`, `kappa_n`, `S_p`, `PF_n`...

use std::collections::{BTreeSet, HashMap};

use super::ElementalProperty;
use crate::config::Config;
use crate::error::{DataError, DataResult};
use crate::io::table::{parse_cell, parse_delimited};
use crate::io::{packaged, read_data_file};
use crate::model::property_key::{PropertyKey, UNDERSCORE};
use crate::model::Element;

const SOURCE: &str = "transport";
const FILE: &str = "transport_data.tsv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Carrier {
  N,
  P,
}

impl Carrier {
  fn parse(s: &str) -> Option<Self> {
    match s {
      "n" => Some(Self::N),
      "p" => Some(Self::P),
      _ => None,
    }
  }
}

#[derive(Debug, Clone)]
pub struct TransportData {
  /// (quantity, carrier) -> element -> value
  values: HashMap<(String, Carrier), HashMap<String, f64>>,
}

impl TransportData {
  pub fn new() -> DataResult<Self> {
    Self::with_config(&Config::default())
  }

  pub fn with_config(config: &Config) -> DataResult<Self> {
    let text = read_data_file(config, FILE, packaged::TRANSPORT)?;
    Self::from_tsv(&text)
  }

  /// Wide format: `element` column plus one column per quantity/carrier pair.
  pub fn from_tsv(text: &str) -> DataResult<Self> {
    let table = parse_delimited(FILE, text)?;
    let c_el = table
      .column("element")
      .ok_or_else(|| DataError::parse(FILE, "missing column 'element'"))?;

    let mut columns = Vec::new();
    for (idx, header) in table.headers.iter().enumerate() {
      if idx == c_el {
        continue;
      }
      let key = PropertyKey::parse(header, UNDERSCORE)
        .map_err(|_| DataError::parse(FILE, format!("column '{}' is not <quantity>_<carrier>", header)))?;
      let carrier = Carrier::parse(key.parameter())
        .ok_or_else(|| DataError::parse(FILE, format!("column '{}' has no n/p carrier", header)))?;
      columns.push((idx, key.field().to_string(), carrier));
    }

    let mut values: HashMap<(String, Carrier), HashMap<String, f64>> = HashMap::new();
    for row in &table.rows {
      for (idx, quantity, carrier) in &columns {
        values
          .entry((quantity.clone(), *carrier))
          .or_default()
          .insert(row[c_el].clone(), parse_cell(FILE, &row[*idx])?);
      }
    }

    log::debug!("{}: {} rows, {} columns", SOURCE, table.rows.len(), columns.len());
    Ok(Self { values })
  }

  /// Quantities available for both carriers, e.g. `["PF", "S", "kappa", ...]`.
  pub fn quantities(&self) -> Vec<&str> {
    let set: BTreeSet<&str> = self.values.keys().map(|(q, _)| q.as_str()).collect();
    set.into_iter().collect()
  }
}

impl ElementalProperty for TransportData {
  fn get_elemental_property(&self, elem: Element, property_name: &str) -> DataResult<f64> {
    let unknown = || DataError::UnknownProperty {
      element: elem.symbol().to_string(),
      property: property_name.to_string(),
      source_name: SOURCE,
    };

    let key = PropertyKey::parse(property_name, UNDERSCORE)?;
    let carrier = Carrier::parse(key.parameter()).ok_or_else(unknown)?;
    let column = self
      .values
      .get(&(key.field().to_string(), carrier))
      .ok_or_else(unknown)?;

    column
      .get(elem.symbol())
      .copied()
      .ok_or_else(|| DataError::UnknownElement {
        element: elem.symbol().to_string(),
        source_name: SOURCE,
      })
  }
}

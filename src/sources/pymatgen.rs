// src/sources/pymatgen.rs

//! Lookups on a periodic-table reference document.
//!
//! The reference is an open schema: each element is a JSON object and any
//! numeric field on it can be requested by name. Nothing here declares the
//! field set up front; a field that is absent on the element is an unknown key,
//! a field that is `null` is `NaN`.

use serde_json::{Map, Value};
use std::collections::HashMap;

use super::{ChargeDependentProperty, ElementalProperty, OxidationStates};
use crate::config::Config;
use crate::error::{DataError, DataResult};
use crate::io::{packaged, read_data_file};
use crate::model::Element;

const SOURCE: &str = "periodic table";
const FILE: &str = "periodic_table.json";

#[derive(Debug, Clone)]
pub struct PymatgenData {
  elements: HashMap<String, Map<String, Value>>,
  /// When true, `get_oxidation_states` returns only the common states.
  /// Changing it affects later calls only.
  pub use_common_oxi_states: bool,
}

impl PymatgenData {
  pub fn new() -> DataResult<Self> {
    Self::with_config(&Config::default())
  }

  pub fn with_config(config: &Config) -> DataResult<Self> {
    let text = read_data_file(config, FILE, packaged::PERIODIC_TABLE)?;
    let mut data = Self::from_json(&text)?;
    data.use_common_oxi_states = config.use_common_oxi_states;
    Ok(data)
  }

  pub fn from_json(text: &str) -> DataResult<Self> {
    let elements: HashMap<String, Map<String, Value>> = serde_json::from_str(text)?;
    log::debug!("{}: {} element records loaded", SOURCE, elements.len());
    Ok(Self {
      elements,
      use_common_oxi_states: true,
    })
  }

  /// Raw field value, for fields that are not scalars (names, lists, maps).
  pub fn get_field(&self, elem: Element, field: &str) -> DataResult<&Value> {
    self.record(elem)?.get(field).ok_or_else(|| DataError::UnknownProperty {
      element: elem.symbol().to_string(),
      property: field.to_string(),
      source_name: SOURCE,
    })
  }

  fn record(&self, elem: Element) -> DataResult<&Map<String, Value>> {
    self
      .elements
      .get(elem.symbol())
      .ok_or_else(|| DataError::UnknownElement {
        element: elem.symbol().to_string(),
        source_name: SOURCE,
      })
  }
}

fn as_scalar(value: &Value, elem: Element, property: &str) -> DataResult<f64> {
  match value {
    Value::Null => Ok(f64::NAN),
    Value::Number(n) => n.as_f64().ok_or_else(|| not_scalar(elem, property)),
    _ => Err(not_scalar(elem, property)),
  }
}

fn not_scalar(elem: Element, property: &str) -> DataError {
  DataError::NotScalar {
    element: elem.symbol().to_string(),
    property: property.to_string(),
  }
}

impl ElementalProperty for PymatgenData {
  fn get_elemental_property(&self, elem: Element, property_name: &str) -> DataResult<f64> {
    let value = self.get_field(elem, property_name)?;
    as_scalar(value, elem, property_name)
  }
}

impl OxidationStates for PymatgenData {
  fn get_oxidation_states(&self, elem: Element) -> DataResult<Vec<i32>> {
    let field = if self.use_common_oxi_states {
      "common_oxidation_states"
    } else {
      "oxidation_states"
    };
    let mut states: Vec<i32> = match self.get_field(elem, field)? {
      Value::Null => Vec::new(),
      value => serde_json::from_value(value.clone()).map_err(|_| not_scalar(elem, field))?,
    };
    states.sort_unstable();
    Ok(states)
  }
}

impl ChargeDependentProperty for PymatgenData {
  /// Reads a charge-keyed field, e.g. `ionic_radii` = `{"3": 1.26}`.
  fn get_charge_dependent_property(&self, elem: Element, charge: i32, property_name: &str) -> DataResult<f64> {
    let Value::Object(by_charge) = self.get_field(elem, property_name)? else {
      return Err(not_scalar(elem, property_name));
    };
    let value = by_charge
      .get(&charge.to_string())
      .ok_or_else(|| DataError::UnknownCharge {
        element: elem.symbol().to_string(),
        charge,
        property: property_name.to_string(),
      })?;
    as_scalar(value, elem, property_name)
  }
}

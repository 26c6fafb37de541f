// src/sources/deml.rs

//! Elemental and ionic data compiled by Deml et al.
//!
//! **Reference**: Deml, Stevanovic, et al., Phys. Rev. B 93, 085142 (2016),
//! "Predicting density functional theory total energies and enthalpies of
//! formation of metal-nonmetal compounds by linear regression".
//!
//! Energies are in J/mol (ionization, electron affinity) or eV/atom (FERE and
//! GGA+U chemical potentials).

use serde::Deserialize;
use std::collections::HashMap;

use super::{ChargeDependentProperty, ElementalProperty, OxidationStates};
use crate::config::Config;
use crate::error::{DataError, DataResult};
use crate::io::{packaged, read_data_file};
use crate::model::property_key::{PropertyKey, UNDERSCORE};
use crate::model::Element;

const SOURCE: &str = "Deml";
const FILE: &str = "deml_elementdata.json";

/// Properties whose file entries are keyed by charge rather than by element alone.
pub const CHARGE_DEPENDENT_PROPERTIES: [&str; 4] = ["xtal_field_split", "magn_moment", "so_coupling", "sat_magn"];

/// Valence electron counts derived from the element's column.
const VALENCE_PROPERTIES: [&str; 4] = ["valence", "valence_s", "valence_p", "valence_d"];

/// How a charge-dependent property relates to its charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeSemantics {
  /// Value recorded for the ion at that charge.
  Absolute,
  /// Sum over every step from the neutral atom up to the charge.
  Cumulative,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct ValenceShells {
  s: f64,
  p: f64,
  d: f64,
}

#[derive(Deserialize)]
struct DemlFile {
  ionization_en: HashMap<String, Vec<f64>>,
  charge_states: HashMap<String, Vec<i32>>,
  col_num: HashMap<String, u8>,
  valence_e: HashMap<String, ValenceShells>,
  #[serde(flatten)]
  rest: HashMap<String, HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone)]
pub struct DemlData {
  /// property -> element -> value
  scalar: HashMap<String, HashMap<String, f64>>,
  /// property -> element -> charge -> value
  by_charge: HashMap<String, HashMap<String, HashMap<i32, f64>>>,
  ionization_en: HashMap<String, Vec<f64>>,
  charge_states: HashMap<String, Vec<i32>>,
  col_num: HashMap<String, u8>,
  valence_e: HashMap<String, ValenceShells>,
}

impl DemlData {
  pub fn new() -> DataResult<Self> {
    Self::with_config(&Config::default())
  }

  pub fn with_config(config: &Config) -> DataResult<Self> {
    let text = read_data_file(config, FILE, packaged::DEML)?;
    Self::from_json(&text)
  }

  pub fn from_json(text: &str) -> DataResult<Self> {
    let file: DemlFile = serde_json::from_str(text)?;

    let mut scalar = HashMap::new();
    let mut by_charge = HashMap::new();
    for (prop, entries) in file.rest {
      if CHARGE_DEPENDENT_PROPERTIES.contains(&prop.as_str()) {
        by_charge.insert(prop.clone(), charge_table(&prop, entries)?);
      } else {
        scalar.insert(prop.clone(), scalar_table(&prop, entries)?);
      }
    }

    // FERE correction: the shift from GGA+U total energy to the fitted
    // elemental reference energy.
    if let (Some(fere), Some(ggau)) = (scalar.get("mus_fere"), scalar.get("GGAU_Etot")) {
      let correction: HashMap<String, f64> = fere
        .iter()
        .filter_map(|(el, mu)| ggau.get(el).map(|e| (el.clone(), mu - e)))
        .collect();
      scalar.insert("FERE correction".to_string(), correction);
    }

    log::debug!(
      "{}: {} scalar and {} charge-dependent properties loaded",
      SOURCE,
      scalar.len(),
      by_charge.len()
    );

    Ok(Self {
      scalar,
      by_charge,
      ionization_en: file.ionization_en,
      charge_states: file.charge_states,
      col_num: file.col_num,
      valence_e: file.valence_e,
    })
  }

  /// Every property name accepted by `get_elemental_property`.
  pub fn available_props(&self) -> Vec<String> {
    let mut props: Vec<String> = self.scalar.keys().cloned().collect();
    props.extend(
      std::iter::once("first_ioniz")
        .chain(VALENCE_PROPERTIES)
        .map(str::to_string),
    );
    props.sort();
    props
  }

  pub fn charge_semantics(&self, property_name: &str) -> Option<ChargeSemantics> {
    if property_name == "total_ioniz" {
      Some(ChargeSemantics::Cumulative)
    } else if self.by_charge.contains_key(property_name) {
      Some(ChargeSemantics::Absolute)
    } else {
      None
    }
  }

  fn valence(&self, elem: Element, property_name: &str) -> DataResult<f64> {
    let shells = self
      .col_num
      .get(elem.symbol())
      .and_then(|col| self.valence_e.get(&col.to_string()))
      .ok_or_else(|| unknown_property(elem, property_name))?;

    if property_name == "valence" {
      return Ok(shells.s + shells.p + shells.d);
    }
    let key = PropertyKey::parse(property_name, UNDERSCORE)?;
    match key.parameter() {
      "s" => Ok(shells.s),
      "p" => Ok(shells.p),
      "d" => Ok(shells.d),
      _ => Err(unknown_property(elem, property_name)),
    }
  }

  fn ionization_steps(&self, elem: Element) -> DataResult<&[f64]> {
    self
      .ionization_en
      .get(elem.symbol())
      .map(Vec::as_slice)
      .ok_or_else(|| DataError::UnknownElement {
        element: elem.symbol().to_string(),
        source_name: SOURCE,
      })
  }

  fn total_ionization(&self, elem: Element, charge: i32) -> DataResult<f64> {
    if charge < 0 {
      return Err(DataError::InvalidCharge {
        property: "total_ioniz".into(),
        charge,
      });
    }
    let steps = self.ionization_steps(elem)?;
    let needed = charge as usize;
    if needed > steps.len() {
      return Err(DataError::UnknownCharge {
        element: elem.symbol().to_string(),
        charge,
        property: "total_ioniz".into(),
      });
    }
    Ok(steps[..needed].iter().sum())
  }
}

impl ElementalProperty for DemlData {
  /// Unknown property names are errors; a known property without an entry for
  /// this element is `NaN`.
  fn get_elemental_property(&self, elem: Element, property_name: &str) -> DataResult<f64> {
    if VALENCE_PROPERTIES.contains(&property_name) {
      return self.valence(elem, property_name);
    }
    if property_name == "first_ioniz" {
      let steps = self.ionization_steps(elem)?;
      return Ok(steps.first().copied().unwrap_or(f64::NAN));
    }

    let table = self
      .scalar
      .get(property_name)
      .ok_or_else(|| unknown_property(elem, property_name))?;
    Ok(table.get(elem.symbol()).copied().unwrap_or(f64::NAN))
  }
}

impl OxidationStates for DemlData {
  fn get_oxidation_states(&self, elem: Element) -> DataResult<Vec<i32>> {
    self
      .charge_states
      .get(elem.symbol())
      .cloned()
      .ok_or_else(|| DataError::UnknownElement {
        element: elem.symbol().to_string(),
        source_name: SOURCE,
      })
  }
}

impl ChargeDependentProperty for DemlData {
  /// `total_ioniz` is cumulative: the energy to strip `charge` electrons from
  /// the neutral atom. Everything else is the value recorded at that charge.
  fn get_charge_dependent_property(&self, elem: Element, charge: i32, property_name: &str) -> DataResult<f64> {
    match self.charge_semantics(property_name) {
      Some(ChargeSemantics::Cumulative) => self.total_ionization(elem, charge),
      Some(ChargeSemantics::Absolute) => self
        .by_charge
        .get(property_name)
        .and_then(|t| t.get(elem.symbol()))
        .and_then(|t| t.get(&charge))
        .copied()
        .ok_or_else(|| DataError::UnknownCharge {
          element: elem.symbol().to_string(),
          charge,
          property: property_name.to_string(),
        }),
      None => Err(unknown_property(elem, property_name)),
    }
  }
}

fn unknown_property(elem: Element, property_name: &str) -> DataError {
  DataError::UnknownProperty {
    element: elem.symbol().to_string(),
    property: property_name.to_string(),
    source_name: SOURCE,
  }
}

fn scalar_table(prop: &str, entries: HashMap<String, serde_json::Value>) -> DataResult<HashMap<String, f64>> {
  entries
    .into_iter()
    .map(|(el, v)| match v {
      serde_json::Value::Null => Ok((el, f64::NAN)),
      other => other
        .as_f64()
        .map(|x| (el.clone(), x))
        .ok_or_else(|| DataError::parse(FILE, format!("{}[{}] is not a number", prop, el))),
    })
    .collect()
}

fn charge_table(prop: &str, entries: HashMap<String, serde_json::Value>) -> DataResult<HashMap<String, HashMap<i32, f64>>> {
  let mut table = HashMap::new();
  for (el, v) in entries {
    let by_charge: HashMap<String, f64> =
      serde_json::from_value(v).map_err(|e| DataError::parse(FILE, format!("{}[{}]: {}", prop, el, e)))?;
    let mut parsed = HashMap::new();
    for (charge, value) in by_charge {
      let charge: i32 = charge
        .parse()
        .map_err(|_| DataError::parse(FILE, format!("{}[{}]: bad charge '{}'", prop, el, charge)))?;
      parsed.insert(charge, value);
    }
    table.insert(el, parsed);
  }
  Ok(table)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::Specie;

  fn el(symbol: &str) -> Element {
    symbol.parse().unwrap()
  }

  fn data() -> DemlData {
    DemlData::new().unwrap()
  }

  #[test]
  fn test_get_property() {
    let deml = data();
    let bi = deml.get_elemental_property(el("Bi"), "mus_fere").unwrap();
    assert!((bi - -4.3853).abs() < 1e-4);
    assert_eq!(deml.get_elemental_property(el("Li"), "electron_affin").unwrap(), 59600.0);
    assert_eq!(deml.get_elemental_property(el("He"), "first_ioniz").unwrap(), 2372300.0);
  }

  #[test]
  fn test_cumulative_ionization() {
    let deml = data();
    let he2 = Specie::new(el("He"), 2);
    let total = deml
      .get_charge_dependent_property_from_specie(&he2, "total_ioniz")
      .unwrap();
    assert!((total - (2372300.0 + 5250500.0)).abs() < 1e-6);

    let first = deml.get_charge_dependent_property(el("He"), 1, "total_ioniz").unwrap();
    assert_eq!(first, deml.get_elemental_property(el("He"), "first_ioniz").unwrap());
    assert_eq!(deml.get_charge_dependent_property(el("He"), 0, "total_ioniz").unwrap(), 0.0);
  }

  #[test]
  fn test_cumulative_needs_every_step() {
    let deml = data();
    let err = deml.get_charge_dependent_property(el("He"), 3, "total_ioniz").unwrap_err();
    assert!(err.is_unknown_key());
    let err = deml.get_charge_dependent_property(el("He"), -1, "total_ioniz").unwrap_err();
    assert!(matches!(err, DataError::InvalidCharge { .. }));
  }

  #[test]
  fn test_absolute_charge_property() {
    let deml = data();
    let v3 = Specie::new(el("V"), 3);
    let split = deml
      .get_charge_dependent_property_from_specie(&v3, "xtal_field_split")
      .unwrap();
    assert!((split - 18.6).abs() < 1e-9);

    let err = deml.get_charge_dependent_property(el("V"), 7, "xtal_field_split").unwrap_err();
    assert!(matches!(err, DataError::UnknownCharge { charge: 7, .. }));
    assert_eq!(deml.charge_semantics("xtal_field_split"), Some(ChargeSemantics::Absolute));
    assert_eq!(deml.charge_semantics("total_ioniz"), Some(ChargeSemantics::Cumulative));
  }

  #[test]
  fn test_get_oxidation() {
    let deml = data();
    assert_eq!(deml.get_oxidation_states(el("Li")).unwrap(), vec![1]);
    assert!(deml.get_oxidation_states(el("Og")).unwrap_err().is_unknown_key());
  }

  #[test]
  fn test_valence_and_derived() {
    let deml = data();
    // Fe sits in column 8: 4s2 3d6
    assert_eq!(deml.get_elemental_property(el("Fe"), "valence_s").unwrap(), 2.0);
    assert_eq!(deml.get_elemental_property(el("Fe"), "valence_d").unwrap(), 6.0);
    assert_eq!(deml.get_elemental_property(el("Fe"), "valence").unwrap(), 8.0);
    assert!(deml.get_elemental_property(el("Fe"), "valence_f").unwrap_err().is_unknown_key());
    let err = deml.get_elemental_property(el("Fe"), "valences").unwrap_err();
    assert!(matches!(err, DataError::UnknownProperty { .. }), "{}", err);

    let corr = deml.get_elemental_property(el("Li"), "FERE correction").unwrap();
    assert!((corr - (-1.65 - -1.9089)).abs() < 1e-9);
  }

  #[test]
  fn test_known_property_without_value_is_nan() {
    let deml = data();
    assert!(deml.get_elemental_property(el("He"), "mus_fere").unwrap().is_nan());
    assert!(deml.get_elemental_property(el("He"), "no_such_prop").unwrap_err().is_unknown_key());
    assert!(deml.available_props().contains(&"first_ioniz".to_string()));
  }
}

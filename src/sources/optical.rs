// src/sources/optical.rs

//! Optical constants of elemental solids on a fixed wavelength grid.
//!
//! Keys are `"<quantity>_<wavelength in nm>"`:
//! - `n`: refractive index
//! - `k`: extinction coefficient
//! - `R`: normal-incidence reflectance, derived at load time
//!
//! **Formula**: R = ((n - 1)² + k²) / ((n + 1)² + k²)
//!
//! The wavelength must be a grid point of the dataset; there is no
//! interpolation between grid points.

use std::collections::{BTreeSet, HashMap};

use super::ElementalProperty;
use crate::config::Config;
use crate::error::{DataError, DataResult};
use crate::io::table::{parse_cell, parse_delimited};
use crate::io::{packaged, read_data_file};
use crate::model::property_key::{grid_key, PropertyKey, UNDERSCORE};
use crate::model::Element;

const SOURCE: &str = "optical";
const FILE: &str = "optical_constants.tsv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpticalQuantity {
  N,
  K,
  R,
}

impl OpticalQuantity {
  fn from_field(field: &str) -> Option<Self> {
    match field {
      "n" => Some(Self::N),
      "k" => Some(Self::K),
      "R" => Some(Self::R),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy)]
struct OpticalPoint {
  n: f64,
  k: f64,
  r: f64,
}

impl OpticalPoint {
  fn new(n: f64, k: f64) -> Self {
    let r = ((n - 1.0).powi(2) + k * k) / ((n + 1.0).powi(2) + k * k);
    Self { n, k, r }
  }

  fn get(&self, quantity: OpticalQuantity) -> f64 {
    match quantity {
      OpticalQuantity::N => self.n,
      OpticalQuantity::K => self.k,
      OpticalQuantity::R => self.r,
    }
  }
}

#[derive(Debug, Clone)]
pub struct OpticalData {
  /// (element symbol, wavelength grid key) -> point
  points: HashMap<(String, u64), OpticalPoint>,
  wavelengths: Vec<f64>,
}

impl OpticalData {
  pub fn new() -> DataResult<Self> {
    Self::with_config(&Config::default())
  }

  pub fn with_config(config: &Config) -> DataResult<Self> {
    let text = read_data_file(config, FILE, packaged::OPTICAL)?;
    Self::from_tsv(&text)
  }

  /// Long format: `element wavelength n k`, one row per grid point.
  pub fn from_tsv(text: &str) -> DataResult<Self> {
    let table = parse_delimited(FILE, text)?;
    let col = |name: &str| {
      table
        .column(name)
        .ok_or_else(|| DataError::parse(FILE, format!("missing column '{}'", name)))
    };
    let (c_el, c_wl, c_n, c_k) = (col("element")?, col("wavelength")?, col("n")?, col("k")?);

    let mut points = HashMap::new();
    let mut grid = BTreeSet::new();
    for row in &table.rows {
      let wavelength = parse_cell(FILE, &row[c_wl])?;
      if !wavelength.is_finite() {
        return Err(DataError::parse(FILE, format!("bad wavelength for {}", row[c_el])));
      }
      let point = OpticalPoint::new(parse_cell(FILE, &row[c_n])?, parse_cell(FILE, &row[c_k])?);
      points.insert((row[c_el].clone(), grid_key(wavelength)), point);
      grid.insert(grid_key(wavelength));
    }

    let mut wavelengths: Vec<f64> = grid.into_iter().map(f64::from_bits).collect();
    wavelengths.sort_by(|a, b| a.total_cmp(b));

    log::debug!("{}: {} points on {} wavelengths", SOURCE, points.len(), wavelengths.len());
    Ok(Self { points, wavelengths })
  }

  /// Wavelength grid (nm), ascending.
  pub fn wavelengths(&self) -> &[f64] {
    &self.wavelengths
  }

  /// Every key accepted by `get_elemental_property`. Wavelengths use the
  /// shortest exact form (`400.0`, `400.25`), so each key parses back to its
  /// grid point.
  pub fn available_props(&self) -> Vec<String> {
    ["n", "k", "R"]
      .iter()
      .flat_map(|q| self.wavelengths.iter().map(move |wl| format!("{}_{:?}", q, wl)))
      .collect()
  }
}

impl ElementalProperty for OpticalData {
  fn get_elemental_property(&self, elem: Element, property_name: &str) -> DataResult<f64> {
    let unknown = || DataError::UnknownProperty {
      element: elem.symbol().to_string(),
      property: property_name.to_string(),
      source_name: SOURCE,
    };

    let key = PropertyKey::parse(property_name, UNDERSCORE)?;
    let quantity = OpticalQuantity::from_field(key.field()).ok_or_else(unknown)?;
    let wavelength = key.value()?;

    match self.points.get(&(elem.symbol().to_string(), grid_key(wavelength))) {
      Some(point) => Ok(point.get(quantity)),
      None if self.points.keys().any(|(el, _)| el == elem.symbol()) => Err(unknown()),
      None => Err(DataError::UnknownElement {
        element: elem.symbol().to_string(),
        source_name: SOURCE,
      }),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn el(symbol: &str) -> Element {
    symbol.parse().unwrap()
  }

  #[test]
  fn test_get_data() {
    let optical = OpticalData::new().unwrap();
    let au_r = optical.get_elemental_property(el("Au"), "R_400.0").unwrap();
    assert!((au_r - 0.25489326484782054).abs() < 1e-9);
    let ag_n = optical.get_elemental_property(el("Ag"), "n_600.0").unwrap();
    assert!((ag_n - 0.13644859985917585).abs() < 1e-12);
    let c_k = optical.get_elemental_property(el("C"), "k_760.0").unwrap();
    assert!((c_k - 0.7462931865379264).abs() < 1e-12);
  }

  #[test]
  fn test_grid_is_exact() {
    let optical = OpticalData::new().unwrap();
    // same grid point written differently
    let a = optical.get_elemental_property(el("Au"), "n_400").unwrap();
    let b = optical.get_elemental_property(el("Au"), "n_400.0").unwrap();
    assert_eq!(a, b);
    // between grid points
    let err = optical.get_elemental_property(el("Au"), "n_410.0").unwrap_err();
    assert!(err.is_unknown_key());
    assert_eq!(optical.wavelengths().first(), Some(&380.0));
    assert_eq!(optical.wavelengths().last(), Some(&780.0));
  }

  #[test]
  fn test_unknown_keys() {
    let optical = OpticalData::new().unwrap();
    assert!(optical.get_elemental_property(el("Au"), "eps_400.0").unwrap_err().is_unknown_key());
    let err = optical.get_elemental_property(el("Au"), "R_blue").unwrap_err();
    assert!(matches!(err, DataError::InvalidKey(_)));
    assert!(err.is_unknown_key());
    assert!(matches!(
      optical.get_elemental_property(el("Og"), "R_400.0"),
      Err(DataError::UnknownElement { .. })
    ));
  }

  #[test]
  fn test_reflectance_formula() {
    let p = OpticalPoint::new(1.0, 0.0);
    assert_eq!(p.r, 0.0);
    // glass-like dielectric
    let p = OpticalPoint::new(1.5, 0.0);
    assert!((p.r - 0.04).abs() < 1e-12);
    let optical = OpticalData::new().unwrap();
    assert_eq!(optical.available_props().len(), 3 * optical.wavelengths().len());
    assert!(optical.available_props().contains(&"R_400.0".to_string()));
  }

  #[test]
  fn test_listed_keys_resolve() {
    let optical = OpticalData::from_tsv("element\twavelength\tn\tk\nAu\t400.25\t1.5\t0.0\nAu\t401\t1.4\t0.1\n").unwrap();
    let props = optical.available_props();
    assert!(props.contains(&"n_400.25".to_string()), "{:?}", props);
    for key in &props {
      assert!(optical.get_elemental_property(el("Au"), key).is_ok(), "{}", key);
    }
    let n = optical.get_elemental_property(el("Au"), "n_400.25").unwrap();
    assert_eq!(n, 1.5);

    let packaged = OpticalData::new().unwrap();
    for key in packaged.available_props() {
      assert!(packaged.get_elemental_property(el("Ag"), &key).is_ok(), "{}", key);
    }
  }
}

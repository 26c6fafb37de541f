// src/sources/mixing.rs

//! Binary liquid mixing enthalpies (kJ/mol) from the Miedema model.
//!
//! **Reference**: Takeuchi & Inoue, Mater. Trans. 46, 2817-2829 (2005).
//!
//! The table is sparse. Pairs outside the model's coverage, and every
//! element paired with itself, are `NaN` rather than zero.

use std::collections::{HashMap, HashSet};

use super::MixingEnthalpyData;
use crate::config::Config;
use crate::error::{DataError, DataResult};
use crate::io::table::parse_lower_triangle;
use crate::io::{packaged, read_data_file};
use crate::model::Element;

const SOURCE: &str = "mixing enthalpy";
const FILE: &str = "mixing_enthalpy.tsv";

#[derive(Debug, Clone)]
pub struct MixingEnthalpy {
  /// Keyed by the pair sorted by atomic number.
  pairs: HashMap<(Element, Element), f64>,
  valid_elements: HashSet<Element>,
}

fn canonical(a: Element, b: Element) -> (Element, Element) {
  if a <= b {
    (a, b)
  } else {
    (b, a)
  }
}

impl MixingEnthalpy {
  pub fn new() -> DataResult<Self> {
    Self::with_config(&Config::default())
  }

  pub fn with_config(config: &Config) -> DataResult<Self> {
    let text = read_data_file(config, FILE, packaged::MIXING_ENTHALPY)?;
    Self::from_tsv(&text)
  }

  pub fn from_tsv(text: &str) -> DataResult<Self> {
    let matrix = parse_lower_triangle(FILE, text)?;
    let elements = matrix
      .labels
      .iter()
      .map(|label| {
        Element::from_symbol(label).ok_or_else(|| DataError::parse(FILE, format!("'{}' is not an element", label)))
      })
      .collect::<DataResult<Vec<Element>>>()?;

    let pairs: HashMap<(Element, Element), f64> = matrix
      .entries
      .iter()
      .map(|&(row, col, v)| (canonical(elements[row], elements[col]), v))
      .collect();

    log::debug!("{}: {} pairs over {} elements", SOURCE, pairs.len(), elements.len());
    Ok(Self {
      pairs,
      valid_elements: elements.into_iter().collect(),
    })
  }

  /// Elements the model covers. Pairs among them may still be `NaN`.
  pub fn valid_elements(&self) -> Vec<Element> {
    let mut els: Vec<Element> = self.valid_elements.iter().copied().collect();
    els.sort_unstable();
    els
  }

  /// Number of recorded pairs.
  pub fn len(&self) -> usize {
    self.pairs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.pairs.is_empty()
  }
}

impl MixingEnthalpyData for MixingEnthalpy {
  /// Order-independent. Fails only when an element is outside the model.
  fn get_mixing_enthalpy(&self, elem_a: Element, elem_b: Element) -> DataResult<f64> {
    for e in [elem_a, elem_b] {
      if !self.valid_elements.contains(&e) {
        return Err(DataError::UnknownElement {
          element: e.symbol().to_string(),
          source_name: SOURCE,
        });
      }
    }
    Ok(self
      .pairs
      .get(&canonical(elem_a, elem_b))
      .copied()
      .unwrap_or(f64::NAN))
  }
}

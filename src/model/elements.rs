// src/model/elements.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Chemical symbols indexed by Z - 1.
const SYMBOLS: [&str; 118] = [
  // --- Period 1 ---
  "H", "He",
  // --- Period 2 ---
  "Li", "Be", "B", "C", "N", "O", "F", "Ne",
  // --- Period 3 ---
  "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar",
  // --- Period 4 ---
  "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se",
  "Br", "Kr",
  // --- Period 5 ---
  "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te",
  "I", "Xe",
  // --- Period 6 ---
  "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
  "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn",
  // --- Period 7 ---
  "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No",
  "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Reserved key used by embedding tables for species outside the trained
/// vocabulary. Never a valid `Element`.
pub const DUMMY_SYMBOL: &str = "Dummy";

/// A chemical element, stored as its atomic number.
///
/// Parsing is case-sensitive ("Fe", not "FE" or "fe"), matching the way every
/// packaged dataset keys its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Element(u8);

impl Element {
  pub const MAX_Z: u8 = SYMBOLS.len() as u8;

  pub fn from_z(z: u8) -> Option<Self> {
    (1..=Self::MAX_Z).contains(&z).then_some(Element(z))
  }

  pub fn from_symbol(symbol: &str) -> Option<Self> {
    SYMBOLS
      .iter()
      .position(|&s| s == symbol)
      .map(|idx| Element(idx as u8 + 1))
  }

  /// Atomic number (Z).
  pub fn z(self) -> u8 {
    self.0
  }

  pub fn symbol(self) -> &'static str {
    SYMBOLS[self.0 as usize - 1]
  }

  /// All elements in order of atomic number.
  pub fn all() -> impl Iterator<Item = Element> {
    (1..=Self::MAX_Z).map(Element)
  }
}

impl fmt::Display for Element {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.symbol())
  }
}

impl FromStr for Element {
  type Err = DataError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Element::from_symbol(s.trim()).ok_or_else(|| DataError::UnknownElement {
      element: s.to_string(),
      source_name: "periodic table",
    })
  }
}

impl TryFrom<String> for Element {
  type Error = DataError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<Element> for String {
  fn from(value: Element) -> Self {
    value.symbol().to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_symbol_roundtrip() {
    for el in Element::all() {
      assert_eq!(Element::from_symbol(el.symbol()), Some(el));
    }
    assert_eq!(Element::all().count(), 118);
  }

  #[test]
  fn test_known_numbers() {
    let cases = [("H", 1), ("Fe", 26), ("Bi", 83), ("Md", 101), ("Db", 105), ("Og", 118)];
    for (sym, z) in cases {
      let el: Element = sym.parse().unwrap();
      assert_eq!(el.z(), z, "{}", sym);
    }
  }

  #[test]
  fn test_rejects_bad_symbols() {
    assert!(Element::from_symbol("fe").is_none());
    assert!(Element::from_symbol(DUMMY_SYMBOL).is_none());
    assert!(Element::from_z(0).is_none());
    assert!(Element::from_z(119).is_none());
    assert!("Xx".parse::<Element>().unwrap_err().is_unknown_key());
  }

  #[test]
  fn test_serde_as_symbol() {
    let json = serde_json::to_string(&Element::from_symbol("Nd").unwrap()).unwrap();
    assert_eq!(json, "\"Nd\"");
    let back: Element = serde_json::from_str(&json).unwrap();
    assert_eq!(back.z(), 60);
  }
}

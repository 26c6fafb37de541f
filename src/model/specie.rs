// src/model/specie.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::elements::Element;
use crate::error::DataError;

/// An element carrying a formal oxidation state, e.g. Fe3+ or O2-.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Specie {
  pub element: Element,
  pub oxidation_state: i32,
}

impl Specie {
  pub fn new(element: Element, oxidation_state: i32) -> Self {
    Self {
      element,
      oxidation_state,
    }
  }
}

impl fmt::Display for Specie {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sign = if self.oxidation_state < 0 { '-' } else { '+' };
    match self.oxidation_state.unsigned_abs() {
      0 => write!(f, "{}0+", self.element),
      1 => write!(f, "{}{}", self.element, sign),
      n => write!(f, "{}{}{}", self.element, n, sign),
    }
  }
}

/// Accepts "Fe3+", "O2-", "Na+", "Cl-" and "Fe0+".
impl FromStr for Specie {
  type Err = DataError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    let invalid = || DataError::InvalidSpecie(s.to_string());

    let sign = match s.chars().last() {
      Some('+') => 1,
      Some('-') => -1,
      _ => return Err(invalid()),
    };
    let body = &s[..s.len() - 1];
    let split = body
      .find(|c: char| c.is_ascii_digit())
      .unwrap_or(body.len());
    let (symbol, magnitude) = body.split_at(split);

    let element: Element = symbol.parse()?;
    let magnitude: i32 = if magnitude.is_empty() {
      1
    } else {
      magnitude.parse().map_err(|_| invalid())?
    };

    Ok(Specie::new(element, sign * magnitude))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_species() {
    let fe: Specie = "Fe3+".parse().unwrap();
    assert_eq!(fe.element.symbol(), "Fe");
    assert_eq!(fe.oxidation_state, 3);

    let o: Specie = "O2-".parse().unwrap();
    assert_eq!(o.oxidation_state, -2);

    let cl: Specie = "Cl-".parse().unwrap();
    assert_eq!(cl.oxidation_state, -1);

    let zero: Specie = "Fe0+".parse().unwrap();
    assert_eq!(zero.oxidation_state, 0);
  }

  #[test]
  fn test_display_matches_parse() {
    for text in ["Fe3+", "O2-", "Na+", "Cl-", "He2+"] {
      let sp: Specie = text.parse().unwrap();
      assert_eq!(sp.to_string(), text);
    }
  }

  #[test]
  fn test_rejects_malformed() {
    assert!(matches!("Fe3".parse::<Specie>(), Err(DataError::InvalidSpecie(_))));
    assert!(matches!("Fe3x+".parse::<Specie>(), Err(DataError::InvalidSpecie(_))));
    assert!("Xq2+".parse::<Specie>().unwrap_err().is_unknown_key());
  }
}

// src/sources/mod.rs

//! Data sources and the capability traits they implement.
//!
//! | Source                  | Elemental | Oxidation states | Charge-dependent | Pairwise | Multi-key |
//! |-------------------------|:---------:|:----------------:|:----------------:|:--------:|:---------:|
//! | [`DemlData`]            | yes       | yes              | yes              |          |           |
//! | [`MagpieData`]          | yes       | yes              |                  |          |           |
//! | [`PymatgenData`]        | yes       | yes              | yes              |          |           |
//! | [`MatscholarElementData`] | yes     |                  |                  |          |           |
//! | [`MegnetElementData`]   | yes       |                  |                  |          |           |
//! | [`OpticalData`]         | yes       |                  |                  |          |           |
//! | [`TransportData`]       | yes       |                  |                  |          |           |
//! | [`MixingEnthalpy`]      |           |                  |                  | yes      |           |
//! | [`IUCrBondValenceData`] |           |                  |                  |          | yes       |
//!
//! [`DemlData`]: deml::DemlData
//! [`MagpieData`]: magpie::MagpieData
//! [`PymatgenData`]: pymatgen::PymatgenData
//! [`MatscholarElementData`]: embedding::MatscholarElementData
//! [`MegnetElementData`]: embedding::MegnetElementData
//! [`OpticalData`]: optical::OpticalData
//! [`TransportData`]: transport::TransportData
//! [`MixingEnthalpy`]: mixing::MixingEnthalpy
//! [`IUCrBondValenceData`]: bond_valence::IUCrBondValenceData

pub mod bond_valence;
pub mod deml;
pub mod embedding;
pub mod magpie;
pub mod mixing;
pub mod optical;
pub mod pymatgen;
pub mod transport;

use crate::error::DataResult;
use crate::model::{Element, Specie};

pub use bond_valence::BondValenceParams;

/// Scalar property lookup for a single element.
pub trait ElementalProperty {
  /// `property_name` may be simple (`"AtomicWeight"`) or compound
  /// (`"embedding 3"`, `"R_400.0"`), depending on the source.
  fn get_elemental_property(&self, elem: Element, property_name: &str) -> DataResult<f64>;
}

pub trait OxidationStates {
  /// Known oxidation states, in ascending order.
  fn get_oxidation_states(&self, elem: Element) -> DataResult<Vec<i32>>;
}

/// Properties keyed by (element, charge).
pub trait ChargeDependentProperty: ElementalProperty {
  fn get_charge_dependent_property(&self, elem: Element, charge: i32, property_name: &str) -> DataResult<f64>;

  /// Same lookup with the (element, charge) pair taken from a species.
  fn get_charge_dependent_property_from_specie(&self, specie: &Specie, property_name: &str) -> DataResult<f64> {
    self.get_charge_dependent_property(specie.element, specie.oxidation_state, property_name)
  }
}

/// Symmetric property of an element pair.
pub trait MixingEnthalpyData {
  /// `NaN` when the pair lies outside the dataset's coverage.
  fn get_mixing_enthalpy(&self, elem_a: Element, elem_b: Element) -> DataResult<f64>;
}

/// Bond valence parameters keyed by ion pair and formal charges.
pub trait BondValenceData {
  fn get_bv_params(&self, cation: Element, anion: Element, cation_charge: i32, anion_charge: i32) -> DataResult<&BondValenceParams>;
}

/// Looks up one property for many elements.
pub fn get_elemental_properties<S>(source: &S, elements: &[Element], property_name: &str) -> Vec<DataResult<f64>>
where
  S: ElementalProperty + ?Sized,
{
  elements
    .iter()
    .map(|&el| source.get_elemental_property(el, property_name))
    .collect()
}

/// Parallel variant of [`get_elemental_properties`] for large element lists.
#[cfg(feature = "parallel")]
pub fn get_elemental_properties_par<S>(source: &S, elements: &[Element], property_name: &str) -> Vec<DataResult<f64>>
where
  S: ElementalProperty + Sync + ?Sized,
{
  use rayon::prelude::*;

  elements
    .par_iter()
    .map(|&el| source.get_elemental_property(el, property_name))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sources::magpie::MagpieData;
  use crate::sources::pymatgen::PymatgenData;

  fn el(symbol: &str) -> Element {
    symbol.parse().unwrap()
  }

  #[test]
  fn test_sources_as_trait_objects() {
    let sources: Vec<(Box<dyn ElementalProperty>, &str)> = vec![
      (Box::new(MagpieData::new().unwrap()), "AtomicWeight"),
      (Box::new(PymatgenData::new().unwrap()), "atomic_mass"),
    ];
    for (source, prop) in &sources {
      let be = source.get_elemental_property(el("Be"), prop).unwrap();
      assert!((be - 9.012182).abs() < 1e-6, "{}", prop);
    }
  }

  #[test]
  fn test_batch_lookup() {
    let magpie = MagpieData::new().unwrap();
    let values = get_elemental_properties(&magpie, &[el("H"), el("Li")], "Number");
    let values: Vec<f64> = values.into_iter().map(|v| v.unwrap()).collect();
    assert_eq!(values, vec![1.0, 3.0]);

    let bad = get_elemental_properties(&magpie, &[el("H")], "NoSuchProperty");
    assert!(bad[0].as_ref().unwrap_err().is_unknown_key());
  }

  #[cfg(feature = "parallel")]
  #[test]
  fn test_parallel_matches_serial() {
    let magpie = MagpieData::new().unwrap();
    let elements: Vec<Element> = Element::all().take(103).collect();
    let serial = get_elemental_properties(&magpie, &elements, "AtomicWeight");
    let parallel = get_elemental_properties_par(&magpie, &elements, "AtomicWeight");
    for (a, b) in serial.iter().zip(&parallel) {
      assert_eq!(a.as_ref().unwrap().to_bits(), b.as_ref().unwrap().to_bits());
    }
  }
}

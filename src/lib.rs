// src/lib.rs

//! Elemental and ionic property lookups over curated materials datasets.
//!
//! Every data source is a read-only view over one packaged reference file (or a
//! small set of them). Sources expose only the capabilities their dataset
//! supports, through the traits in [`sources`]:
//!
//! - [`ElementalProperty`]: scalar lookups, including compound keys such as
//!   `"embedding 3"` or `"R_400.0"`.
//! - [`OxidationStates`]: known oxidation states per element.
//! - [`ChargeDependentProperty`]: properties keyed by (element, charge).
//! - [`MixingEnthalpyData`]: symmetric pairwise lookups.
//! - [`BondValenceData`]: records keyed by (cation, anion, charges).
//!
//! Values that are scientifically undefined come back as `NaN`; queries that
//! name something the dataset does not know come back as a [`DataError`].

pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod sources;
pub mod utils;

pub use config::Config;
pub use error::{DataError, DataResult};
pub use model::{Element, PropertyKey, Specie};
pub use sources::bond_valence::{BondValenceParams, IUCrBondValenceData};
pub use sources::deml::DemlData;
pub use sources::embedding::{EmbeddingTable, MatscholarElementData, MegnetElementData};
pub use sources::magpie::MagpieData;
pub use sources::mixing::MixingEnthalpy;
pub use sources::optical::OpticalData;
pub use sources::pymatgen::PymatgenData;
pub use sources::transport::TransportData;
pub use sources::{
  get_elemental_properties, BondValenceData, ChargeDependentProperty, ElementalProperty,
  MixingEnthalpyData, OxidationStates,
};

#[cfg(feature = "parallel")]
pub use sources::get_elemental_properties_par;

// src/sources/bond_valence.rs

//! Bond valence parameters for cation-anion pairs.
//!
//! **Formula**: s = exp((Ro - R) / B), the valence of a bond of length R.
//!
//! **Reference**: Brown & Altermatt, Acta Cryst. B41, 244-247 (1985);
//! Brese & O'Keeffe, Acta Cryst. B47, 192-197 (1991).
//!
//! Records come from the IUCr `bvparm` CIF. A pair may carry several records
//! at different charges, and several at the same charges; the first record in
//! the file is the recommended one.
//!
//! When the requested charges are not on record, the lookup relaxes in a fixed
//! order and stops at the first step that yields a record:
//! 1. exact (cation, cation charge, anion, anion charge)
//! 2. same cation charge, closest anion charge
//! 3. same anion charge, closest cation charge
//! 4. any charges, closest cation charge
//!
//! Cation-charge ties go to the lower magnitude; remaining ties to file order.

use serde::Serialize;
use std::collections::HashMap;

use super::BondValenceData;
use crate::config::Config;
use crate::error::{DataError, DataResult};
use crate::io::cif::{parse_loops, CifLoop};
use crate::io::table::parse_cell;
use crate::io::{packaged, read_data_file};
use crate::model::{Element, Specie};

const SOURCE: &str = "bond valence";
const FILE: &str = "bvparm2020.cif";

const TAG_CATION: &str = "_valence_param_atom_1";
const TAG_CATION_CHARGE: &str = "_valence_param_atom_1_valence";
const TAG_ANION: &str = "_valence_param_atom_2";
const TAG_ANION_CHARGE: &str = "_valence_param_atom_2_valence";
const TAG_RO: &str = "_valence_param_Ro";
const TAG_B: &str = "_valence_param_B";
const TAG_REF: &str = "_valence_param_ref_id";
const TAG_DETAILS: &str = "_valence_param_details";

/// One bond valence record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BondValenceParams {
  pub cation: Element,
  pub cation_charge: i32,
  pub anion: Element,
  pub anion_charge: i32,
  /// Reference bond length (Å)
  pub ro: f64,
  /// Softness parameter (Å), 0.37 for most pairs
  pub b: f64,
  pub ref_id: String,
  /// `None` when the file has `?`
  pub details: Option<String>,
}

impl BondValenceParams {
  /// Valence of a bond of length `distance` (Å).
  pub fn bond_valence(&self, distance: f64) -> f64 {
    ((self.ro - distance) / self.b).exp()
  }
}

#[derive(Debug, Clone)]
pub struct IUCrBondValenceData {
  /// File order
  records: Vec<BondValenceParams>,
  /// (cation, anion) -> indices into `records`, in file order
  by_pair: HashMap<(Element, Element), Vec<usize>>,
}

impl IUCrBondValenceData {
  pub fn new() -> DataResult<Self> {
    Self::with_config(&Config::default())
  }

  pub fn with_config(config: &Config) -> DataResult<Self> {
    let text = read_data_file(config, FILE, packaged::BOND_VALENCE)?;
    Self::from_cif(&text)
  }

  pub fn from_cif(text: &str) -> DataResult<Self> {
    let loops = parse_loops(FILE, text)?;
    let params = loops
      .iter()
      .find(|l| l.has_tag(TAG_RO))
      .ok_or_else(|| DataError::parse(FILE, format!("no loop with {}", TAG_RO)))?;

    let records = read_records(params)?;
    let mut by_pair: HashMap<(Element, Element), Vec<usize>> = HashMap::new();
    for (i, r) in records.iter().enumerate() {
      by_pair.entry((r.cation, r.anion)).or_default().push(i);
    }

    log::debug!("{}: {} records for {} ion pairs", SOURCE, records.len(), by_pair.len());
    Ok(Self { records, by_pair })
  }

  /// All records for the pair, in file order.
  pub fn records_for(&self, cation: Element, anion: Element) -> Vec<&BondValenceParams> {
    self
      .by_pair
      .get(&(cation, anion))
      .map(|idx| idx.iter().map(|&i| &self.records[i]).collect())
      .unwrap_or_default()
  }

  /// Ion pairs with at least one record, sorted.
  pub fn available_pairs(&self) -> Vec<(Element, Element)> {
    let mut pairs: Vec<_> = self.by_pair.keys().copied().collect();
    pairs.sort_unstable();
    pairs
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  /// First record with exactly these charges, without any fallback.
  pub fn get_bv_params_exact(
    &self,
    cation: Element,
    anion: Element,
    cation_charge: i32,
    anion_charge: i32,
  ) -> Option<&BondValenceParams> {
    self
      .records_for(cation, anion)
      .into_iter()
      .find(|r| r.cation_charge == cation_charge && r.anion_charge == anion_charge)
  }

  /// Same as `get_bv_params`, with charges taken from the species.
  pub fn get_bv_params_from_species(&self, cation: &Specie, anion: &Specie) -> DataResult<&BondValenceParams> {
    self.get_bv_params(cation.element, anion.element, cation.oxidation_state, anion.oxidation_state)
  }
}

fn read_records(params: &CifLoop) -> DataResult<Vec<BondValenceParams>> {
  let col = |tag: &str| {
    params
      .column(tag)
      .ok_or_else(|| DataError::parse(FILE, format!("missing tag {}", tag)))
  };
  let (c_cat, c_catq, c_an, c_anq) = (
    col(TAG_CATION)?,
    col(TAG_CATION_CHARGE)?,
    col(TAG_ANION)?,
    col(TAG_ANION_CHARGE)?,
  );
  let (c_ro, c_b) = (col(TAG_RO)?, col(TAG_B)?);
  let c_ref = params.column(TAG_REF);
  let c_details = params.column(TAG_DETAILS);

  let charge = |s: &str| {
    s.parse::<i32>()
      .map_err(|_| DataError::parse(FILE, format!("bad charge '{}'", s)))
  };

  let mut records = Vec::with_capacity(params.rows.len());
  let mut skipped = 0;
  for row in &params.rows {
    // The full IUCr file also lists deuterium and ammonium pseudo-atoms
    let (Some(cation), Some(anion)) = (Element::from_symbol(&row[c_cat]), Element::from_symbol(&row[c_an])) else {
      skipped += 1;
      continue;
    };
    let ro = parse_cell(FILE, &row[c_ro])?;
    let b = parse_cell(FILE, &row[c_b])?;
    if !ro.is_finite() || !b.is_finite() {
      return Err(DataError::parse(FILE, format!("non-numeric Ro/B for {}-{}", cation, anion)));
    }
    records.push(BondValenceParams {
      cation,
      cation_charge: charge(&row[c_catq])?,
      anion,
      anion_charge: charge(&row[c_anq])?,
      ro,
      b,
      ref_id: c_ref.map(|c| row[c].clone()).unwrap_or_default(),
      details: c_details.map(|c| row[c].clone()).filter(|d| d != "?" && d != "."),
    });
  }
  if skipped > 0 {
    log::debug!("{}: skipped {} records with non-element atoms", SOURCE, skipped);
  }
  Ok(records)
}

/// Widened so caller-supplied charges cannot overflow.
fn charge_distance(a: i32, b: i32) -> i64 {
  (a as i64 - b as i64).abs()
}

impl BondValenceData for IUCrBondValenceData {
  fn get_bv_params(&self, cation: Element, anion: Element, cation_charge: i32, anion_charge: i32) -> DataResult<&BondValenceParams> {
    let candidates = self.records_for(cation, anion);
    if candidates.is_empty() {
      return Err(DataError::NoBondValence {
        cation: cation.symbol().to_string(),
        anion: anion.symbol().to_string(),
      });
    }

    // 1. Exact
    if let Some(r) = self.get_bv_params_exact(cation, anion, cation_charge, anion_charge) {
      return Ok(r);
    }

    // `min_by_key` keeps the first of equal keys, so file order breaks ties
    let by_cation = |r: &&BondValenceParams| (charge_distance(r.cation_charge, cation_charge), r.cation_charge.abs());

    // 2. Same cation charge
    let step2 = candidates
      .iter()
      .copied()
      .filter(|r| r.cation_charge == cation_charge)
      .min_by_key(|r| charge_distance(r.anion_charge, anion_charge));

    // 3. Same anion charge
    let step3 = || {
      candidates
        .iter()
        .copied()
        .filter(|r| r.anion_charge == anion_charge)
        .min_by_key(by_cation)
    };

    // 4. Anything on record for the pair
    let step4 = || candidates.iter().copied().min_by_key(by_cation);

    let found = step2.or_else(step3).or_else(step4).ok_or_else(|| DataError::NoBondValence {
      cation: cation.symbol().to_string(),
      anion: anion.symbol().to_string(),
    })?;

    log::debug!(
      "{}: no {}{:+}-{}{:+} record, using {}{:+}-{}{:+}",
      SOURCE,
      cation,
      cation_charge,
      anion,
      anion_charge,
      found.cation,
      found.cation_charge,
      found.anion,
      found.anion_charge
    );
    Ok(found)
  }
}

// src/sources/magpie.rs

//! Elemental property tables from the Magpie feature set.
//!
//! **Reference**: Ward et al., npj Comput. Mater. 2, 16028 (2016).

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use super::{ElementalProperty, OxidationStates};
use crate::config::Config;
use crate::error::{DataError, DataResult};
use crate::io::table::{parse_line_table, parse_list_table};
use crate::io::{packaged, read_override_dir};
use crate::model::Element;

const SOURCE: &str = "Magpie";
const OXIDATION_TABLE: &str = "OxidationStates";

#[derive(Debug, Clone)]
pub struct MagpieData {
  /// property -> value per atomic number (index Z - 1)
  tables: HashMap<String, Vec<f64>>,
  oxidation_states: Vec<Vec<i32>>,
}

impl MagpieData {
  pub fn new() -> DataResult<Self> {
    Self::with_config(&Config::default())
  }

  /// Tables in `config.data_dir/magpie/` replace the packaged table of the
  /// same name; the remaining packaged tables are kept.
  pub fn with_config(config: &Config) -> DataResult<Self> {
    let mut files: BTreeMap<String, Cow<'static, str>> = packaged::MAGPIE
      .iter()
      .map(|&(name, text)| (name.to_string(), Cow::Borrowed(text)))
      .collect();
    for (name, text) in read_override_dir(config, "magpie", "table")?.unwrap_or_default() {
      files.insert(name, Cow::Owned(text));
    }
    Self::from_tables(files.iter().map(|(name, text)| (name.as_str(), &**text)))
  }

  /// Builds the source from `(property name, table text)` pairs.
  pub fn from_tables<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> DataResult<Self> {
    let mut tables = HashMap::new();
    let mut oxidation_states = Vec::new();

    for (name, text) in files {
      if name == OXIDATION_TABLE {
        oxidation_states = parse_list_table(&format!("magpie/{}.table", name), text)?;
      } else {
        tables.insert(name.to_string(), parse_line_table(text));
      }
    }

    log::debug!("{}: {} property tables loaded", SOURCE, tables.len());
    Ok(Self {
      tables,
      oxidation_states,
    })
  }

  pub fn available_props(&self) -> Vec<&str> {
    let mut props: Vec<&str> = self.tables.keys().map(String::as_str).collect();
    props.sort_unstable();
    props
  }
}

impl ElementalProperty for MagpieData {
  /// Elements past the end of a table are `NaN`, as are entries the table
  /// marks missing.
  fn get_elemental_property(&self, elem: Element, property_name: &str) -> DataResult<f64> {
    let table = self
      .tables
      .get(property_name)
      .ok_or_else(|| DataError::UnknownProperty {
        element: elem.symbol().to_string(),
        property: property_name.to_string(),
        source_name: SOURCE,
      })?;
    Ok(table.get(elem.z() as usize - 1).copied().unwrap_or(f64::NAN))
  }
}

impl OxidationStates for MagpieData {
  fn get_oxidation_states(&self, elem: Element) -> DataResult<Vec<i32>> {
    self
      .oxidation_states
      .get(elem.z() as usize - 1)
      .cloned()
      .ok_or_else(|| DataError::UnknownElement {
        element: elem.symbol().to_string(),
        source_name: SOURCE,
      })
  }
}

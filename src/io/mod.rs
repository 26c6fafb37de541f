// src/io/mod.rs
pub mod cif;
pub mod table;

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::DataResult;

/// Reference files compiled into the crate.
pub mod packaged {
  pub const DEML: &str = include_str!("../../data/deml_elementdata.json");
  pub const PERIODIC_TABLE: &str = include_str!("../../data/periodic_table.json");
  pub const MATSCHOLAR: &str = include_str!("../../data/matscholar_embedding.json");
  pub const MEGNET: &str = include_str!("../../data/megnet_embedding.json");
  pub const OPTICAL: &str = include_str!("../../data/optical_constants.tsv");
  pub const TRANSPORT: &str = include_str!("../../data/transport_data.tsv");
  pub const MIXING_ENTHALPY: &str = include_str!("../../data/mixing_enthalpy.tsv");
  pub const BOND_VALENCE: &str = include_str!("../../data/bvparm2020.cif");

  /// Magpie keeps one file per property; the file stem is the property name.
  pub const MAGPIE: &[(&str, &str)] = &[
    ("AtomicWeight", include_str!("../../data/magpie/AtomicWeight.table")),
    ("Column", include_str!("../../data/magpie/Column.table")),
    ("CovalentRadius", include_str!("../../data/magpie/CovalentRadius.table")),
    ("Electronegativity", include_str!("../../data/magpie/Electronegativity.table")),
    ("Number", include_str!("../../data/magpie/Number.table")),
    ("OxidationStates", include_str!("../../data/magpie/OxidationStates.table")),
    ("Row", include_str!("../../data/magpie/Row.table")),
  ];
}

/// Returns the contents of data file `name`: the copy in `config.data_dir` if
/// there is one, the packaged copy otherwise.
pub fn read_data_file(config: &Config, name: &str, packaged: &'static str) -> DataResult<Cow<'static, str>> {
  if let Some(dir) = &config.data_dir {
    let path = dir.join(name);
    if path.is_file() {
      log::info!("Loading {} from {:?}", name, path);
      return Ok(Cow::Owned(fs::read_to_string(path)?));
    }
  }
  Ok(Cow::Borrowed(packaged))
}

/// Lists `(stem, contents)` of every `*.<extension>` file in `config.data_dir/<subdir>`.
/// `None` when no override directory applies. Callers merge the result over
/// the packaged set by stem.
pub fn read_override_dir(config: &Config, subdir: &str, extension: &str) -> DataResult<Option<Vec<(String, String)>>> {
  let Some(dir) = config.data_dir.as_deref().map(|d| d.join(subdir)) else {
    return Ok(None);
  };
  if !dir.is_dir() {
    return Ok(None);
  }

  let mut files = Vec::new();
  for entry in fs::read_dir(&dir)? {
    let path = entry?.path();
    if path.extension().and_then(|e| e.to_str()) != Some(extension) {
      continue;
    }
    if let Some(stem) = file_stem(&path) {
      files.push((stem, fs::read_to_string(&path)?));
    }
  }
  files.sort_by(|a, b| a.0.cmp(&b.0));
  log::info!("Loading {} {} files from {:?}", files.len(), extension, dir);
  Ok(Some(files))
}

fn file_stem(path: &Path) -> Option<String> {
  path.file_stem().map(|s| s.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_packaged_fallback() {
    let cfg = Config::default();
    let text = read_data_file(&cfg, "bvparm2020.cif", packaged::BOND_VALENCE).unwrap();
    assert!(matches!(text, Cow::Borrowed(_)));
    assert!(read_override_dir(&cfg, "magpie", "table").unwrap().is_none());
  }

  #[test]
  fn test_override_dir_wins() {
    let dir = std::env::temp_dir().join(format!("elemprops-io-{}", std::process::id()));
    fs::create_dir_all(dir.join("magpie")).unwrap();
    fs::write(dir.join("mixing_enthalpy.tsv"), "*\tH\nH\n").unwrap();
    fs::write(dir.join("magpie").join("Density.table"), "0.0899\n").unwrap();
    fs::write(dir.join("magpie").join("notes.txt"), "ignored\n").unwrap();

    let cfg = Config {
      data_dir: Some(dir.clone()),
      ..Config::default()
    };
    let text = read_data_file(&cfg, "mixing_enthalpy.tsv", packaged::MIXING_ENTHALPY).unwrap();
    assert_eq!(text, "*\tH\nH\n");

    // files absent from the override directory still come from the package
    let text = read_data_file(&cfg, "bvparm2020.cif", packaged::BOND_VALENCE).unwrap();
    assert!(matches!(text, Cow::Borrowed(_)));

    let tables = read_override_dir(&cfg, "magpie", "table").unwrap().unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].0, "Density");

    let _ = fs::remove_dir_all(&dir);
  }
}

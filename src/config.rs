// src/config.rs

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::error::DataResult;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
  Error,
  Warn,
  Info,
  Debug,
  Trace,
}

impl From<LogLevel> for log::LevelFilter {
  fn from(level: LogLevel) -> Self {
    match level {
      LogLevel::Error => log::LevelFilter::Error,
      LogLevel::Warn => log::LevelFilter::Warn,
      LogLevel::Info => log::LevelFilter::Info,
      LogLevel::Debug => log::LevelFilter::Debug,
      LogLevel::Trace => log::LevelFilter::Trace,
    }
  }
}

// --- Main Config Struct ---

/// Settings shared by every data source.
///
/// Stored as JSON, by default at `<config dir>/elemprops/settings.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
  /// Directory searched before the packaged files. A file that exists there
  /// (same relative name, e.g. `magpie/AtomicWeight.table`) replaces the
  /// packaged copy.
  #[serde(default)]
  pub data_dir: Option<PathBuf>,

  /// Initial value of `PymatgenData::use_common_oxi_states`.
  #[serde(default = "default_true")]
  pub use_common_oxi_states: bool,

  #[serde(default = "default_log_level")]
  pub log_level: LogLevel,
}

fn default_true() -> bool {
  true
}

fn default_log_level() -> LogLevel {
  LogLevel::Info
}

impl Default for Config {
  fn default() -> Self {
    Self {
      data_dir: None,
      use_common_oxi_states: true,
      log_level: LogLevel::Info,
    }
  }
}

impl Config {
  /// Loads config from the standard OS location. Falls back to defaults (with
  /// a warning) when the file is missing or unreadable.
  pub fn load() -> Self {
    let Some(path) = Self::get_path() else {
      log::debug!("No config directory on this platform. Using defaults.");
      return Self::default();
    };
    if !path.exists() {
      log::debug!("No config found at {:?}. Using defaults.", path);
      return Self::default();
    }
    match Self::load_from(&path) {
      Ok(cfg) => {
        log::info!("Config loaded from {:?}", path);
        cfg
      }
      Err(e) => {
        log::warn!("Error reading config {:?}: {}. Using defaults.", path, e);
        Self::default()
      }
    }
  }

  pub fn load_from(path: &Path) -> DataResult<Self> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
  }

  /// Saves config to the standard OS location.
  pub fn save(&self) -> DataResult<PathBuf> {
    let path = Self::get_path().unwrap_or_else(|| PathBuf::from("settings.json"));
    self.save_to(&path)?;
    Ok(path)
  }

  pub fn save_to(&self, path: &Path) -> DataResult<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, self)?;
    log::info!("Config saved to {:?}", path);
    Ok(())
  }

  /// Installs the stderr logger at `log_level`.
  pub fn init_logger(&self) -> Result<(), log::SetLoggerError> {
    crate::utils::logger::init(self.log_level)
  }

  fn get_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "elemprops", "elemprops").map(|proj| proj.config_dir().join("settings.json"))
  }
}

//! Definition files.
//!
//! Worlds can grow their effect catalog and reset lists at runtime from
//! TOML files. A definition file holds `[[effect]]` entries, each a
//! single-attribute toggle, and `[[reset]]` entries appended to a class
//! reset list. Files load from an explicit path or from every `.toml`
//! under a directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use sigil_types::AttrValue;

/// One `[[effect]]` entry: a toggle that holds `attribute` at `engaged`
/// while any handle is outstanding and writes `released` back on the
/// last retirement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EffectDef {
    pub tag: String,
    pub attribute: String,
    pub engaged: AttrValue,
    pub released: AttrValue,
}

/// One `[[reset]]` entry, applied to entities of `class` when they die.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResetDef {
    pub class: String,
    pub attribute: String,
    pub value: AttrValue,
}

/// Contents of one definition file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DefinitionFile {
    #[serde(default, rename = "effect")]
    pub effects: Vec<EffectDef>,

    #[serde(default, rename = "reset")]
    pub resets: Vec<ResetDef>,
}

/// Errors from reading definition files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Parses a single definition file.
pub fn load_file(path: &Path) -> Result<DefinitionFile, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads every `.toml` file under a directory, in path order.
///
/// Files that fail to read or parse are skipped with a warning so one
/// bad file cannot take the rest of the set down with it.
pub fn load_dir(dir: &Path) -> Result<Vec<DefinitionFile>, ConfigError> {
    let entries = fs::read_dir(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match load_file(&path) {
            Ok(file) => files.push(file),
            Err(e) => tracing::warn!("skipping definition file: {e}"),
        }
    }
    Ok(files)
}

/// Default directory for user definition files.
pub fn default_user_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("sigil").join("definitions"))
}

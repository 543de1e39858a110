//! Loading of layered TOML configuration files.
//!
//! A configuration is stored in a main config root, e.g. `./config/ratatoskr.toml`. A robot
//! specific overlay root, e.g. `./config/overlay/<robot>/`, may contain a partial copy of the
//! same file whose values take precedence over the main file.
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use toml::Table;

pub mod error;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};

/// A configuration that is loaded from a TOML file.
pub trait Config: DeserializeOwned {
    /// Path of the configuration file, relative to a config root.
    const PATH: &'static str;

    /// Loads the configuration from the main config root.
    fn load(root: impl AsRef<Path>) -> Result<Self> {
        let table = read_table(&root.as_ref().join(Self::PATH))?;

        deserialize::<Self>(table)
    }

    /// Loads the configuration from the main config root, with the overlay root applied on top.
    ///
    /// A missing overlay file is not an error, the main configuration is used as is.
    fn load_with_overlay(
        root: impl AsRef<Path>,
        overlay_root: impl AsRef<Path>,
    ) -> Result<Self> {
        let main = read_table(&root.as_ref().join(Self::PATH))?;

        let overlay_path = overlay_root.as_ref().join(Self::PATH);
        if !overlay_path.is_file() {
            tracing::debug!(path = %overlay_path.display(), "no config overlay found");
            return deserialize::<Self>(main);
        }

        let overlay = read_table(&overlay_path)?;
        tracing::info!(path = %overlay_path.display(), "applying config overlay");

        deserialize::<Self>(merge_tables(main, overlay))
    }
}

/// Merges `overlay` into `main`.
///
/// Tables present in both are merged recursively, any other value in `overlay` replaces the value
/// in `main`. Keys only present in `overlay` are added.
#[must_use]
pub fn merge_tables(mut main: Table, overlay: Table) -> Table {
    for (key, overlay_value) in overlay {
        let merged = match (main.remove(&key), overlay_value) {
            (Some(toml::Value::Table(main_table)), toml::Value::Table(overlay_table)) => {
                toml::Value::Table(merge_tables(main_table, overlay_table))
            }
            (_, overlay_value) => overlay_value,
        };

        main.insert(key, merged);
    }

    main
}

fn read_table(path: &Path) -> Result<Table> {
    let contents = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })?;

    contents.parse::<Table>().map_err(|source| Error::Parse {
        path: path.to_owned(),
        source,
    })
}

fn deserialize<T: Config>(table: Table) -> Result<T> {
    toml::Value::Table(table)
        .try_into::<T>()
        .map_err(|source| Error::Deserialize {
            path: T::PATH,
            source,
        })
}

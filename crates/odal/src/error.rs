//! Result and Error types for the crate.
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result containing an error variant from this module.
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration error variants
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// The configuration file could not be read.
    #[error("Failed to read config file `{}`", path.display())]
    #[diagnostic(
        code(odal::io),
        help("Config files are looked up relative to the config root, see `--config-root`.")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML.
    #[error("Failed to parse config file `{}`", path.display())]
    #[diagnostic(code(odal::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The (merged) configuration does not match the expected structure.
    #[error("Invalid configuration for `{path}`")]
    #[diagnostic(code(odal::deserialize))]
    Deserialize {
        path: &'static str,
        #[source]
        source: toml::de::Error,
    },
}

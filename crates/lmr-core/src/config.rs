//! JSON configuration loading.
//!
//! Each crate owns its config struct (`MatrixConfig`, `AnalysisConfig`,
//! `OrientationConfig`, …) with a `Default` impl and a `serde::Deserialize`
//! derive.  Applications typically bundle them into one struct and read it
//! with [`load_json_config`]; missing fields fall back to defaults when the
//! struct is annotated with `#[serde(default)]`.

use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::{CoreError, CoreResult};

/// Read a config value of type `T` from a JSON file.
pub fn load_json_config<T: DeserializeOwned>(path: &Path) -> CoreResult<T> {
    let file = std::fs::File::open(path)?;
    let config = serde_json::from_reader(std::io::BufReader::new(file))
        .map_err(|e| CoreError::Config(format!("{}: {e}", path.display())))?;
    log::info!("loaded configuration from {}", path.display());
    Ok(config)
}

/// Like [`load_json_config`] but accepts any `Read` source.
pub fn load_json_config_reader<T: DeserializeOwned, R: Read>(reader: R) -> CoreResult<T> {
    serde_json::from_reader(reader).map_err(|e| CoreError::Config(e.to_string()))
}

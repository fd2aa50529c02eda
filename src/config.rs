//! YAML dialect files.
//!
//! A dialects file maps names to dialect settings:
//!
//! ```yaml
//! dialects:
//!   logs:
//!     delimiter: "::"
//!     trim_characters: [" ", "\t"]
//!     skip_empty_rows: true
//! ```

use std::{
    collections::BTreeMap,
    fs::File,
    io::{Read, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    dialect::Dialect,
    error::{DialectError, Result},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialectsFile {
    #[serde(default)]
    pub dialects: BTreeMap<String, Dialect>,
}

impl DialectsFile {
    pub fn load(path: &Path) -> Result<Self> {
        let mut file = File::open(path).map_err(|source| DialectError::IoOpenFailure {
            path: path.to_path_buf(),
            source,
        })?;
        let mut raw = String::new();
        file.read_to_string(&mut raw)?;
        Self::parse(&raw).map_err(|message| DialectError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn parse(input: &str) -> std::result::Result<Self, String> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(input).map_err(|err| err.to_string())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_yaml::to_string(self).map_err(|err| DialectError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let mut file = File::create(path).map_err(|source| DialectError::IoOpenFailure {
            path: path.to_path_buf(),
            source,
        })?;
        file.write_all(serialized.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

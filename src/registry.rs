//! Named dialect presets and active-dialect selection.
//!
//! Every [`crate::Reader`] and [`crate::Writer`] owns its own registry value;
//! nothing is shared or static. A registry starts with the `unix`, `excel`
//! and `excel_tab` presets and `excel` selected.

use std::{collections::BTreeMap, path::Path};

use log::debug;

use crate::{
    config,
    dialect::Dialect,
    error::{DialectError, Result},
};

pub const DEFAULT_DIALECT: &str = "excel";

#[derive(Debug, Clone)]
pub struct DialectRegistry {
    dialects: BTreeMap<String, Dialect>,
    current: String,
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DialectRegistry {
    pub fn new() -> Self {
        let mut dialects = BTreeMap::new();
        dialects.insert("unix".to_string(), preset(","));
        dialects.insert("excel".to_string(), preset(","));
        dialects.insert("excel_tab".to_string(), preset("\t"));
        Self {
            dialects,
            current: DEFAULT_DIALECT.to_string(),
        }
    }

    /// Returns a mutable handle to the named dialect. An unknown name is
    /// registered with default settings and becomes the active dialect.
    pub fn configure_dialect(&mut self, name: &str) -> &mut Dialect {
        if !self.dialects.contains_key(name) {
            debug!("Registering dialect '{name}'");
            self.current = name.to_string();
        }
        self.dialects.entry(name.to_string()).or_default()
    }

    /// Shorthand for configuring the default `excel` dialect.
    pub fn configure_default_dialect(&mut self) -> &mut Dialect {
        self.configure_dialect(DEFAULT_DIALECT)
    }

    pub fn use_dialect(&mut self, name: &str) -> Result<()> {
        if !self.dialects.contains_key(name) {
            return Err(DialectError::UnknownDialect(name.to_string()));
        }
        self.current = name.to_string();
        Ok(())
    }

    pub fn get_dialect(&self, name: &str) -> Result<&Dialect> {
        self.dialects
            .get(name)
            .ok_or_else(|| DialectError::UnknownDialect(name.to_string()))
    }

    pub fn list_dialects(&self) -> Vec<String> {
        self.dialects.keys().cloned().collect()
    }

    pub fn current_name(&self) -> &str {
        &self.current
    }

    pub fn current(&self) -> Result<&Dialect> {
        self.get_dialect(&self.current)
    }

    /// Inserts or replaces a dialect without changing the active selection.
    pub fn register(&mut self, name: impl Into<String>, dialect: Dialect) {
        self.dialects.insert(name.into(), dialect);
    }

    /// Loads every dialect defined in a YAML dialects file into the registry.
    /// Returns the names that were loaded.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<Vec<String>> {
        let file = config::DialectsFile::load(path)?;
        let mut loaded = Vec::with_capacity(file.dialects.len());
        for (name, dialect) in file.dialects {
            dialect.validate()?;
            debug!("Loaded dialect '{name}' from {path:?}");
            loaded.push(name.clone());
            self.register(name, dialect);
        }
        Ok(loaded)
    }
}

fn preset(delimiter: &str) -> Dialect {
    let mut dialect = Dialect::new();
    dialect
        .delimiter(delimiter)
        .quote_character('"')
        .double_quote(true)
        .header(true);
    dialect
}

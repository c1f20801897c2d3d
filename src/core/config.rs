//! Configuration records for the logger hierarchy
//!
//! A configuration is an ordered list of per-logger declarations. Records
//! are kept sorted shallow-to-deep (the root first, then by the number of
//! `.` separators) so that by the time `a.b.c` is applied, `a` and `a.b`
//! already carry their own settings.
//!
//! # Example
//!
//! ```
//! use rust_logger_hierarchy::core::HierarchyConfig;
//!
//! let config = HierarchyConfig::from_json_str(r#"[
//!     {"logger": "a.b.c.d", "level": "error", "local": true},
//!     {"logger": "*", "level": "info"},
//!     {"logger": "a.b", "level": "debug"}
//! ]"#).unwrap();
//!
//! let order: Vec<&str> = config.iter().map(|r| r.logger.as_str()).collect();
//! assert_eq!(order, vec!["*", "a.b", "a.b.c.d"]);
//! ```

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use crate::appenders::registry::{OutputKind, FILE_OPTION};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Logger name that addresses the root in configuration
pub const ROOT_PATTERN: &str = "*";

/// One output declared on a logger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(alias = "type")]
    pub kind: String,
    #[serde(default)]
    pub options: HashMap<String, String>,
    /// Local outputs are written by the declaring logger only
    #[serde(default)]
    pub local: bool,
}

impl OutputConfig {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            options: HashMap::new(),
            local: false,
        }
    }

    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::new(OutputKind::File.as_str())
            .option(FILE_OPTION, path.as_ref().display().to_string())
    }

    pub fn stdout() -> Self {
        Self::new(OutputKind::Stdout.as_str())
    }

    pub fn stderr() -> Self {
        Self::new(OutputKind::Stderr.as_str())
    }

    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn local(mut self, local: bool) -> Self {
        self.local = local;
        self
    }

    pub fn output_kind(&self) -> Result<OutputKind> {
        self.kind.parse()
    }

    /// Check the declaration without opening anything
    pub fn check(&self) -> Result<()> {
        let kind = self.output_kind()?;
        if kind == OutputKind::File
            && self
                .options
                .get(FILE_OPTION)
                .map_or(true, |path| path.trim().is_empty())
        {
            return Err(LoggerError::output_options(
                kind.as_str(),
                "missing required 'file' option",
            ));
        }
        Ok(())
    }
}

/// Declaration for one logger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Logger name; `*` or empty addresses the root
    pub logger: String,
    /// Level name, or an unset token; missing means unset
    #[serde(default)]
    pub level: String,
    /// Keep this logger's own level and outputs from passing to descendants
    #[serde(default)]
    pub local: bool,
    #[serde(default, alias = "out")]
    pub outputs: Vec<OutputConfig>,
}

impl LoggerConfig {
    pub fn new(logger: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            logger: logger.into(),
            level: level.into(),
            local: false,
            outputs: Vec::new(),
        }
    }

    pub fn root(level: impl Into<String>) -> Self {
        Self::new(ROOT_PATTERN, level)
    }

    #[must_use]
    pub fn local(mut self, local: bool) -> Self {
        self.local = local;
        self
    }

    #[must_use]
    pub fn output(mut self, output: OutputConfig) -> Self {
        self.outputs.push(output);
        self
    }

    pub fn is_root(&self) -> bool {
        let name = self.logger.trim();
        name.is_empty() || name == ROOT_PATTERN
    }

    /// Sort key: root first, then by separator count
    pub fn depth(&self) -> usize {
        if self.is_root() {
            0
        } else {
            1 + self.logger.matches('.').count()
        }
    }

    /// Parsed level; `None` for the unset tokens
    pub fn level_setting(&self) -> Result<Option<LogLevel>> {
        LogLevel::parse_setting(&self.level)
    }
}

/// An ordered, sorted list of logger declarations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LoggerConfig>", into = "Vec<LoggerConfig>")]
pub struct HierarchyConfig {
    records: Vec<LoggerConfig>,
}

impl HierarchyConfig {
    /// Build a configuration, stable-sorting records shallow-to-deep
    pub fn new(mut records: Vec<LoggerConfig>) -> Self {
        records.sort_by_key(LoggerConfig::depth);
        Self { records }
    }

    pub fn records(&self) -> &[LoggerConfig] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LoggerConfig> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Parse a YAML sequence of logger declarations
    ///
    /// ```
    /// use rust_logger_hierarchy::core::HierarchyConfig;
    ///
    /// let config = HierarchyConfig::from_yaml_str("
    /// - logger: 'a.b'
    ///   level: debug
    /// - logger: '*'
    ///   level: info
    ///   out:
    ///     - type: stderr
    /// ").unwrap();
    ///
    /// assert_eq!(config.len(), 2);
    /// assert!(config.records()[0].is_root());
    /// ```
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        yaml::parse(s)
    }

    /// Load from a file; `.json` files are read as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            return Self::from_json_str(&contents);
        }

        #[cfg(feature = "yaml")]
        {
            Self::from_yaml_str(&contents)
        }
        #[cfg(not(feature = "yaml"))]
        {
            Err(LoggerError::config(
                path.display().to_string(),
                "YAML support is disabled; use a .json file",
            ))
        }
    }

    /// Report every problem a later apply would hit on levels and output
    /// declarations, without touching any logger or file.
    pub fn validate(&self) -> std::result::Result<(), Vec<LoggerError>> {
        let mut errors = Vec::new();
        for record in &self.records {
            match record.level_setting() {
                Err(e) => errors.push(e),
                Ok(None) if record.is_root() => errors.push(LoggerError::InvalidRootLevel),
                Ok(_) => {}
            }
            for output in &record.outputs {
                if let Err(e) = output.check() {
                    errors.push(e);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<Vec<LoggerConfig>> for HierarchyConfig {
    fn from(records: Vec<LoggerConfig>) -> Self {
        Self::new(records)
    }
}

impl From<HierarchyConfig> for Vec<LoggerConfig> {
    fn from(config: HierarchyConfig) -> Self {
        config.records
    }
}

impl FromIterator<LoggerConfig> for HierarchyConfig {
    fn from_iter<I: IntoIterator<Item = LoggerConfig>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a HierarchyConfig {
    type Item = &'a LoggerConfig;
    type IntoIter = std::slice::Iter<'a, LoggerConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(feature = "yaml")]
mod yaml {
    use super::{HierarchyConfig, LoggerConfig, OutputConfig};
    use crate::core::error::{LoggerError, Result};
    use yaml_rust::{yaml, Yaml, YamlLoader};

    pub(super) fn parse(s: &str) -> Result<HierarchyConfig> {
        let docs = YamlLoader::load_from_str(s).map_err(|e| LoggerError::yaml(e.to_string()))?;
        let Some(doc) = docs.first() else {
            return Ok(HierarchyConfig::default());
        };

        match doc {
            Yaml::Null => Ok(HierarchyConfig::default()),
            Yaml::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| logger_record(item, i))
                .collect::<Result<Vec<_>>>()
                .map(HierarchyConfig::new),
            _ => Err(LoggerError::yaml(
                "top level must be a sequence of logger records",
            )),
        }
    }

    fn logger_record(item: &Yaml, index: usize) -> Result<LoggerConfig> {
        let map = item
            .as_hash()
            .ok_or_else(|| LoggerError::yaml(format!("record #{index} is not a mapping")))?;

        let mut record = LoggerConfig::new("", "");
        let mut has_logger = false;
        foreach_kv(map, |key, value| {
            match key {
                "logger" => {
                    record.logger = scalar(value, key)?;
                    has_logger = true;
                }
                "level" => record.level = scalar(value, key)?,
                "local" => record.local = boolean(value, key)?,
                "out" | "outputs" => {
                    let outputs = value
                        .as_vec()
                        .ok_or_else(|| LoggerError::yaml(format!("'{key}' must be a sequence")))?;
                    for output in outputs {
                        record.outputs.push(output_record(output)?);
                    }
                }
                _ => return Err(LoggerError::yaml(format!("unknown key '{key}'"))),
            }
            Ok(())
        })
        .map_err(|e| LoggerError::yaml(format!("record #{index}: {e}")))?;

        if !has_logger {
            return Err(LoggerError::yaml(format!(
                "record #{index}: missing 'logger' key"
            )));
        }
        Ok(record)
    }

    fn output_record(item: &Yaml) -> Result<OutputConfig> {
        let map = item
            .as_hash()
            .ok_or_else(|| LoggerError::yaml("output is not a mapping"))?;

        let mut output = OutputConfig::new("");
        foreach_kv(map, |key, value| {
            match key {
                "type" | "kind" => output.kind = scalar(value, key)?,
                "local" => output.local = boolean(value, key)?,
                "options" => {
                    let options = value
                        .as_hash()
                        .ok_or_else(|| LoggerError::yaml("'options' must be a mapping"))?;
                    foreach_kv(options, |k, v| {
                        output.options.insert(k.to_string(), scalar(v, k)?);
                        Ok(())
                    })?;
                }
                _ => return Err(LoggerError::yaml(format!("unknown output key '{key}'"))),
            }
            Ok(())
        })?;
        Ok(output)
    }

    fn foreach_kv<F>(map: &yaml::Hash, mut f: F) -> Result<()>
    where
        F: FnMut(&str, &Yaml) -> Result<()>,
    {
        for (k, v) in map.iter() {
            match k {
                Yaml::String(key) => f(key, v)?,
                _ => return Err(LoggerError::yaml("mapping keys must be strings")),
            }
        }
        Ok(())
    }

    fn scalar(value: &Yaml, key: &str) -> Result<String> {
        match value {
            Yaml::String(s) | Yaml::Real(s) => Ok(s.clone()),
            Yaml::Integer(i) => Ok(i.to_string()),
            Yaml::Boolean(b) => Ok(b.to_string()),
            Yaml::Null => Ok(String::new()),
            _ => Err(LoggerError::yaml(format!("'{key}' must be a scalar"))),
        }
    }

    fn boolean(value: &Yaml, key: &str) -> Result<bool> {
        match value {
            Yaml::Boolean(b) => Ok(*b),
            Yaml::Null => Ok(false),
            _ => Err(LoggerError::yaml(format!("'{key}' must be a boolean"))),
        }
    }
}

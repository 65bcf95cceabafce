//! Configuration loading for TOML, JSON and YAML files.
//!
//! The format is picked from the file extension. Partial files are merged
//! over a typed default so callers only need to write the keys they change.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Load configuration from file, auto-detecting the format
pub fn load_config<T>(path: &Path) -> crate::Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let value = load_value(path)?;
    serde_json::from_value(value)
        .map_err(|e| crate::UtilError::Config(format!("{}: {e}", path.display())))
}

/// Read a config file into an untyped JSON value
fn load_value(path: &Path) -> crate::Result<serde_json::Value> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    let content = std::fs::read_to_string(path)?;

    match extension.as_str() {
        "toml" => {
            let toml_value: toml::Value = toml::from_str(&content)
                .map_err(|e| crate::UtilError::Config(format!("TOML parse error: {e}")))?;
            serde_json::to_value(toml_value)
                .map_err(|e| crate::UtilError::Config(format!("TOML conversion error: {e}")))
        }
        "json" => serde_json::from_str(&content)
            .map_err(|e| crate::UtilError::Config(format!("JSON parse error: {e}"))),
        "yml" | "yaml" => serde_yaml::from_str(&content)
            .map_err(|e| crate::UtilError::Config(format!("YAML parse error: {e}"))),
        _ => Err(crate::UtilError::Config(format!(
            "Unsupported config format: {extension}"
        ))),
    }
}

/// Merge two JSON values (second overrides first)
fn merge_json_values(base: &mut serde_json::Value, override_value: serde_json::Value) {
    match (base, override_value) {
        (serde_json::Value::Object(base_obj), serde_json::Value::Object(override_obj)) => {
            for (key, value) in override_obj {
                match base_obj.get_mut(&key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_obj.insert(key, value);
                    }
                }
            }
        }
        (base_value, override_value) => {
            *base_value = override_value;
        }
    }
}

/// Merge two configurations (second overrides first)
pub fn merge_configs<T>(base: &mut T, override_config: T) -> crate::Result<()>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let override_value = serde_json::to_value(override_config)
        .map_err(|e| crate::UtilError::Serialization(format!("Override serialization error: {e}")))?;
    merge_value_into(base, override_value)
}

fn merge_value_into<T>(base: &mut T, override_value: serde_json::Value) -> crate::Result<()>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let mut base_value = serde_json::to_value(&*base)
        .map_err(|e| crate::UtilError::Serialization(format!("Base serialization error: {e}")))?;

    merge_json_values(&mut base_value, override_value);

    *base = serde_json::from_value(base_value)
        .map_err(|e| crate::UtilError::Serialization(format!("Result deserialization error: {e}")))?;

    Ok(())
}

/// Configuration builder for fluent API
#[derive(Debug)]
pub struct ConfigBuilder<T> {
    config: T,
}

impl<T> ConfigBuilder<T>
where
    T: Default + Serialize + for<'de> Deserialize<'de>,
{
    /// Create new config builder with defaults
    pub fn new() -> Self {
        Self {
            config: T::default(),
        }
    }

    /// Load a possibly partial file and merge it over the current values
    pub fn load_file(mut self, path: &Path) -> crate::Result<Self> {
        let value = load_value(path)?;
        merge_value_into(&mut self.config, value)?;
        Ok(self)
    }

    pub fn build(self) -> T {
        self.config
    }
}

impl<T> Default for ConfigBuilder<T>
where
    T: Default + Serialize + for<'de> Deserialize<'de>,
{
    fn default() -> Self {
        Self::new()
    }
}

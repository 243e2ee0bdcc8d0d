//! Parameters file handling.
//!
//! The parameters file is a flat YAML mapping consumed by the workflow engine
//! via `-params-file`. The launcher reads it, merges command-line overrides on
//! top (override wins on key collision, nothing is ever dropped), and rewrites
//! the file in full before the engine sees it.

use crate::console;
use crate::error::{NfLaunchError, Result};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Runtime parameter mapping. BTreeMap keeps dumps deterministic.
pub type ParamMap = BTreeMap<String, Value>;

/// Read a parameters file into a [`ParamMap`].
///
/// An empty or null document is an empty map. Anything that is not a mapping
/// with string keys is a [`NfLaunchError::ConfigRead`].
pub fn read_params(path: &Path) -> Result<ParamMap> {
    let raw = fs::read_to_string(path)?;
    let doc: Value = serde_yaml::from_str(&raw)
        .map_err(|e| NfLaunchError::config_read(path, e.to_string()))?;

    match doc {
        Value::Null => Ok(ParamMap::new()),
        Value::Mapping(mapping) => {
            let mut params = ParamMap::new();
            for (key, value) in mapping {
                let key = key.as_str().ok_or_else(|| {
                    NfLaunchError::config_read(path, "parameter keys must be strings")
                })?;
                params.insert(key.to_string(), value);
            }
            Ok(params)
        }
        other => Err(NfLaunchError::config_read(
            path,
            format!("expected a key: value mapping, found {}", yaml_kind(&other)),
        )),
    }
}

/// Merge overrides into a base mapping. Override values replace existing keys;
/// keys only in the override set are added.
pub fn merge_params(base: &mut ParamMap, overrides: &ParamMap) {
    for (key, value) in overrides {
        base.insert(key.clone(), value.clone());
    }
}

/// Rewrite the parameters file in full with the given mapping.
pub fn write_params(path: &Path, params: &ParamMap) -> Result<()> {
    console::msg(&format!(
        "Writing runtime parameters file to {}",
        path.display()
    ));
    let rendered = render_params(params);
    fs::write(path, rendered)?;
    Ok(())
}

/// YAML dump of a mapping, used both for the file contents and the
/// runtime-parameters banner.
pub fn render_params(params: &ParamMap) -> String {
    if params.is_empty() {
        return "{}\n".to_string();
    }
    // Serializing a BTreeMap of scalars cannot fail.
    serde_yaml::to_string(params).unwrap_or_else(|_| "{}\n".to_string())
}

fn yaml_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

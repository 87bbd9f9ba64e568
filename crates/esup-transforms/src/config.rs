//! Configuration resolver.
//!
//! Turns the raw `--transformers`, `--disable-transformers` and `--module`
//! selections into a [`TransformConfig`]: an enabled flag for every catalog
//! entry. Resolution is atomic; on error no configuration exists.

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

use crate::catalog::{CATALOG, TransformerName};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Options --transformers and --disable-transformers can not be used together.")]
    ConflictingOptions,
    #[error("Unknown transformer \"{0}\".")]
    UnknownTransformer(String),
    #[error("Unsupported module system \"{0}\".")]
    UnsupportedModuleSystem(String),
}

/// The only module system `--module` accepts.
pub const COMMONJS: &str = "commonjs";

/// Enabled flag per transformer. Total over the catalog: there is no unset
/// state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransformConfig {
    enabled: [bool; TransformerName::COUNT],
}

impl TransformConfig {
    /// The catalog defaults.
    pub fn defaults() -> TransformConfig {
        let mut enabled = [false; TransformerName::COUNT];
        for entry in &CATALOG {
            enabled[entry.name.index()] = entry.enabled_by_default;
        }
        TransformConfig { enabled }
    }

    /// Everything disabled.
    pub fn none() -> TransformConfig {
        TransformConfig {
            enabled: [false; TransformerName::COUNT],
        }
    }

    /// Exactly the given transformers enabled.
    pub fn only(names: &[TransformerName]) -> TransformConfig {
        let mut config = TransformConfig::none();
        for &name in names {
            config.set(name, true);
        }
        config
    }

    pub fn is_enabled(&self, name: TransformerName) -> bool {
        self.enabled[name.index()]
    }

    pub fn set(&mut self, name: TransformerName, enabled: bool) {
        self.enabled[name.index()] = enabled;
    }

    /// `(name, enabled)` in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (TransformerName, bool)> + '_ {
        CATALOG
            .iter()
            .map(|entry| (entry.name, self.is_enabled(entry.name)))
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled.iter().filter(|e| **e).count()
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        TransformConfig::defaults()
    }
}

/// A JSON object keyed by transformer name, in catalog order.
impl Serialize for TransformConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(TransformerName::COUNT))?;
        for (name, enabled) in self.iter() {
            map.serialize_entry(name.as_str(), &enabled)?;
        }
        map.end()
    }
}

/// Resolve raw selections against the catalog.
///
/// - `selected` and `disabled` are mutually exclusive.
/// - `selected` enables exactly the named transformers.
/// - `disabled` turns the named transformers off, starting from the defaults.
/// - `module_mode` `"commonjs"` enables both CommonJS transforms, overriding
///   the lists. An empty string counts as absent.
pub fn resolve<S: AsRef<str>>(
    selected: Option<&[S]>,
    disabled: Option<&[S]>,
    module_mode: Option<&str>,
) -> Result<TransformConfig, ConfigError> {
    if selected.is_some() && disabled.is_some() {
        return Err(ConfigError::ConflictingOptions);
    }

    let mut config = TransformConfig::defaults();

    if let Some(names) = selected {
        config = TransformConfig::none();
        set_enabled(&mut config, names, true)?;
    }

    if let Some(names) = disabled {
        set_enabled(&mut config, names, false)?;
    }

    match module_mode {
        None | Some("") => {}
        Some(COMMONJS) => {
            config.set(TransformerName::ImportCommonjs, true);
            config.set(TransformerName::ExportCommonjs, true);
        }
        Some(other) => return Err(ConfigError::UnsupportedModuleSystem(other.to_string())),
    }

    tracing::debug!(enabled = config.enabled_count(), "resolved transform config");
    Ok(config)
}

fn set_enabled<S: AsRef<str>>(
    config: &mut TransformConfig,
    names: &[S],
    enabled: bool,
) -> Result<(), ConfigError> {
    for name in names {
        let name = name.as_ref();
        let Some(transformer) = TransformerName::from_name(name) else {
            return Err(ConfigError::UnknownTransformer(name.to_string()));
        };
        config.set(transformer, enabled);
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

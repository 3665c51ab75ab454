//! Opaque `config_settings` forwarded by the packaging frontend.

use std::collections::BTreeMap;
use std::str::FromStr;

/// Frontend-supplied `KEY=VALUE` settings.
///
/// The build hooks accept these for interface compatibility; nothing in the
/// build consumes them beyond logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSettings(BTreeMap<String, String>);

impl ConfigSettings {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A single `KEY=VALUE` (or bare `KEY`) setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingError {
    #[error("invalid config setting `{raw}`: expected KEY=VALUE with a non-empty KEY")]
    EmptyKey { raw: String },
}

impl FromStr for Setting {
    type Err = SettingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (key, value) = raw.split_once('=').unwrap_or((raw, ""));
        let key = key.trim();
        if key.is_empty() {
            return Err(SettingError::EmptyKey {
                raw: raw.to_owned(),
            });
        }
        Ok(Self {
            key: key.to_owned(),
            value: value.to_owned(),
        })
    }
}

/// Later settings for the same key replace earlier ones.
impl FromIterator<Setting> for ConfigSettings {
    fn from_iter<I: IntoIterator<Item = Setting>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| (s.key, s.value)).collect())
    }
}

//! Configuration store
//!
//! Generic typed key/value store with ordered string groups and named child
//! configurations. All operations are local to the store: no I/O, no global
//! state, no synchronisation (callers serialise concurrent mutation).

use std::collections::{BTreeMap, HashMap};

use contracts::{ContractError, Quatf, Result, Vec3f};

use crate::value::{ConfigEntry, ConfigKind, ConfigType, ConfigValue};

/// Typed key/value store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    values: HashMap<String, ConfigEntry>,
    groups: BTreeMap<String, Configuration>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a scalar under `key`.
    ///
    /// Returns `true` when the key already held content (scalar or group),
    /// which is replaced.
    pub fn set<T: Into<ConfigValue>>(&mut self, key: impl Into<String>, value: T) -> bool {
        self.values
            .insert(key.into(), ConfigEntry::Scalar(value.into()))
            .is_some()
    }

    /// Scalar stored under `key` as `T`.
    ///
    /// # Errors
    /// - `KeyNotFound` when nothing is stored under `key`
    /// - `TypeMismatch` when the stored kind is not `T`
    pub fn get<T: ConfigType>(&self, key: &str) -> Result<T> {
        match self.values.get(key) {
            None => Err(ContractError::key_not_found(key)),
            Some(ConfigEntry::Scalar(value)) => T::from_value(value)
                .ok_or_else(|| ContractError::type_mismatch(key, T::KIND, value.kind())),
            Some(ConfigEntry::Group(_)) => Err(ContractError::type_mismatch(
                key,
                T::KIND,
                ConfigKind::Group,
            )),
        }
    }

    /// Append `value` to the string group under `key` and return the new size.
    ///
    /// A scalar string already stored under `key` becomes the first element.
    ///
    /// # Errors
    /// `TypeMismatch` when `key` holds a non-string scalar.
    pub fn add_string_to_group(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<usize> {
        let key = key.into();
        let value = value.into();
        match self.values.get_mut(&key) {
            None => {
                self.values.insert(key, ConfigEntry::Group(vec![value]));
                Ok(1)
            }
            Some(ConfigEntry::Group(items)) => {
                items.push(value);
                Ok(items.len())
            }
            Some(entry) => match entry {
                ConfigEntry::Scalar(ConfigValue::String(first)) => {
                    let items = vec![std::mem::take(first), value];
                    let len = items.len();
                    *entry = ConfigEntry::Group(items);
                    Ok(len)
                }
                other => Err(ContractError::type_mismatch(
                    &key,
                    ConfigKind::Group,
                    other.kind(),
                )),
            },
        }
    }

    /// Strings of the group under `key`, in insertion order.
    ///
    /// A scalar string reads as a one-element group. Absent keys and
    /// non-string scalars yield an empty sequence.
    pub fn get_string_group(&self, key: &str) -> Vec<String> {
        match self.values.get(key) {
            Some(ConfigEntry::Group(items)) => items.clone(),
            Some(ConfigEntry::Scalar(ConfigValue::String(value))) => vec![value.clone()],
            _ => Vec::new(),
        }
    }

    pub fn has_value(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Delete whatever is stored under `key`; returns whether anything was.
    pub fn remove_value(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    /// Raw scalar under `key`
    pub fn value(&self, key: &str) -> Option<&ConfigValue> {
        match self.values.get(key) {
            Some(ConfigEntry::Scalar(value)) => Some(value),
            _ => None,
        }
    }

    pub fn entry(&self, key: &str) -> Option<&ConfigEntry> {
        self.values.get(key)
    }

    pub fn kind(&self, key: &str) -> Option<ConfigKind> {
        self.values.get(key).map(ConfigEntry::kind)
    }

    /// Keys in sorted order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Entries in sorted key order
    pub fn entries(&self) -> Vec<(&str, &ConfigEntry)> {
        let mut entries: Vec<(&str, &ConfigEntry)> = self
            .values
            .iter()
            .map(|(key, entry)| (key.as_str(), entry))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Number of keys (child configurations not included)
    pub fn key_count(&self) -> usize {
        self.values.len()
    }

    /// No keys and no child configurations
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.groups.is_empty()
    }

    // ===== Child configurations =====

    pub fn group(&self, name: &str) -> Option<&Configuration> {
        self.groups.get(name)
    }

    /// Child configuration `name`, created empty if absent
    pub fn group_mut(&mut self, name: impl Into<String>) -> &mut Configuration {
        self.groups.entry(name.into()).or_default()
    }

    /// Nested child configuration, creating every missing level
    pub fn group_path_mut<S: AsRef<str>>(&mut self, path: &[S]) -> &mut Configuration {
        path.iter()
            .fold(self, |cfg, name| cfg.group_mut(name.as_ref()))
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    pub fn remove_group(&mut self, name: &str) -> Option<Configuration> {
        self.groups.remove(name)
    }

    /// Child names in sorted order
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &Configuration)> {
        self.groups.iter().map(|(name, cfg)| (name.as_str(), cfg))
    }

    // ===== Typed accessors =====

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) -> bool {
        self.set(key, value)
    }

    pub fn set_float(&mut self, key: impl Into<String>, value: f32) -> bool {
        self.set(key, value)
    }

    pub fn set_double(&mut self, key: impl Into<String>, value: f64) -> bool {
        self.set(key, value)
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i32) -> bool {
        self.set(key, value)
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        self.set(key, value.into())
    }

    pub fn set_vec3(&mut self, key: impl Into<String>, value: Vec3f) -> bool {
        self.set(key, value)
    }

    pub fn set_quat(&mut self, key: impl Into<String>, value: Quatf) -> bool {
        self.set(key, value)
    }

    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.get(key)
    }

    pub fn get_float(&self, key: &str) -> Result<f32> {
        self.get(key)
    }

    pub fn get_double(&self, key: &str) -> Result<f64> {
        self.get(key)
    }

    pub fn get_int(&self, key: &str) -> Result<i32> {
        self.get(key)
    }

    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get(key)
    }

    pub fn get_vec3(&self, key: &str) -> Result<Vec3f> {
        self.get(key)
    }

    pub fn get_quat(&self, key: &str) -> Result<Quatf> {
        self.get(key)
    }
}

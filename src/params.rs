//! Ordered kernel parameter set: parsing and canonical serialization.
//!
//! A command line is a sequence of whitespace-separated `key[=value]` tokens.
//! Only the first `=` separates key from value, so `root=ZFS=/rpool/ROOT`
//! keeps `ZFS=/rpool/ROOT` as the value. A bare `quiet` is a flag (no value)
//! and is distinct from `quiet=`, which carries an explicit empty value.
//!
//! Entries keep first-seen order. Inserting an existing key overwrites its
//! value in place; new keys append at the end.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::error::{CmdlineError, Result};

/// Ordered mapping of parameter name to optional value.
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    entries: Vec<(String, Option<String>)>,
    index: HashMap<String, usize>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw command line text.
    ///
    /// Duplicate keys collapse to the last occurrence's value, held at the
    /// position of the first occurrence.
    pub fn parse(text: &str) -> Self {
        text.split_whitespace().map(split_token).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Look up a parameter.
    ///
    /// The outer `Option` is presence; the inner one is the value, `None`
    /// meaning a bare flag.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.index
            .get(name)
            .map(|&pos| self.entries[pos].1.as_deref())
    }

    /// Insert or overwrite a parameter, returning the previous value if the
    /// key was already present.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: Option<String>,
    ) -> Option<Option<String>> {
        let name = name.into();
        if let Some(&pos) = self.index.get(&name) {
            return Some(std::mem::replace(&mut self.entries[pos].1, value));
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, value));
        None
    }

    /// Remove a parameter, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Option<String>> {
        let pos = self.index.remove(name)?;
        let (_, value) = self.entries.remove(pos);
        for (key, _) in &self.entries[pos..] {
            if let Some(slot) = self.index.get_mut(key) {
                *slot -= 1;
            }
        }
        Some(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    /// Canonical single-line form: tokens joined by one space, no trailing
    /// newline. An empty set yields the empty string.
    pub fn to_cmdline(&self) -> String {
        self.to_string()
    }
}

/// Read and parse the parameter file at `path`.
pub fn read_parameters(path: &Path) -> Result<ParameterSet> {
    let text = fs::read_to_string(path)
        .map_err(|err| CmdlineError::io("reading kernel cmdline", path, err))?;
    let set = ParameterSet::parse(&text);
    debug!(path = %path.display(), parameters = set.len(), "parsed kernel cmdline");
    Ok(set)
}

fn split_token(token: &str) -> (String, Option<String>) {
    match token.split_once('=') {
        Some((key, value)) => (key.to_string(), Some(value.to_string())),
        None => (token.to_string(), None),
    }
}

impl PartialEq for ParameterSet {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for ParameterSet {}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match value {
                Some(value) => write!(f, "{key}={value}")?,
                None => f.write_str(key)?,
            }
        }
        Ok(())
    }
}

impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, &value)?;
        }
        map.end()
    }
}

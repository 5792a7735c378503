//! KVMap type.
//!
//! Flat key → value projection of a secret, without payload flags. Used
//! for export (.env, JSON) and for reading .env files before a push.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

/// A flat mapping of secret keys to plain string values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KVMap {
    entries: BTreeMap<String, String>,
}

impl KVMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse .env text.
    ///
    /// Skips empty lines and comments (lines starting with #). Supports
    /// values with or without quotes, and an optional `export ` prefix.
    pub fn from_dotenv(contents: &str) -> Self {
        let mut map = Self::new();

        for line in contents.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);
            if let Some((key, value)) = line.split_once('=') {
                map.insert(key.trim(), parse_env_value(value.trim()));
            }
        }

        map
    }

    /// Read and parse a .env file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read.
    pub fn load_dotenv(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::from_dotenv(&contents))
    }

    /// Serialize to .env format.
    ///
    /// Quotes values that contain whitespace or .env-special characters.
    pub fn to_dotenv(&self) -> String {
        let mut output = String::new();

        for (key, value) in &self.entries {
            if needs_quotes(value) {
                output.push_str(&format!("{}=\"{}\"\n", key, escape_env_value(value)));
            } else {
                output.push_str(&format!("{}={}\n", key, value));
            }
        }

        output
    }

    /// Serialize to a pretty JSON object with sorted keys.
    pub fn to_json(&self) -> String {
        // BTreeMap<String, String> always serializes
        serde_json::to_string_pretty(&self.entries).unwrap_or_else(|_| "{}".to_string())
    }
}

impl FromIterator<(String, String)> for KVMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for KVMap {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl std::fmt::Display for KVMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_dotenv())
    }
}

fn parse_env_value(raw: &str) -> String {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return unescape_double_quoted(&raw[1..raw.len() - 1]);
    }

    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return raw[1..raw.len() - 1].to_string();
    }

    raw.to_string()
}

fn unescape_double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value.chars().any(|ch| ch.is_whitespace())
        || value.contains(['#', '=', '"', '\'', '\\'])
}

fn escape_env_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(ch),
        }
    }

    escaped
}

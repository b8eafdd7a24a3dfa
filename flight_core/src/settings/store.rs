//! Typed `key=type,raw` store.
//!
//! Malformed or unknown lines are dropped on load with a warning; typed
//! getters fall back to the caller's default when a key is missing or holds
//! another type. Strings escape backslash and newline.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use flight_common::prelude::ModuleId;
use tracing::{debug, warn};

use super::SettingsError;

#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    String(String),
    Integer(i64),
    Decimal(f64),
    Vector4([f64; 4]),
    Boolean(bool),
}

impl SettingValue {
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Decimal(_) => "decimal",
            Self::Vector4(_) => "vector4",
            Self::Boolean(_) => "boolean",
        }
    }

    fn parse(type_name: &str, raw: &str) -> Option<Self> {
        match type_name {
            "string" => unescape(raw).map(Self::String),
            "integer" => raw.trim().parse().ok().map(Self::Integer),
            "decimal" => raw.trim().parse().ok().map(Self::Decimal),
            "boolean" => match raw.trim().to_ascii_lowercase().as_str() {
                "true" => Some(Self::Boolean(true)),
                "false" => Some(Self::Boolean(false)),
                _ => None,
            },
            "vector4" => {
                let mut out = [0.0; 4];
                let mut parts = raw.split(',');
                for slot in &mut out {
                    *slot = parts.next()?.trim().parse().ok()?;
                }
                parts.next().is_none().then_some(Self::Vector4(out))
            }
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    /// Raw value part of a line (after `type,`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(&escape(s)),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Vector4([a, b, c, d]) => write!(f, "{a},{b},{c},{d}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\n', "\\n")
}

fn unescape(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '\\' => out.push('\\'),
            'n' => out.push('\n'),
            _ => return None,
        }
    }
    Some(out)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsStore {
    entries: BTreeMap<String, SettingValue>,
    rejected: usize,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a settings document. Never fails; bad lines are counted in
    /// [`rejected`](Self::rejected) and skipped.
    pub fn parse(text: &str) -> Self {
        let mut store = Self::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let parsed = line.split_once('=').and_then(|(key, rest)| {
                let (type_name, raw) = rest.split_once(',')?;
                let key = key.trim();
                if key.is_empty() {
                    return None;
                }
                Some((key, SettingValue::parse(type_name.trim(), raw)?))
            });
            match parsed {
                Some((key, value)) => {
                    store.entries.insert(key.to_string(), value);
                }
                None => {
                    store.rejected += 1;
                    warn!(line = index + 1, "dropping malformed settings line: {line:?}");
                }
            }
        }
        store
    }

    /// Missing file loads as an empty store.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let store = Self::parse(&text);
                debug!(path = %path.display(), entries = store.len(), "settings loaded");
                Ok(store)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, starting empty");
                Ok(Self::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_text())?;
        debug!(path = %path.display(), entries = self.len(), "settings saved");
        Ok(())
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(&format!("{key}={},{value}\n", value.type_name()));
        }
        out
    }

    /// Lines dropped by the last parse.
    #[inline]
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.entries.get(key)
    }

    /// Keys may not contain `=` or line breaks; such writes are ignored.
    pub fn set(&mut self, key: &str, value: SettingValue) {
        if key.is_empty() || key.contains(['=', '\n', '\r']) {
            warn!("refusing to store setting with invalid key {key:?}");
            return;
        }
        self.entries.insert(key.to_string(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<SettingValue> {
        self.entries.remove(key)
    }

    fn typed<T>(&self, key: &str, default: T, pick: impl FnOnce(&SettingValue) -> Option<T>) -> T {
        match self.entries.get(key) {
            None => default,
            Some(value) => pick(value).unwrap_or_else(|| {
                warn!("setting {key} holds a {}, using default", value.type_name());
                default
            }),
        }
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.typed(key, default.to_string(), |v| match v {
            SettingValue::String(s) => Some(s.clone()),
            _ => None,
        })
    }

    pub fn get_integer(&self, key: &str, default: i64) -> i64 {
        self.typed(key, default, |v| match v {
            SettingValue::Integer(i) => Some(*i),
            _ => None,
        })
    }

    /// Integers widen to decimals.
    pub fn get_decimal(&self, key: &str, default: f64) -> f64 {
        self.typed(key, default, |v| match v {
            SettingValue::Decimal(d) => Some(*d),
            SettingValue::Integer(i) => Some(*i as f64),
            _ => None,
        })
    }

    pub fn get_vector4(&self, key: &str, default: [f64; 4]) -> [f64; 4] {
        self.typed(key, default, |v| match v {
            SettingValue::Vector4(v) => Some(*v),
            _ => None,
        })
    }

    pub fn get_boolean(&self, key: &str, default: bool) -> bool {
        self.typed(key, default, |v| match v {
            SettingValue::Boolean(b) => Some(*b),
            _ => None,
        })
    }
}

// ─── Per-module View ────────────────────────────────────────────────

/// A module's view of the global store; every key is prefixed `"{module}."`.
pub struct SettingsScope<'a> {
    store: &'a mut SettingsStore,
    module: ModuleId,
}

impl<'a> SettingsScope<'a> {
    pub fn new(store: &'a mut SettingsStore, module: ModuleId) -> Self {
        Self { store, module }
    }

    #[inline]
    pub fn module(&self) -> ModuleId {
        self.module
    }

    fn key(&self, name: &str) -> String {
        format!("{}.{name}", self.module)
    }

    pub fn set(&mut self, name: &str, value: SettingValue) {
        let key = self.key(name);
        self.store.set(&key, value);
    }

    pub fn set_string(&mut self, name: &str, value: &str) {
        self.set(name, SettingValue::String(value.to_string()));
    }

    pub fn set_integer(&mut self, name: &str, value: i64) {
        self.set(name, SettingValue::Integer(value));
    }

    pub fn set_decimal(&mut self, name: &str, value: f64) {
        self.set(name, SettingValue::Decimal(value));
    }

    pub fn set_vector4(&mut self, name: &str, value: [f64; 4]) {
        self.set(name, SettingValue::Vector4(value));
    }

    pub fn set_boolean(&mut self, name: &str, value: bool) {
        self.set(name, SettingValue::Boolean(value));
    }

    pub fn get_string(&self, name: &str, default: &str) -> String {
        self.store.get_string(&self.key(name), default)
    }

    pub fn get_integer(&self, name: &str, default: i64) -> i64 {
        self.store.get_integer(&self.key(name), default)
    }

    pub fn get_decimal(&self, name: &str, default: f64) -> f64 {
        self.store.get_decimal(&self.key(name), default)
    }

    pub fn get_vector4(&self, name: &str, default: [f64; 4]) -> [f64; 4] {
        self.store.get_vector4(&self.key(name), default)
    }

    pub fn get_boolean(&self, name: &str, default: bool) -> bool {
        self.store.get_boolean(&self.key(name), default)
    }
}

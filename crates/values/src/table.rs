//! The ordered label/code table and its list serialization.

use crate::error::ValuesError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Separator between label and code in the serialized list form.
pub const LIST_SEPARATOR: char = '\t';

/// One menu entry: what the user sees and what gets written to the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    pub label: Cow<'static, str>,
    pub value: Cow<'static, str>,
}

impl Value {
    pub const fn new_static(label: &'static str, value: &'static str) -> Self {
        Self {
            label: Cow::Borrowed(label),
            value: Cow::Borrowed(value),
        }
    }

    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: Cow::Owned(label.into()),
            value: Cow::Owned(value.into()),
        }
    }

    /// The label without its mnemonic marker.
    pub fn display_label(&self) -> String {
        display_label(&self.label)
    }
}

/// Strips the first `_` mnemonic marker from a menu label. A doubled `__`
/// stands for a literal underscore.
pub fn display_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut chars = label.chars().peekable();
    let mut mnemonic_seen = false;
    while let Some(c) = chars.next() {
        if c == '_' {
            if chars.peek() == Some(&'_') {
                chars.next();
                out.push('_');
                continue;
            }
            if !mnemonic_seen {
                mnemonic_seen = true;
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// An ordered table of [`Value`]s. The order is the menu order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueTable {
    entries: Vec<Value>,
}

impl ValueTable {
    pub fn new(entries: Vec<Value>) -> Self {
        Self { entries }
    }

    /// Builds a table that borrows the given static label/code pairs.
    pub fn from_static(pairs: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|&(label, value)| Value::new_static(label, value))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.entries.get(index)
    }

    /// Returns the code stored at `index`, or `None` when out of bounds.
    pub fn index_to_value(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|v| v.value.as_ref())
    }

    /// Returns the position of the first entry with the given code.
    ///
    /// An absent code selects the first entry, which is the "None" entry of
    /// every built-in table. An unknown code yields `None`.
    pub fn value_to_index(&self, value: Option<&str>) -> Option<usize> {
        let Some(value) = value else {
            return Some(0);
        };
        self.entries.iter().position(|v| v.value == value)
    }

    /// Finds the entry for a code.
    pub fn find(&self, value: &str) -> Option<&Value> {
        self.entries.iter().find(|v| v.value == value)
    }

    /// Serializes every entry as `label<TAB>code`, in table order.
    pub fn to_tab_list(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|v| format!("{}{}{}", v.label, LIST_SEPARATOR, v.value))
            .collect()
    }

    /// Parses the output of [`ValueTable::to_tab_list`]. Each item is split
    /// at its first TAB, so codes may themselves contain TABs.
    pub fn from_tab_list<S: AsRef<str>>(items: &[S]) -> Result<Self, ValuesError> {
        if items.is_empty() {
            return Err(ValuesError::EmptyList);
        }
        let mut entries = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let item = item.as_ref();
            let (label, value) =
                item.split_once(LIST_SEPARATOR)
                    .ok_or_else(|| ValuesError::MissingSeparator {
                        index,
                        item: item.to_string(),
                    })?;
            log::debug!("from_tab_list: label '{}' value '{}'", label, value);
            entries.push(Value::new(label, value));
        }
        Ok(Self { entries })
    }
}

impl<'t> IntoIterator for &'t ValueTable {
    type Item = &'t Value;
    type IntoIter = std::slice::Iter<'t, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

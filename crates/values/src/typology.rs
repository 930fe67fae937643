//! The typologies the editor knows, and the set of active tables.

use crate::defaults;
use crate::error::ValuesError;
use crate::table::{Value, ValueTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Typology {
    #[serde(rename = "pos")]
    PartOfSpeech,
    #[serde(rename = "gen")]
    Gender,
    #[serde(rename = "num")]
    Number,
    Domain,
    Register,
    #[serde(rename = "xr")]
    CrossReference,
}

/// Where a typology's code ends up in a TEI entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeiEncoding {
    /// The code is the text content of `element`, e.g. `<pos>n</pos>`, with an
    /// optional fixed `type` attribute, e.g. `<usg type="dom">agr</usg>`.
    Content {
        element: &'static str,
        type_attr: Option<&'static str>,
    },
    /// The code is the `type` attribute of `element`, e.g. `<xr type="syn">`.
    TypeAttribute { element: &'static str },
}

impl Typology {
    pub const ALL: [Typology; 6] = [
        Typology::PartOfSpeech,
        Typology::Gender,
        Typology::Number,
        Typology::Domain,
        Typology::Register,
        Typology::CrossReference,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Typology::PartOfSpeech => "pos",
            Typology::Gender => "gen",
            Typology::Number => "num",
            Typology::Domain => "domain",
            Typology::Register => "register",
            Typology::CrossReference => "xr",
        }
    }

    pub fn encoding(self) -> TeiEncoding {
        match self {
            Typology::PartOfSpeech => TeiEncoding::Content {
                element: "pos",
                type_attr: None,
            },
            Typology::Gender => TeiEncoding::Content {
                element: "gen",
                type_attr: None,
            },
            Typology::Number => TeiEncoding::Content {
                element: "number",
                type_attr: None,
            },
            Typology::Domain => TeiEncoding::Content {
                element: "usg",
                type_attr: Some("dom"),
            },
            Typology::Register => TeiEncoding::Content {
                element: "usg",
                type_attr: Some("reg"),
            },
            Typology::CrossReference => TeiEncoding::TypeAttribute { element: "xr" },
        }
    }

    /// The built-in table for this typology.
    pub fn default_table(self) -> ValueTable {
        let pairs = match self {
            Typology::PartOfSpeech => defaults::PART_OF_SPEECH,
            Typology::Gender => defaults::GENDER,
            Typology::Number => defaults::NUMBER,
            Typology::Domain => defaults::DOMAIN,
            Typology::Register => defaults::REGISTER,
            Typology::CrossReference => defaults::CROSS_REFERENCE,
        };
        ValueTable::from_static(pairs)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Typology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Typology {
    type Err = ValuesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Typology::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| ValuesError::UnknownTypology(s.to_string()))
    }
}

/// The tables currently backing the editor's menus, one per typology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueTables {
    tables: [ValueTable; 6],
}

impl Default for ValueTables {
    fn default() -> Self {
        Self {
            tables: Typology::ALL.map(Typology::default_table),
        }
    }
}

impl ValueTables {
    pub fn get(&self, typology: Typology) -> &ValueTable {
        &self.tables[typology.slot()]
    }

    pub fn set(&mut self, typology: Typology, table: ValueTable) {
        log::debug!("Replacing {} table ({} entries)", typology, table.len());
        self.tables[typology.slot()] = table;
    }

    /// Restores the built-in table for `typology`.
    pub fn reset(&mut self, typology: Typology) {
        self.tables[typology.slot()] = typology.default_table();
    }

    /// Replaces a table from its `label<TAB>code` list form.
    pub fn load_tab_list<S: AsRef<str>>(
        &mut self,
        typology: Typology,
        items: &[S],
    ) -> Result<(), ValuesError> {
        let table = ValueTable::from_tab_list(items)?;
        self.set(typology, table);
        Ok(())
    }

    /// Checks that `value` is a known code of `typology`.
    pub fn validate(&self, typology: Typology, value: &str) -> Result<&Value, ValuesError> {
        self.get(typology)
            .find(value)
            .ok_or_else(|| ValuesError::UnknownValue {
                typology: typology.to_string(),
                value: value.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (Typology, &ValueTable)> {
        Typology::ALL.into_iter().zip(self.tables.iter())
    }
}

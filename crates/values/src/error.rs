use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValuesError {
    #[error("Item {index} ('{item}') has no TAB between label and value")]
    MissingSeparator { index: usize, item: String },

    #[error("Cannot build a value table from an empty list")]
    EmptyList,

    #[error("Unknown value '{value}' for typology {typology}")]
    UnknownValue { typology: String, value: String },

    #[error("Unknown typology '{0}'")]
    UnknownTypology(String),
}

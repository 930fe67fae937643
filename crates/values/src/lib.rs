//! Label/code tables for the TEI typologies the editor offers in its menus.
//!
//! Each table maps a human readable label (possibly carrying a `_` mnemonic
//! marker) to the short code written into the dictionary file. The first
//! entry of every built-in table carries the empty code and stands for
//! "nothing selected".

pub mod defaults;
pub mod error;
pub mod table;
pub mod typology;

pub use error::ValuesError;
pub use table::{Value, ValueTable, display_label};
pub use typology::{TeiEncoding, Typology, ValueTables};

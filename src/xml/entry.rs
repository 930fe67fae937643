use super::leaf::copy_node_to_doc;
use super::session::XPathSession;
use crate::error::EditorError;
use freedict_dom::{Document, NodeId};

const ORTH_PATH: &str = "/entry/form/orth";

impl XPathSession {
    /// The headwords of `entry` joined with `", "`, cut to `max_chars`
    /// characters.
    pub fn entry_orths_to_string(
        &self,
        doc: &Document,
        entry: NodeId,
        max_chars: usize,
    ) -> Result<String, EditorError> {
        // Evaluated on a copy so the absolute path only sees this entry.
        let copy = copy_node_to_doc(doc, entry)?;
        let orths = self.find_strings(&copy, copy.root(), ORTH_PATH)?;
        if orths.is_empty() {
            return Err(EditorError::NoOrthNodes(entry));
        }
        Ok(orths.join(", ").chars().take(max_chars).collect())
    }
}

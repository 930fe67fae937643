//! Dictionary-wide sanity checks.
//!
//! A check is an XPath expression selecting offending nodes, usually
//! `entry` elements. Reports name each offender by its headwords.

use crate::error::EditorError;
use crate::xml::XPathSession;
use crate::xml::braces::UNBALANCED_BRACES;
use freedict_dom::{Document, NodeId};
use freedict_values::{TeiEncoding, Typology, ValueTables};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanityCheck {
    pub name: String,
    pub xpath: String,
}

impl SanityCheck {
    pub fn new(name: &str, xpath: &str) -> Self {
        Self {
            name: name.to_string(),
            xpath: xpath.to_string(),
        }
    }

    /// Entries with an unbalanced brace in a headword, translation, note,
    /// definition or quotation.
    pub fn unbalanced_braces(prefix: &str) -> Self {
        Self::new(
            "Unbalanced braces",
            &format!(
                "//entry[{prefix}:{UNBALANCED_BRACES}(.//orth | .//tr | .//note | .//def | .//q)]"
            ),
        )
    }
}

pub fn default_checks(prefix: &str) -> Vec<SanityCheck> {
    vec![SanityCheck::unbalanced_braces(prefix)]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offender {
    pub node: NodeId,
    /// `None` when the node is not an entry or has no `form/orth`.
    pub headword: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanityReport {
    pub check: String,
    pub offenders: Vec<Offender>,
}

impl SanityReport {
    pub fn passed(&self) -> bool {
        self.offenders.is_empty()
    }
}

/// Runs every check against `doc`. A failing expression aborts the run.
pub fn run_checks(
    session: &XPathSession,
    doc: &Document,
    checks: &[SanityCheck],
    headword_length: usize,
) -> Result<Vec<SanityReport>, EditorError> {
    checks
        .iter()
        .map(|check| {
            let nodes = session.find_node_set(doc, &check.xpath)?;
            log::info!("Sanity check '{}': {} offender(s)", check.name, nodes.len());
            let offenders = nodes
                .into_iter()
                .map(|node| Offender {
                    node,
                    headword: headword(session, doc, node, headword_length),
                })
                .collect();
            Ok(SanityReport {
                check: check.name.clone(),
                offenders,
            })
        })
        .collect()
}

fn headword(session: &XPathSession, doc: &Document, node: NodeId, max_chars: usize) -> Option<String> {
    if doc.local_name(node) != Some("entry") {
        return None;
    }
    match session.entry_orths_to_string(doc, node, max_chars) {
        Ok(s) => Some(s),
        Err(e) => {
            log::debug!("No headword for {:?}: {}", node, e);
            None
        }
    }
}

/// A typology code found in the document that its table does not know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueViolation {
    pub typology: Typology,
    pub node: NodeId,
    pub value: String,
}

/// XPath selecting the nodes that carry codes of `typology`.
fn typology_path(typology: Typology) -> String {
    match typology.encoding() {
        TeiEncoding::Content {
            element,
            type_attr: Some(t),
        } => format!("//{element}[@type='{t}']"),
        TeiEncoding::Content { element, type_attr: None } => format!("//{element}"),
        TeiEncoding::TypeAttribute { element } => format!("//{element}[@type]"),
    }
}

/// Checks every typology code in `doc` against `tables`.
pub fn check_values(
    session: &XPathSession,
    doc: &Document,
    tables: &ValueTables,
) -> Result<Vec<ValueViolation>, EditorError> {
    let mut violations = Vec::new();
    for typology in Typology::ALL {
        for node in session.find_node_set(doc, &typology_path(typology))? {
            let value = match typology.encoding() {
                TeiEncoding::Content { .. } => doc.text_content(node).trim().to_string(),
                TeiEncoding::TypeAttribute { .. } => doc.attribute(node, "type").unwrap_or_default().to_string(),
            };
            if let Err(e) = tables.validate(typology, &value) {
                log::debug!("{}", e);
                violations.push(ValueViolation { typology, node, value });
            }
        }
    }
    Ok(violations)
}

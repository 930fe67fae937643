//! XPath evaluation over a [`Document`] with the editor's extension
//! functions bound, plus a handle for stopping a running query.

use super::braces::{DEFAULT_MAX_DEPTH, UNBALANCED_BRACES, unbalanced_braces_function};
use crate::config::{EditorConfig, FREEDICT_EDITOR_NAMESPACE, FREEDICT_EDITOR_NAMESPACE_PREFIX};
use crate::error::EditorError;
use freedict_dom::{Document, DomNode, NodeId};
use freedict_xpath1::{DataSourceNode, EvaluationContext, FunctionRegistry, XPathValue, evaluate, parse_expression};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// The query a session is currently evaluating.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveQuery {
    pub xpath: String,
    pub started: Instant,
}

impl ActiveQuery {
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Shared view of a session's running query. Clones share state, so one
/// can be handed to another thread to watch or interrupt evaluation.
#[derive(Debug, Clone, Default)]
pub struct QueryMonitor {
    active: Arc<Mutex<Option<ActiveQuery>>>,
    interrupt: Arc<AtomicBool>,
}

impl QueryMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<ActiveQuery>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn active_query(&self) -> Option<ActiveQuery> {
        self.slot().clone()
    }

    pub fn is_running(&self) -> bool {
        self.slot().is_some()
    }

    /// Asks the running query to stop. Returns false when nothing is running.
    pub fn interrupt(&self) -> bool {
        let active = self.slot();
        match active.as_ref() {
            Some(query) => {
                log::info!("Interrupting XPath query '{}'", query.xpath);
                self.interrupt.store(true, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    fn begin(&self, xpath: &str) -> RunningQuery<'_> {
        let mut active = self.slot();
        self.interrupt.store(false, Ordering::Relaxed);
        *active = Some(ActiveQuery {
            xpath: xpath.to_string(),
            started: Instant::now(),
        });
        RunningQuery { monitor: self }
    }
}

/// Clears the monitor's record when evaluation ends, however it ends.
struct RunningQuery<'m> {
    monitor: &'m QueryMonitor,
}

impl RunningQuery<'_> {
    fn flag(&self) -> &AtomicBool {
        &self.monitor.interrupt
    }
}

impl Drop for RunningQuery<'_> {
    fn drop(&mut self) {
        if let Some(query) = self.monitor.slot().take() {
            log::debug!("XPath query '{}' took {:?}", query.xpath, query.elapsed());
        }
    }
}

/// Evaluates XPath expressions with the editor namespace and its
/// extension functions bound.
///
/// A clone shares the bindings but gets its own [`QueryMonitor`].
#[derive(Debug)]
pub struct XPathSession {
    registry: FunctionRegistry,
    monitor: QueryMonitor,
}

impl Clone for XPathSession {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            monitor: QueryMonitor::new(),
        }
    }
}

impl Default for XPathSession {
    fn default() -> Self {
        Self::new()
    }
}

impl XPathSession {
    /// A session binding `fd` to the editor namespace.
    pub fn new() -> Self {
        let mut registry = FunctionRegistry::new();
        if let Err(e) = registry.register_namespace(FREEDICT_EDITOR_NAMESPACE_PREFIX, FREEDICT_EDITOR_NAMESPACE) {
            log::warn!("Unable to register namespace prefix: {}", e);
        }
        register_extensions(&mut registry, FREEDICT_EDITOR_NAMESPACE, DEFAULT_MAX_DEPTH);
        Self {
            registry,
            monitor: QueryMonitor::new(),
        }
    }

    pub fn from_config(config: &EditorConfig) -> Result<Self, EditorError> {
        let mut registry = FunctionRegistry::new();
        registry.register_namespace(&config.namespace_prefix, &config.namespace_uri)?;
        register_extensions(&mut registry, &config.namespace_uri, config.max_brace_depth);
        Ok(Self {
            registry,
            monitor: QueryMonitor::new(),
        })
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.registry
    }

    pub fn monitor(&self) -> &QueryMonitor {
        &self.monitor
    }

    /// Evaluates `xpath` with `context` as the context node.
    pub fn evaluate<'a>(
        &self,
        doc: &'a Document,
        context: NodeId,
        xpath: &str,
    ) -> Result<XPathValue<DomNode<'a>>, EditorError> {
        let expr = parse_expression(xpath)?;
        let running = self.monitor.begin(xpath);
        let ctx = EvaluationContext::new(doc.node(context), doc.node(doc.root()), &self.registry)
            .with_interrupt(running.flag());
        Ok(evaluate(&expr, &ctx)?)
    }

    /// All nodes matched by `xpath`, evaluated from the document node, in
    /// document order. Empty when nothing matches.
    pub fn find_node_set(&self, doc: &Document, xpath: &str) -> Result<Vec<NodeId>, EditorError> {
        self.find_node_set_from(doc, doc.root(), xpath)
    }

    /// Like [`find_node_set`](Self::find_node_set) with `context` as the
    /// context node. Attribute nodes are not returned.
    pub fn find_node_set_from(
        &self,
        doc: &Document,
        context: NodeId,
        xpath: &str,
    ) -> Result<Vec<NodeId>, EditorError> {
        match self.evaluate(doc, context, xpath)? {
            XPathValue::NodeSet(nodes) => {
                let total = nodes.len();
                let ids: Vec<NodeId> = nodes
                    .into_iter()
                    .filter(|n| !n.is_attribute())
                    .map(|n| n.id())
                    .collect();
                if ids.len() < total {
                    log::debug!("'{}': skipped {} attribute node(s)", xpath, total - ids.len());
                }
                Ok(ids)
            }
            other => Err(EditorError::NotANodeSet {
                xpath: xpath.to_string(),
                found: other.type_name(),
            }),
        }
    }

    /// The first node matched by `xpath`, if any.
    pub fn find_single_node(&self, doc: &Document, xpath: &str) -> Result<Option<NodeId>, EditorError> {
        let nodes = self.find_node_set(doc, xpath)?;
        if nodes.len() > 1 {
            log::warn!("{} matching nodes (only 1 expected). Taking first.", nodes.len());
        }
        Ok(nodes.first().copied())
    }

    /// String values of the nodes matched by `xpath`.
    pub fn find_strings(&self, doc: &Document, context: NodeId, xpath: &str) -> Result<Vec<String>, EditorError> {
        match self.evaluate(doc, context, xpath)? {
            XPathValue::NodeSet(nodes) => Ok(nodes.iter().map(|n| n.string_value()).collect()),
            other => Err(EditorError::NotANodeSet {
                xpath: xpath.to_string(),
                found: other.type_name(),
            }),
        }
    }
}

fn register_extensions(registry: &mut FunctionRegistry, uri: &str, max_depth: usize) {
    registry.register_extension(uri, UNBALANCED_BRACES, move |args| {
        unbalanced_braces_function(args, max_depth)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use freedict_xpath1::XPathError;

    const DICT: &str = r#"<TEI><text><body>
<entry><form><orth>cat (n)</orth></form><sense><cit><quote>Katze</quote></cit></sense></entry>
<entry><form><orth>dog]</orth></form></entry>
</body></text></TEI>"#;

    #[test]
    fn test_find_node_set() {
        let doc = Document::parse(DICT).unwrap();
        let session = XPathSession::new();
        let entries = session.find_node_set(&doc, "//entry").unwrap();
        assert_eq!(entries.len(), 2);
        assert!(session.find_node_set(&doc, "//superEntry").unwrap().is_empty());
    }

    #[test]
    fn test_find_node_set_rejects_scalars() {
        let doc = Document::parse(DICT).unwrap();
        let session = XPathSession::new();
        assert!(matches!(
            session.find_node_set(&doc, "count(//entry)"),
            Err(EditorError::NotANodeSet { found: "number", .. })
        ));
    }

    #[test]
    fn test_find_single_node_takes_first() {
        let doc = Document::parse(DICT).unwrap();
        let session = XPathSession::new();
        let first = session.find_single_node(&doc, "//orth").unwrap().unwrap();
        assert_eq!(doc.text_content(first), "cat (n)");
        assert_eq!(session.find_single_node(&doc, "//xr").unwrap(), None);
    }

    #[test]
    fn test_extension_function_in_predicate() {
        let doc = Document::parse(DICT).unwrap();
        let session = XPathSession::new();
        let bad = session
            .find_node_set(&doc, "//entry[fd:unbalanced-braces(.//orth | .//quote)]")
            .unwrap();
        assert_eq!(bad.len(), 1);
        assert_eq!(session.find_strings(&doc, bad[0], "form/orth").unwrap(), vec!["dog]"]);
    }

    #[test]
    fn test_unbound_prefix_is_an_error() {
        let doc = Document::parse(DICT).unwrap();
        let session = XPathSession::new();
        assert!(matches!(
            session.find_node_set(&doc, "//entry[x:unbalanced-braces(.//orth)]"),
            Err(EditorError::XPath(XPathError::UnboundPrefix(_)))
        ));
    }

    #[test]
    fn test_custom_prefix_from_config() {
        let doc = Document::parse(DICT).unwrap();
        let config = EditorConfig {
            namespace_prefix: "ed".into(),
            ..EditorConfig::default()
        };
        let session = XPathSession::from_config(&config).unwrap();
        let bad = session
            .find_node_set(&doc, "//entry[ed:unbalanced-braces(.//orth)]")
            .unwrap();
        assert_eq!(bad.len(), 1);
    }

    #[test]
    fn test_filter_expression_and_prefixed_steps() {
        let doc = Document::parse(DICT).unwrap();
        let session = XPathSession::new();
        assert_eq!(session.find_strings(&doc, doc.root(), "(//orth)[2]").unwrap(), vec!["dog]"]);
        assert!(matches!(
            session.find_node_set(&doc, "//zz:orth"),
            Err(EditorError::XPath(XPathError::UnboundPrefix(p))) if p == "zz"
        ));
        // The prefix is bound, but no element in the document carries it.
        assert!(session.find_node_set(&doc, "//fd:orth").unwrap().is_empty());
    }

    #[test]
    fn test_cloned_session_has_its_own_monitor() {
        let doc = Document::parse(DICT).unwrap();
        let mut session = XPathSession::new();
        let watched = session.monitor().clone();
        session
            .registry_mut()
            .register_extension(FREEDICT_EDITOR_NAMESPACE, "busy", move |_| {
                Ok(freedict_xpath1::ExtensionResult::Boolean(watched.is_running()))
            });
        let copy = session.clone();

        let busy = |s: &XPathSession| match s.evaluate(&doc, doc.root(), "fd:busy()").unwrap() {
            XPathValue::Boolean(b) => b,
            other => panic!("Expected a boolean, got {:?}", other),
        };
        assert!(busy(&session));
        // The copy keeps the extension but runs under a separate monitor.
        assert!(!busy(&copy));
        assert!(!copy.monitor().interrupt());
    }

    #[test]
    fn test_monitor_is_idle_between_queries() {
        let doc = Document::parse(DICT).unwrap();
        let session = XPathSession::new();
        let monitor = session.monitor().clone();
        assert!(!monitor.interrupt());
        session.find_node_set(&doc, "//entry").unwrap();
        assert!(!monitor.is_running());
        assert_eq!(monitor.active_query(), None);
    }

    #[test]
    fn test_interrupt_stops_running_query() {
        let doc = Document::parse(DICT).unwrap();
        let mut session = XPathSession::new();
        let monitor = session.monitor().clone();
        let uri = FREEDICT_EDITOR_NAMESPACE;
        // An extension that interrupts its own query, standing in for a
        // second thread.
        let inner = monitor.clone();
        session.registry_mut().register_extension(uri, "stop", move |_| {
            assert!(inner.interrupt());
            Ok(freedict_xpath1::ExtensionResult::Boolean(true))
        });
        let result = session.find_node_set(&doc, "//entry[fd:stop()]//orth");
        assert!(matches!(result, Err(EditorError::XPath(XPathError::Interrupted))));
        assert!(!monitor.is_running());

        // The next query starts with a cleared flag.
        assert_eq!(session.find_node_set(&doc, "//entry").unwrap().len(), 2);
    }
}

//! Core XPath 1.0 functions plus namespaced extension functions.

use super::engine::{EvaluationContext, XPathValue, number_to_string, string_to_number};
use crate::datasource::DataSourceNode;
use crate::error::XPathError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An argument handed to an extension function. Node-sets arrive as the
/// string values of their nodes, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtensionArg {
    NodeSet(Vec<String>),
    String(String),
    Number(f64),
    Boolean(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExtensionResult {
    String(String),
    Number(f64),
    Boolean(bool),
}

pub type ExtensionFunction =
    Arc<dyn Fn(&[ExtensionArg]) -> Result<ExtensionResult, XPathError> + Send + Sync>;

/// Namespace bindings and extension functions visible to an expression.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    namespaces: HashMap<String, String>,
    extensions: HashMap<(String, String), ExtensionFunction>,
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("namespaces", &self.namespaces)
            .field("extensions", &self.extensions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `prefix` to `uri`. Rebinding a prefix replaces the old URI.
    pub fn register_namespace(&mut self, prefix: &str, uri: &str) -> Result<(), XPathError> {
        if prefix.is_empty() || prefix.contains(':') || prefix == "xml" {
            return Err(XPathError::InvalidPrefix(prefix.to_string()));
        }
        if let Some(old) = self.namespaces.insert(prefix.to_string(), uri.to_string())
            && old != uri
        {
            log::debug!("Namespace prefix '{}' rebound from {} to {}", prefix, old, uri);
        }
        Ok(())
    }

    pub fn namespace_uri(&self, prefix: &str) -> Option<&str> {
        self.namespaces.get(prefix).map(String::as_str)
    }

    /// Registers `function` as `{uri}local_name`.
    pub fn register_extension<F>(&mut self, uri: &str, local_name: &str, function: F)
    where
        F: Fn(&[ExtensionArg]) -> Result<ExtensionResult, XPathError> + Send + Sync + 'static,
    {
        self.extensions.insert(
            (uri.to_string(), local_name.to_string()),
            Arc::new(function),
        );
    }

    fn resolve(&self, qname: &str) -> Result<&ExtensionFunction, XPathError> {
        let (prefix, local) = qname
            .split_once(':')
            .ok_or_else(|| XPathError::UnknownFunction(qname.to_string()))?;
        let uri = self
            .namespace_uri(prefix)
            .ok_or_else(|| XPathError::UnboundPrefix(prefix.to_string()))?;
        self.extensions
            .get(&(uri.to_string(), local.to_string()))
            .ok_or_else(|| XPathError::UnknownFunction(qname.to_string()))
    }
}

fn arity(function: &str, expected: &'static str, got: usize) -> XPathError {
    XPathError::Arity {
        function: function.to_string(),
        expected,
        got,
    }
}

fn expect_args<N>(
    name: &str,
    args: &[XPathValue<N>],
    range: std::ops::RangeInclusive<usize>,
    expected: &'static str,
) -> Result<(), XPathError> {
    if range.contains(&args.len()) {
        Ok(())
    } else {
        Err(arity(name, expected, args.len()))
    }
}

/// Dispatches a call to a core function, or to an extension when the name
/// carries a prefix.
pub fn evaluate_function<'a, 'd, N: DataSourceNode<'a>>(
    name: &str,
    args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<'a, 'd, N>,
) -> Result<XPathValue<N>, XPathError> {
    if name.contains(':') {
        return call_extension(name, args, e_ctx.functions);
    }

    let mut args = args;
    match name {
        // Node-set
        "last" => {
            expect_args(name, &args, 0..=0, "0")?;
            Ok(XPathValue::Number(e_ctx.context_size as f64))
        }
        "position" => {
            expect_args(name, &args, 0..=0, "0")?;
            Ok(XPathValue::Number(e_ctx.context_position as f64))
        }
        "count" => {
            expect_args(name, &args, 1..=1, "1")?;
            Ok(XPathValue::Number(node_set_arg(name, args.remove(0))?.len() as f64))
        }
        "local-name" | "name" => {
            expect_args(name, &args, 0..=1, "0 or 1")?;
            let node = match args.pop() {
                Some(v) => node_set_arg(name, v)?.first().copied(),
                None => Some(e_ctx.context_node),
            };
            let qname = node.and_then(|n| n.name());
            let text = match (name, qname) {
                (_, None) => String::new(),
                ("name", Some(q)) => match q.prefix {
                    Some(prefix) => format!("{}:{}", prefix, q.local_part),
                    None => q.local_part.to_string(),
                },
                (_, Some(q)) => q.local_part.to_string(),
            };
            Ok(XPathValue::String(text))
        }

        // String
        "string" => {
            expect_args(name, &args, 0..=1, "0 or 1")?;
            Ok(XPathValue::String(string_or_context(args.pop(), e_ctx)))
        }
        "concat" => {
            if args.len() < 2 {
                return Err(arity(name, "2 or more", args.len()));
            }
            Ok(XPathValue::String(args.iter().map(|v| v.to_string()).collect()))
        }
        "starts-with" | "contains" | "substring-before" | "substring-after" => {
            expect_args(name, &args, 2..=2, "2")?;
            let needle = args.remove(1).to_string();
            let haystack = args.remove(0).to_string();
            Ok(match name {
                "starts-with" => XPathValue::Boolean(haystack.starts_with(&needle)),
                "contains" => XPathValue::Boolean(haystack.contains(&needle)),
                "substring-before" => XPathValue::String(
                    haystack
                        .find(&needle)
                        .map(|i| haystack[..i].to_string())
                        .unwrap_or_default(),
                ),
                _ => XPathValue::String(
                    haystack
                        .find(&needle)
                        .map(|i| haystack[i + needle.len()..].to_string())
                        .unwrap_or_default(),
                ),
            })
        }
        "substring" => {
            expect_args(name, &args, 2..=3, "2 or 3")?;
            let length = (args.len() == 3).then(|| args.remove(2).to_number());
            let start = args.remove(1).to_number();
            let s = args.remove(0).to_string();
            Ok(XPathValue::String(substring(&s, start, length)))
        }
        "string-length" => {
            expect_args(name, &args, 0..=1, "0 or 1")?;
            let s = string_or_context(args.pop(), e_ctx);
            Ok(XPathValue::Number(s.chars().count() as f64))
        }
        "normalize-space" => {
            expect_args(name, &args, 0..=1, "0 or 1")?;
            let s = string_or_context(args.pop(), e_ctx);
            Ok(XPathValue::String(s.split_whitespace().collect::<Vec<_>>().join(" ")))
        }
        "translate" => {
            expect_args(name, &args, 3..=3, "3")?;
            let to: Vec<char> = args.remove(2).to_string().chars().collect();
            let from: Vec<char> = args.remove(1).to_string().chars().collect();
            let source = args.remove(0).to_string();
            let translated = source
                .chars()
                .filter_map(|c| match from.iter().position(|&f| f == c) {
                    Some(pos) => to.get(pos).copied(),
                    None => Some(c),
                })
                .collect();
            Ok(XPathValue::String(translated))
        }

        // Boolean
        "boolean" => {
            expect_args(name, &args, 1..=1, "1")?;
            Ok(XPathValue::Boolean(args.remove(0).to_bool()))
        }
        "not" => {
            expect_args(name, &args, 1..=1, "1")?;
            Ok(XPathValue::Boolean(!args.remove(0).to_bool()))
        }
        "true" | "false" => {
            expect_args(name, &args, 0..=0, "0")?;
            Ok(XPathValue::Boolean(name == "true"))
        }

        // Number
        "number" => {
            expect_args(name, &args, 0..=1, "0 or 1")?;
            let n = match args.pop() {
                Some(v) => v.to_number(),
                None => string_to_number(&e_ctx.context_node.string_value()),
            };
            Ok(XPathValue::Number(n))
        }
        "sum" => {
            expect_args(name, &args, 1..=1, "1")?;
            let total = node_set_arg(name, args.remove(0))?
                .iter()
                .map(|n| string_to_number(&n.string_value()))
                .sum();
            Ok(XPathValue::Number(total))
        }
        "floor" | "ceiling" | "round" => {
            expect_args(name, &args, 1..=1, "1")?;
            let n = args.remove(0).to_number();
            Ok(XPathValue::Number(match name {
                "floor" => n.floor(),
                "ceiling" => n.ceil(),
                // Halves round towards positive infinity.
                _ if n.is_finite() && n != 0.0 => (n + 0.5).floor(),
                _ => n,
            }))
        }

        _ => Err(XPathError::UnknownFunction(name.to_string())),
    }
}

fn node_set_arg<N>(function: &str, value: XPathValue<N>) -> Result<Vec<N>, XPathError> {
    match value {
        XPathValue::NodeSet(nodes) => Ok(nodes),
        XPathValue::String(_) | XPathValue::Number(_) | XPathValue::Boolean(_) => {
            Err(XPathError::FunctionError {
                function: function.to_string(),
                message: "argument must be a node-set".to_string(),
            })
        }
    }
}

fn string_or_context<'a, N: DataSourceNode<'a>>(
    arg: Option<XPathValue<N>>,
    e_ctx: &EvaluationContext<'a, '_, N>,
) -> String {
    match arg {
        Some(v) => v.to_string(),
        None => e_ctx.context_node.string_value(),
    }
}

fn substring(s: &str, start: f64, length: Option<f64>) -> String {
    let first = (start + 0.5).floor();
    let last = length.map_or(f64::INFINITY, |l| first + (l + 0.5).floor());
    s.chars()
        .enumerate()
        .filter(|&(i, _)| {
            let pos = (i + 1) as f64;
            pos >= first && pos < last
        })
        .map(|(_, c)| c)
        .collect()
}

fn call_extension<'a, N: DataSourceNode<'a>>(
    name: &str,
    args: Vec<XPathValue<N>>,
    registry: &FunctionRegistry,
) -> Result<XPathValue<N>, XPathError> {
    let function = registry.resolve(name)?;
    let args: Vec<ExtensionArg> = args
        .into_iter()
        .map(|v| match v {
            XPathValue::NodeSet(nodes) => {
                ExtensionArg::NodeSet(nodes.iter().map(|n| n.string_value()).collect())
            }
            XPathValue::String(s) => ExtensionArg::String(s),
            XPathValue::Number(n) => ExtensionArg::Number(n),
            XPathValue::Boolean(b) => ExtensionArg::Boolean(b),
        })
        .collect();
    Ok(match function(&args)? {
        ExtensionResult::String(s) => XPathValue::String(s),
        ExtensionResult::Number(n) => XPathValue::Number(n),
        ExtensionResult::Boolean(b) => XPathValue::Boolean(b),
    })
}

impl fmt::Display for ExtensionArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionArg::NodeSet(values) => f.write_str(values.first().map_or("", String::as_str)),
            ExtensionArg::String(s) => f.write_str(s),
            ExtensionArg::Number(n) => f.write_str(&number_to_string(*n)),
            ExtensionArg::Boolean(b) => write!(f, "{}", b),
        }
    }
}

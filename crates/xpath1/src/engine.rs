//! Evaluates a parsed expression against any `DataSourceNode` tree.

use super::ast::{Axis, BinaryOperator, Expression, LocationPath, NodeTest, NodeTypeTest, Step, UnaryOperator};
use super::functions::{self, FunctionRegistry};
use super::{axes, operators};
use crate::datasource::{DataSourceNode, NodeType};
use crate::error::XPathError;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};

/// The four XPath 1.0 value types.
#[derive(Debug, Clone)]
pub enum XPathValue<N> {
    NodeSet(Vec<N>),
    String(String),
    Number(f64),
    Boolean(bool),
}

impl<'a, N: DataSourceNode<'a>> XPathValue<N> {
    pub fn to_bool(&self) -> bool {
        match self {
            XPathValue::NodeSet(nodes) => !nodes.is_empty(),
            XPathValue::String(s) => !s.is_empty(),
            XPathValue::Number(n) => *n != 0.0 && !n.is_nan(),
            XPathValue::Boolean(b) => *b,
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            XPathValue::Number(n) => *n,
            XPathValue::Boolean(b) => f64::from(u8::from(*b)),
            XPathValue::String(s) => string_to_number(s),
            XPathValue::NodeSet(_) => string_to_number(&self.to_string()),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            XPathValue::NodeSet(_) => "node-set",
            XPathValue::String(_) => "string",
            XPathValue::Number(_) => "number",
            XPathValue::Boolean(_) => "boolean",
        }
    }
}

impl<'a, N: DataSourceNode<'a>> fmt::Display for XPathValue<N> {
    /// The XPath `string()` conversion. A node-set converts to the string
    /// value of its first node.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XPathValue::NodeSet(nodes) => match nodes.first() {
                Some(n) => f.write_str(&n.string_value()),
                None => Ok(()),
            },
            XPathValue::String(s) => f.write_str(s),
            XPathValue::Number(n) => f.write_str(&number_to_string(*n)),
            XPathValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// XPath number syntax: optional minus, digits with an optional fraction,
/// surrounded by optional whitespace. Anything else is NaN.
pub fn string_to_number(s: &str) -> f64 {
    let t = s.trim();
    let digits = t.strip_prefix('-').unwrap_or(t);
    let valid = !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.chars().filter(|&c| c == '.').count() <= 1
        && digits != ".";
    if !valid {
        return f64::NAN;
    }
    t.parse().unwrap_or(f64::NAN)
}

pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        format!("{}", n)
    }
}

/// Everything an expression needs while it is being evaluated.
/// `'a` is the lifetime of the tree, `'d` that of the borrowed registry.
pub struct EvaluationContext<'a, 'd, N: DataSourceNode<'a>> {
    pub context_node: N,
    pub root_node: N,
    pub functions: &'d FunctionRegistry,
    pub context_position: usize, // 1-based
    pub context_size: usize,
    /// Polled at every step; once set, evaluation stops with `Interrupted`.
    pub interrupt: Option<&'d AtomicBool>,
    _marker: PhantomData<&'a ()>,
}

impl<'a, 'd, N: DataSourceNode<'a>> EvaluationContext<'a, 'd, N> {
    pub fn new(context_node: N, root_node: N, functions: &'d FunctionRegistry) -> Self {
        Self {
            context_node,
            root_node,
            functions,
            context_position: 1,
            context_size: 1,
            interrupt: None,
            _marker: PhantomData,
        }
    }

    pub fn with_interrupt(mut self, flag: &'d AtomicBool) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// A context for evaluating a predicate on `node`.
    fn at(&self, node: N, position: usize, size: usize) -> Self {
        Self {
            context_node: node,
            root_node: self.root_node,
            functions: self.functions,
            context_position: position,
            context_size: size,
            interrupt: self.interrupt,
            _marker: PhantomData,
        }
    }

    fn check_interrupt(&self) -> Result<(), XPathError> {
        match self.interrupt {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(XPathError::Interrupted),
            _ => Ok(()),
        }
    }
}

pub fn evaluate<'a, N>(
    expr: &Expression,
    e_ctx: &EvaluationContext<'a, '_, N>,
) -> Result<XPathValue<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    match expr {
        Expression::Literal(s) => Ok(XPathValue::String(s.clone())),
        Expression::Number(n) => Ok(XPathValue::Number(*n)),
        Expression::LocationPath(path) => Ok(XPathValue::NodeSet(evaluate_location_path(path, e_ctx)?)),
        Expression::Variable(name) => Err(XPathError::UnknownVariable(name.clone())),
        Expression::Filter { primary, predicates } => match evaluate(primary, e_ctx)? {
            XPathValue::NodeSet(mut nodes) => {
                nodes.sort();
                nodes.dedup();
                Ok(XPathValue::NodeSet(apply_predicates(nodes, predicates, e_ctx)?))
            }
            other => Err(XPathError::TypeError(format!(
                "predicates can only filter a node-set, not a {}",
                other.type_name()
            ))),
        },
        Expression::FunctionCall { name, args } => {
            let evaluated = args
                .iter()
                .map(|arg| evaluate(arg, e_ctx))
                .collect::<Result<Vec<_>, _>>()?;
            functions::evaluate_function(name, evaluated, e_ctx)
        }
        Expression::BinaryOp {
            left,
            op: BinaryOperator::Or,
            right,
        } => Ok(XPathValue::Boolean(
            evaluate(left, e_ctx)?.to_bool() || evaluate(right, e_ctx)?.to_bool(),
        )),
        Expression::BinaryOp {
            left,
            op: BinaryOperator::And,
            right,
        } => Ok(XPathValue::Boolean(
            evaluate(left, e_ctx)?.to_bool() && evaluate(right, e_ctx)?.to_bool(),
        )),
        Expression::BinaryOp { left, op, right } => {
            let left_val = evaluate(left, e_ctx)?;
            let right_val = evaluate(right, e_ctx)?;
            operators::evaluate(*op, left_val, right_val)
        }
        Expression::UnaryOp {
            op: UnaryOperator::Minus,
            expr,
        } => Ok(XPathValue::Number(-evaluate(expr, e_ctx)?.to_number())),
    }
}

fn evaluate_location_path<'a, N>(
    path: &LocationPath,
    e_ctx: &EvaluationContext<'a, '_, N>,
) -> Result<Vec<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    let mut current = match &path.start_point {
        Some(start) => match evaluate(start, e_ctx)? {
            XPathValue::NodeSet(nodes) => nodes,
            other => {
                return Err(XPathError::TypeError(format!(
                    "a path can only continue from a node-set, not a {}",
                    other.type_name()
                )));
            }
        },
        None if path.is_absolute => vec![e_ctx.root_node],
        None => vec![e_ctx.context_node],
    };

    for step in &path.steps {
        current = evaluate_step(step, &current, e_ctx)?;
    }
    Ok(current)
}

/// Applies one step to every context node. Predicates see positions along
/// the axis of their own context node; the merged result is in document order.
fn evaluate_step<'a, N>(
    step: &Step,
    context_nodes: &[N],
    e_ctx: &EvaluationContext<'a, '_, N>,
) -> Result<Vec<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    if let NodeTest::Name(wanted) = &step.node_test
        && let Some((prefix, _)) = wanted.split_once(':')
        && prefix != "xml"
        && e_ctx.functions.namespace_uri(prefix).is_none()
    {
        return Err(XPathError::UnboundPrefix(prefix.to_string()));
    }

    let mut result = Vec::new();
    for &node in context_nodes {
        e_ctx.check_interrupt()?;
        let candidates: Vec<N> = axes::collect(step.axis, node)
            .into_iter()
            .filter(|n| matches_node_test(*n, &step.node_test, step.axis))
            .collect();
        result.extend(apply_predicates(candidates, &step.predicates, e_ctx)?);
    }
    result.sort();
    result.dedup();
    Ok(result)
}

fn matches_node_test<'a, N: DataSourceNode<'a>>(node: N, test: &NodeTest, axis: Axis) -> bool {
    let principal = if axis == Axis::Attribute {
        NodeType::Attribute
    } else {
        NodeType::Element
    };
    match test {
        NodeTest::Wildcard => node.node_type() == principal,
        // An unprefixed test matches on the local part alone. A prefixed
        // one also needs the node's own prefix to agree.
        NodeTest::Name(wanted) => {
            node.node_type() == principal
                && node.name().is_some_and(|q| match wanted.split_once(':') {
                    Some((prefix, local)) => q.prefix == Some(prefix) && q.local_part == local,
                    None => q.local_part == wanted.as_str(),
                })
        }
        NodeTest::NodeType(NodeTypeTest::Node) => true,
        NodeTest::NodeType(NodeTypeTest::Text) => node.node_type() == NodeType::Text,
        NodeTest::NodeType(NodeTypeTest::Comment) => node.node_type() == NodeType::Comment,
        NodeTest::NodeType(NodeTypeTest::ProcessingInstruction) => {
            node.node_type() == NodeType::ProcessingInstruction
        }
    }
}

fn apply_predicates<'a, N>(
    mut nodes: Vec<N>,
    predicates: &[Expression],
    e_ctx: &EvaluationContext<'a, '_, N>,
) -> Result<Vec<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    for predicate in predicates {
        let size = nodes.len();
        let mut kept = Vec::with_capacity(size);
        for (i, node) in nodes.into_iter().enumerate() {
            e_ctx.check_interrupt()?;
            let keep = match evaluate(predicate, &e_ctx.at(node, i + 1, size))? {
                XPathValue::Number(n) => n == (i + 1) as f64,
                other => other.to_bool(),
            };
            if keep {
                kept.push(node);
            }
        }
        nodes = kept;
    }
    Ok(nodes)
}

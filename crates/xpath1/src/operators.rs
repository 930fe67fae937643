//! Binary operators other than `and`/`or`, which the engine short-circuits.

use crate::ast::BinaryOperator;
use crate::datasource::DataSourceNode;
use crate::engine::{XPathValue, string_to_number};
use crate::error::XPathError;

pub fn evaluate<'a, N: DataSourceNode<'a>>(
    op: BinaryOperator,
    left: XPathValue<N>,
    right: XPathValue<N>,
) -> Result<XPathValue<N>, XPathError> {
    match op {
        BinaryOperator::Or => Ok(XPathValue::Boolean(left.to_bool() || right.to_bool())),
        BinaryOperator::And => Ok(XPathValue::Boolean(left.to_bool() && right.to_bool())),
        BinaryOperator::Equals
        | BinaryOperator::NotEquals
        | BinaryOperator::LessThan
        | BinaryOperator::LessThanOrEqual
        | BinaryOperator::GreaterThan
        | BinaryOperator::GreaterThanOrEqual => Ok(XPathValue::Boolean(compare(op, &left, &right))),
        BinaryOperator::Plus => Ok(arithmetic(left, right, |l, r| l + r)),
        BinaryOperator::Minus => Ok(arithmetic(left, right, |l, r| l - r)),
        BinaryOperator::Multiply => Ok(arithmetic(left, right, |l, r| l * r)),
        BinaryOperator::Divide => Ok(arithmetic(left, right, |l, r| l / r)),
        BinaryOperator::Modulo => Ok(arithmetic(left, right, |l, r| l % r)),
        BinaryOperator::Union => union(left, right),
    }
}

fn arithmetic<'a, N: DataSourceNode<'a>>(
    left: XPathValue<N>,
    right: XPathValue<N>,
    f: impl Fn(f64, f64) -> f64,
) -> XPathValue<N> {
    XPathValue::Number(f(left.to_number(), right.to_number()))
}

fn union<'a, N: DataSourceNode<'a>>(
    left: XPathValue<N>,
    right: XPathValue<N>,
) -> Result<XPathValue<N>, XPathError> {
    match (left, right) {
        (XPathValue::NodeSet(mut nodes), XPathValue::NodeSet(more)) => {
            nodes.extend(more);
            nodes.sort();
            nodes.dedup();
            Ok(XPathValue::NodeSet(nodes))
        }
        (l, r) => Err(XPathError::TypeError(format!(
            "'|' needs two node-sets, got {} and {}",
            l.type_name(),
            r.type_name()
        ))),
    }
}

/// An atomic operand of a comparison.
enum Atom {
    Str(String),
    Num(f64),
    Bool(bool),
}

fn compare<'a, N: DataSourceNode<'a>>(
    op: BinaryOperator,
    left: &XPathValue<N>,
    right: &XPathValue<N>,
) -> bool {
    match (left, right) {
        (XPathValue::NodeSet(l), XPathValue::NodeSet(r)) => {
            let rs: Vec<String> = r.iter().map(|n| n.string_value()).collect();
            l.iter().any(|ln| {
                let ls = ln.string_value();
                rs.iter()
                    .any(|r| compare_atoms(op, &Atom::Str(ls.clone()), &Atom::Str(r.clone())))
            })
        }
        (XPathValue::NodeSet(nodes), other) => {
            let other = atom(other);
            match other {
                Atom::Bool(_) => compare_atoms(op, &Atom::Bool(!nodes.is_empty()), &other),
                _ => nodes
                    .iter()
                    .any(|n| compare_atoms(op, &Atom::Str(n.string_value()), &other)),
            }
        }
        (other, XPathValue::NodeSet(nodes)) => {
            let other = atom(other);
            match other {
                Atom::Bool(_) => compare_atoms(op, &other, &Atom::Bool(!nodes.is_empty())),
                _ => nodes
                    .iter()
                    .any(|n| compare_atoms(op, &other, &Atom::Str(n.string_value()))),
            }
        }
        (l, r) => compare_atoms(op, &atom(l), &atom(r)),
    }
}

fn atom<'a, N: DataSourceNode<'a>>(value: &XPathValue<N>) -> Atom {
    match value {
        XPathValue::String(s) => Atom::Str(s.clone()),
        XPathValue::Number(n) => Atom::Num(*n),
        XPathValue::Boolean(b) => Atom::Bool(*b),
        XPathValue::NodeSet(_) => Atom::Str(value.to_string()),
    }
}

fn atom_number(a: &Atom) -> f64 {
    match a {
        Atom::Str(s) => string_to_number(s),
        Atom::Num(n) => *n,
        Atom::Bool(b) => f64::from(u8::from(*b)),
    }
}

fn atom_bool(a: &Atom) -> bool {
    match a {
        Atom::Str(s) => !s.is_empty(),
        Atom::Num(n) => *n != 0.0 && !n.is_nan(),
        Atom::Bool(b) => *b,
    }
}

fn compare_atoms(op: BinaryOperator, l: &Atom, r: &Atom) -> bool {
    match op {
        BinaryOperator::Equals | BinaryOperator::NotEquals => {
            let equal = match (l, r) {
                (Atom::Bool(_), _) | (_, Atom::Bool(_)) => atom_bool(l) == atom_bool(r),
                (Atom::Num(_), _) | (_, Atom::Num(_)) => atom_number(l) == atom_number(r),
                (Atom::Str(a), Atom::Str(b)) => a == b,
            };
            (op == BinaryOperator::Equals) == equal
        }
        _ => {
            let (a, b) = (atom_number(l), atom_number(r));
            match op {
                BinaryOperator::LessThan => a < b,
                BinaryOperator::LessThanOrEqual => a <= b,
                BinaryOperator::GreaterThan => a > b,
                _ => a >= b,
            }
        }
    }
}

//! A `nom`-based parser for XPath 1.0 expressions.

use super::ast::*;
use crate::error::XPathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit0, digit1, multispace0},
    combinator::{map, map_res, not, opt, peek, recognize, value, verify},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated},
};

pub fn parse_expression(input: &str) -> Result<Expression, XPathError> {
    match expression(input.trim()) {
        Ok(("", expr)) => Ok(expr),
        Ok((rem, _)) => Err(XPathError::XPathParse(
            input.to_string(),
            format!("unexpected input at '{}'", rem),
        )),
        Err(e) => Err(XPathError::XPathParse(input.to_string(), e.to_string())),
    }
}

// --- Combinators & Helpers ---

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

/// An operator name such as `and` or `div` that must not run on into a name.
fn keyword<'a>(word: &'static str) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    terminated(tag(word), not(peek(name_char)))
}

fn name_char(input: &str) -> IResult<&str, char> {
    verify(nom::character::complete::anychar, |c: &char| {
        c.is_alphanumeric() || *c == '_' || *c == '-' || *c == '.'
    })
    .parse(input)
}

/// Folds `operand (op operand)*` into a left-associative tree.
fn left_assoc<'a, F, G>(
    operand: F,
    operator: G,
) -> impl FnMut(&'a str) -> IResult<&'a str, Expression>
where
    F: Parser<&'a str, Output = Expression, Error = nom::error::Error<&'a str>> + Clone,
    G: Parser<&'a str, Output = BinaryOperator, Error = nom::error::Error<&'a str>> + Clone,
{
    move |input: &str| {
        let (input, first) = operand.clone().parse(input)?;
        let (input, rest) = many0(pair(ws(operator.clone()), operand.clone())).parse(input)?;
        let expr = rest.into_iter().fold(first, |left, (op, right)| Expression::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        });
        Ok((input, expr))
    }
}

// --- Operators ---

fn or_op(input: &str) -> IResult<&str, BinaryOperator> {
    value(BinaryOperator::Or, keyword("or")).parse(input)
}

fn and_op(input: &str) -> IResult<&str, BinaryOperator> {
    value(BinaryOperator::And, keyword("and")).parse(input)
}

fn equality_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        value(BinaryOperator::NotEquals, tag("!=")),
        value(BinaryOperator::Equals, tag("=")),
    ))
    .parse(input)
}

fn relational_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        value(BinaryOperator::LessThanOrEqual, alt((tag("<="), tag("&lt;=")))),
        value(BinaryOperator::GreaterThanOrEqual, alt((tag(">="), tag("&gt;=")))),
        value(BinaryOperator::LessThan, alt((tag("<"), tag("&lt;")))),
        value(BinaryOperator::GreaterThan, alt((tag(">"), tag("&gt;")))),
    ))
    .parse(input)
}

fn additive_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        value(BinaryOperator::Plus, char('+')),
        value(BinaryOperator::Minus, char('-')),
    ))
    .parse(input)
}

fn multiplicative_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        value(BinaryOperator::Multiply, char('*')),
        value(BinaryOperator::Divide, keyword("div")),
        value(BinaryOperator::Modulo, keyword("mod")),
    ))
    .parse(input)
}

fn union_op(input: &str) -> IResult<&str, BinaryOperator> {
    value(BinaryOperator::Union, char('|')).parse(input)
}

// --- Expression Parsers (lowest precedence first) ---

fn expression(input: &str) -> IResult<&str, Expression> {
    left_assoc(and_expr, or_op)(input)
}

fn and_expr(input: &str) -> IResult<&str, Expression> {
    left_assoc(equality_expr, and_op)(input)
}

fn equality_expr(input: &str) -> IResult<&str, Expression> {
    left_assoc(relational_expr, equality_op)(input)
}

fn relational_expr(input: &str) -> IResult<&str, Expression> {
    left_assoc(additive_expr, relational_op)(input)
}

fn additive_expr(input: &str) -> IResult<&str, Expression> {
    left_assoc(multiplicative_expr, additive_op)(input)
}

fn multiplicative_expr(input: &str) -> IResult<&str, Expression> {
    left_assoc(unary_expr, multiplicative_op)(input)
}

fn unary_expr(input: &str) -> IResult<&str, Expression> {
    alt((
        map(preceded(ws(char('-')), unary_expr), |expr| Expression::UnaryOp {
            op: UnaryOperator::Minus,
            expr: Box::new(expr),
        }),
        union_expr,
    ))
    .parse(input)
}

fn union_expr(input: &str) -> IResult<&str, Expression> {
    left_assoc(path_expr, union_op)(input)
}

/// A primary expression optionally continued by `/step` or `//step`, or a
/// plain location path.
fn path_expr(input: &str) -> IResult<&str, Expression> {
    // Primary first: `position()` must not be read as a step named `position`.
    let (i, start) = alt((filter_expr, map(location_path, Expression::LocationPath))).parse(input)?;
    let (i, more) = many0(pair(alt((tag("//"), tag("/"))), step)).parse(i)?;
    if more.is_empty() {
        return Ok((i, start));
    }

    let mut path = match start {
        Expression::LocationPath(lp) => lp,
        other => LocationPath {
            start_point: Some(Box::new(other)),
            is_absolute: false,
            steps: vec![],
        },
    };
    push_steps(&mut path.steps, more);
    Ok((i, Expression::LocationPath(path)))
}

fn push_steps(steps: &mut Vec<Step>, more: Vec<(&str, Step)>) {
    for (sep, next) in more {
        if sep == "//" {
            steps.push(Step::descendant_or_self());
        }
        steps.push(next);
    }
}

/// A primary expression with optional predicates.
fn filter_expr(input: &str) -> IResult<&str, Expression> {
    let (i, primary) = primary_expr(input)?;
    let (i, predicates) = many0(predicate).parse(i)?;
    if predicates.is_empty() {
        return Ok((i, primary));
    }
    Ok((
        i,
        Expression::Filter {
            primary: Box::new(primary),
            predicates,
        },
    ))
}

fn primary_expr(input: &str) -> IResult<&str, Expression> {
    ws(alt((
        variable_reference,
        map(number, Expression::Number),
        map(string_literal, Expression::Literal),
        function_call,
        delimited(ws(char('(')), expression, ws(char(')'))),
    )))
    .parse(input)
}

// --- Literals ---

/// `Digits ('.' Digits?)? | '.' Digits`. No sign, no exponent.
fn number(input: &str) -> IResult<&str, f64> {
    map_res(
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        |s: &str| s.parse::<f64>(),
    )
    .parse(input)
}

fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        alt((
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
        )),
        str::to_string,
    )
    .parse(input)
}

fn variable_reference(input: &str) -> IResult<&str, Expression> {
    map(preceded(char('$'), q_name), Expression::Variable).parse(input)
}

// --- Names and node tests ---

fn nc_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '-' || c == '.'),
    ))
    .parse(input)
}

fn q_name(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(nc_name, opt(pair(char(':'), nc_name)))),
        str::to_string,
    )
    .parse(input)
}

const NODE_TYPE_NAMES: [&str; 4] = ["text", "node", "comment", "processing-instruction"];

fn node_type_test(input: &str) -> IResult<&str, NodeTest> {
    map(
        terminated(
            alt((
                tag("text"),
                tag("node"),
                tag("comment"),
                tag("processing-instruction"),
            )),
            pair(ws(char('(')), char(')')),
        ),
        |name: &str| {
            NodeTest::NodeType(match name {
                "text" => NodeTypeTest::Text,
                "comment" => NodeTypeTest::Comment,
                "processing-instruction" => NodeTypeTest::ProcessingInstruction,
                _ => NodeTypeTest::Node,
            })
        },
    )
    .parse(input)
}

fn node_test(input: &str) -> IResult<&str, NodeTest> {
    alt((
        value(NodeTest::Wildcard, char('*')),
        node_type_test,
        map(q_name, NodeTest::Name),
    ))
    .parse(input)
}

// --- Paths ---

fn axis(input: &str) -> IResult<&str, Axis> {
    terminated(
        alt((
            value(Axis::AncestorOrSelf, tag("ancestor-or-self")),
            value(Axis::Ancestor, tag("ancestor")),
            value(Axis::Attribute, tag("attribute")),
            value(Axis::Child, tag("child")),
            value(Axis::DescendantOrSelf, tag("descendant-or-self")),
            value(Axis::Descendant, tag("descendant")),
            value(Axis::FollowingSibling, tag("following-sibling")),
            value(Axis::Following, tag("following")),
            value(Axis::Parent, tag("parent")),
            value(Axis::PrecedingSibling, tag("preceding-sibling")),
            value(Axis::Preceding, tag("preceding")),
            value(Axis::SelfAxis, tag("self")),
        )),
        tag("::"),
    )
    .parse(input)
}

fn predicate(input: &str) -> IResult<&str, Expression> {
    delimited(ws(char('[')), expression, ws(char(']'))).parse(input)
}

fn step(input: &str) -> IResult<&str, Step> {
    let any_node = || NodeTest::NodeType(NodeTypeTest::Node);
    let (i, (axis, node_test)) = alt((
        map(tag(".."), |_| (Axis::Parent, any_node())),
        map(char('.'), |_| (Axis::SelfAxis, any_node())),
        map(preceded(char('@'), node_test), |nt| (Axis::Attribute, nt)),
        map(pair(opt(axis), node_test), |(ax, nt)| {
            (ax.unwrap_or(Axis::Child), nt)
        }),
    ))
    .parse(input)?;
    let (i, predicates) = many0(predicate).parse(i)?;
    Ok((
        i,
        Step {
            axis,
            node_test,
            predicates,
        },
    ))
}

/// A path that does not start with a variable or function call.
fn location_path(input: &str) -> IResult<&str, LocationPath> {
    let (i, (is_absolute, mut steps)) = if let Some(rest) = input.strip_prefix("//") {
        let (rest, first) = step(rest)?;
        (rest, (true, vec![Step::descendant_or_self(), first]))
    } else if let Some(rest) = input.strip_prefix('/') {
        match step(rest) {
            Ok((rest, first)) => (rest, (true, vec![first])),
            // The bare root path "/"
            Err(_) => (rest, (true, vec![])),
        }
    } else {
        let (rest, first) = step(input)?;
        (rest, (false, vec![first]))
    };

    let (i, more) = many0(pair(alt((tag("//"), tag("/"))), step)).parse(i)?;
    push_steps(&mut steps, more);

    Ok((
        i,
        LocationPath {
            start_point: None,
            is_absolute,
            steps,
        },
    ))
}

fn function_call(input: &str) -> IResult<&str, Expression> {
    let (i, name) = q_name(input)?;
    let (i, _) = peek(ws(char('('))).parse(i)?;

    // text(), node() and friends are node tests, handled by `step`.
    if NODE_TYPE_NAMES.contains(&name.as_str()) {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }

    let (i, args) = preceded(
        multispace0,
        delimited(
            char('('),
            ws(separated_list0(ws(char(',')), expression)),
            char(')'),
        ),
    )
    .parse(i)?;

    Ok((i, Expression::FunctionCall { name, args }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child(name: &str) -> Step {
        Step {
            axis: Axis::Child,
            node_test: NodeTest::Name(name.into()),
            predicates: vec![],
        }
    }

    fn relative(steps: Vec<Step>) -> Expression {
        Expression::LocationPath(LocationPath {
            start_point: None,
            is_absolute: false,
            steps,
        })
    }

    #[test]
    fn test_parse_absolute_path() {
        assert_eq!(
            parse_expression("/entry/form/orth").unwrap(),
            Expression::LocationPath(LocationPath {
                start_point: None,
                is_absolute: true,
                steps: vec![child("entry"), child("form"), child("orth")],
            })
        );
    }

    #[test]
    fn test_parse_double_slash() {
        assert_eq!(
            parse_expression("//entry").unwrap(),
            Expression::LocationPath(LocationPath {
                start_point: None,
                is_absolute: true,
                steps: vec![Step::descendant_or_self(), child("entry")],
            })
        );
    }

    #[test]
    fn test_parse_sanity_check_query() {
        let expr = parse_expression(
            "//entry[ fd:unbalanced-braces(.//orth | .//tr | .//note | .//def | .//q) ]",
        )
        .unwrap();
        let Expression::LocationPath(lp) = expr else {
            panic!("Expected a location path");
        };
        assert_eq!(lp.steps.len(), 2);
        let Expression::FunctionCall { name, args } = &lp.steps[1].predicates[0] else {
            panic!("Expected a function call predicate");
        };
        assert_eq!(name, "fd:unbalanced-braces");
        assert_eq!(args.len(), 1);
        assert!(matches!(
            args[0],
            Expression::BinaryOp {
                op: BinaryOperator::Union,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_abbreviated_steps() {
        let Expression::LocationPath(lp) = parse_expression("../@type").unwrap() else {
            panic!("Expected a location path");
        };
        assert_eq!(lp.steps[0].axis, Axis::Parent);
        assert_eq!(lp.steps[1].axis, Axis::Attribute);
        assert_eq!(lp.steps[1].node_test, NodeTest::Name("type".into()));

        let Expression::LocationPath(lp) = parse_expression(".").unwrap() else {
            panic!("Expected a location path");
        };
        assert_eq!(lp.steps[0].axis, Axis::SelfAxis);
    }

    #[test]
    fn test_names_that_look_like_numbers_or_keywords() {
        // `info` must not be read as the number "inf" followed by "o".
        assert_eq!(parse_expression("info").unwrap(), relative(vec![child("info")]));
        assert_eq!(parse_expression("order").unwrap(), relative(vec![child("order")]));
        assert_eq!(
            parse_expression("a or b").unwrap(),
            Expression::BinaryOp {
                left: Box::new(relative(vec![child("a")])),
                op: BinaryOperator::Or,
                right: Box::new(relative(vec![child("b")])),
            }
        );
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_expression("12").unwrap(), Expression::Number(12.0));
        assert_eq!(parse_expression(".5").unwrap(), Expression::Number(0.5));
        assert_eq!(
            parse_expression("-3").unwrap(),
            Expression::UnaryOp {
                op: UnaryOperator::Minus,
                expr: Box::new(Expression::Number(3.0))
            }
        );
    }

    #[test]
    fn test_parse_operator_precedence() {
        assert_eq!(
            parse_expression("1 + 2 * 3").unwrap(),
            Expression::BinaryOp {
                left: Box::new(Expression::Number(1.0)),
                op: BinaryOperator::Plus,
                right: Box::new(Expression::BinaryOp {
                    left: Box::new(Expression::Number(2.0)),
                    op: BinaryOperator::Multiply,
                    right: Box::new(Expression::Number(3.0)),
                }),
            }
        );
    }

    #[test]
    fn test_parse_predicate_with_attribute() {
        let Expression::LocationPath(lp) = parse_expression("usg[@type = 'dom'][1]").unwrap()
        else {
            panic!("Expected a location path");
        };
        assert_eq!(lp.steps[0].predicates.len(), 2);
        assert!(lp.steps[0].predicates[0].is_binary_op());
        assert_eq!(lp.steps[0].predicates[1], Expression::Number(1.0));
    }

    #[test]
    fn test_parse_axes() {
        for (text, axis) in [
            ("ancestor-or-self::entry", Axis::AncestorOrSelf),
            ("following-sibling::orth", Axis::FollowingSibling),
            ("preceding::*", Axis::Preceding),
        ] {
            let Expression::LocationPath(lp) = parse_expression(text).unwrap() else {
                panic!("Expected a location path for {}", text);
            };
            assert_eq!(lp.steps[0].axis, axis);
        }
    }

    #[test]
    fn test_parse_text_node_test_and_variable_path() {
        let Expression::LocationPath(lp) = parse_expression("$n/orth/text()").unwrap() else {
            panic!("Expected a location path");
        };
        assert_eq!(
            lp.start_point.as_deref(),
            Some(&Expression::Variable("n".into()))
        );
        assert_eq!(
            lp.steps[1].node_test,
            NodeTest::NodeType(NodeTypeTest::Text)
        );
    }

    #[test]
    fn test_parse_filter_expression() {
        let Expression::Filter { primary, predicates } = parse_expression("(//orth)[2]").unwrap() else {
            panic!("Expected a filter expression");
        };
        assert!(primary.is_location_path());
        assert_eq!(predicates, vec![Expression::Number(2.0)]);

        // A filter can start a longer path.
        let Expression::LocationPath(lp) = parse_expression("(//entry)[last()]/form").unwrap() else {
            panic!("Expected a location path");
        };
        assert!(matches!(lp.start_point.as_deref(), Some(Expression::Filter { .. })));
        assert_eq!(lp.steps, vec![child("form")]);

        // No predicates, no wrapper.
        assert!(parse_expression("(//orth)").unwrap().is_location_path());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_expression("//entry["),
            Err(XPathError::XPathParse(..))
        ));
        assert!(matches!(
            parse_expression("count(orth"),
            Err(XPathError::XPathParse(..))
        ));
    }
}

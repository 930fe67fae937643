//! Brace balance checking and the `unbalanced-braces` XPath function.

use freedict_xpath1::{ExtensionArg, ExtensionResult, XPathError};

pub const DEFAULT_MAX_DEPTH: usize = 100;

pub const UNBALANCED_BRACES: &str = "unbalanced-braces";

fn opener_for(closer: char) -> Option<char> {
    match closer {
        ')' => Some('('),
        ']' => Some('['),
        '}' => Some('{'),
        _ => None,
    }
}

/// True if some `(`, `[` or `{` in `text` lacks its partner, or a closer
/// has no matching opener. Nesting deeper than `max_depth` also counts as
/// unbalanced.
pub fn contains_unbalanced_braces(text: &str, max_depth: usize) -> bool {
    let mut stack: Vec<char> = Vec::new();
    for c in text.chars() {
        match c {
            '(' | '[' | '{' => {
                if stack.len() >= max_depth {
                    log::warn!("Too many open braces (more than {})", max_depth);
                    return true;
                }
                stack.push(c);
            }
            ')' | ']' | '}' => {
                if stack.pop() != opener_for(c) {
                    return true;
                }
            }
            _ => {}
        }
    }
    !stack.is_empty()
}

/// Body of `fd:unbalanced-braces(node-set)`: true when the string value of
/// any node in the set is unbalanced.
pub fn unbalanced_braces_function(
    args: &[ExtensionArg],
    max_depth: usize,
) -> Result<ExtensionResult, XPathError> {
    let [arg] = args else {
        return Err(XPathError::Arity {
            function: UNBALANCED_BRACES.to_string(),
            expected: "1",
            got: args.len(),
        });
    };
    match arg {
        ExtensionArg::NodeSet(values) => Ok(ExtensionResult::Boolean(
            values
                .iter()
                .any(|v| contains_unbalanced_braces(v, max_depth)),
        )),
        _ => Err(XPathError::TypeError(format!(
            "{} expects a node-set argument",
            UNBALANCED_BRACES
        ))),
    }
}

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum XPathError {
    #[error("XPath parse error in '{0}': {1}")]
    XPathParse(String, String),

    #[error("Function '{function}' error: {message}")]
    FunctionError { function: String, message: String },

    #[error("Function '{function}' expects {expected} argument(s), got {got}")]
    Arity {
        function: String,
        expected: &'static str,
        got: usize,
    },

    #[error("Unknown XPath function '{0}'")]
    UnknownFunction(String),

    #[error("Namespace prefix '{0}' is not bound")]
    UnboundPrefix(String),

    #[error("Invalid namespace prefix '{0}'")]
    InvalidPrefix(String),

    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Variable '{0}' not found")]
    UnknownVariable(String),

    #[error("Evaluation interrupted")]
    Interrupted,
}

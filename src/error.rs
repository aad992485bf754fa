use thiserror::Error;

/// Result type for the cellcalc crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the cellcalc crate
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A fragment of the formula matched no token class
    #[error("unsupported token '{0}'")]
    UnsupportedToken(String),
    /// A `)` was found with no `(` left to close
    #[error("no matching '(' for ')'")]
    UnmatchedParenthesis,
    /// A `(` was never closed
    #[error("unbalanced expression")]
    UnbalancedExpression,
    /// An operator did not find two operands
    #[error("not enough operands for operator '{0}'")]
    InsufficientOperands(String),
    /// A symbol that is not one of `+`, `-`, `*` or `/` was used as operator
    #[error("unsupported operator '{0}'")]
    UnsupportedOperator(String),
    /// The variable does not appear in the expression
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    /// The value bound to a variable is not a number
    #[error("value '{value}' of '{name}' is not a number")]
    InvalidNumberFormat {
        /// Name of the variable
        name: String,
        /// Offending value
        value: String,
    },
    /// Evaluating an expression without any token
    #[error("empty expression")]
    EmptyExpression,
    /// A cell depends on itself through other cells
    #[error("circular reference through {0}")]
    CircularReference(String),
    /// The dependency cascade went deeper than allowed
    #[error("recalculation cascade deeper than {0} cells")]
    CascadeTooDeep(usize),
    /// A grid needs at least one row and one column
    #[error("invalid grid dimensions {rows}x{columns}")]
    InvalidDimensions {
        /// Requested row count
        rows: usize,
        /// Requested column count
        columns: usize,
    },
    /// The position is outside of the grid
    #[error("cell ({row}, {column}) is out of bounds")]
    OutOfBounds {
        /// 0-based row
        row: usize,
        /// 0-based column
        column: usize,
    },
    /// The text is not an A1-style cell reference
    #[error("invalid cell address '{0}'")]
    InvalidAddress(String),
}

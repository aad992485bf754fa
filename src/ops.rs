use crate::error::{Error, Result};
use hashbrown::HashMap;

/// Binary operators allowed in formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl Op {
    /// Every operator, in table order
    pub const ALL: [Op; 4] = [Op::Add, Op::Sub, Op::Mul, Op::Div];

    /// Get the operator for `symbol`, failing for anything that is not a
    /// binary operator (parenthesis included).
    pub fn from_symbol(symbol: &str) -> Result<Self> {
        match lookup(symbol) {
            Some(Symbol::Binary(op)) => Ok(op),
            _ => Err(Error::UnsupportedOperator(symbol.into())),
        }
    }

    /// Textual form of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }

    /// Get the operator precedence. Operators with higher precedence should be
    /// evaluated first.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
        }
    }

    /// Check if the operator is left associative
    pub fn is_left_associative(self) -> bool {
        match self {
            Self::Add | Self::Sub | Self::Mul | Self::Div => true,
        }
    }

    /// Apply the operator. Division by zero follows IEEE-754 and yields an
    /// infinity or `NaN`.
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Self::Add => left + right,
            Self::Sub => left - right,
            Self::Mul => left * right,
            Self::Div => left / right,
        }
    }
}

/// Entry of the operator table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// One of the binary operators
    Binary(Op),
}

impl Symbol {
    /// Parenthesis sit at precedence 0, below every real operator.
    pub fn precedence(self) -> u8 {
        match self {
            Self::LParen | Self::RParen => 0,
            Self::Binary(op) => op.precedence(),
        }
    }
}

lazy_static! {
    static ref SYMBOLS: HashMap<&'static str, Symbol> = {
        let mut map = HashMap::new();
        map.insert("(", Symbol::LParen);
        map.insert(")", Symbol::RParen);
        for &op in &Op::ALL {
            map.insert(op.symbol(), Symbol::Binary(op));
        }
        map.shrink_to_fit();
        map
    };
}

/// Look `symbol` up in the operator table
pub fn lookup(symbol: &str) -> Option<Symbol> {
    SYMBOLS.get(symbol).copied()
}

/// Check if `symbol` is in the operator table, parenthesis included
pub fn is_operator_symbol(symbol: &str) -> bool {
    SYMBOLS.contains_key(symbol)
}

/// Check if `symbol` opens a group
pub fn is_left_paren(symbol: &str) -> bool {
    lookup(symbol) == Some(Symbol::LParen)
}

/// Check if `symbol` closes a group
pub fn is_right_paren(symbol: &str) -> bool {
    lookup(symbol) == Some(Symbol::RParen)
}

/// Precedence of `symbol`, or `None` for operands
pub fn precedence_of(symbol: &str) -> Option<u8> {
    lookup(symbol).map(Symbol::precedence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("(" => Some(0) ; "left parenthesis")]
    #[test_case(")" => Some(0) ; "right parenthesis")]
    #[test_case("+" => Some(1) ; "addition")]
    #[test_case("-" => Some(1) ; "subtraction")]
    #[test_case("*" => Some(2) ; "multiplication")]
    #[test_case("/" => Some(2) ; "division")]
    #[test_case("A1" => None ; "operand")]
    #[test_case("^" => None ; "not in table")]
    fn precedence(symbol: &str) -> Option<u8> {
        precedence_of(symbol)
    }

    #[test]
    fn classification() {
        for symbol in &["+", "-", "*", "/", "(", ")"] {
            assert!(is_operator_symbol(symbol));
        }
        assert!(!is_operator_symbol("12.5"));
        assert!(!is_operator_symbol("Hello"));

        assert!(is_left_paren("("));
        assert!(!is_left_paren("+"));
        assert!(is_right_paren(")"));
        assert!(!is_right_paren("+"));
    }

    #[test]
    fn from_symbol() {
        assert_eq!(Op::from_symbol("/"), Ok(Op::Div));
        assert_eq!(
            Op::from_symbol("("),
            Err(Error::UnsupportedOperator("(".into()))
        );
        assert_eq!(
            Op::from_symbol("%"),
            Err(Error::UnsupportedOperator("%".into()))
        );
    }

    #[test]
    fn apply() {
        assert_eq!(Op::Sub.apply(8.0, 3.0), 5.0);
        assert_eq!(Op::Div.apply(1.0, 0.0), f64::INFINITY);
        assert!(Op::Div.apply(0.0, 0.0).is_nan());
        assert!(Op::ALL.iter().all(|op| op.is_left_associative()));
    }
}

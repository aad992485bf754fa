use crate::ast::{Bindings, Node};
use crate::error::{Error, Result};
use crate::lexer::tokenize;
use crate::postfix::to_postfix;
use crate::token::{Token, TokenKind};

/// Evaluate a single formula from `input`, every variable being worth `0`.
///
/// Returns `Ok(result)` if the evaluation is successful, or `Err(cause)` if
/// parsing or evaluating the formula failed.
///
/// # Example
///
/// ```
/// # use cellcalc::eval;
/// assert_eq!(eval("2*(3+5)"), Ok(16.0));
/// assert_eq!(eval("8/4/2"), Ok(1.0));
/// assert_eq!(eval("A1+2"), Ok(2.0));
/// ```
pub fn eval(input: &str) -> Result<f64> {
    ExpressionTree::parse(input).and_then(|tree| tree.evaluate())
}

/// A parsed formula, with the values bound to its variables.
///
/// The tree keeps the tokens of the formula and a binding table seeded with
/// every identifier found, each worth `"0"` until [`set_variable`] is called.
///
/// # Examples
/// ```
/// # use cellcalc::ExpressionTree;
/// let mut tree = ExpressionTree::parse("Hello+World").unwrap();
/// tree.set_variable("Hello", "20").unwrap();
/// tree.set_variable("World", "50").unwrap();
/// assert_eq!(tree.evaluate(), Ok(70.0));
///
/// tree.set_variable("Hello", "5").unwrap();
/// assert_eq!(tree.evaluate(), Ok(55.0));
/// ```
///
/// [`set_variable`]: #method.set_variable
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionTree<'a> {
    expression: &'a str,
    tokens: Vec<Token<'a>>,
    postfix: Vec<Token<'a>>,
    bindings: Bindings,
    root: Option<Node>,
}

impl<'a> ExpressionTree<'a> {
    /// Parse the given `expression` into an `ExpressionTree`. The leading
    /// `=` of a cell formula must not be part of `expression`.
    ///
    /// # Examples
    /// ```
    /// # use cellcalc::ExpressionTree;
    /// // A valid expression
    /// assert!(ExpressionTree::parse("3+5*A2").is_ok());
    /// // invalid expressions
    /// assert!(ExpressionTree::parse("3 + 5").is_err());
    /// assert!(ExpressionTree::parse("(3+5").is_err());
    /// ```
    pub fn parse(expression: &'a str) -> Result<Self> {
        let tokens = tokenize(expression)?;

        let mut bindings = Bindings::new();
        for token in &tokens {
            if token.kind() == TokenKind::Identifier {
                bindings.seed(token.text());
            }
        }

        let postfix = to_postfix(&tokens)?;
        let root = Node::from_postfix(&postfix, &bindings)?;
        Ok(Self {
            expression,
            tokens,
            postfix,
            bindings,
            root,
        })
    }

    /// Evaluate the tree with the values currently bound
    ///
    /// # Examples
    ///
    /// ```
    /// # use cellcalc::{Error, ExpressionTree};
    /// let tree = ExpressionTree::parse("1/0").unwrap();
    /// assert_eq!(tree.evaluate(), Ok(f64::INFINITY));
    ///
    /// let tree = ExpressionTree::parse("").unwrap();
    /// assert_eq!(tree.evaluate(), Err(Error::EmptyExpression));
    /// ```
    pub fn evaluate(&self) -> Result<f64> {
        match self.root {
            Some(ref root) => root.evaluate(&self.bindings),
            None => Err(Error::EmptyExpression),
        }
    }

    /// Bind `value` to the variable `name`. Fails if `name` does not appear
    /// in the expression.
    pub fn set_variable(&mut self, name: &str, value: &str) -> Result<()> {
        self.bindings.set(name, value)
    }

    /// Value currently bound to `name`
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.bindings.get(name)
    }

    /// Names of the variables, in order of first appearance
    ///
    /// # Examples
    /// ```
    /// # use cellcalc::ExpressionTree;
    /// let tree = ExpressionTree::parse("B1*(A1+B1)").unwrap();
    /// assert_eq!(tree.variables().collect::<Vec<_>>(), vec!["B1", "A1"]);
    /// ```
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.bindings.names()
    }

    /// Source text of the expression
    pub fn expression(&self) -> &'a str {
        self.expression
    }

    /// Tokens of the expression, in infix order
    pub fn tokens(&self) -> &[Token<'a>] {
        &self.tokens
    }

    /// Tokens of the expression, in postfix order
    pub fn postfix(&self) -> &[Token<'a>] {
        &self.postfix
    }

    /// Root of the tree, `None` for an empty expression
    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }
}

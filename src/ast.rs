use crate::error::{Error, Result};
use crate::ops::Op;
use crate::token::{Token, TokenKind};
use hashbrown::HashMap;

/// Default value of a variable that was never bound
pub const DEFAULT_VALUE: &str = "0";

/// Name to textual value table of an expression tree.
///
/// Variable nodes only keep the slot of their name in this table, so that
/// binding a name once is seen by every node referencing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    slots: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl Bindings {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` with the default value and return its slot. A name
    /// registered twice keeps its first slot and value.
    pub fn seed(&mut self, name: &str) -> usize {
        if let Some(&slot) = self.index.get(name) {
            return slot;
        }
        let slot = self.slots.len();
        self.slots.push((name.into(), DEFAULT_VALUE.into()));
        self.index.insert(name.into(), slot);
        slot
    }

    /// Slot of `name`, if it was registered
    pub fn slot(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Current value bound to `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.slot(name).map(|slot| self.slots[slot].1.as_str())
    }

    /// Overwrite the value bound to `name`
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let slot = self
            .slot(name)
            .ok_or_else(|| Error::UnknownVariable(name.into()))?;
        self.slots[slot].1 = value.into();
        Ok(())
    }

    /// Registered names, in discovery order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|(name, _)| name.as_str())
    }

    fn number(&self, slot: usize) -> Result<f64> {
        let (name, value) = &self.slots[slot];
        value.parse().map_err(|_| Error::InvalidNumberFormat {
            name: name.clone(),
            value: value.clone(),
        })
    }
}

/// Nodes of an expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A constant value
    Constant(f64),
    /// A variable, resolved through the bindings at evaluation time
    Variable {
        /// Name of the variable
        name: String,
        /// Slot of the name in the bindings
        slot: usize,
    },
    /// <left> op <right>
    Binary {
        /// Operator applied to the children
        op: Op,
        /// Left operand
        left: Box<Node>,
        /// Right operand
        right: Box<Node>,
    },
}

impl Node {
    /// Create the node of the binary operator `symbol`
    pub fn operator(symbol: &str, left: Node, right: Node) -> Result<Self> {
        let op = Op::from_symbol(symbol)?;
        Ok(Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Build the tree of a postfix token sequence. Every identifier must
    /// already be registered in `bindings`.
    ///
    /// Returns `Ok(None)` for an empty sequence.
    pub fn from_postfix(postfix: &[Token<'_>], bindings: &Bindings) -> Result<Option<Self>> {
        let mut stack: Vec<Self> = Vec::new();
        for token in postfix {
            let node = match token.kind() {
                TokenKind::Number => {
                    let value = token
                        .text()
                        .parse()
                        .map_err(|_| Error::UnsupportedToken(token.text().into()))?;
                    Self::Constant(value)
                }
                TokenKind::Identifier => {
                    let name = token.text();
                    let slot = bindings
                        .slot(name)
                        .ok_or_else(|| Error::UnknownVariable(name.into()))?;
                    Self::Variable {
                        name: name.into(),
                        slot,
                    }
                }
                TokenKind::Operator | TokenKind::LParen | TokenKind::RParen => {
                    // the right operand is on top of the stack
                    match (stack.pop(), stack.pop()) {
                        (Some(right), Some(left)) => Self::operator(token.text(), left, right)?,
                        _ => return Err(Error::InsufficientOperands(token.text().into())),
                    }
                }
            };
            stack.push(node);
        }

        let root = stack.pop();
        if !stack.is_empty() {
            return Err(Error::UnbalancedExpression);
        }
        Ok(root)
    }

    /// Evaluate the node against `bindings`.
    ///
    /// The walk keeps its own stack, so the depth of the tree is only
    /// bounded by memory. Left operands are evaluated before right ones.
    pub fn evaluate(&self, bindings: &Bindings) -> Result<f64> {
        enum Step<'n> {
            Visit(&'n Node),
            Apply(Op),
        }

        let mut steps = vec![Step::Visit(self)];
        let mut values: Vec<f64> = Vec::new();
        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(Self::Constant(value)) => values.push(*value),
                Step::Visit(Self::Variable { slot, .. }) => values.push(bindings.number(*slot)?),
                Step::Visit(Self::Binary { op, left, right }) => {
                    steps.push(Step::Apply(*op));
                    steps.push(Step::Visit(right));
                    steps.push(Step::Visit(left));
                }
                Step::Apply(op) => match (values.pop(), values.pop()) {
                    (Some(right), Some(left)) => values.push(op.apply(left, right)),
                    _ => return Err(Error::InsufficientOperands(op.symbol().into())),
                },
            }
        }
        values.pop().ok_or(Error::EmptyExpression)
    }
}

impl Drop for Node {
    // the default drop recurses once per level
    fn drop(&mut self) {
        let mut pending = Vec::new();
        if let Self::Binary { left, right, .. } = self {
            pending.push(std::mem::replace(&mut **left, Self::Constant(0.0)));
            pending.push(std::mem::replace(&mut **right, Self::Constant(0.0)));
        }
        while let Some(mut node) = pending.pop() {
            if let Self::Binary { left, right, .. } = &mut node {
                pending.push(std::mem::replace(&mut **left, Self::Constant(0.0)));
                pending.push(std::mem::replace(&mut **right, Self::Constant(0.0)));
            }
        }
    }
}

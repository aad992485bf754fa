#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(
    clippy::needless_return,
    clippy::missing_docs_in_private_items,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]

//! Cellcalc, a formula evaluation and recalculation engine for a grid of
//! cells.
//!
//! Each cell holds either literal text or a formula starting with `=`. The
//! easiest way to use this crate is with the
//! [`Spreadsheet`](struct.Spreadsheet.html) type:
//!
//! ```
//! use cellcalc::Spreadsheet;
//!
//! let mut sheet = Spreadsheet::new(10, 10).unwrap();
//! sheet.set_cell_text(0, 0, "5").unwrap();
//! sheet.set_cell_text(0, 1, "=A1+2").unwrap();
//! sheet.set_cell_text(0, 2, "=B1+1").unwrap();
//! assert_eq!(sheet.cell_value(0, 2).unwrap(), "8");
//!
//! // Every cell depending on A1 is updated
//! sheet.set_cell_text(0, 0, "10").unwrap();
//! assert_eq!(sheet.cell_value(0, 1).unwrap(), "12");
//! assert_eq!(sheet.cell_value(0, 2).unwrap(), "13");
//! ```
//!
//! It is also possible to use the formula engine on its own with the
//! [`ExpressionTree`](struct.ExpressionTree.html) type, binding values to
//! the variables of a formula:
//!
//! ```
//! use cellcalc::ExpressionTree;
//!
//! let mut tree = ExpressionTree::parse("rate*(base+bonus)").unwrap();
//! tree.set_variable("rate", "2").unwrap();
//! tree.set_variable("base", "10").unwrap();
//! tree.set_variable("bonus", "1.5").unwrap();
//! assert_eq!(tree.evaluate(), Ok(23.0));
//! ```
//!
//! # Language definition
//!
//! Formulas can contain the following elements, without any whitespace:
//!
//! - decimal literal values: `12`, `0.5`, `-3` (a sign is only part of a
//!   number where an operand is expected);
//! - identifiers: ASCII letters optionally followed by digits. Identifiers
//!   naming a cell of the grid (`A1`, `AB12`) are cell references;
//! - left and right parenthesis;
//! - the binary operators `+`, `-`, `*` and `/`.
//!
//! Any other symbol is forbidden in the input.
//!
//! The operators obey the usual rules of precedence and are all left
//! associative. Values are `f64`: dividing by zero gives an infinity or
//! `NaN`.
//!
//! # Technical details
//!
//! Formulas are tokenized, converted to postfix order with the shunting yard
//! algorithm and built into a tree. Each cell records the cells whose
//! formula references it; editing a cell re-evaluates those dependents, and
//! theirs, from their own text. Reference cycles are reported as
//! [`Error::CircularReference`](enum.Error.html#variant.CircularReference).

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

mod address;
mod ast;
mod cell;
mod error;
mod expr;
mod lexer;
mod ops;
mod options;
mod postfix;
mod sheet;
mod token;

pub use address::{column_name, CellAddress};
pub use ast::{Bindings, Node, DEFAULT_VALUE};
pub use cell::{Cell, DEFAULT_BACKGROUND};
pub use error::{Error, Result};
pub use expr::{eval, ExpressionTree};
pub use lexer::{is_identifier, tokenize};
pub use ops::{is_left_paren, is_operator_symbol, is_right_paren, precedence_of, Op, Symbol};
pub use options::SheetOptions;
pub use postfix::to_postfix;
pub use sheet::{CellRecord, CellUpdate, Spreadsheet};
pub use token::{Token, TokenKind};

use crate::error::{Error, Result};
use crate::ops::{self, Symbol};
use crate::token::Token;

/// Convert an infix token sequence to postfix (reverse polish) order with the
/// shunting yard algorithm.
///
/// Operators of equal precedence are popped before the incoming operator is
/// pushed, which makes every operator left associative.
pub fn to_postfix<'a>(tokens: &[Token<'a>]) -> Result<Vec<Token<'a>>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut operators: Vec<Token<'a>> = Vec::new();

    'tokens: for &token in tokens {
        match ops::lookup(token.text()) {
            None => output.push(token),
            Some(Symbol::LParen) => operators.push(token),
            Some(Symbol::RParen) => {
                while let Some(top) = operators.pop() {
                    if ops::is_left_paren(top.text()) {
                        continue 'tokens;
                    }
                    output.push(top);
                }
                return Err(Error::UnmatchedParenthesis);
            }
            Some(incoming @ Symbol::Binary(_)) => {
                while let Some(&top) = operators.last() {
                    let pop_me = ops::precedence_of(top.text())
                        .map_or(false, |precedence| precedence >= incoming.precedence());
                    if !pop_me {
                        break;
                    }
                    operators.pop();
                    output.push(top);
                }
                operators.push(token);
            }
        }
    }

    while let Some(token) = operators.pop() {
        if ops::is_left_paren(token.text()) {
            return Err(Error::UnbalancedExpression);
        }
        output.push(token);
    }
    trace!("postfix form: {:?}", output);
    Ok(output)
}

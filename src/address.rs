//! A1-style cell references

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Position of a cell in the grid. Both indexes are 0-based; the row is
/// 1-based in text (`A1` is row 0, column 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellAddress {
    /// Row index
    pub row: usize,
    /// Column index (A=0, B=1, ..., Z=25, AA=26)
    pub column: usize,
}

impl CellAddress {
    /// Address of the cell at zero-based `row` and `column`
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Parse a cell address from A1-style notation. Column letters are
    /// case-insensitive.
    ///
    /// # Examples
    /// ```
    /// use cellcalc::CellAddress;
    ///
    /// let addr = CellAddress::parse("B3").unwrap();
    /// assert_eq!((addr.row, addr.column), (2, 1));
    ///
    /// let addr = CellAddress::parse("aa10").unwrap();
    /// assert_eq!((addr.row, addr.column), (9, 26));
    ///
    /// assert!(CellAddress::parse("A0").is_err());
    /// assert!(CellAddress::parse("Hello").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidAddress(s.into());

        let split = s
            .find(|c: char| !c.is_ascii_alphabetic())
            .ok_or_else(invalid)?;
        let (letters, digits) = s.split_at(split);
        if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let column = letters_to_column(letters).ok_or_else(invalid)?;
        let row: usize = digits.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }
        Ok(Self::new(row - 1, column))
    }
}

/// Convert column letters to a 0-based index, `None` on overflow
fn letters_to_column(letters: &str) -> Option<usize> {
    let mut column: usize = 0;
    for b in letters.bytes() {
        let digit = usize::from(b.to_ascii_uppercase() - b'A') + 1;
        column = column.checked_mul(26)?.checked_add(digit)?;
    }
    column.checked_sub(1)
}

/// Letters naming the 0-based `column`
///
/// ```
/// # use cellcalc::column_name;
/// assert_eq!(column_name(0), "A");
/// assert_eq!(column_name(25), "Z");
/// assert_eq!(column_name(27), "AB");
/// ```
pub fn column_name(column: usize) -> String {
    let mut letters = Vec::new();
    let mut n = column + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.iter().rev().map(|&b| char::from(b)).collect()
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_name(self.column), self.row + 1)
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

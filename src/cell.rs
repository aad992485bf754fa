use crate::address::CellAddress;

/// Background of a cell that was never colored (opaque white, ARGB)
pub const DEFAULT_BACKGROUND: u32 = 0xFFFF_FFFF;

/// A cell of the grid.
///
/// The text is what the user typed; the value is the text itself, or the
/// evaluation of the formula when the text starts with `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    address: CellAddress,
    text: String,
    value: String,
    background: u32,
    /// Cells whose formula references this one, in registration order
    dependents: Vec<CellAddress>,
    /// Cells referenced by the formula of this one
    precedents: Vec<CellAddress>,
}

impl Cell {
    pub(crate) fn new(address: CellAddress) -> Self {
        Self {
            address,
            text: String::new(),
            value: String::new(),
            background: DEFAULT_BACKGROUND,
            dependents: Vec::new(),
            precedents: Vec::new(),
        }
    }

    /// Position of the cell in the grid
    pub fn address(&self) -> CellAddress {
        self.address
    }

    /// Zero-based row
    pub fn row(&self) -> usize {
        self.address.row
    }

    /// Zero-based column
    pub fn column(&self) -> usize {
        self.address.column
    }

    /// Raw text, possibly a formula
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Computed value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Computed value, if it is a number
    pub fn numeric_value(&self) -> Option<f64> {
        self.value.parse().ok()
    }

    /// Background color (ARGB)
    pub fn background(&self) -> u32 {
        self.background
    }

    /// Cells whose formula references this one
    pub fn dependents(&self) -> &[CellAddress] {
        &self.dependents
    }

    /// Cells referenced by the formula of this one
    pub fn precedents(&self) -> &[CellAddress] {
        &self.precedents
    }

    /// Check if the cell holds neither text nor a custom background
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.background == DEFAULT_BACKGROUND
    }

    pub(crate) fn set_text(&mut self, text: &str) {
        self.text = text.into();
    }

    pub(crate) fn set_value(&mut self, value: String) {
        self.value = value;
    }

    pub(crate) fn set_background(&mut self, background: u32) {
        self.background = background;
    }

    /// Returns `false` if `dependent` was already registered
    pub(crate) fn add_dependent(&mut self, dependent: CellAddress) -> bool {
        if self.dependents.contains(&dependent) {
            return false;
        }
        self.dependents.push(dependent);
        true
    }

    pub(crate) fn remove_dependent(&mut self, dependent: CellAddress) {
        self.dependents.retain(|&address| address != dependent);
    }

    pub(crate) fn add_precedent(&mut self, precedent: CellAddress) {
        if !self.precedents.contains(&precedent) {
            self.precedents.push(precedent);
        }
    }

    pub(crate) fn take_precedents(&mut self) -> Vec<CellAddress> {
        std::mem::take(&mut self.precedents)
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new(self.address);
    }
}

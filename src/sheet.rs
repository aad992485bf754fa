//! Grid of cells, dependency tracking and recalculation

use crate::address::CellAddress;
use crate::cell::Cell;
use crate::error::{Error, Result};
use crate::expr::ExpressionTree;
use crate::options::SheetOptions;
use hashbrown::HashSet;
use std::collections::BTreeSet;

/// New computed value of a cell, reported by [`Spreadsheet::set_cell_text`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    /// Recalculated cell
    pub address: CellAddress,
    /// Its new computed value
    pub value: String,
}

/// What a persistence layer stores for a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRecord {
    /// Position of the cell
    pub address: CellAddress,
    /// Raw text, formulas included
    pub text: String,
    /// Background color (ARGB)
    pub background: u32,
}

/// A fixed-size grid of cells.
///
/// Setting the text of a cell evaluates it and re-evaluates, transitively,
/// every cell whose formula references it.
///
/// # Example
///
/// ```
/// use cellcalc::Spreadsheet;
///
/// let mut sheet = Spreadsheet::new(10, 5).unwrap();
/// sheet.set_cell_text(0, 0, "5").unwrap();
/// sheet.set_cell_text(0, 1, "=A1+2").unwrap();
/// assert_eq!(sheet.cell_value(0, 1).unwrap(), "7");
///
/// let updates = sheet.set_cell_text(0, 0, "10").unwrap();
/// assert_eq!(updates.len(), 2);
/// assert_eq!(sheet.cell_value(0, 1).unwrap(), "12");
/// ```
#[derive(Debug, Clone)]
pub struct Spreadsheet {
    rows: usize,
    columns: usize,
    /// Row-major storage
    cells: Vec<Cell>,
    /// Cells with text or a custom background
    occupied: BTreeSet<CellAddress>,
    options: SheetOptions,
}

impl Spreadsheet {
    /// Create a grid of `rows` x `columns` empty cells
    pub fn new(rows: usize, columns: usize) -> Result<Self> {
        Self::with_options(rows, columns, SheetOptions::default())
    }

    /// Create a grid of `rows` x `columns` empty cells using `options`
    pub fn with_options(rows: usize, columns: usize, options: SheetOptions) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(Error::InvalidDimensions { rows, columns });
        }
        let cells = (0..rows)
            .flat_map(|row| {
                (0..columns).map(move |column| Cell::new(CellAddress::new(row, column)))
            })
            .collect();
        Ok(Self {
            rows,
            columns,
            cells,
            occupied: BTreeSet::new(),
            options,
        })
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// Recalculation options in use
    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    /// Get the cell at `row`, `column`, or `None` outside of the grid
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        if row < self.rows && column < self.columns {
            Some(&self.cells[row * self.columns + column])
        } else {
            None
        }
    }

    /// Get a cell by its A1-style name
    pub fn cell_by_name(&self, name: &str) -> Option<&Cell> {
        let address = CellAddress::parse(name).ok()?;
        self.cell(address.row, address.column)
    }

    /// Raw text of a cell
    pub fn cell_text(&self, row: usize, column: usize) -> Result<&str> {
        Ok(self.checked_cell(row, column)?.text())
    }

    /// Computed value of a cell
    pub fn cell_value(&self, row: usize, column: usize) -> Result<&str> {
        Ok(self.checked_cell(row, column)?.value())
    }

    /// Background color (ARGB) of a cell
    pub fn background(&self, row: usize, column: usize) -> Result<u32> {
        Ok(self.checked_cell(row, column)?.background())
    }

    /// Cells whose formula references the cell at `row`, `column`
    pub fn dependents(&self, row: usize, column: usize) -> Result<&[CellAddress]> {
        Ok(self.checked_cell(row, column)?.dependents())
    }

    /// Cells referenced by the formula of the cell at `row`, `column`
    pub fn precedents(&self, row: usize, column: usize) -> Result<&[CellAddress]> {
        Ok(self.checked_cell(row, column)?.precedents())
    }

    /// Cells with text or a custom background, in address order
    pub fn occupied(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.occupied.iter().map(move |&address| self.get(address))
    }

    /// Set the text of a cell, then recalculate it and everything depending
    /// on it.
    ///
    /// Returns the new value of every recalculated cell, the edited cell
    /// first, each cell once. On error the cascade stops where it failed; the cells updated
    /// before keep their new value, the failing cell keeps its previous one.
    pub fn set_cell_text(
        &mut self,
        row: usize,
        column: usize,
        text: &str,
    ) -> Result<Vec<CellUpdate>> {
        let address = self.checked_cell(row, column)?.address();
        self.get_mut(address).set_text(text);
        self.track(address);

        let mut updates = Vec::new();
        if let Err(err) = self.recalculate(address, &mut updates) {
            warn!("recalculation from {} aborted: {}", address, err);
            return Err(err);
        }
        Ok(updates)
    }

    /// Set the background color (ARGB) of a cell
    pub fn set_background(&mut self, row: usize, column: usize, background: u32) -> Result<()> {
        let address = self.checked_cell(row, column)?.address();
        self.get_mut(address).set_background(background);
        self.track(address);
        Ok(())
    }

    /// Reset every cell to its initial state, dependencies included
    pub fn clear(&mut self) {
        if self.occupied.is_empty() {
            debug!("spreadsheet is already empty");
        }
        for cell in &mut self.cells {
            cell.reset();
        }
        self.occupied.clear();
    }

    /// Records of every occupied cell, in address order
    pub fn records(&self) -> impl Iterator<Item = CellRecord> + '_ {
        self.occupied().map(|cell| CellRecord {
            address: cell.address(),
            text: cell.text().into(),
            background: cell.background(),
        })
    }

    /// Replace the content of the grid by `records`, applied in order so
    /// that dependencies are rebuilt.
    pub fn load<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = CellRecord>,
    {
        self.clear();
        for record in records {
            let CellAddress { row, column } = record.address;
            self.set_background(row, column, record.background)?;
            self.set_cell_text(row, column, &record.text)?;
        }
        Ok(())
    }

    fn checked_cell(&self, row: usize, column: usize) -> Result<&Cell> {
        self.cell(row, column).ok_or(Error::OutOfBounds { row, column })
    }

    fn get(&self, address: CellAddress) -> &Cell {
        &self.cells[address.row * self.columns + address.column]
    }

    fn get_mut(&mut self, address: CellAddress) -> &mut Cell {
        &mut self.cells[address.row * self.columns + address.column]
    }

    /// Keep the occupied index in sync with the cell content
    fn track(&mut self, address: CellAddress) {
        if self.get(address).is_empty() {
            self.occupied.remove(&address);
        } else {
            self.occupied.insert(address);
        }
    }

    /// Resolve an identifier to a cell of the grid
    fn resolve(&self, name: &str) -> Option<CellAddress> {
        CellAddress::parse(name)
            .ok()
            .filter(|address| address.row < self.rows && address.column < self.columns)
    }

    /// Recalculate `origin`, then each of its transitive dependents once,
    /// every cell after all of its precedents.
    fn recalculate(&mut self, origin: CellAddress, updates: &mut Vec<CellUpdate>) -> Result<()> {
        self.refresh(origin, updates)?;
        let order = self.cascade_order(origin)?;
        // dependents are evaluated from their own text
        for address in order.into_iter().skip(1) {
            self.refresh(address, updates)?;
        }
        Ok(())
    }

    fn refresh(&mut self, address: CellAddress, updates: &mut Vec<CellUpdate>) -> Result<()> {
        let value = self.compute(address)?;
        debug!("{} = {}", address, value);
        self.get_mut(address).set_value(value.clone());
        updates.push(CellUpdate { address, value });
        Ok(())
    }

    /// Topological order of `origin` and everything depending on it,
    /// `origin` first.
    ///
    /// Depth-first over the dependents, keeping the current path: reaching a
    /// cell of the path is a cycle, a path longer than `max_cascade_depth`
    /// aborts. The reversed post-order puts each cell after its precedents.
    fn cascade_order(&self, origin: CellAddress) -> Result<Vec<CellAddress>> {
        let max_depth = self.options.max_cascade_depth;
        let mut visited = HashSet::new();
        visited.insert(origin);
        // cell, index of its next dependent to visit
        let mut path = vec![(origin, 0)];
        let mut finished = Vec::new();

        while let Some(&(address, next)) = path.last() {
            let dependent = match self.get(address).dependents().get(next) {
                Some(&dependent) => dependent,
                None => {
                    path.pop();
                    finished.push(address);
                    continue;
                }
            };
            let top = path.len() - 1;
            path[top].1 += 1;

            if path.iter().any(|&(cell, _)| cell == dependent) {
                return Err(Error::CircularReference(dependent.to_string()));
            }
            if visited.insert(dependent) {
                if path.len() >= max_depth {
                    return Err(Error::CascadeTooDeep(max_depth));
                }
                path.push((dependent, 0));
            }
        }

        finished.reverse();
        Ok(finished)
    }

    /// Compute the value of a cell from its text, registering the cells its
    /// formula references.
    fn compute(&mut self, address: CellAddress) -> Result<String> {
        let text = self.get(address).text().to_owned();
        if !text.starts_with('=') {
            self.link(address, &[]);
            return Ok(text);
        }
        let formula = &text[1..];

        let mut tree = ExpressionTree::parse(formula)?;
        let references = tree
            .variables()
            .filter_map(|name| self.resolve(name).map(|cell| (name.to_owned(), cell)))
            .filter(|&(_, cell)| cell != address)
            .collect::<Vec<_>>();
        let cells = references.iter().map(|&(_, cell)| cell).collect::<Vec<_>>();
        self.link(address, &cells);

        for (name, cell) in &references {
            let cell = self.get(*cell);
            if cell.numeric_value().is_some() {
                tree.set_variable(name, cell.value())?;
            }
        }

        Ok(tree.evaluate()?.to_string())
    }

    /// Register `address` as a dependent of every cell in `references`
    fn link(&mut self, address: CellAddress, references: &[CellAddress]) {
        if self.options.prune_stale_dependencies {
            for stale in self.get_mut(address).take_precedents() {
                if !references.contains(&stale) {
                    debug!("{} no longer depends on {}", address, stale);
                    self.get_mut(stale).remove_dependent(address);
                }
            }
        }
        for &reference in references {
            if self.get_mut(reference).add_dependent(address) {
                debug!("{} depends on {}", address, reference);
            }
            self.get_mut(address).add_precedent(reference);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::DEFAULT_BACKGROUND;

    fn a1(name: &str) -> CellAddress {
        CellAddress::parse(name).unwrap()
    }

    #[test]
    fn dimensions() {
        let sheet = Spreadsheet::new(4, 5).unwrap();
        assert_eq!(sheet.row_count(), 4);
        assert_eq!(sheet.column_count(), 5);
        assert_eq!(
            Spreadsheet::new(0, 3).unwrap_err(),
            Error::InvalidDimensions {
                rows: 0,
                columns: 3
            }
        );
    }

    #[test]
    fn cell_lookup() {
        let sheet = Spreadsheet::new(5, 5).unwrap();
        let cell = sheet.cell(2, 4).unwrap();
        assert_eq!((cell.row(), cell.column()), (2, 4));
        assert!(sheet.cell(5, 1).is_none());
        assert!(sheet.cell(1, 5).is_none());
        assert_eq!(sheet.cell_by_name("B3").unwrap().address(), a1("B3"));
        assert!(sheet.cell_by_name("F1").is_none());
        assert!(sheet.cell_by_name("Hello").is_none());
        assert_eq!(
            sheet.cell_text(7, 0),
            Err(Error::OutOfBounds { row: 7, column: 0 })
        );
    }

    #[test]
    fn plain_text() {
        let mut sheet = Spreadsheet::new(3, 3).unwrap();
        let updates = sheet.set_cell_text(1, 1, "Hello").unwrap();
        assert_eq!(
            updates,
            vec![CellUpdate {
                address: a1("B2"),
                value: "Hello".into()
            }]
        );
        assert_eq!(sheet.cell_text(1, 1).unwrap(), "Hello");
        assert_eq!(sheet.cell_value(1, 1).unwrap(), "Hello");
    }

    #[test]
    fn formula_without_references() {
        let mut sheet = Spreadsheet::new(3, 3).unwrap();
        sheet.set_cell_text(0, 0, "=2*(3+5)").unwrap();
        assert_eq!(sheet.cell_value(0, 0).unwrap(), "16");
        sheet.set_cell_text(0, 0, "=1/4").unwrap();
        assert_eq!(sheet.cell_value(0, 0).unwrap(), "0.25");
        sheet.set_cell_text(0, 0, "=1/0").unwrap();
        assert_eq!(sheet.cell_value(0, 0).unwrap(), "inf");
    }

    #[test]
    fn non_numeric_and_unknown_references() {
        let mut sheet = Spreadsheet::new(3, 3).unwrap();
        sheet.set_cell_text(0, 0, "Hello").unwrap();
        sheet.set_cell_text(0, 1, "=A1+Z9+World+1").unwrap();
        assert_eq!(sheet.cell_value(0, 1).unwrap(), "1");
        // Z9 is outside of the grid, World is not a cell
        assert_eq!(sheet.precedents(0, 1).unwrap(), &[a1("A1")]);
    }

    #[test]
    fn registers_dependents_once() {
        let mut sheet = Spreadsheet::new(3, 3).unwrap();
        sheet.set_cell_text(0, 0, "2").unwrap();
        sheet.set_cell_text(0, 1, "=A1*A1").unwrap();
        sheet.set_cell_text(0, 1, "=A1+A1").unwrap();
        assert_eq!(sheet.dependents(0, 0).unwrap(), &[a1("B1")]);
        assert_eq!(sheet.cell_value(0, 1).unwrap(), "4");
    }

    #[test]
    fn self_reference_is_ignored() {
        let mut sheet = Spreadsheet::new(3, 3).unwrap();
        sheet.set_cell_text(0, 0, "=A1+1").unwrap();
        assert_eq!(sheet.cell_value(0, 0).unwrap(), "1");
        assert!(sheet.dependents(0, 0).unwrap().is_empty());
        sheet.set_cell_text(0, 0, "=A1+1").unwrap();
        assert_eq!(sheet.cell_value(0, 0).unwrap(), "1");
    }

    #[test]
    fn stale_dependencies_are_pruned() {
        let mut sheet = Spreadsheet::new(3, 3).unwrap();
        sheet.set_cell_text(0, 0, "1").unwrap();
        sheet.set_cell_text(1, 0, "2").unwrap();
        sheet.set_cell_text(0, 1, "=A1").unwrap();
        sheet.set_cell_text(0, 1, "=A2").unwrap();
        assert!(sheet.dependents(0, 0).unwrap().is_empty());
        assert_eq!(sheet.dependents(1, 0).unwrap(), &[a1("B1")]);

        let updates = sheet.set_cell_text(0, 0, "7").unwrap();
        assert_eq!(updates.len(), 1);

        sheet.set_cell_text(0, 1, "plain").unwrap();
        assert!(sheet.dependents(1, 0).unwrap().is_empty());
        assert!(sheet.precedents(0, 1).unwrap().is_empty());
    }

    #[test]
    fn additive_dependencies() {
        let options = SheetOptions::default().with_prune_stale_dependencies(false);
        let mut sheet = Spreadsheet::with_options(3, 3, options).unwrap();
        sheet.set_cell_text(0, 0, "1").unwrap();
        sheet.set_cell_text(0, 1, "=A1").unwrap();
        sheet.set_cell_text(0, 1, "=5").unwrap();
        assert_eq!(sheet.dependents(0, 0).unwrap(), &[a1("B1")]);

        // B1 is still recalculated, from its own text
        let updates = sheet.set_cell_text(0, 0, "3").unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(sheet.cell_value(0, 1).unwrap(), "5");
    }

    #[test]
    fn circular_reference() {
        let mut sheet = Spreadsheet::new(3, 3).unwrap();
        sheet.set_cell_text(0, 0, "=B1+1").unwrap();
        assert_eq!(
            sheet.set_cell_text(0, 1, "=A1+1"),
            Err(Error::CircularReference("B1".into()))
        );
        assert_eq!(sheet.cell_text(0, 1).unwrap(), "=A1+1");
    }

    #[test]
    fn cascade_depth() {
        let options = SheetOptions::default().with_max_cascade_depth(2);
        let mut sheet = Spreadsheet::with_options(1, 4, options.clone()).unwrap();
        sheet.set_cell_text(0, 1, "=A1").unwrap();
        sheet.set_cell_text(0, 2, "=B1").unwrap();
        assert_eq!(
            sheet.set_cell_text(0, 0, "1"),
            Err(Error::CascadeTooDeep(2))
        );
        // the chain is checked before any dependent is recalculated
        assert_eq!(sheet.cell_value(0, 0).unwrap(), "1");
        assert_eq!(sheet.cell_value(0, 1).unwrap(), "0");
        assert_eq!(sheet.cell_value(0, 2).unwrap(), "0");

        let mut sheet = Spreadsheet::with_options(1, 4, options).unwrap();
        sheet.set_cell_text(0, 1, "=A1").unwrap();
        assert_eq!(sheet.set_cell_text(0, 0, "1").unwrap().len(), 2);
    }

    #[test]
    fn diamond_is_recalculated_once() {
        let mut sheet = Spreadsheet::new(2, 4).unwrap();
        sheet.set_cell_text(0, 1, "=A1*2").unwrap();
        sheet.set_cell_text(0, 2, "=A1+1").unwrap();
        sheet.set_cell_text(0, 3, "=B1-C1").unwrap();

        let updates = sheet.set_cell_text(0, 0, "6").unwrap();
        let addresses = updates.iter().map(|u| u.address).collect::<Vec<_>>();
        assert_eq!(addresses, vec![a1("A1"), a1("C1"), a1("B1"), a1("D1")]);
        assert_eq!(updates[3].value, "5");
    }

    #[test]
    fn failed_formula_keeps_previous_value() {
        let mut sheet = Spreadsheet::new(3, 3).unwrap();
        sheet.set_cell_text(0, 0, "=1+2").unwrap();
        assert_eq!(
            sheet.set_cell_text(0, 0, "=1+"),
            Err(Error::InsufficientOperands("+".into()))
        );
        assert_eq!(sheet.cell_text(0, 0).unwrap(), "=1+");
        assert_eq!(sheet.cell_value(0, 0).unwrap(), "3");
        assert_eq!(sheet.set_cell_text(0, 0, "="), Err(Error::EmptyExpression));
    }

    #[test]
    fn clear_and_background() {
        let mut sheet = Spreadsheet::new(5, 5).unwrap();
        sheet.set_cell_text(1, 1, "Hello").unwrap();
        sheet.set_cell_text(1, 2, "=B2").unwrap();
        sheet.set_background(1, 2, 0xFF00_FF00).unwrap();
        sheet.set_background(3, 3, 0xFFFF_FF00).unwrap();
        assert_eq!(sheet.background(1, 2).unwrap(), 0xFF00_FF00);
        assert_eq!(sheet.occupied().count(), 3);

        sheet.clear();
        assert_eq!(sheet.occupied().count(), 0);
        assert_eq!(sheet.cell_text(1, 1).unwrap(), "");
        assert_eq!(sheet.background(1, 2).unwrap(), DEFAULT_BACKGROUND);
        assert!(sheet.dependents(1, 1).unwrap().is_empty());
    }

    #[test]
    fn emptied_cell_leaves_index() {
        let mut sheet = Spreadsheet::new(2, 2).unwrap();
        sheet.set_cell_text(0, 0, "x").unwrap();
        sheet.set_cell_text(0, 0, "").unwrap();
        assert_eq!(sheet.records().count(), 0);
    }
}

/// Options for recalculation
///
/// # Example
///
/// ```
/// use cellcalc::SheetOptions;
///
/// let options = SheetOptions::default()
///     .with_prune_stale_dependencies(false)
///     .with_max_cascade_depth(32);
/// assert!(!options.prune_stale_dependencies);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetOptions {
    /// Drop the dependency edges a formula no longer uses when it is edited
    /// (default: true). When disabled, edges are only ever added.
    pub prune_stale_dependencies: bool,
    /// Maximum length of a dependency chain followed by one edit
    /// (default: 256)
    pub max_cascade_depth: usize,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            prune_stale_dependencies: true,
            max_cascade_depth: 256,
        }
    }
}

impl SheetOptions {
    /// Set `prune_stale_dependencies`
    pub fn with_prune_stale_dependencies(mut self, prune: bool) -> Self {
        self.prune_stale_dependencies = prune;
        self
    }

    /// Set `max_cascade_depth`
    pub fn with_max_cascade_depth(mut self, depth: usize) -> Self {
        self.max_cascade_depth = depth;
        self
    }
}

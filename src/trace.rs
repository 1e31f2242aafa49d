use std::fmt;

/// Per-search trace context.
///
/// Tracks the recursion depth so events can be indented, and counts how many
/// search nodes were entered. Passed explicitly down the recursion.
#[derive(Debug, Default, Clone)]
pub struct Trace {
    depth: usize,
    nodes: u64,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Search nodes entered so far.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub(crate) fn descend(&mut self) {
        self.depth += 1;
        self.nodes += 1;
    }

    pub(crate) fn ascend(&mut self) {
        assert!(self.depth > 0, "invalid step up");
        self.depth -= 1;
    }

    pub(crate) fn event(&self, args: fmt::Arguments<'_>) {
        let indent = 2 * self.depth;
        tracing::trace!(depth = self.depth, "{:indent$}{}", "", args);
    }
}

//! Configuration for the cover search.

/// Search settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Try the degree-one reduction on the min-heap top at every node.
    ///
    /// Turning it off never changes the size of the result, only the amount
    /// of branching needed to find it.
    pub degree_one_rule: bool,

    /// Largest cover size the iterative deepening will try.
    ///
    /// `None` searches up to the vertex count, which always succeeds.
    pub max_cover_size: Option<usize>,

    /// Check each returned cover against the edge list before handing it out.
    pub verify: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            degree_one_rule: true,
            max_cover_size: None,
            verify: cfg!(debug_assertions),
        }
    }
}

/// Index of a vertex in the graph arena (0-indexed).
pub type VertexId = usize;

/// Mutable per-vertex search state.
///
/// Records live in a dense array owned by [`crate::Graph`]; the heaps refer to
/// them by index and keep `pos_max`/`pos_min` pointing at their own slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    pub(crate) id: VertexId,
    /// Number of neighbours that are currently uncovered.
    pub(crate) degree: usize,
    pub(crate) covered: bool,
    pub(crate) pos_max: usize,
    pub(crate) pos_min: usize,
}

impl Vertex {
    pub(crate) fn new(id: VertexId) -> Self {
        Vertex {
            id,
            degree: 0,
            covered: false,
            pos_max: usize::MAX,
            pos_min: usize::MAX,
        }
    }

    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn is_covered(&self) -> bool {
        self.covered
    }
}

use bitvec::prelude::*;
use smallvec::SmallVec;

use crate::{
    error::{Error, Result},
    heap::{DegreeHeap, MaxDegree, MinDegree},
    vertex::{Vertex, VertexId},
    Cover,
};

pub(crate) type Neighbours = SmallVec<[VertexId; 4]>;

/// Largest vertex count [`Graph::try_new`] accepts.
pub const MAX_VERTICES: usize = u32::MAX as usize;

/// Undirected graph together with the mutable search state of its vertices.
///
/// The adjacency is fixed once construction is done. Coverage is flipped only
/// through [`crate::Coverage`], which keeps the bitmap, the live degrees and
/// both heaps in step.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) adjacency: Vec<Neighbours>,
    pub(crate) edges: Vec<(VertexId, VertexId)>,
    pub(crate) covered: BitVec,
    pub(crate) max_heap: DegreeHeap<MaxDegree>,
    pub(crate) min_heap: DegreeHeap<MinDegree>,
}

/// Copy of both heap arrays, taken before a bounded search.
#[derive(Debug, Clone)]
pub struct HeapSnapshot {
    max: Vec<VertexId>,
    min: Vec<VertexId>,
}

impl Graph {
    /// Graph with `vertex_count` isolated, uncovered vertices.
    pub fn new(vertex_count: usize) -> Self {
        Self::with_storage(
            Vec::with_capacity(vertex_count),
            Vec::with_capacity(vertex_count),
            vertex_count,
        )
    }

    /// Like [`Graph::new`], but a vertex count the arena cannot hold is an error
    /// instead of an allocation failure.
    pub fn try_new(vertex_count: usize) -> Result<Self> {
        let too_many = || Error::TooManyVertices {
            count: vertex_count,
            max: MAX_VERTICES,
        };
        if vertex_count > MAX_VERTICES {
            return Err(too_many());
        }
        let mut vertices = Vec::new();
        vertices
            .try_reserve_exact(vertex_count)
            .map_err(|_| too_many())?;
        let mut adjacency = Vec::new();
        adjacency
            .try_reserve_exact(vertex_count)
            .map_err(|_| too_many())?;
        Ok(Self::with_storage(vertices, adjacency, vertex_count))
    }

    fn with_storage(
        vertices: Vec<Vertex>,
        adjacency: Vec<Neighbours>,
        vertex_count: usize,
    ) -> Self {
        let mut graph = Graph {
            vertices,
            adjacency,
            edges: Vec::new(),
            covered: BitVec::with_capacity(vertex_count),
            max_heap: DegreeHeap::with_capacity(vertex_count),
            min_heap: DegreeHeap::with_capacity(vertex_count),
        };
        if let Some(last) = vertex_count.checked_sub(1) {
            graph.add_vertex_if_absent(last);
        }
        graph
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[(VertexId, VertexId)] {
        &self.edges
    }

    pub fn vertex(&self, vertex: VertexId) -> &Vertex {
        &self.vertices[vertex]
    }

    pub fn neighbours(&self, vertex: VertexId) -> &[VertexId] {
        &self.adjacency[vertex]
    }

    /// Live degree: neighbours of `vertex` that are currently uncovered.
    pub fn degree(&self, vertex: VertexId) -> usize {
        self.vertices[vertex].degree
    }

    pub fn max_heap(&self) -> &DegreeHeap<MaxDegree> {
        &self.max_heap
    }

    pub fn min_heap(&self) -> &DegreeHeap<MinDegree> {
        &self.min_heap
    }

    /// Makes sure a record exists for `vertex`, growing the arena if needed.
    ///
    /// New records start uncovered with degree 0 and are pushed onto both heaps.
    /// Ids between the old size and `vertex` are materialized as well.
    pub fn add_vertex_if_absent(&mut self, vertex: VertexId) -> VertexId {
        for id in self.vertices.len()..=vertex {
            self.vertices.push(Vertex::new(id));
            self.adjacency.push(Neighbours::new());
            self.covered.push(false);
            self.max_heap.push(&mut self.vertices, id);
            self.min_heap.push(&mut self.vertices, id);
        }
        vertex
    }

    /// Adds the undirected edge `{a, b}`.
    ///
    /// Self loops are rejected before anything is touched. The edge must not be
    /// present yet; [`crate::parse_input`] drops repeated edges before adding them.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> Result<()> {
        if a == b {
            return Err(Error::SelfLoop { vertex: a });
        }
        self.add_vertex_if_absent(a.max(b));
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
        self.edges.push((a, b));
        if !self.covered[b] {
            self.shift_degree(a, 1);
        }
        if !self.covered[a] {
            self.shift_degree(b, 1);
        }
        Ok(())
    }

    /// Adds `delta` to the live degree of `vertex` and repairs both heaps.
    pub(crate) fn shift_degree(&mut self, vertex: VertexId, delta: isize) {
        let record = &self.vertices[vertex];
        let degree = record
            .degree
            .checked_add_signed(delta)
            .unwrap_or_else(|| panic!("degree of vertex {} underflowed", vertex + 1));
        let covered = record.covered;
        self.set_key(vertex, degree, covered);
    }

    pub(crate) fn set_key(&mut self, vertex: VertexId, degree: usize, covered: bool) {
        self.max_heap
            .update(&mut self.vertices, vertex, degree, covered);
        self.min_heap
            .update(&mut self.vertices, vertex, degree, covered);
    }

    pub fn snapshot(&self) -> HeapSnapshot {
        HeapSnapshot {
            max: self.max_heap.snapshot(),
            min: self.min_heap.snapshot(),
        }
    }

    /// Clears the coverage bitmap and puts both heaps back as they were at `snapshot`.
    pub fn restore(&mut self, snapshot: HeapSnapshot) {
        self.covered.fill(false);
        self.max_heap.restore(&mut self.vertices, snapshot.max);
        self.min_heap.restore(&mut self.vertices, snapshot.min);
        debug_assert!(self.check_invariants());
    }

    /// Returns true when every edge has an endpoint in `cover`.
    pub fn validate_cover(&self, cover: &Cover) -> bool {
        let mut member = bitvec![0; self.vertex_count()];
        for &vertex in cover.vertices() {
            if vertex >= self.vertex_count() {
                tracing::warn!(vertex = vertex + 1, "cover names an unknown vertex");
                return false;
            }
            member.set(vertex, true);
        }
        for &(start, end) in &self.edges {
            if !(member[start] || member[end]) {
                tracing::warn!(start = start + 1, end = end + 1, "edge not covered");
                return false;
            }
        }
        true
    }

    /// Checks the bitmap, live degrees and both heaps against each other.
    pub fn check_invariants(&self) -> bool {
        let flags_match = self
            .vertices
            .iter()
            .all(|vertex| self.covered[vertex.id] == vertex.covered);
        let degrees_match = self.vertices.iter().all(|vertex| {
            let live = self.adjacency[vertex.id]
                .iter()
                .filter(|&&neighbour| !self.covered[neighbour])
                .count();
            live == vertex.degree
        });
        flags_match
            && degrees_match
            && self.max_heap.is_consistent(&self.vertices)
            && self.min_heap.is_consistent(&self.vertices)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_graph_is_isolated() {
        let graph = Graph::new(4);
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.max_heap().len(), 4);
        assert_eq!(graph.min_heap().len(), 4);
        assert!((0..4).all(|v| graph.degree(v) == 0));
        assert!(graph.check_invariants());
    }

    #[test]
    fn test_add_edge_updates_degrees() {
        let mut graph = Graph::new(4);
        graph.add_edge(0, 1).unwrap();
        graph.add_edge(0, 2).unwrap();
        graph.add_edge(0, 3).unwrap();
        assert_eq!(graph.degree(0), 3);
        assert_eq!(graph.degree(3), 1);
        assert_eq!(graph.neighbours(0), &[1, 2, 3]);
        assert_eq!(graph.max_heap().peek(), Some(0));
        assert_ne!(graph.min_heap().peek(), Some(0));
        assert!(graph.check_invariants());
    }

    #[test]
    fn test_self_loop_leaves_graph_untouched() {
        let mut graph = Graph::new(3);
        graph.add_edge(0, 1).unwrap();
        let before = graph.clone();
        assert!(matches!(
            graph.add_edge(2, 2),
            Err(Error::SelfLoop { vertex: 2 })
        ));
        assert_eq!(graph.vertices, before.vertices);
        assert_eq!(graph.edges, before.edges);
        assert_eq!(graph.max_heap().as_slice(), before.max_heap().as_slice());
        assert_eq!(graph.min_heap().as_slice(), before.min_heap().as_slice());
    }

    #[test]
    fn test_try_new_rejects_huge_counts() {
        assert!(matches!(
            Graph::try_new(usize::MAX),
            Err(Error::TooManyVertices { .. })
        ));
        assert!(matches!(
            Graph::try_new(MAX_VERTICES + 1),
            Err(Error::TooManyVertices { .. })
        ));
        let graph = Graph::try_new(3).unwrap();
        assert_eq!(graph.vertex_count(), 3);
        assert!(graph.check_invariants());
    }

    #[test]
    fn test_add_vertex_grows_arena() {
        let mut graph = Graph::default();
        graph.add_edge(0, 3).unwrap();
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.degree(1), 0);
        assert_eq!(graph.add_vertex_if_absent(2), 2);
        assert_eq!(graph.vertex_count(), 4);
        assert!(graph.check_invariants());
    }

    #[test]
    fn test_validate_cover() {
        let mut graph = Graph::new(3);
        graph.add_edge(0, 1).unwrap();
        graph.add_edge(1, 2).unwrap();
        assert!(!graph.validate_cover(&Cover::default()));
        assert!(graph.validate_cover(&Cover::new(vec![1])));
        assert!(!graph.validate_cover(&Cover::new(vec![0])));
        assert!(graph.validate_cover(&Cover::full(3)));
        assert!(!graph.validate_cover(&Cover::new(vec![7])));
    }
}

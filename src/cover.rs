//! Coverage mutator: the only place a vertex's covered flag changes.

use std::ops::{Deref, DerefMut};

use smallvec::SmallVec;

use crate::{graph::Graph, vertex::VertexId};

/// Mutable view of a graph's coverage state for the duration of one search.
///
/// Every flip keeps the bitmap, the vertex record, the live degree of each
/// neighbour and both heaps consistent.
#[derive(Debug)]
pub struct Coverage<'g> {
    graph: &'g mut Graph,
}

impl<'g> Coverage<'g> {
    pub fn new(graph: &'g mut Graph) -> Self {
        Coverage { graph }
    }

    pub fn graph(&self) -> &Graph {
        &*self.graph
    }

    /// Marks `vertex` covered and removes it from the live degree of its neighbours.
    ///
    /// # Panics
    ///
    /// If `vertex` is already covered, which means a backtrack went missing.
    pub fn cover(&mut self, vertex: VertexId) {
        assert!(
            !self.graph.covered[vertex],
            "vertex {} already covered",
            vertex + 1
        );
        let degree = self.graph.vertices[vertex].degree;
        self.graph.set_key(vertex, degree, true);
        self.graph.covered.set(vertex, true);
        self.shift_neighbours(vertex, -1);
    }

    /// Exact inverse of [`Coverage::cover`].
    ///
    /// # Panics
    ///
    /// If `vertex` is not covered.
    pub fn uncover(&mut self, vertex: VertexId) {
        assert!(
            self.graph.covered[vertex],
            "vertex {} not covered",
            vertex + 1
        );
        let degree = self.count_uncovered(vertex);
        debug_assert_eq!(degree, self.graph.vertices[vertex].degree);
        self.graph.set_key(vertex, degree, false);
        self.graph.covered.set(vertex, false);
        self.shift_neighbours(vertex, 1);
    }

    fn shift_neighbours(&mut self, vertex: VertexId, delta: isize) {
        for index in 0..self.graph.adjacency[vertex].len() {
            let neighbour = self.graph.adjacency[vertex][index];
            self.graph.shift_degree(neighbour, delta);
        }
    }

    /// Opens a scope whose covers are undone, newest first, when it is dropped.
    pub fn scope(&mut self) -> CoverScope<'_, 'g> {
        CoverScope {
            coverage: self,
            covered: SmallVec::new(),
        }
    }

    pub fn is_covered(&self, vertex: VertexId) -> bool {
        self.graph.covered[vertex]
    }

    pub fn uncovered_neighbours(&self, vertex: VertexId) -> SmallVec<[VertexId; 8]> {
        self.graph
            .neighbours(vertex)
            .iter()
            .copied()
            .filter(|&neighbour| !self.is_covered(neighbour))
            .collect()
    }

    pub fn first_uncovered_neighbour(&self, vertex: VertexId) -> Option<VertexId> {
        self.graph
            .neighbours(vertex)
            .iter()
            .copied()
            .find(|&neighbour| !self.is_covered(neighbour))
    }

    pub fn count_uncovered(&self, vertex: VertexId) -> usize {
        self.graph
            .neighbours(vertex)
            .iter()
            .filter(|&&neighbour| !self.is_covered(neighbour))
            .count()
    }

    /// Highest-degree uncovered vertex, or a covered one if nothing is left.
    pub fn max_top(&self) -> Option<VertexId> {
        self.graph.max_heap.peek()
    }

    /// Lowest-degree uncovered vertex, or a covered one if nothing is left.
    pub fn min_top(&self) -> Option<VertexId> {
        self.graph.min_heap.peek()
    }
}

/// Covers made through this guard are uncovered in reverse order on drop,
/// whichever way the enclosing branch exits.
#[derive(Debug)]
pub struct CoverScope<'c, 'g> {
    coverage: &'c mut Coverage<'g>,
    covered: SmallVec<[VertexId; 4]>,
}

impl CoverScope<'_, '_> {
    pub fn cover(&mut self, vertex: VertexId) {
        self.coverage.cover(vertex);
        self.covered.push(vertex);
    }

    /// Vertices covered by this scope, oldest first.
    pub fn covered(&self) -> &[VertexId] {
        &self.covered
    }
}

impl<'g> Deref for CoverScope<'_, 'g> {
    type Target = Coverage<'g>;

    fn deref(&self) -> &Self::Target {
        &*self.coverage
    }
}

impl<'g> DerefMut for CoverScope<'_, 'g> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.coverage
    }
}

impl Drop for CoverScope<'_, '_> {
    fn drop(&mut self) {
        // State is already corrupt if we are unwinding from a violation.
        if std::thread::panicking() {
            return;
        }
        while let Some(vertex) = self.covered.pop() {
            self.coverage.uncover(vertex);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // 0 - 1 - 2 - 3 plus the chord 1 - 3
    fn paw() -> Graph {
        let mut graph = Graph::new(4);
        for (a, b) in [(0, 1), (1, 2), (2, 3), (1, 3)] {
            graph.add_edge(a, b).unwrap();
        }
        graph
    }

    fn state(graph: &Graph) -> (Vec<bool>, Vec<usize>) {
        (
            (0..graph.vertex_count())
                .map(|v| graph.vertex(v).is_covered())
                .collect(),
            (0..graph.vertex_count()).map(|v| graph.degree(v)).collect(),
        )
    }

    /// `(covered, degree)` of the vertex in each slot of both heap arrays.
    fn heap_keys(graph: &Graph) -> (Vec<(bool, usize)>, Vec<(bool, usize)>) {
        let key = |&v: &VertexId| (graph.vertex(v).is_covered(), graph.degree(v));
        (
            graph.max_heap().as_slice().iter().map(key).collect(),
            graph.min_heap().as_slice().iter().map(key).collect(),
        )
    }

    #[test]
    fn test_cover_updates_neighbours() {
        let mut graph = paw();
        let mut coverage = Coverage::new(&mut graph);
        coverage.cover(1);
        assert!(coverage.is_covered(1));
        assert_eq!(coverage.graph().degree(0), 0);
        assert_eq!(coverage.graph().degree(2), 1);
        assert_eq!(coverage.graph().degree(3), 1);
        assert_eq!(coverage.count_uncovered(3), 1);
        assert_eq!(coverage.first_uncovered_neighbour(3), Some(2));
        assert_eq!(coverage.first_uncovered_neighbour(0), None);
        assert_eq!(coverage.uncovered_neighbours(2).as_slice(), &[3]);
        assert!(coverage.graph().check_invariants());
    }

    #[test]
    fn test_cover_then_uncover_restores_state() {
        let mut graph = paw();
        let before = state(&graph);
        let keys = heap_keys(&graph);
        for vertex in 0..4 {
            let mut coverage = Coverage::new(&mut graph);
            coverage.cover(vertex);
            coverage.uncover(vertex);
            assert_eq!(state(&graph), before);
            assert_eq!(heap_keys(&graph), keys);
            assert!(graph.check_invariants());
        }
    }

    #[test]
    fn test_max_top_is_covered_once_everything_is() {
        let mut graph = paw();
        let mut coverage = Coverage::new(&mut graph);
        let mut scope = coverage.scope();
        for vertex in 0..4 {
            scope.cover(vertex);
        }
        let top = scope.max_top().unwrap();
        assert!(scope.is_covered(top));
        assert_eq!(scope.covered(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_scope_uncovers_on_drop() {
        let mut graph = paw();
        let before = state(&graph);
        {
            let mut coverage = Coverage::new(&mut graph);
            let mut outer = coverage.scope();
            outer.cover(1);
            {
                let mut inner = outer.scope();
                inner.cover(2);
                inner.cover(3);
                assert!(inner.is_covered(3));
            }
            assert!(!outer.is_covered(2));
            assert!(outer.is_covered(1));
            assert!(outer.graph().check_invariants());
        }
        assert_eq!(state(&graph), before);
        assert!(graph.check_invariants());
    }

    #[test]
    #[should_panic(expected = "already covered")]
    fn test_double_cover_panics() {
        let mut graph = paw();
        let mut coverage = Coverage::new(&mut graph);
        coverage.cover(0);
        coverage.cover(0);
    }

    #[test]
    #[should_panic(expected = "not covered")]
    fn test_uncover_uncovered_panics() {
        let mut graph = paw();
        let mut coverage = Coverage::new(&mut graph);
        coverage.uncover(2);
    }
}

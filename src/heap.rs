//! Position-aware binary heaps over the vertex arena.
//!
//! Both heaps hold every vertex exactly once. Uncovered vertices always sort
//! before covered ones; among equal coverage the max heap prefers high degree
//! and the min heap low degree. Each vertex stores its slot in each heap so a
//! key change can be repaired in O(log n) from where the vertex currently sits.

use std::marker::PhantomData;

use crate::vertex::{Vertex, VertexId};

/// Ordering and position bookkeeping for one heap instance.
pub trait HeapOrder {
    /// Returns true if `a` must sit above `b`.
    fn precedes(a: &Vertex, b: &Vertex) -> bool;
    fn position(vertex: &Vertex) -> usize;
    fn set_position(vertex: &mut Vertex, position: usize);
}

/// Highest uncovered degree on top.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxDegree;

/// Lowest uncovered degree on top.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinDegree;

impl HeapOrder for MaxDegree {
    #[inline]
    fn precedes(a: &Vertex, b: &Vertex) -> bool {
        (!a.covered && b.covered) || (a.covered == b.covered && a.degree > b.degree)
    }

    #[inline]
    fn position(vertex: &Vertex) -> usize {
        vertex.pos_max
    }

    #[inline]
    fn set_position(vertex: &mut Vertex, position: usize) {
        vertex.pos_max = position;
    }
}

impl HeapOrder for MinDegree {
    #[inline]
    fn precedes(a: &Vertex, b: &Vertex) -> bool {
        (!a.covered && b.covered) || (a.covered == b.covered && a.degree < b.degree)
    }

    #[inline]
    fn position(vertex: &Vertex) -> usize {
        vertex.pos_min
    }

    #[inline]
    fn set_position(vertex: &mut Vertex, position: usize) {
        vertex.pos_min = position;
    }
}

#[derive(Debug, Clone)]
pub struct DegreeHeap<O> {
    slots: Vec<VertexId>,
    order: PhantomData<O>,
}

impl<O> Default for DegreeHeap<O> {
    fn default() -> Self {
        DegreeHeap {
            slots: Vec::new(),
            order: PhantomData,
        }
    }
}

impl<O: HeapOrder> DegreeHeap<O> {
    pub fn with_capacity(capacity: usize) -> Self {
        DegreeHeap {
            slots: Vec::with_capacity(capacity),
            order: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Vertex at the top of the heap.
    pub fn peek(&self) -> Option<VertexId> {
        self.slots.first().copied()
    }

    /// Backing array in heap order.
    pub fn as_slice(&self) -> &[VertexId] {
        &self.slots
    }

    pub(crate) fn push(&mut self, vertices: &mut [Vertex], vertex: VertexId) {
        let position = self.slots.len();
        self.slots.push(vertex);
        O::set_position(&mut vertices[vertex], position);
        self.sift_up(vertices, position);
    }

    /// Sets the key of `vertex` and restores heap order around it.
    pub(crate) fn update(
        &mut self,
        vertices: &mut [Vertex],
        vertex: VertexId,
        degree: usize,
        covered: bool,
    ) {
        let record = &mut vertices[vertex];
        record.degree = degree;
        record.covered = covered;
        self.fix(vertices, vertex);
    }

    /// Restores heap order after the key of `vertex` changed in either direction.
    pub(crate) fn fix(&mut self, vertices: &mut [Vertex], vertex: VertexId) {
        let position = O::position(&vertices[vertex]);
        debug_assert_eq!(self.slots[position], vertex);
        if !self.sift_down(vertices, position) {
            self.sift_up(vertices, position);
        }
    }

    pub(crate) fn snapshot(&self) -> Vec<VertexId> {
        self.slots.clone()
    }

    /// Reinstates a previously taken backing array and re-points every vertex at it.
    pub(crate) fn restore(&mut self, vertices: &mut [Vertex], slots: Vec<VertexId>) {
        debug_assert_eq!(slots.len(), self.slots.len());
        for (position, &vertex) in slots.iter().enumerate() {
            O::set_position(&mut vertices[vertex], position);
        }
        self.slots = slots;
    }

    /// Checks the ordering and position invariants against the arena.
    pub fn is_consistent(&self, vertices: &[Vertex]) -> bool {
        if self.slots.len() != vertices.len() {
            return false;
        }
        let positions_match = self
            .slots
            .iter()
            .enumerate()
            .all(|(position, &vertex)| O::position(&vertices[vertex]) == position);
        let ordered = (1..self.slots.len()).all(|child| {
            let parent = (child - 1) / 2;
            !O::precedes(&vertices[self.slots[child]], &vertices[self.slots[parent]])
        });
        positions_match && ordered
    }

    fn swap(&mut self, vertices: &mut [Vertex], i: usize, j: usize) {
        self.slots.swap(i, j);
        O::set_position(&mut vertices[self.slots[i]], i);
        O::set_position(&mut vertices[self.slots[j]], j);
    }

    fn sift_up(&mut self, vertices: &mut [Vertex], mut child: usize) {
        while child > 0 {
            let parent = (child - 1) / 2;
            if !O::precedes(&vertices[self.slots[child]], &vertices[self.slots[parent]]) {
                break;
            }
            self.swap(vertices, parent, child);
            child = parent;
        }
    }

    /// Returns whether the element moved.
    fn sift_down(&mut self, vertices: &mut [Vertex], start: usize) -> bool {
        let len = self.slots.len();
        let mut parent = start;
        loop {
            let left = 2 * parent + 1;
            if left >= len {
                break;
            }
            let mut best = left;
            let right = left + 1;
            if right < len
                && O::precedes(&vertices[self.slots[right]], &vertices[self.slots[left]])
            {
                best = right;
            }
            if !O::precedes(&vertices[self.slots[best]], &vertices[self.slots[parent]]) {
                break;
            }
            self.swap(vertices, parent, best);
            parent = best;
        }
        parent > start
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn arena(degrees: &[usize]) -> Vec<Vertex> {
        degrees
            .iter()
            .enumerate()
            .map(|(id, &degree)| Vertex {
                degree,
                ..Vertex::new(id)
            })
            .collect()
    }

    fn build<O: HeapOrder>(vertices: &mut [Vertex]) -> DegreeHeap<O> {
        let mut heap = DegreeHeap::with_capacity(vertices.len());
        for id in 0..vertices.len() {
            heap.push(vertices, id);
        }
        heap
    }

    #[test]
    fn test_peek_extremes() {
        let mut vertices = arena(&[3, 1, 4, 1, 5, 9, 2, 6]);
        let max = build::<MaxDegree>(&mut vertices);
        let min = build::<MinDegree>(&mut vertices);
        assert_eq!(max.peek(), Some(5));
        assert_eq!(vertices[min.peek().unwrap()].degree, 1);
        assert!(max.is_consistent(&vertices));
        assert!(min.is_consistent(&vertices));
    }

    #[test]
    fn test_covered_sinks_below_uncovered() {
        let mut vertices = arena(&[7, 1, 2]);
        let mut max = build::<MaxDegree>(&mut vertices);
        let mut min = build::<MinDegree>(&mut vertices);
        max.update(&mut vertices, 0, 7, true);
        min.fix(&mut vertices, 0);
        assert_eq!(max.peek(), Some(2));
        min.update(&mut vertices, 1, 1, true);
        max.fix(&mut vertices, 1);
        assert_eq!(min.peek(), Some(2));
        assert!(max.is_consistent(&vertices));
        assert!(min.is_consistent(&vertices));
    }

    #[test]
    fn test_empty_heap() {
        let heap = DegreeHeap::<MaxDegree>::default();
        assert!(heap.is_empty());
        assert_eq!(heap.peek(), None);
        assert!(heap.is_consistent(&[]));
    }

    #[test]
    fn test_random_updates_keep_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let degrees: Vec<usize> = (0..64).map(|_| rng.gen_range(0..20)).collect();
        let mut vertices = arena(&degrees);
        let mut max = build::<MaxDegree>(&mut vertices);
        let mut min = build::<MinDegree>(&mut vertices);
        for _ in 0..2000 {
            let vertex = rng.gen_range(0..vertices.len());
            let degree = rng.gen_range(0..20);
            let covered = rng.gen_bool(0.3);
            max.update(&mut vertices, vertex, degree, covered);
            min.fix(&mut vertices, vertex);
            assert!(max.is_consistent(&vertices));
            assert!(min.is_consistent(&vertices));
        }
    }

    #[test]
    fn test_restore_repositions_vertices() {
        let mut vertices = arena(&[1, 2, 3, 4, 5]);
        let mut max = build::<MaxDegree>(&mut vertices);
        let saved = max.snapshot();
        max.update(&mut vertices, 4, 0, false);
        max.update(&mut vertices, 4, 5, false);
        max.restore(&mut vertices, saved.clone());
        assert_eq!(max.as_slice(), saved.as_slice());
        assert!(max.is_consistent(&vertices));
    }
}

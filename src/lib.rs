//! Exact minimum vertex cover by iterative-deepening branch and bound.
//!
//! A [`Graph`] owns every vertex record together with two position-aware heaps
//! (highest and lowest live degree). The search flips coverage through a
//! [`Coverage`] mutator and undoes each flip on the way back out, so the whole
//! recursion shares a single copy of the state.

use std::fmt::Write;

pub mod cover;
pub mod error;
pub mod graph;
pub mod heap;
pub mod input;
pub mod search;
pub mod settings;
pub mod trace;
pub mod vertex;

pub use cover::{CoverScope, Coverage};
pub use error::{Error, Result};
pub use graph::{Graph, HeapSnapshot};
pub use input::parse_input;
pub use search::{SearchStats, Solution};
pub use settings::Settings;
pub use trace::Trace;
pub use vertex::{Vertex, VertexId};

/// A vertex cover, as 0-indexed vertex ids.
///
/// The order is the one the search produced while unwinding unless [`Cover::sort`]
/// was called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cover {
    vertices: Vec<VertexId>,
}

impl Cover {
    pub fn new(vertices: Vec<VertexId>) -> Self {
        Cover { vertices }
    }

    #[cfg(test)]
    fn full(n: usize) -> Cover {
        Cover {
            vertices: (0..n).collect(),
        }
    }

    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn sort(&mut self) {
        self.vertices.sort_unstable();
    }

    /// One 1-indexed vertex id per line.
    pub fn format(&self) -> String {
        let mut output = String::new();
        for vertex in &self.vertices {
            let _ = writeln!(&mut output, "{}", vertex + 1);
        }
        output
    }
}

impl From<Cover> for Vec<VertexId> {
    fn from(cover: Cover) -> Self {
        cover.vertices
    }
}

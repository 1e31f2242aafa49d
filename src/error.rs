//! Error types for graph construction and input parsing.

use thiserror::Error;

/// Invalid input, either while reading the text format or while building a graph.
///
/// Broken branch discipline (covering a covered vertex, uncovering an uncovered
/// one) is a defect and panics instead of surfacing here.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading the input stream failed
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// No header line
    #[error("empty input, expected a header line `N M`")]
    EmptyInput,

    /// A line did not consist of exactly two tokens
    #[error("line {line}: expected two integers, got `{content}`")]
    MalformedLine { line: usize, content: String },

    /// A token was not a non-negative integer
    #[error("line {line}: invalid number `{token}`")]
    InvalidNumber { line: usize, token: String },

    /// Vertex id outside `1..=count`
    #[error("line {line}: vertex {vertex} is outside 1..={count}")]
    VertexOutOfRange {
        line: usize,
        vertex: usize,
        count: usize,
    },

    /// Header vertex count too large to allocate
    #[error("vertex count {count} is too large (at most {max})")]
    TooManyVertices { count: usize, max: usize },

    /// Edge from a vertex to itself (0-indexed id, reported 1-indexed)
    #[error("no self loops are allowed, got an edge from vertex {} to itself", .vertex + 1)]
    SelfLoop { vertex: usize },
}

/// Result type for graph construction and parsing.
pub type Result<T> = std::result::Result<T, Error>;

//! Text input: a header line `N M` followed by one `u v` line per edge, 1-indexed.

use std::io::BufRead;

use crate::{
    error::{Error, Result},
    graph::Graph,
};

/// Upper bound on the edge capacity reserved from the header alone.
const MAX_EDGE_HINT: usize = 1 << 20;

/// Reads a graph.
///
/// Edges are read until the end of the stream or the first blank line; `M` only
/// sizes the edge list up front. Repeated edges, in either direction, are kept once.
pub fn parse_input(reader: impl BufRead) -> Result<Graph> {
    let mut lines = reader.lines();
    let header = lines.next().ok_or(Error::EmptyInput)??;
    let (vertex_count, edge_count) = parse_pair(&header, 1)?.ok_or_else(|| Error::MalformedLine {
        line: 1,
        content: header.clone(),
    })?;

    let mut graph = Graph::try_new(vertex_count)?;
    let mut edges = Vec::with_capacity(edge_count.min(MAX_EDGE_HINT));
    for (index, line) in lines.enumerate() {
        let number = index + 2;
        let Some((start, end)) = parse_pair(&line?, number)? else {
            break;
        };
        for vertex in [start, end] {
            if vertex == 0 || vertex > vertex_count {
                return Err(Error::VertexOutOfRange {
                    line: number,
                    vertex,
                    count: vertex_count,
                });
            }
        }
        if start == end {
            return Err(Error::SelfLoop { vertex: start - 1 });
        }
        edges.push((start.min(end) - 1, start.max(end) - 1));
    }

    edges.sort_unstable();
    edges.dedup();
    graph.edges.reserve(edges.len());
    for (start, end) in edges {
        graph.add_edge(start, end)?;
    }

    if graph.edge_count() != edge_count {
        tracing::debug!(
            declared = edge_count,
            read = graph.edge_count(),
            "edge count differs from header"
        );
    }
    Ok(graph)
}

/// Two integers, or `None` for a blank line.
fn parse_pair(line: &str, number: usize) -> Result<Option<(usize, usize)>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (first, second) = match tokens.as_slice() {
        [] => return Ok(None),
        &[first, second] => (first, second),
        _ => {
            return Err(Error::MalformedLine {
                line: number,
                content: line.to_owned(),
            })
        }
    };
    let parse = |token: &str| {
        token.parse::<usize>().map_err(|_| Error::InvalidNumber {
            line: number,
            token: token.to_owned(),
        })
    };
    Ok(Some((parse(first)?, parse(second)?)))
}

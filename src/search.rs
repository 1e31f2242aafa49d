//! Branch and bound over cover sizes.
//!
//! The driver asks, for k = 0, 1, 2, ..., whether a cover of at most k
//! vertices exists and stops at the first yes, so the answer is minimum.
//! Each question is one depth-first search over the shared coverage state:
//! every vertex covered on the way down is uncovered again by its scope guard
//! on the way back up.

use crate::{
    cover::Coverage,
    graph::Graph,
    settings::Settings,
    trace::Trace,
    vertex::VertexId,
    Cover,
};

/// Work done by [`Graph::solve`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Bounded searches run, one per k tried.
    pub rounds: usize,
    /// Search nodes entered over all rounds.
    pub nodes: u64,
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub cover: Cover,
    pub stats: SearchStats,
}

struct Search<'s> {
    settings: &'s Settings,
    trace: Trace,
}

impl<'s> Search<'s> {
    fn new(settings: &'s Settings) -> Self {
        Search {
            settings,
            trace: Trace::new(),
        }
    }

    /// Finds at most `k` vertices that cover every uncovered edge, or `None`.
    ///
    /// Leaves the coverage state exactly as it found it.
    fn search(&mut self, k: isize, coverage: &mut Coverage<'_>) -> Option<Vec<VertexId>> {
        self.trace.descend();
        let found = self.branch(k, coverage);
        self.trace.ascend();
        found
    }

    fn branch(&mut self, k: isize, coverage: &mut Coverage<'_>) -> Option<Vec<VertexId>> {
        self.trace.event(format_args!("branch(k={k})"));
        if k < 0 {
            return None;
        }

        if self.settings.degree_one_rule {
            if let Some((u, v)) = degree_one(coverage) {
                self.trace
                    .event(format_args!("one degree rule - {} via {}", u + 1, v + 1));
                // u is only retired; its last edge is paid for by v
                let mut forced = coverage.scope();
                forced.cover(u);
                forced.cover(v);
                if let Some(mut found) = self.search(k - 1, &mut forced) {
                    found.push(v);
                    return Some(found);
                }
            }
        }

        // A max-heap top with no uncovered edges means none are left anywhere,
        // so the remaining uncovered vertices are retired at no cost.
        let mut free = coverage.scope();
        let u = loop {
            match free.max_top() {
                Some(u) if !free.is_covered(u) => {
                    if free.count_uncovered(u) > 0 {
                        break u;
                    }
                    free.cover(u);
                }
                _ => {
                    self.trace.event(format_args!("all edges covered"));
                    return Some(Vec::new());
                }
            }
        };
        self.trace.event(format_args!(
            "u={} degree={}",
            u + 1,
            free.graph().degree(u)
        ));

        {
            let mut include = free.scope();
            include.cover(u);
            if let Some(mut found) = self.search(k - 1, &mut include) {
                found.push(u);
                return Some(found);
            }
        }

        let neighbours = free.uncovered_neighbours(u);
        let cost = neighbours.len() as isize;
        if cost > k {
            return None;
        }
        let mut exclude = free.scope();
        for &v in &neighbours {
            exclude.cover(v);
        }
        let mut found = self.search(k - cost, &mut exclude)?;
        found.extend_from_slice(&neighbours);
        Some(found)
    }
}

/// The min-heap top, if it is uncovered with exactly one uncovered neighbour.
fn degree_one(coverage: &Coverage<'_>) -> Option<(VertexId, VertexId)> {
    let u = coverage.min_top()?;
    if coverage.is_covered(u) || coverage.count_uncovered(u) != 1 {
        return None;
    }
    coverage.first_uncovered_neighbour(u).map(|v| (u, v))
}

impl Graph {
    /// Minimum vertex cover with default settings.
    pub fn compute_cover(&mut self) -> Cover {
        match self.solve(&Settings::default()) {
            Some(solution) => solution.cover,
            None => unreachable!("every graph has a cover of all its vertices"),
        }
    }

    /// Iterative deepening over the cover size.
    ///
    /// Returns `None` only when `settings.max_cover_size` is below the optimum.
    /// The graph is left fully uncovered afterwards.
    pub fn solve(&mut self, settings: &Settings) -> Option<Solution> {
        let limit = settings
            .max_cover_size
            .map_or(self.vertex_count(), |max| max.min(self.vertex_count()));
        let mut stats = SearchStats::default();

        for k in 0..=limit {
            let (found, nodes) = self.bounded(k, settings);
            stats.rounds += 1;
            stats.nodes += nodes;
            tracing::debug!(k, nodes, found = found.is_some(), "finished round");
            if let Some(cover) = found {
                return Some(Solution { cover, stats });
            }
        }
        None
    }

    /// A single search for a cover of at most `k` vertices from the uncovered state.
    pub fn cover_within(&mut self, k: usize, settings: &Settings) -> Option<Cover> {
        self.bounded(k, settings).0
    }

    fn bounded(&mut self, k: usize, settings: &Settings) -> (Option<Cover>, u64) {
        let snapshot = self.snapshot();
        let vertex_count = self.vertex_count();
        let mut search = Search::new(settings);
        let found = {
            let mut coverage = Coverage::new(self);
            // Isolated vertices would otherwise hold the min-heap top for the
            // whole search and keep the degree-one rule from ever firing.
            let mut root = coverage.scope();
            for vertex in 0..vertex_count {
                if root.graph().degree(vertex) == 0 {
                    root.cover(vertex);
                }
            }
            search.search(k as isize, &mut root)
        };
        self.restore(snapshot);

        let cover = found.map(Cover::new);
        if settings.verify {
            if let Some(cover) = &cover {
                assert!(cover.len() <= k, "cover of {} exceeds k={k}", cover.len());
                assert!(self.validate_cover(cover), "search returned an invalid cover");
            }
        }
        (cover, search.trace.nodes())
    }
}

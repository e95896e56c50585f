//! Ranked enumeration of fault sets under a fault budget.
//!
//! Fault sets are grouped into splits by their number of edge faults
//! `i = 0..=F`. Within a split the vertex combination is the outer loop and
//! the edge combination the inner loop, both lexicographic over pool
//! positions, so every fault set has a stable global rank. The rank is what
//! resume offsets and shard limits refer to.
//!
//! With [`AnchorPolicy::Assume`] the enumeration exploits vertex
//! transitivity: any fault set with at least one vertex fault is equivalent
//! to one that removes the anchor. Split `i` then picks `max(0, F - 1 - i)`
//! further vertices from the non-anchor vertices and removes the anchor
//! itself unless `i == F`.

use serde::Serialize;

use fsmp_graph::{EdgeId, FaultSet, Graph, VertexId};

use crate::combinatorics::{binomial, Combinations};
use crate::pipeline::EngineError;

/// Whether the enumeration assumes a fixed faulty vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "anchor")]
pub enum AnchorPolicy {
    Disabled,
    Assume(VertexId),
}

impl AnchorPolicy {
    pub fn anchor(self) -> Option<VertexId> {
        match self {
            AnchorPolicy::Disabled => None,
            AnchorPolicy::Assume(anchor) => Some(anchor),
        }
    }
}

/// One block of the enumeration: all fault sets with `edge_faults` edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaultSplit {
    pub edge_faults: usize,
    /// Vertices chosen from the pool, not counting the anchor.
    pub vertex_faults: usize,
    pub removes_anchor: bool,
    pub count: u64,
    pub first_index: u64,
}

impl FaultSplit {
    fn end_index(&self) -> u64 {
        self.first_index + self.count
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumerationPlan {
    pub budget: usize,
    pub anchor: AnchorPolicy,
    pub num_vertices: usize,
    pub num_edges: usize,
    pub splits: Vec<FaultSplit>,
    pub total: u64,
}

impl EnumerationPlan {
    pub fn new(
        num_vertices: usize,
        num_edges: usize,
        budget: usize,
        anchor: AnchorPolicy,
    ) -> Result<Self, EngineError> {
        if let AnchorPolicy::Assume(vertex) = anchor {
            if vertex.index() >= num_vertices {
                return Err(EngineError::Config(format!(
                    "anchor {vertex} is not a vertex of a graph with {num_vertices} vertices"
                )));
            }
        }
        let too_large = || EngineError::EnumerationTooLarge {
            budget,
            vertices: num_vertices,
            edges: num_edges,
        };

        let vertex_pool = match anchor {
            AnchorPolicy::Disabled => num_vertices,
            AnchorPolicy::Assume(_) => num_vertices - 1,
        };
        let mut splits = Vec::with_capacity(budget + 1);
        let mut total: u64 = 0;
        for edge_faults in 0..=budget {
            let (vertex_faults, removes_anchor) = match anchor {
                AnchorPolicy::Disabled => (budget - edge_faults, false),
                AnchorPolicy::Assume(_) => (
                    budget.saturating_sub(edge_faults + 1),
                    edge_faults != budget,
                ),
            };
            let count = binomial(vertex_pool, vertex_faults)
                .zip(binomial(num_edges, edge_faults))
                .and_then(|(v, e)| v.checked_mul(e))
                .ok_or_else(too_large)?;
            splits.push(FaultSplit {
                edge_faults,
                vertex_faults,
                removes_anchor,
                count,
                first_index: total,
            });
            total = total.checked_add(count).ok_or_else(too_large)?;
        }

        Ok(Self {
            budget,
            anchor,
            num_vertices,
            num_edges,
            splits,
            total,
        })
    }

    fn vertex_pool(&self) -> usize {
        match self.anchor {
            AnchorPolicy::Disabled => self.num_vertices,
            AnchorPolicy::Assume(_) => self.num_vertices - 1,
        }
    }

    /// Split holding global rank `index`, if any.
    fn locate(&self, index: u64) -> Option<usize> {
        self.splits
            .iter()
            .position(|split| index >= split.first_index && index < split.end_index())
    }
}

/// A fault set together with its global rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFaultSet {
    pub index: u64,
    pub faults: FaultSet,
}

#[derive(Debug, Clone)]
pub struct FaultSetEnumerator {
    plan: EnumerationPlan,
}

impl FaultSetEnumerator {
    pub fn new(
        num_vertices: usize,
        num_edges: usize,
        budget: usize,
        anchor: AnchorPolicy,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            plan: EnumerationPlan::new(num_vertices, num_edges, budget, anchor)?,
        })
    }

    pub fn for_graph<L>(
        graph: &Graph<L>,
        budget: usize,
        anchor: AnchorPolicy,
    ) -> Result<Self, EngineError> {
        Self::new(graph.num_vertices(), graph.num_edges(), budget, anchor)
    }

    pub fn plan(&self) -> &EnumerationPlan {
        &self.plan
    }

    pub fn total(&self) -> u64 {
        self.plan.total
    }

    pub fn iter(&self) -> FaultSetIter<'_> {
        self.iter_from(0)
    }

    /// Iterator starting at global rank `offset`. Past the end it is empty.
    pub fn iter_from(&self, offset: u64) -> FaultSetIter<'_> {
        let Some(split) = self.plan.locate(offset) else {
            return FaultSetIter::finished(&self.plan);
        };
        let block = &self.plan.splits[split];
        let edge_count = binomial(self.plan.num_edges, block.edge_faults).unwrap_or(0);
        let within = offset - block.first_index;
        // `within < count` and the split count fits, so both ranks are in range.
        let cursors = Combinations::from_rank(
            self.plan.vertex_pool(),
            block.vertex_faults,
            within / edge_count,
        )
        .zip(Combinations::from_rank(
            self.plan.num_edges,
            block.edge_faults,
            within % edge_count,
        ));
        match cursors {
            Some((vertices, edges)) => FaultSetIter {
                plan: &self.plan,
                split,
                next_index: offset,
                vertices,
                edges,
            },
            None => FaultSetIter::finished(&self.plan),
        }
    }

    pub fn fault_set_at(&self, index: u64) -> Option<FaultSet> {
        self.iter_from(index).next().map(|item| item.faults)
    }
}

/// Lazy, restartable walk over an [`EnumerationPlan`].
#[derive(Debug, Clone)]
pub struct FaultSetIter<'p> {
    plan: &'p EnumerationPlan,
    split: usize,
    next_index: u64,
    vertices: Combinations,
    edges: Combinations,
}

impl<'p> FaultSetIter<'p> {
    fn finished(plan: &'p EnumerationPlan) -> Self {
        Self {
            plan,
            split: plan.splits.len(),
            next_index: plan.total,
            vertices: Combinations::new(0, 1),
            edges: Combinations::new(0, 1),
        }
    }

    fn enter_split(&mut self, split: usize) {
        self.split = split;
        if let Some(block) = self.plan.splits.get(split) {
            self.vertices = Combinations::new(self.plan.vertex_pool(), block.vertex_faults);
            self.edges = Combinations::new(self.plan.num_edges, block.edge_faults);
        }
    }

    fn pool_vertex(&self, position: usize) -> VertexId {
        let position = position as u32;
        match self.plan.anchor {
            AnchorPolicy::Assume(anchor) if position >= anchor.0 => VertexId(position + 1),
            _ => VertexId(position),
        }
    }

    /// Global rank of the next item.
    pub fn position(&self) -> u64 {
        self.next_index
    }
}

impl Iterator for FaultSetIter<'_> {
    type Item = IndexedFaultSet;

    fn next(&mut self) -> Option<IndexedFaultSet> {
        let plan = self.plan;
        loop {
            let block = plan.splits.get(self.split)?;
            let (Some(vertex_positions), Some(edge_positions)) =
                (self.vertices.current(), self.edges.current())
            else {
                self.enter_split(self.split + 1);
                continue;
            };

            let mut vertices: Vec<VertexId> = vertex_positions
                .iter()
                .map(|&p| self.pool_vertex(p))
                .collect();
            if block.removes_anchor {
                vertices.extend(plan.anchor.anchor());
            }
            let edges = edge_positions.iter().map(|&p| EdgeId(p as u32));
            let item = IndexedFaultSet {
                index: self.next_index,
                faults: FaultSet::new(vertices, edges),
            };

            if !self.edges.advance() && self.vertices.advance() {
                self.edges = Combinations::new(plan.num_edges, block.edge_faults);
            }
            self.next_index += 1;
            return Some(item);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.plan.total.saturating_sub(self.next_index);
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

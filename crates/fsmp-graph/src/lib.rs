#![doc = include_str!("../README.md")]

//! Graph data model for fault-tolerance checks on burnt pancake graphs.
//!
//! This crate defines the arena graph, the signed-permutation vertex labels,
//! the burnt pancake generator, fault application through liveness masks,
//! the triviality predicates (basic / conditionally basic), and the
//! value-relabelling automorphisms that witness vertex-transitivity.

pub mod fault;
pub mod graph;
pub mod pancake;
#[cfg(any(test, feature = "proptest"))]
pub mod proptest_generators;
pub mod symmetry;
pub mod triviality;
pub mod vertex;

pub use fault::{FaultSet, FaultedGraph};
pub use graph::{Edge, EdgeId, Graph, GraphError, GraphView, VertexId};
pub use pancake::{burnt_pancake_graph, signed_permutations, PancakeGraph, MAX_DIMENSION};
pub use triviality::{classify, is_basic, is_conditionally_basic, Triviality};
pub use vertex::SignedPermutation;

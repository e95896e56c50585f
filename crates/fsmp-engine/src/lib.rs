#![doc = include_str!("../README.md")]

//! Fault-set verification engine.
//!
//! The engine enumerates fault sets of a base graph, classifies each faulted
//! graph as trivial or not, and asks a linear feasibility backend whether the
//! non-trivial ones still admit a fractional perfect matching.

pub mod combinatorics;
pub mod enumerator;
pub mod matching;
pub mod pipeline;
pub mod result;

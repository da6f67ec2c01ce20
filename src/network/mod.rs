//! Co-occurrence network
//!
//! Entities mentioned together in a claim note are linked; the edge weight
//! counts the shared notes.

pub mod builder;

pub use builder::{CoOccurrenceGraph, GraphNode};

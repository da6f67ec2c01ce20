//! Entity extraction from claim notes

pub mod matcher;

pub use matcher::EntityMatcher;

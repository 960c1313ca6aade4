//! The resolved dependency tree and everything that reads it.
//!
//! [`tree`] holds the immutable arena produced by the resolver, [`filter`]
//! the composable node predicates, [`traversal`] the visitor contract with
//! its stock visitors (collecting, filtering, serializing) and [`json`] a
//! serde view of the tree.

pub mod filter;
pub mod json;
pub mod traversal;
pub mod tree;

pub use tree::{ConflictData, DependencyNode, DependencyTree, NodeAttributes, NodeId, TreeAssembly};

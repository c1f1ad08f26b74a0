//! Generic set tree: an arena-backed tree whose branches never repeat a value.
//!
//! Nodes are addressed through [`NodeId`] handles into a [`SetTree`]. Every
//! operation treats the node it is given as the root of its own subtree:
//! - insertion rejects a value already present on the branch above
//! - three walks (root-first, leaf-first, bottom-up parent/child pairs)
//! - `invalidate` and `regenerate` rebuild a subtree from an expansion rule
//!
//! The [`template`] module uses the tree to resolve `@{key}` references
//! between variables, with self references rejected as branch duplicates.

pub mod arena;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exitcode;
pub mod template;
pub mod traversal;
pub mod tree_traits;
pub mod util;

pub use arena::{NodeId, SetTree, TreeNode};
pub use errors::{AppError, TreeError, TreeResult};
pub use tree_traits::TreeNodeConvert;

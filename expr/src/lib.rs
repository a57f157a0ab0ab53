//! Expression-tree data model of the iskra kernel generator.
//!
//! Device statements are described as flat trees of operator nodes over
//! value leaves. This crate owns that representation and nothing else:
//!
//! - [`op`]: the operator taxonomy and its rendering classification.
//! - [`node`]: nodes, operand slots, scalar types and array layouts.
//! - [`tree`]: the bottom-up tree builder and subtree queries.
//!
//! Turning a tree into device source is the `iskra-codegen` crate's job.

pub mod error;
pub mod node;
pub mod op;
pub mod prelude;
pub mod tree;

#[cfg(test)]
pub mod test;

pub use error::*;
pub use node::{ExprNode, Layout, Operand, ScalarType, Side};
pub use op::{BinaryOp, Op, ReduceKind, UnaryOp, ViewOp};
pub use tree::{ExprTree, TreeBuilder};

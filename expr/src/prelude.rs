//! Commonly used expression types, for glob import.

pub use crate::error::{Error, Result};
pub use crate::node::{ExprNode, Layout, Operand, ScalarType, Side};
pub use crate::op::{BinaryOp, Op, ReduceKind, UnaryOp, ViewOp};
pub use crate::tree::{ExprTree, TreeBuilder};

pub use strum::AsRefStr;

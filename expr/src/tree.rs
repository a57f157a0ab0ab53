//! Expression trees.
//!
//! A tree is a flat vector of [`ExprNode`]s in bottom-up order: operands
//! reference earlier nodes by index, the statement root is pushed last.
//! Several roots may live in one vector and share subtrees, which makes
//! the structure a DAG; sharing is by node index, never by cycles.

use std::rc::Rc;

use snafu::ensure;

use crate::error::{ChildOutOfRangeSnafu, Result, SelfReferenceSnafu};
use crate::node::{ExprNode, Operand, ScalarType};
use crate::op::Op;

/// An immutable expression DAG. Built through [`TreeBuilder`], which
/// guarantees that every composite operand points below its node.
#[derive(Debug, Clone, Default)]
pub struct ExprTree {
    nodes: Vec<ExprNode>,
}

impl ExprTree {
    pub fn builder() -> TreeBuilder {
        TreeBuilder::default()
    }

    /// The node at `idx`. Indices come from [`TreeBuilder::push`] and are
    /// dense, so the access is direct.
    pub fn node(&self, idx: usize) -> &ExprNode {
        &self.nodes[idx]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes with their indices, bottom-up.
    pub fn nodes(&self) -> impl Iterator<Item = (usize, &ExprNode)> {
        self.nodes.iter().enumerate()
    }

    /// Element type of the first value leaf under `idx`, left operand
    /// first. Structural nodes inherit this as their working type.
    pub fn subtree_dtype(&self, idx: usize) -> Option<ScalarType> {
        let node = self.node(idx);
        for operand in [&node.lhs, &node.rhs] {
            let found = match operand {
                Operand::Node(child) => self.subtree_dtype(*child),
                operand => operand.dtype(),
            };
            if found.is_some() {
                return found;
            }
        }
        None
    }
}

/// Bottom-up tree builder.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<ExprNode>,
}

impl TreeBuilder {
    /// Appends a node and returns its index. Composite operands must
    /// reference nodes pushed before this one.
    pub fn push(&mut self, op: Op, lhs: Operand, rhs: Operand) -> Result<usize> {
        let idx = self.nodes.len();
        for operand in [&lhs, &rhs] {
            if let Operand::Node(child) = operand {
                ensure!(*child != idx, SelfReferenceSnafu { node: idx });
                ensure!(*child < idx, ChildOutOfRangeSnafu { node: idx, child: *child });
            }
        }
        self.nodes.push(ExprNode { op, lhs, rhs });
        Ok(idx)
    }

    pub fn finish(self) -> Rc<ExprTree> {
        Rc::new(ExprTree { nodes: self.nodes })
    }
}

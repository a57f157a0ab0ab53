//! Tree traversal and the two rendering drivers.
//!
//! [`traverse`] walks a subtree in operand order, calling a visitor
//! around and inside every node. The `inspect` flag decides whether
//! structural-leaf nodes are entered: statement processing reaches
//! through them to the buffers underneath, inline evaluation treats them
//! as opaque leaves and lets their mapped object render itself.
//!
//! [`evaluate`] composes one inline expression string; [`process`] emits
//! one fetch statement per matching accessor template for every mapped
//! object it visits, memoized by object name.

use std::collections::{BTreeMap, BTreeSet};

use iskra_expr::{ExprTree, Op, Operand, Side};

use crate::error::Result;
use crate::mapping::Mapping;
use crate::stream::KernelStream;

/// `type_key → access template`, for inline evaluation.
pub type Accessors = BTreeMap<String, String>;

/// `type_key → fetch templates`, one statement emitted per entry.
pub type MultiAccessors = BTreeMap<String, Vec<String>>;

/// Hooks invoked by [`traverse`].
pub trait TreeVisitor {
    /// Entered `node`, before any operand.
    fn enter(&mut self, _tree: &ExprTree, _node: usize) {}

    /// One addressable position of `node`: its left slot, its right
    /// slot, or the node itself between the two.
    fn operand(&mut self, tree: &ExprTree, node: usize, side: Side) -> Result<()>;

    /// Done with `node`, after all operands.
    fn exit(&mut self, _tree: &ExprTree, _node: usize) {}
}

/// Walks the subtree at `root` in operand order: left, node, right, with
/// composite slots expanded before their visit.
pub fn traverse<V: TreeVisitor>(tree: &ExprTree, root: usize, visitor: &mut V, inspect: bool) -> Result<()> {
    let node = tree.node(root);
    let recurse = if node.op.is_structural_leaf() { inspect } else { true };

    visitor.enter(tree, root);

    if recurse {
        if let Operand::Node(child) = node.lhs {
            traverse(tree, child, visitor, inspect)?;
        }
        if !node.lhs.is_none() {
            visitor.operand(tree, root, Side::Lhs)?;
        }
    }

    visitor.operand(tree, root, Side::This)?;

    if recurse && !node.rhs.is_none() {
        if let Operand::Node(child) = node.rhs {
            traverse(tree, child, visitor, inspect)?;
        }
        visitor.operand(tree, root, Side::Rhs)?;
    }

    visitor.exit(tree, root);
    Ok(())
}

/// Runs `visitor` over one side of `root`: the root's own subtree for
/// [`Side::This`], otherwise the slot's subtree when it is composite and
/// the bare slot when it is not.
fn dispatch<V: TreeVisitor>(tree: &ExprTree, root: usize, side: Side, visitor: &mut V, inspect: bool) -> Result<()> {
    let operand = match side {
        Side::This => return traverse(tree, root, visitor, inspect),
        Side::Lhs => tree.node(root).lhs,
        Side::Rhs => tree.node(root).rhs,
    };
    if let Operand::Node(child) = operand {
        traverse(tree, child, visitor, inspect)
    } else {
        visitor.operand(tree, root, side)
    }
}

/// Renders one side of `root` as a single inline expression.
pub fn evaluate(side: Side, accessors: &Accessors, tree: &ExprTree, root: usize, mapping: &Mapping) -> Result<String> {
    let mut visitor = EvaluateVisitor { accessors, mapping, out: String::new() };
    dispatch(tree, root, side, &mut visitor, false)?;
    Ok(visitor.out)
}

/// Emits the fetch statements of every object mapped under one side of
/// `root`, one statement per accessor template matching its `type_key`.
///
/// `fetched` suppresses objects already emitted; pass the same set
/// across calls to share fetches between statement parts.
pub fn process(
    stream: &mut KernelStream,
    side: Side,
    accessors: &MultiAccessors,
    tree: &ExprTree,
    root: usize,
    mapping: &Mapping,
    fetched: &mut BTreeSet<String>,
) -> Result<()> {
    let mut visitor = ProcessVisitor { accessors, mapping, stream, fetched };
    dispatch(tree, root, side, &mut visitor, true)
}

struct EvaluateVisitor<'a> {
    accessors: &'a Accessors,
    mapping: &'a Mapping,
    out: String,
}

impl TreeVisitor for EvaluateVisitor<'_> {
    fn enter(&mut self, tree: &ExprTree, node: usize) {
        if let Some(function) = tree.node(node).op.prefix_function() {
            self.out.push_str(function);
        }
        self.out.push('(');
    }

    fn operand(&mut self, tree: &ExprTree, node: usize, side: Side) -> Result<()> {
        let current = tree.node(node);
        match side {
            Side::This => {
                if current.op.is_structural_leaf() {
                    let rendered = self.mapping.get(node, Side::This)?.evaluate(self.accessors)?;
                    self.out.push_str(&rendered);
                } else if let Some(token) = current.op.infix_token() {
                    self.out.push_str(token);
                } else if matches!(current.op, Op::Binary(_)) {
                    // Call-form binary: the function name came with the
                    // opening parenthesis, this is the argument comma.
                    self.out.push(',');
                }
            }
            side => {
                let operand = match side {
                    Side::Lhs => current.lhs,
                    _ => current.rhs,
                };
                if !operand.is_composite() {
                    let rendered = self.mapping.get(node, side)?.evaluate(self.accessors)?;
                    self.out.push_str(&rendered);
                }
            }
        }
        Ok(())
    }

    fn exit(&mut self, _tree: &ExprTree, _node: usize) {
        self.out.push(')');
    }
}

struct ProcessVisitor<'a> {
    accessors: &'a MultiAccessors,
    mapping: &'a Mapping,
    stream: &'a mut KernelStream,
    fetched: &'a mut BTreeSet<String>,
}

impl TreeVisitor for ProcessVisitor<'_> {
    fn operand(&mut self, _tree: &ExprTree, node: usize, side: Side) -> Result<()> {
        let Some(object) = self.mapping.find(node, side) else {
            return Ok(());
        };
        let Some(templates) = self.accessors.get(object.type_key()) else {
            return Ok(());
        };
        if self.fetched.contains(object.name()) {
            tracing::trace!(node, side = ?side, name = object.name(), "fetch suppressed");
            return Ok(());
        }
        for template in templates {
            let statement = object.process(template)?;
            self.stream.writeln(statement);
        }
        tracing::trace!(node, side = ?side, name = object.name(), type_key = object.type_key(), "fetch emitted");
        self.fetched.insert(object.name().to_string());
        Ok(())
    }
}

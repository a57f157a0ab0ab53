use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// A node listed itself as one of its operands.
    #[snafu(display("node {node} references itself as an operand"))]
    SelfReference { node: usize },

    /// A node referenced a child that is not part of the tree yet. Trees
    /// are built bottom-up, so every composite operand must point at an
    /// already-pushed node.
    #[snafu(display("node {node} references child {child}, which is not pushed yet"))]
    ChildOutOfRange { node: usize, child: usize },
}

//! Error types of the emission layer.

use iskra_expr::Side;
use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// A traversal looked up a `(node, side)` pair the mapping has no
    /// object for. The tree and the table were built inconsistently.
    #[snafu(display("no mapped object for node {node} ({side:?})"))]
    MissingMapping { node: usize, side: Side },

    /// A lookup ran against a mapping whose builder has not finished.
    #[snafu(display("mapping is still being built"))]
    MappingUnsealed,

    /// A view or reduction object outlived the mapping its operand
    /// entries live in.
    #[snafu(display("mapping of node {node} was released before rendering"))]
    MappingReleased { node: usize },

    /// An offset macro with no argument list.
    #[snafu(display("offset macro at byte {position} has no argument list"))]
    OffsetMacroMissingBrace { position: usize },

    /// An offset macro whose argument list never closes.
    #[snafu(display("offset macro at byte {position} has an unterminated argument list"))]
    OffsetMacroUnterminated { position: usize },

    /// Recursive rendering was requested on an object that carries no
    /// subtree, such as a plain scalar or array.
    #[snafu(display("{type_key} objects do not carry a subtree to render"))]
    RecursionUnsupported { type_key: String },
}

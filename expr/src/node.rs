//! Node-level building blocks of an expression tree.
//!
//! An [`ExprNode`] pairs an operator tag with two [`Operand`] slots. A slot
//! is either empty, a reference to another node of the same tree, or a value
//! leaf: a device scalar, a host scalar, a strided array, or a fixed-size
//! argument pack. Device-resident leaves carry a buffer handle so that two
//! occurrences of the same buffer can be recognized when the tree is mapped.

use strum::{AsRefStr, EnumCount, EnumIter, VariantArray};

use crate::op::Op;

/// Scalar element types, spelled the way device source expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, AsRefStr, EnumCount, EnumIter, VariantArray)]
pub enum ScalarType {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Half,
    Float,
    Double,
}

impl ScalarType {
    /// OpenCL-C spelling of the element type.
    pub const fn c_style(&self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::UChar => "uchar",
            Self::Short => "short",
            Self::UShort => "ushort",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Long => "long",
            Self::ULong => "ulong",
            Self::Half => "half",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

/// Which part of a node an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    /// The left operand slot.
    Lhs,
    /// The right operand slot.
    Rhs,
    /// The node itself.
    This,
}

/// Shape class of an array operand.
///
/// Decides the formula substituted for the array's `$OFFSET` macro: a
/// column is addressed by its first index alone, a row by its second, a
/// general strided matrix by the full `(i) + (j) * ld` form. `Vector` is
/// the true one-dimensional case and takes the one-argument macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// One-dimensional buffer; `$OFFSET{i}` is `i` itself.
    Vector,
    /// Column shape (tag `'c'`): offset is the first index.
    Col,
    /// Row shape (tag `'r'`): offset is the second index.
    Row,
    /// General strided matrix: `(i) + (j) * ld`.
    Strided,
}

impl Layout {
    /// Maps the one-character shape tag of a 2D operand. Anything that is
    /// neither `'c'` nor `'r'` is treated as general strided.
    pub const fn from_tag(tag: char) -> Self {
        match tag {
            'c' => Self::Col,
            'r' => Self::Row,
            _ => Self::Strided,
        }
    }
}

/// One operand slot of an expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Empty slot; unary operators leave `rhs` unused.
    None,
    /// Composite: the operand is the subtree rooted at another node.
    Node(usize),
    /// Device-resident scalar, identified by its buffer handle.
    Scalar { dtype: ScalarType, handle: u64 },
    /// Host-side scalar, injected into the source text by name.
    HostScalar(ScalarType),
    /// Strided device array.
    Array { dtype: ScalarType, layout: Layout, handle: u64 },
    /// Fixed-size argument pack (repetition descriptors and the like).
    Tuple { dtype: ScalarType, size: usize },
}

impl Operand {
    /// True for any value-carrying leaf (neither empty nor composite).
    pub const fn is_leaf(&self) -> bool {
        !matches!(self, Self::None | Self::Node(_))
    }

    pub const fn is_composite(&self) -> bool {
        matches!(self, Self::Node(_))
    }

    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Element type of a value leaf.
    pub const fn dtype(&self) -> Option<ScalarType> {
        match self {
            Self::HostScalar(dtype) => Some(*dtype),
            Self::Scalar { dtype, .. } | Self::Array { dtype, .. } | Self::Tuple { dtype, .. } => Some(*dtype),
            Self::None | Self::Node(_) => None,
        }
    }
}

/// One node of an expression tree: an operator and its two operand slots.
#[derive(Debug, Clone, Copy)]
pub struct ExprNode {
    pub op: Op,
    pub lhs: Operand,
    pub rhs: Operand,
}

impl ExprNode {
    /// The operand in a given slot; [`Side::This`] addresses no slot.
    pub const fn operand(&self, side: Side) -> Option<&Operand> {
        match side {
            Side::Lhs => Some(&self.lhs),
            Side::Rhs => Some(&self.rhs),
            Side::This => None,
        }
    }
}

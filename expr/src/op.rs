//! Operator taxonomy.
//!
//! Operators split into two families. Elementwise operators ([`BinaryOp`],
//! [`UnaryOp`]) are pure text: inline rendering composes their token infix
//! or as a prefix function call. Structural operators (views, reductions,
//! the matrix product) are leaves of inline rendering; each one gets a
//! mapped object of its own and renders through it.

use strum::AsRefStr;

/// Elementwise binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
pub enum BinaryOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Gt,
    Lt,
    Max,
    Min,
    Pow,
}

impl BinaryOp {
    /// Source token: the infix symbol, or the function name for the
    /// call-form operators.
    pub const fn token(&self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Eq => "==",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Max => "max",
            Self::Min => "min",
            Self::Pow => "pow",
        }
    }

    /// True when the token sits between its operands; `max`, `min` and
    /// `pow` render as two-argument calls instead.
    pub const fn is_infix(&self) -> bool {
        !matches!(self, Self::Max | Self::Min | Self::Pow)
    }
}

/// Elementwise unary functions, rendered as one-argument calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
pub enum UnaryOp {
    Neg,
    Abs,
    Sqrt,
    Exp,
    Log,
    Cos,
    Sin,
}

impl UnaryOp {
    pub const fn token(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Abs => "fabs",
            Self::Sqrt => "sqrt",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Cos => "cos",
            Self::Sin => "sin",
        }
    }
}

/// What a reduction folds its elements into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
pub enum ReduceKind {
    Sum,
    Max,
    Min,
    /// Index of the maximal element.
    ArgMax,
    /// Index of the minimal element.
    ArgMin,
    /// Index of the first maximal element.
    ArgMaxFirst,
    /// Index of the first minimal element.
    ArgMinFirst,
}

impl ReduceKind {
    /// True for the kinds that produce an element index rather than an
    /// element value. Their accumulators carry a value/index pair.
    pub const fn is_index(&self) -> bool {
        matches!(self, Self::ArgMax | Self::ArgMin | Self::ArgMaxFirst | Self::ArgMinFirst)
    }
}

/// Access-shape views over an array operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
pub enum ViewOp {
    /// Transposed access to a matrix.
    Trans,
    /// Diagonal matrix built from a vector.
    VectorDiag,
    /// Vector holding the diagonal of a matrix.
    MatrixDiag,
    /// One row of a matrix, selected by the right operand.
    MatrixRow,
    /// One column of a matrix, selected by the right operand.
    MatrixColumn,
    /// Matrix tiled from a smaller one; the right operand packs the
    /// repetition counts.
    Repeat,
}

/// Operator tag of an expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
pub enum Op {
    Binary(BinaryOp),
    Unary(UnaryOp),
    /// Reduction of all elements to one value.
    Reduce(ReduceKind),
    /// Row-wise reduction of a matrix to a column.
    ReduceRows(ReduceKind),
    /// Column-wise reduction of a matrix to a row.
    ReduceCols(ReduceKind),
    View(ViewOp),
    /// Matrix-matrix product.
    Product,
}

impl Op {
    /// True for the node kinds that inline rendering treats as opaque
    /// leaves: views, reductions and the matrix product.
    pub const fn is_structural_leaf(&self) -> bool {
        matches!(
            self,
            Self::Reduce(_) | Self::ReduceRows(_) | Self::ReduceCols(_) | Self::View(_) | Self::Product
        )
    }

    /// Token to place between the operands, if this operator renders
    /// infix.
    pub const fn infix_token(&self) -> Option<&'static str> {
        match self {
            Self::Binary(op) if op.is_infix() => Some(op.token()),
            _ => None,
        }
    }

    /// Function name to emit before the operand list, if this operator
    /// renders as a call.
    pub const fn prefix_function(&self) -> Option<&'static str> {
        match self {
            Self::Unary(op) => Some(op.token()),
            Self::Binary(op) if !op.is_infix() => Some(op.token()),
            _ => None,
        }
    }

    /// The fold kind, for any of the three reduction forms.
    pub const fn reduce_kind(&self) -> Option<ReduceKind> {
        match self {
            Self::Reduce(kind) | Self::ReduceRows(kind) | Self::ReduceCols(kind) => Some(*kind),
            _ => None,
        }
    }
}

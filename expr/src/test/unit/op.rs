use strum::IntoEnumIterator;
use test_case::test_case;

use crate::node::{Layout, ScalarType};
use crate::op::{BinaryOp, Op, ReduceKind, UnaryOp, ViewOp};

#[test_case(BinaryOp::Assign, "=")]
#[test_case(BinaryOp::Add, "+")]
#[test_case(BinaryOp::Sub, "-")]
#[test_case(BinaryOp::Mul, "*")]
#[test_case(BinaryOp::Div, "/")]
#[test_case(BinaryOp::Eq, "==")]
#[test_case(BinaryOp::Gt, ">")]
#[test_case(BinaryOp::Lt, "<")]
fn test_binary_infix_token(op: BinaryOp, token: &str) {
    assert!(op.is_infix());
    assert_eq!(Op::Binary(op).infix_token(), Some(token));
    assert_eq!(Op::Binary(op).prefix_function(), None);
}

#[test_case(BinaryOp::Max, "max")]
#[test_case(BinaryOp::Min, "min")]
#[test_case(BinaryOp::Pow, "pow")]
fn test_binary_call_form(op: BinaryOp, function: &str) {
    assert!(!op.is_infix());
    assert_eq!(Op::Binary(op).infix_token(), None);
    assert_eq!(Op::Binary(op).prefix_function(), Some(function));
}

#[test_case(UnaryOp::Neg, "-")]
#[test_case(UnaryOp::Abs, "fabs")]
#[test_case(UnaryOp::Sqrt, "sqrt")]
#[test_case(UnaryOp::Exp, "exp")]
#[test_case(UnaryOp::Log, "log")]
#[test_case(UnaryOp::Cos, "cos")]
#[test_case(UnaryOp::Sin, "sin")]
fn test_unary_call_form(op: UnaryOp, function: &str) {
    assert_eq!(Op::Unary(op).prefix_function(), Some(function));
    assert_eq!(Op::Unary(op).infix_token(), None);
}

#[test_case(Op::View(ViewOp::Trans))]
#[test_case(Op::View(ViewOp::VectorDiag))]
#[test_case(Op::View(ViewOp::MatrixDiag))]
#[test_case(Op::View(ViewOp::MatrixRow))]
#[test_case(Op::View(ViewOp::MatrixColumn))]
#[test_case(Op::View(ViewOp::Repeat))]
#[test_case(Op::Reduce(ReduceKind::Sum))]
#[test_case(Op::ReduceRows(ReduceKind::Max))]
#[test_case(Op::ReduceCols(ReduceKind::Min))]
#[test_case(Op::Product)]
fn test_structural_leaves(op: Op) {
    assert!(op.is_structural_leaf());
    assert_eq!(op.infix_token(), None);
    assert_eq!(op.prefix_function(), None);
}

#[test_case(Op::Binary(BinaryOp::Add))]
#[test_case(Op::Binary(BinaryOp::Max))]
#[test_case(Op::Unary(UnaryOp::Sqrt))]
fn test_elementwise_is_not_structural(op: Op) {
    assert!(!op.is_structural_leaf());
}

#[test_case(ReduceKind::Sum, false)]
#[test_case(ReduceKind::Max, false)]
#[test_case(ReduceKind::Min, false)]
#[test_case(ReduceKind::ArgMax, true)]
#[test_case(ReduceKind::ArgMin, true)]
#[test_case(ReduceKind::ArgMaxFirst, true)]
#[test_case(ReduceKind::ArgMinFirst, true)]
fn test_index_reductions(kind: ReduceKind, index: bool) {
    assert_eq!(kind.is_index(), index);
    assert_eq!(Op::Reduce(kind).reduce_kind(), Some(kind));
    assert_eq!(Op::ReduceRows(kind).reduce_kind(), Some(kind));
    assert_eq!(Op::ReduceCols(kind).reduce_kind(), Some(kind));
}

#[test]
fn test_elementwise_has_no_reduce_kind() {
    assert_eq!(Op::Binary(BinaryOp::Add).reduce_kind(), None);
    assert_eq!(Op::Product.reduce_kind(), None);
}

#[test_case('c', Layout::Col)]
#[test_case('r', Layout::Row)]
#[test_case('x', Layout::Strided)]
#[test_case('C', Layout::Strided)]
fn test_layout_tags(tag: char, layout: Layout) {
    assert_eq!(Layout::from_tag(tag), layout);
}

#[test]
fn test_scalar_type_spellings_are_lowercase() {
    for dtype in ScalarType::iter() {
        let spelling = dtype.c_style();
        assert!(!spelling.is_empty());
        assert!(spelling.chars().all(|c| c.is_ascii_lowercase()), "{spelling}");
    }
}

#[test_case(ScalarType::UChar, "uchar")]
#[test_case(ScalarType::UInt, "uint")]
#[test_case(ScalarType::Half, "half")]
#[test_case(ScalarType::Float, "float")]
#[test_case(ScalarType::Double, "double")]
fn test_scalar_type_spelling(dtype: ScalarType, spelling: &str) {
    assert_eq!(dtype.c_style(), spelling);
}

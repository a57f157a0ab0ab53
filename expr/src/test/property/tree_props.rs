use proptest::prelude::*;

use crate::node::{Operand, ScalarType};
use crate::op::{Op, UnaryOp};
use crate::tree::ExprTree;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// The first node of a tree can never reference another node, itself
    /// included.
    #[test]
    fn forward_references_never_build(child in 0usize..64) {
        let mut builder = ExprTree::builder();
        let pushed = builder.push(Op::Unary(UnaryOp::Neg), Operand::Node(child), Operand::None);
        prop_assert!(pushed.is_err());
    }

    /// Bottom-up chains of any length build, and indices stay dense.
    #[test]
    fn chains_build_bottom_up(len in 1usize..32) {
        let mut builder = ExprTree::builder();
        let mut last = builder
            .push(Op::Unary(UnaryOp::Neg), Operand::HostScalar(ScalarType::Float), Operand::None)
            .unwrap();
        for _ in 1..len {
            last = builder.push(Op::Unary(UnaryOp::Neg), Operand::Node(last), Operand::None).unwrap();
        }
        let tree = builder.finish();
        prop_assert_eq!(tree.len(), len);
        prop_assert_eq!(last, len - 1);
    }
}

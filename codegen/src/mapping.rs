//! The `(node, side) → object` table and its construction.
//!
//! One mapping covers one generation pass. [`MappingBuilder`] populates
//! it bottom-up, handing out object ids monotonically, then seals it;
//! lookups only work on a sealed table. View and reduction objects hold a
//! [`NodeInfo`] pointing back into the table so they can re-render their
//! operands; the back reference is weak, the table owns the objects and
//! not the other way around.

use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::{Rc, Weak};

use snafu::OptionExt;

use iskra_expr::{ExprTree, Op, Operand, ScalarType, Side, ViewOp};

use crate::error::{MappingReleasedSnafu, MappingUnsealedSnafu, MissingMappingSnafu, Result};
use crate::object::MappedObject;
use crate::stream::KernelStream;
use crate::traverse::{self, Accessors, MultiAccessors, TreeVisitor};

pub type MappingKey = (usize, Side);

/// A sealed `(node, side) → object` table.
#[derive(Debug, Default)]
pub struct Mapping {
    entries: OnceCell<BTreeMap<MappingKey, Rc<MappedObject>>>,
}

impl Mapping {
    fn sealed(&self) -> Result<&BTreeMap<MappingKey, Rc<MappedObject>>> {
        self.entries.get().context(MappingUnsealedSnafu)
    }

    /// The object registered for `(node, side)`. A miss means the tree
    /// and the table were built inconsistently, which is fatal.
    pub fn get(&self, node: usize, side: Side) -> Result<&Rc<MappedObject>> {
        self.sealed()?
            .get(&(node, side))
            .context(MissingMappingSnafu { node, side })
    }

    /// Non-contractual lookup: statement processing probes every visited
    /// pair and skips the unmapped ones.
    pub fn find(&self, node: usize, side: Side) -> Option<&Rc<MappedObject>> {
        self.entries.get()?.get(&(node, side))
    }

    pub fn len(&self) -> usize {
        self.entries.get().map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&MappingKey, &Rc<MappedObject>)> {
        self.entries.get().into_iter().flatten()
    }
}

/// Tree context of a view or reduction object: the subtree it sits on
/// and the table its operand entries live in.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    mapping: Weak<Mapping>,
    tree: Rc<ExprTree>,
    root: usize,
}

impl NodeInfo {
    pub fn new(mapping: &Rc<Mapping>, tree: Rc<ExprTree>, root: usize) -> Self {
        Self { mapping: Rc::downgrade(mapping), tree, root }
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn tree(&self) -> &Rc<ExprTree> {
        &self.tree
    }

    pub fn mapping(&self) -> Result<Rc<Mapping>> {
        self.mapping.upgrade().context(MappingReleasedSnafu { node: self.root })
    }

    /// Emits the fetch statements of the subtree on `side` with a fresh
    /// memoization set.
    pub fn process_recursive(&self, stream: &mut KernelStream, side: Side, accessors: &MultiAccessors) -> Result<()> {
        let mapping = self.mapping()?;
        let mut fetched = BTreeSet::new();
        traverse::process(stream, side, accessors, &self.tree, self.root, &mapping, &mut fetched)
    }

    /// Renders the subtree on `side` as one inline expression.
    pub fn evaluate_recursive(&self, side: Side, accessors: &Accessors) -> Result<String> {
        let mapping = self.mapping()?;
        traverse::evaluate(side, accessors, &self.tree, self.root, &mapping)
    }
}

/// Populates and seals a [`Mapping`].
///
/// The standard population pass is [`map_expression`]; drivers with
/// special operand conventions register entries themselves and use
/// [`MappingBuilder::node_info`] for hand-built view objects.
pub struct MappingBuilder {
    mapping: Rc<Mapping>,
    tree: Rc<ExprTree>,
    entries: BTreeMap<MappingKey, Rc<MappedObject>>,
    bound: BTreeMap<u64, Rc<MappedObject>>,
    next_id: u32,
}

impl MappingBuilder {
    pub fn new(tree: Rc<ExprTree>) -> Self {
        Self {
            mapping: Rc::new(Mapping::default()),
            tree,
            entries: BTreeMap::new(),
            bound: BTreeMap::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Tree context for an object rooted at `root`.
    pub fn node_info(&self, root: usize) -> NodeInfo {
        NodeInfo::new(&self.mapping, self.tree.clone(), root)
    }

    /// Registers `object` under `(node, side)`.
    pub fn insert(&mut self, node: usize, side: Side, object: MappedObject) {
        self.insert_shared(node, side, Rc::new(object));
    }

    /// Registers an already-shared object. Two keys aliasing one object
    /// share its name, which is what fetch memoization keys on.
    pub fn insert_shared(&mut self, node: usize, side: Side, object: Rc<MappedObject>) {
        tracing::trace!(
            node,
            side = ?side,
            name = object.name(),
            type_key = object.type_key(),
            "register mapped object"
        );
        self.entries.insert((node, side), object);
    }

    /// Registers the value leaf sitting in `(node, side)`, keyed by its
    /// operand class. Composite and empty slots are skipped.
    pub fn map_operand(&mut self, node: usize, side: Side) {
        let Some(operand) = self.tree.node(node).operand(side).copied() else { return };
        match operand {
            Operand::Scalar { dtype, handle } => {
                self.map_bound(node, side, handle, |id| MappedObject::scalar(dtype, id));
            }
            Operand::Array { dtype, layout, handle } => {
                self.map_bound(node, side, handle, |id| MappedObject::array(dtype, id, layout));
            }
            Operand::HostScalar(dtype) => {
                let id = self.next_id();
                self.insert(node, side, MappedObject::host_scalar(dtype, id));
            }
            Operand::Tuple { dtype, size } => {
                let id = self.next_id();
                self.insert(node, side, MappedObject::tuple(dtype, id, size));
            }
            Operand::None | Operand::Node(_) => {}
        }
    }

    /// Device-resident leaves are bound by buffer handle: the same
    /// buffer maps to the same object wherever it occurs, so a statement
    /// fetches it once.
    fn map_bound(&mut self, node: usize, side: Side, handle: u64, build: impl FnOnce(u32) -> MappedObject) {
        if let Some(object) = self.bound.get(&handle) {
            let object = object.clone();
            self.insert_shared(node, side, object);
            return;
        }
        let id = self.next_id();
        let object = Rc::new(build(id));
        self.bound.insert(handle, object.clone());
        self.insert_shared(node, side, object);
    }

    /// Registers the object a structural-leaf node renders through.
    /// Elementwise nodes need none and are skipped.
    pub fn map_node(&mut self, node: usize) {
        let op = self.tree.node(node).op;
        if !op.is_structural_leaf() {
            return;
        }
        let scalartype = self.tree.subtree_dtype(node).unwrap_or(ScalarType::Float);
        let info = self.node_info(node);
        let id = self.next_id();
        let object = match op {
            Op::View(ViewOp::Trans) => MappedObject::trans(scalartype, id, info),
            Op::View(ViewOp::VectorDiag) => MappedObject::vector_diag(scalartype, id, info),
            Op::View(ViewOp::MatrixDiag) => MappedObject::matrix_diag(scalartype, id, info),
            Op::View(ViewOp::MatrixRow) => MappedObject::matrix_row(scalartype, id, info),
            Op::View(ViewOp::MatrixColumn) => MappedObject::matrix_column(scalartype, id, info),
            Op::View(ViewOp::Repeat) => MappedObject::matrix_repeat(scalartype, id, info),
            Op::Reduce(_) => MappedObject::scalar_reduction(scalartype, id, info),
            Op::ReduceRows(_) | Op::ReduceCols(_) => MappedObject::matrix_reduction(scalartype, id, info),
            Op::Product => MappedObject::matrix_product(scalartype, id, info),
            Op::Binary(_) | Op::Unary(_) => return,
        };
        self.insert(node, Side::This, object);
    }

    /// Seals the table. Lookups work from here on.
    pub fn finish(self) -> Rc<Mapping> {
        let Self { mapping, entries, .. } = self;
        // Each builder owns a fresh cell and `finish` consumes the
        // builder, so this is the cell's one and only `set`.
        mapping.entries.set(entries).expect("mapping is sealed exactly once");
        mapping
    }
}

struct MapVisitor<'a> {
    builder: &'a mut MappingBuilder,
}

impl TreeVisitor for MapVisitor<'_> {
    fn operand(&mut self, _tree: &ExprTree, node: usize, side: Side) -> Result<()> {
        match side {
            Side::This => self.builder.map_node(node),
            side => self.builder.map_operand(node, side),
        }
        Ok(())
    }
}

/// Standard population pass: maps every value leaf and every structural
/// node of the statement rooted at `root`, then seals the table.
pub fn map_expression(tree: &Rc<ExprTree>, root: usize) -> Result<Rc<Mapping>> {
    let mut builder = MappingBuilder::new(tree.clone());
    let mut visitor = MapVisitor { builder: &mut builder };
    traverse::traverse(tree, root, &mut visitor, true)?;
    let mapping = builder.finish();
    tracing::debug!(root, entries = mapping.len(), "mapped expression");
    Ok(mapping)
}

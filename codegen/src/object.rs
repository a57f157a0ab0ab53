//! Mapped objects.
//!
//! Every value leaf and every structural node of a mapped expression gets
//! one [`MappedObject`]: a symbol name (`obj{id}`), a `type_key` that
//! selects templates addressed to it, and a keyword table of
//! `#`-prefixed attributes derived from its name. Emission drivers hand
//! objects raw template text; [`MappedObject::process`] substitutes the
//! table and then runs the variant's own rewriting pass, so the driver
//! never spells out symbol names, offset arithmetic or view plumbing.
//!
//! Variants without tree context (scalars, arrays, tuples) finish after
//! substitution, give or take the array's offset-macro expansion. View
//! variants re-render their operands through the mapping they were built
//! from, which is what [`NodeInfo`] carries.

use std::collections::BTreeMap;

use snafu::OptionExt;

use iskra_expr::{ExprNode, Layout, Op, ScalarType, Side};

use crate::error::{RecursionUnsupportedSnafu, Result};
use crate::mapping::NodeInfo;
use crate::offset::OffsetMorph;
use crate::stream::KernelStream;
use crate::template;
use crate::traverse::{Accessors, MultiAccessors};

/// Symbol name of object `id`.
fn object_name(id: u32) -> String {
    format!("obj{id}")
}

/// Assembles an object's keyword table. Every object starts with its
/// element type and its own name; variants add derived attributes.
struct KeywordsBuilder {
    name: String,
    keywords: BTreeMap<String, String>,
}

impl KeywordsBuilder {
    fn new(scalartype: ScalarType, id: u32) -> Self {
        let name = object_name(id);
        let mut keywords = BTreeMap::new();
        keywords.insert("#scalartype".to_string(), scalartype.c_style().to_string());
        keywords.insert("#name".to_string(), name.clone());
        Self { name, keywords }
    }

    /// Registers `token` as the object's name plus `suffix`.
    fn suffixed(&mut self, token: impl Into<String>, suffix: impl AsRef<str>) {
        let value = format!("{}{}", self.name, suffix.as_ref());
        self.keywords.insert(token.into(), value);
    }

    /// Registers `token` with verbatim replacement text.
    fn literal(&mut self, token: impl Into<String>, value: impl Into<String>) {
        self.keywords.insert(token.into(), value.into());
    }

    fn finish(self) -> BTreeMap<String, String> {
        self.keywords
    }
}

/// What an object is, and the state its rewriting pass needs.
#[derive(Debug, Clone)]
pub enum ObjectKind {
    /// Device-resident scalar.
    Scalar,
    /// Host-side scalar, passed by value.
    HostScalar,
    /// Fixed-size argument pack.
    Tuple { size: usize },
    /// Strided array; expands its offset macro by layout.
    Array { morph: OffsetMorph },
    VectorDiag(NodeInfo),
    Trans(NodeInfo),
    MatrixRow(NodeInfo),
    MatrixColumn(NodeInfo),
    MatrixRepeat(NodeInfo),
    MatrixDiag(NodeInfo),
    ScalarReduction(NodeInfo),
    MatrixReduction(NodeInfo),
    MatrixProduct(NodeInfo),
}

/// Rendering handle of one mapped expression leaf.
#[derive(Debug, Clone)]
pub struct MappedObject {
    id: u32,
    name: String,
    type_key: String,
    keywords: BTreeMap<String, String>,
    kind: ObjectKind,
}

impl MappedObject {
    fn assemble(id: u32, type_key: impl Into<String>, keywords: KeywordsBuilder, kind: ObjectKind) -> Self {
        Self {
            id,
            name: object_name(id),
            type_key: type_key.into(),
            keywords: keywords.finish(),
            kind,
        }
    }

    fn node_object(scalartype: ScalarType, id: u32, type_key: &str, kind: ObjectKind) -> Self {
        Self::assemble(id, type_key, KeywordsBuilder::new(scalartype, id), kind)
    }

    pub fn scalar(scalartype: ScalarType, id: u32) -> Self {
        let mut keywords = KeywordsBuilder::new(scalartype, id);
        keywords.suffixed("#pointer", "_pointer");
        Self::assemble(id, "scalar", keywords, ObjectKind::Scalar)
    }

    pub fn host_scalar(scalartype: ScalarType, id: u32) -> Self {
        Self::node_object(scalartype, id, "host_scalar", ObjectKind::HostScalar)
    }

    /// Argument pack of `size` values; entry `k` is addressed by
    /// `#tuplearg{k}` and named `obj{id}{k}`.
    pub fn tuple(scalartype: ScalarType, id: u32, size: usize) -> Self {
        let mut keywords = KeywordsBuilder::new(scalartype, id);
        for arg in 0..size {
            keywords.suffixed(format!("#tuplearg{arg}"), arg.to_string());
        }
        Self::assemble(id, format!("tuple{size}"), keywords, ObjectKind::Tuple { size })
    }

    /// Strided array. Registers the name-derived geometry attributes and
    /// an [`OffsetMorph`] matching `layout`.
    pub fn array(scalartype: ScalarType, id: u32, layout: Layout) -> Self {
        let mut keywords = KeywordsBuilder::new(scalartype, id);
        keywords.suffixed("#ld", "_ld");
        keywords.suffixed("#start1", "_start1");
        keywords.suffixed("#start2", "_start2");
        keywords.suffixed("#stride1", "_stride1");
        keywords.suffixed("#stride2", "_stride2");
        // Token alias, not a name: it resolves in the same substitution
        // pass because "#stride2" sorts after "#nldstride".
        keywords.literal("#nldstride", "#stride2");
        let morph = OffsetMorph::new(layout, format!("{}_ld", object_name(id)));
        Self::assemble(id, "array", keywords, ObjectKind::Array { morph })
    }

    pub fn vector_diag(scalartype: ScalarType, id: u32, info: NodeInfo) -> Self {
        Self::node_object(scalartype, id, "vector_diag", ObjectKind::VectorDiag(info))
    }

    pub fn trans(scalartype: ScalarType, id: u32, info: NodeInfo) -> Self {
        Self::node_object(scalartype, id, "matrix_trans", ObjectKind::Trans(info))
    }

    pub fn matrix_row(scalartype: ScalarType, id: u32, info: NodeInfo) -> Self {
        Self::node_object(scalartype, id, "matrix_row", ObjectKind::MatrixRow(info))
    }

    pub fn matrix_column(scalartype: ScalarType, id: u32, info: NodeInfo) -> Self {
        Self::node_object(scalartype, id, "matrix_column", ObjectKind::MatrixColumn(info))
    }

    pub fn matrix_repeat(scalartype: ScalarType, id: u32, info: NodeInfo) -> Self {
        Self::node_object(scalartype, id, "matrix_repeat", ObjectKind::MatrixRepeat(info))
    }

    pub fn matrix_diag(scalartype: ScalarType, id: u32, info: NodeInfo) -> Self {
        Self::node_object(scalartype, id, "matrix_diag", ObjectKind::MatrixDiag(info))
    }

    pub fn scalar_reduction(scalartype: ScalarType, id: u32, info: NodeInfo) -> Self {
        Self::node_object(scalartype, id, "scalar_reduction", ObjectKind::ScalarReduction(info))
    }

    pub fn matrix_reduction(scalartype: ScalarType, id: u32, info: NodeInfo) -> Self {
        Self::node_object(scalartype, id, "mreduction", ObjectKind::MatrixReduction(info))
    }

    pub fn matrix_product(scalartype: ScalarType, id: u32, info: NodeInfo) -> Self {
        Self::node_object(scalartype, id, "mproduct", ObjectKind::MatrixProduct(info))
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_key(&self) -> &str {
        &self.type_key
    }

    pub fn keywords(&self) -> &BTreeMap<String, String> {
        &self.keywords
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    /// Tree context, for the variants that carry one.
    pub fn node_info(&self) -> Option<&NodeInfo> {
        match &self.kind {
            ObjectKind::Scalar | ObjectKind::HostScalar | ObjectKind::Tuple { .. } | ObjectKind::Array { .. } => None,
            ObjectKind::VectorDiag(info)
            | ObjectKind::Trans(info)
            | ObjectKind::MatrixRow(info)
            | ObjectKind::MatrixColumn(info)
            | ObjectKind::MatrixRepeat(info)
            | ObjectKind::MatrixDiag(info)
            | ObjectKind::ScalarReduction(info)
            | ObjectKind::MatrixReduction(info)
            | ObjectKind::MatrixProduct(info) => Some(info),
        }
    }

    /// Reduction metadata, for the two reduction variants. The fold
    /// strategy itself lives in the emission driver; this exposes what
    /// the driver needs to pick one.
    pub fn reduction(&self) -> Option<Reduction<'_>> {
        match &self.kind {
            ObjectKind::ScalarReduction(info) | ObjectKind::MatrixReduction(info) => Some(Reduction { info }),
            _ => None,
        }
    }

    /// Substitutes the keyword table into `template`, then runs the
    /// variant's rewriting pass over the result.
    pub fn process(&self, template: &str) -> Result<String> {
        let text = template::substitute(template, &self.keywords);
        self.postprocess(text)
    }

    /// Renders the object through the accessor registered for its
    /// `type_key`, falling back to the bare name when none is.
    pub fn evaluate(&self, accessors: &Accessors) -> Result<String> {
        match accessors.get(&self.type_key) {
            Some(template) => self.process(template),
            None => Ok(self.name.clone()),
        }
    }

    /// See [`NodeInfo::process_recursive`]. Fails on variants without
    /// tree context.
    pub fn process_recursive(&self, stream: &mut KernelStream, side: Side, accessors: &MultiAccessors) -> Result<()> {
        let info = self
            .node_info()
            .context(RecursionUnsupportedSnafu { type_key: self.type_key.clone() })?;
        info.process_recursive(stream, side, accessors)
    }

    /// See [`NodeInfo::evaluate_recursive`]. Fails on variants without
    /// tree context.
    pub fn evaluate_recursive(&self, side: Side, accessors: &Accessors) -> Result<String> {
        let info = self
            .node_info()
            .context(RecursionUnsupportedSnafu { type_key: self.type_key.clone() })?;
        info.evaluate_recursive(side, accessors)
    }

    fn postprocess(&self, text: String) -> Result<String> {
        match &self.kind {
            ObjectKind::Scalar
            | ObjectKind::HostScalar
            | ObjectKind::Tuple { .. }
            | ObjectKind::ScalarReduction(_)
            | ObjectKind::MatrixReduction(_)
            | ObjectKind::MatrixProduct(_) => Ok(text),
            ObjectKind::Array { morph } => morph.expand(&text),
            ObjectKind::VectorDiag(info) | ObjectKind::MatrixDiag(info) => {
                wrap_in_lhs(substitute_rhs(text, "#diag_offset", info)?, info)
            }
            ObjectKind::MatrixRow(info) => wrap_in_lhs(substitute_rhs(text, "#row", info)?, info),
            ObjectKind::MatrixColumn(info) => wrap_in_lhs(substitute_rhs(text, "#column", info)?, info),
            ObjectKind::Trans(info) => wrap_in_lhs(text, info),
            ObjectKind::MatrixRepeat(info) => {
                let mapping = info.mapping()?;
                let tiled = mapping.get(info.root(), Side::Rhs)?.process(&text)?;
                wrap_in_lhs(tiled, info)
            }
        }
    }
}

/// Replaces `token` with the inline rendering of the right operand, which
/// selects the viewed row, column or diagonal.
fn substitute_rhs(text: String, token: &str, info: &NodeInfo) -> Result<String> {
    let selector = info.evaluate_recursive(Side::Rhs, &Accessors::new())?;
    Ok(text.replace(token, &selector))
}

/// Re-renders the left operand with the text so far as its `array`
/// accessor: the wrapped array's own substitution pass finishes the
/// geometry tokens and the offset macro.
fn wrap_in_lhs(text: String, info: &NodeInfo) -> Result<String> {
    let mut accessors = Accessors::new();
    accessors.insert("array".to_string(), text);
    info.evaluate_recursive(Side::Lhs, &accessors)
}

/// Reduction metadata of a mapped reduction object.
#[derive(Debug, Clone, Copy)]
pub struct Reduction<'a> {
    info: &'a NodeInfo,
}

impl<'a> Reduction<'a> {
    pub fn root_idx(&self) -> usize {
        self.info.root()
    }

    pub fn root_node(&self) -> &'a ExprNode {
        self.info.tree().node(self.info.root())
    }

    /// Operator tag of the reduced node.
    pub fn root_op(&self) -> Op {
        self.root_node().op
    }

    /// True for the index-producing kinds, whose accumulators carry a
    /// value/index pair.
    pub fn is_index_reduction(&self) -> bool {
        self.root_op().reduce_kind().is_some_and(|kind| kind.is_index())
    }
}

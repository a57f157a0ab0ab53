//! Kernel-source emission for mapped expression trees.
//!
//! Emission drivers describe device source as templates with `#`-prefixed
//! tokens; this crate turns an expression tree into the objects those
//! templates address and renders them.
//!
//! # Architecture
//!
//! - **Mapping**: the `(node, side) → object` table of one pass
//! - **Objects**: per-leaf symbol names, keyword tables and rewriting
//! - **Traversal**: the inline-evaluation and statement-processing walks
//!
//! # Usage
//!
//! ```ignore
//! use iskra_codegen::{map_expression, traverse};
//!
//! let mapping = map_expression(&tree, root)?;
//! let inline = traverse::evaluate(Side::This, &accessors, &tree, root, &mapping)?;
//! ```

pub mod error;
pub mod mapping;
pub mod object;
pub mod offset;
pub mod stream;
pub mod template;
pub mod traverse;


pub use error::*;
pub use mapping::{Mapping, MappingBuilder, MappingKey, NodeInfo, map_expression};
pub use object::{MappedObject, ObjectKind, Reduction};
pub use offset::OffsetMorph;
pub use stream::KernelStream;
pub use traverse::{Accessors, MultiAccessors, TreeVisitor};

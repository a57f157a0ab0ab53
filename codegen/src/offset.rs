//! The `$OFFSET` macro.
//!
//! Access templates address array elements through `$OFFSET{i}` (vectors)
//! or `$OFFSET{i, j}` (matrices) instead of spelling the index arithmetic
//! out. Each array object owns an [`OffsetMorph`] that rewrites the macro
//! into the formula matching the array's layout.
//!
//! Scanning is deliberately naive: after a macro the next `{` opens the
//! argument list and the next `}` closes it, wherever they sit, so the
//! arguments themselves must not contain braces. The argument split is
//! the first `,` inside the braces; without one the whole span counts as
//! the first index and the second is empty.

use snafu::OptionExt;

use iskra_expr::Layout;

use crate::error::{OffsetMacroMissingBraceSnafu, OffsetMacroUnterminatedSnafu, Result};

const MACRO: &str = "$OFFSET";

/// Layout-directed expansion of the offset macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetMorph {
    layout: Layout,
    ld: String,
}

impl OffsetMorph {
    pub fn new(layout: Layout, ld: impl Into<String>) -> Self {
        Self { layout, ld: ld.into() }
    }

    pub const fn layout(&self) -> Layout {
        self.layout
    }

    /// Expands every macro occurrence in `text`.
    pub fn expand(&self, text: &str) -> Result<String> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        let mut consumed = 0;

        while let Some(at) = rest.find(MACRO) {
            out.push_str(&rest[..at]);
            let position = consumed + at;
            let after = &rest[at..];

            let open = after.find('{').context(OffsetMacroMissingBraceSnafu { position })?;
            let close = open
                + 1
                + after[open + 1..].find('}').context(OffsetMacroUnterminatedSnafu { position })?;

            out.push_str(&self.formula(&after[open + 1..close]));
            rest = &after[close + 1..];
            consumed = position + close + 1;
        }

        out.push_str(rest);
        Ok(out)
    }

    fn formula(&self, args: &str) -> String {
        if self.layout == Layout::Vector {
            return args.to_string();
        }
        let (i, j) = match args.find(',') {
            Some(comma) => (&args[..comma], &args[comma + 1..]),
            None => (args, ""),
        };
        match self.layout {
            Layout::Vector | Layout::Col => i.to_string(),
            Layout::Row => j.to_string(),
            Layout::Strided => format!("({i}) + ({j}) * {}", self.ld),
        }
    }
}

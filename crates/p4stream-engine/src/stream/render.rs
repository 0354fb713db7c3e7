//! Stream spec document rendering
//!
//! Produces the text form accepted by `p4 stream -i`. The layout is fixed:
//! mainline streams omit the `Options:` line, and the `Paths:` section always
//! shares the whole stream.

use std::fmt::Write;

use p4stream_utils::error::StreamError;

use super::{NO_PARENT, StreamKind, StreamSpec};

/// Path mapping line emitted for every new stream.
pub const SHARE_ALL: &str = "share ...";

const INDENT: &str = "        ";

/// Render the creation document for `spec`.
///
/// `spec.kind` must already be validated; `spec.paths` is ignored. Mainline
/// streams always render `Parent: none`; other kinds render the parent as
/// given.
pub fn render_spec(spec: &StreamSpec, kind: StreamKind) -> Result<String, StreamError> {
    let mut doc = String::new();
    write_document(&mut doc, spec, kind).map_err(|e| StreamError::Template(e.to_string()))?;
    Ok(doc)
}

fn write_document(
    out: &mut impl Write,
    spec: &StreamSpec,
    kind: StreamKind,
) -> std::fmt::Result {
    let parent = if kind == StreamKind::Mainline {
        NO_PARENT
    } else {
        spec.parent.as_str()
    };

    writeln!(out, "Stream:  {}", spec.path)?;
    writeln!(out, "Owner:        {}", spec.owner)?;
    writeln!(out, "Name:         {}", spec.name)?;
    writeln!(out, "Parent:       {parent}")?;
    writeln!(out, "Type:         {kind}")?;
    writeln!(out, "Description:")?;
    writeln!(out, "{INDENT}Created by {} automatically.", spec.owner)?;
    if kind != StreamKind::Mainline {
        writeln!(out, "Options:        {}", spec.options)?;
    }
    writeln!(out, "Paths:")?;
    writeln!(out, "{INDENT}{SHARE_ALL}")
}

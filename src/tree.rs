//! Structure section: the connector-drawn tree of a walked root.

use crate::types::Node;
use std::io::{self, Write};

pub const STRUCTURE_HEADER: &str = "Repository Structure:";

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// Writes the header, the root line and one line per descendant, in the
/// child order stored on each node.
///
/// The root is drawn as the single last child of the header, so every other
/// line is indented by one level.
pub fn write_structure<W: Write>(root: &Node, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", STRUCTURE_HEADER)?;
    writeln!(out, "{}{}", LAST_BRANCH, root.name)?;
    write_children(root, SPACE, out)
}

/// The structure section as a string.
pub fn render_structure(root: &Node) -> String {
    let mut buf = Vec::new();
    write_structure(root, &mut buf).expect("writing to a Vec cannot fail");
    String::from_utf8_lossy(&buf).into_owned()
}

fn write_children<W: Write>(node: &Node, prefix: &str, out: &mut W) -> io::Result<()> {
    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let branch = if last { LAST_BRANCH } else { BRANCH };
        writeln!(out, "{}{}{}", prefix, branch, child.name)?;
        if child.is_dir() {
            let next = format!("{}{}", prefix, if last { SPACE } else { PIPE });
            write_children(child, &next, out)?;
        }
    }
    Ok(())
}

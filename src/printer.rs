use crate::error::Error;
use crate::outline::OutlineNode;

/// Print the entries below `root` as an indented bullet list.
///
/// Each level of nesting adds two spaces of indentation. Entries nested
/// deeper than `max_depth` are refused rather than printed.
pub fn print_outline(root: &OutlineNode, max_depth: usize) -> Result<String, Error> {
    let mut out = String::new();
    print_entries(root, 0, max_depth, &mut out)?;
    Ok(out)
}

fn print_entries(
    node: &OutlineNode,
    depth: usize,
    max_depth: usize,
    out: &mut String,
) -> Result<(), Error> {
    if node.children.is_empty() {
        return Ok(());
    }
    if depth > max_depth {
        return Err(Error::OutlineDepthExceeded { max_depth });
    }

    let indent_str = "  ".repeat(depth);
    for entry in &node.children {
        out.push_str(&indent_str);
        out.push(entry.bullet);
        out.push(' ');
        out.push_str(&entry.literal);
        out.push('\n');

        print_entries(entry, depth + 1, max_depth, out)?;
    }
    Ok(())
}

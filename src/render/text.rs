use crate::tree::{AttrTree, Node};
use std::fmt::{self, Display, Write};

const INDENT: &str = "  ";

/// Render a tree as an indented outline.
///
/// Sub-trees end with `/` and fixed nodes are tagged:
///
/// ```text
/// [fixed]
/// Example/
///   Path1 = 42
///   Empty/ [fixed]
/// ```
pub fn render_outline<V: Display>(tree: &AttrTree<V>) -> Result<String, fmt::Error> {
    let mut out = String::new();
    if tree.fixed() {
        out.push_str("[fixed]\n");
    }
    write_children(&mut out, tree, 0)?;
    Ok(out)
}

fn write_children<V: Display>(out: &mut String, tree: &AttrTree<V>, depth: usize) -> fmt::Result {
    let pad = INDENT.repeat(depth);
    for (name, node) in tree.iter() {
        match node {
            Node::Value(v) => writeln!(out, "{}{} = {}", pad, name, v)?,
            Node::Tree(t) => {
                let tag = if t.fixed() { " [fixed]" } else { "" };
                writeln!(out, "{}{}/{}", pad, name, tag)?;
                write_children(out, t, depth + 1)?;
            }
        }
    }
    Ok(())
}

/// One `dotted.path<TAB>value` line per stored value, in assignment order.
pub fn render_paths<V: Display>(tree: &AttrTree<V>) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for (path, value) in tree.data() {
        writeln!(out, "{}\t{}", path, value)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Path;
    use pretty_assertions::assert_eq;

    fn path(s: &str) -> Path {
        s.parse().unwrap()
    }

    #[test]
    fn outline_nests_and_tags_fixed() {
        let mut tr: AttrTree<i32> = AttrTree::new();
        tr.set_path(&path("Example.Path1"), 42).unwrap();
        tr.get_or_create("Example")
            .unwrap()
            .get_or_create("Empty")
            .unwrap()
            .set_fixed(true);
        tr.set("Top", -1).unwrap();
        tr.set_fixed(true);

        assert_eq!(
            render_outline(&tr).unwrap(),
            "[fixed]\nExample/\n  Path1 = 42\n  Empty/ [fixed]\nTop = -1\n"
        );
    }

    #[test]
    fn paths_are_tab_separated() {
        let mut tr: AttrTree<String> = AttrTree::new();
        tr.set_path(&path("A.B"), "x".to_string()).unwrap();
        tr.set_path(&path("C"), "y".to_string()).unwrap();
        tr.set_path(&path("A.D"), "z".to_string()).unwrap();
        assert_eq!(render_paths(&tr).unwrap(), "A.B\tx\nC\ty\nA.D\tz\n");
        assert_eq!(render_paths(&AttrTree::<String>::new()).unwrap(), "");
    }
}

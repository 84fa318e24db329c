//! Graphviz rendering of a tree, built only on the read-only node view.

use plustree_core::{BPlusTree, NodeRef};
use std::fmt::{self, Display, Write};

const LEAF_COLOR: &str = "#e1f5fe";
const PORT_COLOR: &str = "#f0f0f0";

/// Renders the tree as a DOT digraph: one HTML table per node, an edge from
/// each child port of an internal node, and the leaf chain as dashed edges
/// on a shared rank.
pub fn render<K, V>(tree: &BPlusTree<K, V>) -> String
where
    K: Ord + Clone + Display,
{
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_dot(&mut out, tree);
    out
}

fn write_dot<K, V>(out: &mut String, tree: &BPlusTree<K, V>) -> fmt::Result
where
    K: Ord + Clone + Display,
{
    writeln!(out, "digraph bplustree {{")?;
    writeln!(out, "  rankdir=TB;")?;
    writeln!(out, "  node [shape=plain];")?;

    let mut stack = vec![tree.root()];
    while let Some(node) = stack.pop() {
        write_node(out, &node)?;
        if let Some(children) = node.children() {
            for (i, &child) in children.iter().enumerate() {
                writeln!(out, "  n{}:c{} -> n{};", node.id().index(), i, child.index())?;
            }
            stack.extend(children.iter().rev().filter_map(|&child| tree.node(child)));
        }
    }

    writeln!(out, "  subgraph leaves {{")?;
    writeln!(out, "    rank=same;")?;
    for leaf in tree.leaves() {
        if let Some(next) = leaf.next() {
            writeln!(
                out,
                "    n{} -> n{} [constraint=false, style=dashed, color=blue, arrowsize=0.5];",
                leaf.id().index(),
                next.index()
            )?;
        }
    }
    writeln!(out, "  }}")?;
    writeln!(out, "}}")
}

fn write_node<K, V>(out: &mut String, node: &NodeRef<'_, K, V>) -> fmt::Result
where
    K: Ord + Clone + Display,
{
    let id = node.id().index();
    if node.is_leaf() {
        write!(
            out,
            "  n{} [label=<<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\" BGCOLOR=\"{}\"><TR>",
            id, LEAF_COLOR
        )?;
        if node.keys().is_empty() {
            write!(out, "<TD> </TD>")?;
        }
        for key in node.keys() {
            write!(out, "<TD>{}</TD>", escape(key))?;
        }
    } else {
        write!(
            out,
            "  n{} [label=<<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\"><TR>",
            id
        )?;
        for (i, key) in node.keys().iter().enumerate() {
            write!(out, "<TD PORT=\"c{}\" BGCOLOR=\"{}\"> </TD>", i, PORT_COLOR)?;
            write!(out, "<TD>{}</TD>", escape(key))?;
        }
        write!(
            out,
            "<TD PORT=\"c{}\" BGCOLOR=\"{}\"> </TD>",
            node.keys().len(),
            PORT_COLOR
        )?;
    }
    writeln!(out, "</TR></TABLE>>];")
}

fn escape(value: &impl Display) -> String {
    value
        .to_string()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

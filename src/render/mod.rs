//! render
//!
//! Pure Diagram-to-DOT text emission.
//!
//! # Architecture
//!
//! Rendering is a three-phase recursive walk from the root memory:
//!
//! 1. Node declarations, depth-first, with each interior memory wrapped in
//!    a `subgraph "clusterM<N>"` block
//! 2. Edges: one directed edge per reference-valued slot, plus invisible
//!    structural edges that keep nested and linked content adjacent
//! 3. Styling folded into the declarations (color attribute, dotted
//!    outline for the pale color)
//!
//! The walk never follows `next`/`prev` pointers to termination — circular
//! lists are reached through the member lists, so rendering a bounded
//! diagram always terminates.
//!
//! # Determinism
//!
//! Output depends only on insertion order. Cluster ids are issued by a
//! counter owned by the renderer, memoized per memory, monotonically
//! increasing across the renderer's lifetime.

use std::collections::HashMap;
use std::fmt::Write;

use thiserror::Error;

use crate::core::diagram::{Diagram, MemoryId, NodeId};
use crate::core::node::{Node, SlotValue};

/// Errors from DOT emission.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("formatting failed: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Render a diagram with a fresh renderer.
///
/// # Errors
///
/// Returns `RenderError` if text emission fails.
pub fn to_dot(diagram: &Diagram) -> Result<String, RenderError> {
    DotRenderer::new().render(diagram)
}

/// Stateful DOT renderer.
///
/// The only state is cluster-id issuance: each interior memory gets a
/// `clusterM<N>` id the first time it is declared, and keeps it for the
/// renderer's lifetime, so re-rendering an unchanged diagram through the
/// same renderer is byte-identical.
#[derive(Debug, Default)]
pub struct DotRenderer {
    cluster_seq: u32,
    clusters: HashMap<MemoryId, u32>,
}

impl DotRenderer {
    /// Create a renderer with no issued cluster ids.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the diagram from its root memory.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` if text emission fails.
    pub fn render(&mut self, diagram: &Diagram) -> Result<String, RenderError> {
        let mut out = String::new();
        self.header(&mut out)?;
        self.declare_members(diagram, &mut out, diagram.root())?;
        self.member_edges(diagram, &mut out, diagram.root())?;
        out.push_str("}\n");
        Ok(out)
    }

    fn header(&self, out: &mut String) -> Result<(), RenderError> {
        out.push_str(
            "digraph g {\n\
             graph [\n\
             rankdir = \"LR\"\n\
             clusterrank = \"local\"\n\
             ];\n\
             node [\n\
             fontsize = \"6\"\n\
             shape = \"ellipse\"\n\
             ];\n\
             edge [\n\
             ];\n",
        );
        Ok(())
    }

    /// The memoized `"clusterM<N>"` id for an interior memory, quoted.
    fn cluster_id(&mut self, memory: MemoryId) -> String {
        let seq = match self.clusters.get(&memory) {
            Some(&seq) => seq,
            None => {
                self.cluster_seq += 1;
                self.clusters.insert(memory, self.cluster_seq);
                self.cluster_seq
            }
        };
        format!("\"clusterM{seq}\"")
    }

    // ------------------------------------------------------------------
    // Phase 1: node declarations
    // ------------------------------------------------------------------

    fn declare_members(
        &mut self,
        diagram: &Diagram,
        out: &mut String,
        memory: MemoryId,
    ) -> Result<(), RenderError> {
        for &member in diagram.memory(memory).members() {
            self.declare_node(diagram, out, member)?;
        }
        Ok(())
    }

    fn declare_node(
        &mut self,
        diagram: &Diagram,
        out: &mut String,
        id: NodeId,
    ) -> Result<(), RenderError> {
        let node = diagram.node(id);
        let interior = node.interior();

        if let Some(memory) = interior {
            let cluster = self.cluster_id(memory);
            writeln!(out, "subgraph {cluster} {{")?;
            writeln!(out, "  rankdir = \"LR\"")?;
            writeln!(out)?;
        }

        writeln!(out, "{} [", dot_id(node))?;
        writeln!(out, "   label = \"{}\"", record_label(diagram, node))?;
        writeln!(out, "   shape = \"record\"")?;
        if let Some(attr) = style_attr(node) {
            writeln!(out, "   {attr}")?;
        }
        if interior.is_some() {
            writeln!(out, "   rank=-1")?;
        }
        writeln!(out, "]")?;

        if let Some(memory) = interior {
            self.declare_members(diagram, out, memory)?;
            writeln!(out, "}}")?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Phase 2: edges
    // ------------------------------------------------------------------

    fn member_edges(
        &mut self,
        diagram: &Diagram,
        out: &mut String,
        memory: MemoryId,
    ) -> Result<(), RenderError> {
        for &member in diagram.memory(memory).members() {
            self.node_edges(diagram, out, member)?;
        }
        Ok(())
    }

    fn node_edges(
        &mut self,
        diagram: &Diagram,
        out: &mut String,
        id: NodeId,
    ) -> Result<(), RenderError> {
        let node = diagram.node(id);

        for slot in node.slots() {
            let target = match slot.value() {
                SlotValue::Node(target) => {
                    let target = diagram.node(*target);
                    Some((
                        format!("{}:\"sn\"", dot_id(target)),
                        style_attr(target),
                    ))
                }
                SlotValue::Slot(sid) => {
                    let owner = diagram.node(sid.node());
                    Some((
                        format!("{}:\"s{}\"", dot_id(owner), sid.index()),
                        None,
                    ))
                }
                _ => None,
            };
            if let Some((dst, attr)) = target {
                let src = format!("{}:\"s{}\"", dot_id(node), slot.index());
                match attr {
                    Some(attr) => writeln!(out, "{src} -> {dst} [ {attr} ];")?,
                    None => writeln!(out, "{src} -> {dst} [ ];")?,
                }
            }
        }

        if let Some(memory) = node.interior() {
            // Grouping only: tie the node to its interior members.
            for &member in diagram.memory(memory).members() {
                writeln!(
                    out,
                    "{} -> {} [ style=\"invis\" ];",
                    dot_id(node),
                    dot_id(diagram.node(member))
                )?;
            }
            self.member_edges(diagram, out, memory)?;

            // Keep linked groupings visually adjacent.
            for &link in node.links() {
                if let Some(linked) = diagram.node(link).interior() {
                    let from = self.cluster_id(memory);
                    let to = self.cluster_id(linked);
                    writeln!(out, "subgraph {from} -> subgraph {to} [ style=invis ];")?;
                }
            }
        }
        Ok(())
    }
}

/// The quoted DOT id of a node, without an anchor.
fn dot_id(node: &Node) -> String {
    format!("\"{}\"", node.name())
}

/// The record label: a name field followed by one field per slot.
fn record_label(diagram: &Diagram, node: &Node) -> String {
    let mut fields = vec![format!("<sn>[{}]", node.name())];
    for slot in node.slots() {
        fields.push(format!(
            "<s{}> {}: {}\\l",
            slot.index(),
            escape_label(slot.name()),
            value_text(diagram, slot.value())
        ));
    }
    fields.join("|")
}

/// Render a slot value for its label field.
///
/// References render as `&name` / `&name.slot`; the absent value renders
/// as an empty field.
fn value_text(diagram: &Diagram, value: &SlotValue) -> String {
    match value {
        SlotValue::Absent => String::new(),
        SlotValue::Text(text) => escape_label(text),
        SlotValue::Int(n) => n.to_string(),
        SlotValue::Node(id) => format!("&{}", diagram.node(*id).name()),
        SlotValue::Slot(sid) => {
            let owner = diagram.node(sid.node());
            format!("&{}.{}", owner.name(), escape_label(owner.slots()[sid.index()].name()))
        }
    }
}

/// The styling attribute for a node declaration, if it has one.
///
/// The pale color renders as a dotted outline; anything else becomes a
/// color attribute.
fn style_attr(node: &Node) -> Option<String> {
    node.color().map(|c| {
        if c.is_pale() {
            "style=dotted".to_string()
        } else {
            format!("color=\"{c}\"")
        }
    })
}

/// Escape record-label specials in user-provided text.
fn escape_label(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '"' | '\\' | '|' | '{' | '}' | '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::NodeSpec;

    const HEADER: &str = "digraph g {\n\
        graph [\n\
        rankdir = \"LR\"\n\
        clusterrank = \"local\"\n\
        ];\n\
        node [\n\
        fontsize = \"6\"\n\
        shape = \"ellipse\"\n\
        ];\n\
        edge [\n\
        ];\n";

    #[test]
    fn bare_node_declaration() {
        let mut d = Diagram::new();
        let root = d.root();
        d.add_struct(root, NodeSpec::new("a")).unwrap();

        let dot = to_dot(&d).unwrap();
        let expected = format!(
            "{HEADER}\"a\" [\n   label = \"<sn>[a]\"\n   shape = \"record\"\n]\n}}\n"
        );
        assert_eq!(dot, expected);
    }

    #[test]
    fn slots_render_in_declaration_order_with_ports() {
        let mut d = Diagram::new();
        let root = d.root();
        d.add_struct(
            root,
            NodeSpec::new("a").field("size", 16).slot("next").color("green"),
        )
        .unwrap();

        let dot = to_dot(&d).unwrap();
        assert!(dot.contains(
            "   label = \"<sn>[a]|<s0> size: 16\\l|<s1> next: \\l\"\n"
        ));
        assert!(dot.contains("   color=\"green\"\n"));
    }

    #[test]
    fn pale_color_renders_dotted() {
        let mut d = Diagram::new();
        let root = d.root();
        d.add_struct(root, NodeSpec::new("a").color("white")).unwrap();

        let dot = to_dot(&d).unwrap();
        assert!(dot.contains("   style=dotted\n"));
        assert!(!dot.contains("color=\"white\""));
    }

    #[test]
    fn node_reference_edge_targets_node_anchor() {
        let mut d = Diagram::new();
        let root = d.root();
        let a = d.add_struct(root, NodeSpec::new("a").color("red")).unwrap();
        d.add_struct(root, NodeSpec::new("b").field("peer", a))
            .unwrap();

        let dot = to_dot(&d).unwrap();
        assert!(dot.contains("\"b\":\"s0\" -> \"a\":\"sn\" [ color=\"red\" ];\n"));
    }

    #[test]
    fn slot_reference_edge_targets_field_anchor() {
        let mut d = Diagram::new();
        let root = d.root();
        let a = d
            .add_struct(root, NodeSpec::new("a").slot("x").slot("y"))
            .unwrap();
        let y = d.slot_id(a, "y").unwrap();
        d.add_struct(root, NodeSpec::new("b").field("peer", y))
            .unwrap();

        let dot = to_dot(&d).unwrap();
        assert!(dot.contains("\"b\":\"s0\" -> \"a\":\"s1\" [ ];\n"));
        assert!(dot.contains("<s0> peer: &a.y\\l"));
    }

    #[test]
    fn reference_labels_use_ampersand_notation() {
        let mut d = Diagram::new();
        let root = d.root();
        let a = d.add_struct(root, NodeSpec::new("a")).unwrap();
        d.add_struct(root, NodeSpec::new("b").field("peer", a))
            .unwrap();

        let dot = to_dot(&d).unwrap();
        assert!(dot.contains("<s0> peer: &a\\l"));
    }

    #[test]
    fn interior_renders_as_cluster_with_invis_edges() {
        let mut d = Diagram::new();
        let root = d.root();
        let block = d.add_struct(root, NodeSpec::new("block")).unwrap();
        let inner = d.interior(block);
        d.add_struct(inner, NodeSpec::new("obj1")).unwrap();
        d.add_struct(inner, NodeSpec::new("obj2")).unwrap();

        let dot = to_dot(&d).unwrap();
        assert!(dot.contains("subgraph \"clusterM1\" {\n  rankdir = \"LR\"\n\n"));
        assert!(dot.contains("   rank=-1\n"));
        assert!(dot.contains("\"block\" -> \"obj1\" [ style=\"invis\" ];\n"));
        assert!(dot.contains("\"block\" -> \"obj2\" [ style=\"invis\" ];\n"));

        // The interior's members are declared inside the subgraph block.
        let cluster_start = dot.find("subgraph \"clusterM1\"").unwrap();
        let cluster_end = dot[cluster_start..].find("\n}\n").unwrap() + cluster_start;
        let body = &dot[cluster_start..cluster_end];
        assert!(body.contains("\"obj1\" ["));
        assert!(body.contains("\"obj2\" ["));
    }

    #[test]
    fn cluster_ids_increase_in_declaration_order() {
        let mut d = Diagram::new();
        let root = d.root();
        let first = d.add_struct(root, NodeSpec::new("first")).unwrap();
        let second = d.add_struct(root, NodeSpec::new("second")).unwrap();
        d.interior(first);
        d.interior(second);

        let dot = to_dot(&d).unwrap();
        let m1 = dot.find("\"clusterM1\"").unwrap();
        let m2 = dot.find("\"clusterM2\"").unwrap();
        assert!(m1 < m2);
        assert!(!dot.contains("clusterM3"));
    }

    #[test]
    fn links_render_subgraph_adjacency_edges() {
        let mut d = Diagram::new();
        let root = d.root();
        let a = d.add_struct(root, NodeSpec::new("a")).unwrap();
        let b = d.add_struct(root, NodeSpec::new("b")).unwrap();
        d.interior(a);
        d.interior(b);
        d.add_link(a, b);

        let dot = to_dot(&d).unwrap();
        assert!(dot.contains(
            "subgraph \"clusterM1\" -> subgraph \"clusterM2\" [ style=invis ];\n"
        ));
    }

    #[test]
    fn links_without_interiors_render_nothing() {
        let mut d = Diagram::new();
        let root = d.root();
        let a = d.add_struct(root, NodeSpec::new("a")).unwrap();
        let b = d.add_struct(root, NodeSpec::new("b")).unwrap();
        d.interior(a);
        d.add_link(a, b); // b has no interior

        let dot = to_dot(&d).unwrap();
        assert!(!dot.contains("subgraph \"clusterM1\" ->"));
    }

    #[test]
    fn rendering_twice_is_byte_identical() {
        let mut d = Diagram::new();
        let root = d.root();
        let a = d
            .add_struct(root, NodeSpec::new("a").slot("p_next").slot("p_prev"))
            .unwrap();
        let b = d
            .add_struct(root, NodeSpec::new("b").slot("p_next").slot("p_prev"))
            .unwrap();
        d.list_append("p", a, b).unwrap();
        d.interior(a);

        assert_eq!(to_dot(&d).unwrap(), to_dot(&d).unwrap());

        let mut renderer = DotRenderer::new();
        let first = renderer.render(&d).unwrap();
        let second = renderer.render(&d).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn label_specials_escaped_in_values() {
        let mut d = Diagram::new();
        let root = d.root();
        d.add_struct(root, NodeSpec::new("a").field("data", "[16 bytes] | x"))
            .unwrap();

        let dot = to_dot(&d).unwrap();
        assert!(dot.contains("<s0> data: [16 bytes] \\| x\\l"));
    }
}

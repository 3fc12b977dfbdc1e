//! scene
//!
//! Example-graph builders: the allocator bookkeeping scene.
//!
//! # Overview
//!
//! This layer is a thin caller of [`crate::core`]. It populates a
//! [`Diagram`] with the structures a mark/sweep allocator keeps:
//!
//! - one root bookkeeping struct holding global per-color counts and the
//!   head of the type ring
//! - per-type structs with an allocation size, per-color counts, and an
//!   interior holding one list-head node per mark color
//! - per-type block structs whose interiors hold the allocated objects
//! - object nodes linked into both their block's interior and their
//!   color's ring on the owning type
//!
//! Every generated name comes from counters owned by the [`Scene`], so the
//! same parameters always produce the same diagram.

use std::fmt;

use anyhow::{Context, Result};

use crate::core::{Diagram, NodeId, NodeSpec, SlotValue};

/// The four mark states the illustrated allocator distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkColor {
    /// Unreached; a candidate for sweeping.
    White,
    /// Allocated since the last cycle began.
    Ecru,
    /// Reached but not yet scanned.
    Grey,
    /// Reached and fully scanned.
    Black,
}

impl MarkColor {
    /// All colors, in the order the bookkeeping slots are declared.
    pub const ALL: [MarkColor; 4] = [
        MarkColor::White,
        MarkColor::Ecru,
        MarkColor::Grey,
        MarkColor::Black,
    ];

    /// The color's display name (also the class-head slot name on a type).
    pub fn name(&self) -> &'static str {
        match self {
            MarkColor::White => "white",
            MarkColor::Ecru => "ecru",
            MarkColor::Grey => "grey",
            MarkColor::Black => "black",
        }
    }

    /// The per-color counter slot name.
    pub fn count_slot(&self) -> &'static str {
        match self {
            MarkColor::White => "white_count",
            MarkColor::Ecru => "ecru_count",
            MarkColor::Grey => "grey_count",
            MarkColor::Black => "black_count",
        }
    }
}

impl fmt::Display for MarkColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The mark-color sequence objects cycle through in the example scene.
const MARK_PATTERN: [MarkColor; 8] = [
    MarkColor::White,
    MarkColor::White,
    MarkColor::White,
    MarkColor::Ecru,
    MarkColor::Ecru,
    MarkColor::Grey,
    MarkColor::Black,
    MarkColor::Black,
];

/// Parameters for the example scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneSpec {
    /// Number of allocation types.
    pub types: usize,
    /// Number of blocks per type.
    pub blocks_per_type: usize,
    /// Number of objects per type, spread round-robin over its blocks.
    pub objects_per_type: usize,
}

impl Default for SceneSpec {
    fn default() -> Self {
        Self {
            types: 1,
            blocks_per_type: 2,
            objects_per_type: 8,
        }
    }
}

/// Builder for the allocator bookkeeping scene.
///
/// Owns the diagram under construction plus the name counters, so ids like
/// `tm_type@1` are issued deterministically.
///
/// # Example
///
/// ```
/// use heapdot::scene::{Scene, SceneSpec};
///
/// let diagram = Scene::build(&SceneSpec::default()).unwrap();
/// assert!(diagram.find("tm_data").is_some());
/// assert!(diagram.find("tm_type@1").is_some());
/// ```
#[derive(Debug)]
pub struct Scene {
    diagram: Diagram,
    tm: NodeId,
    type_seq: usize,
    block_seq: usize,
    node_seq: usize,
}

impl Scene {
    /// Create a scene holding only the root bookkeeping struct.
    pub fn new() -> Result<Self> {
        let mut diagram = Diagram::new();
        let root = diagram.root();
        let tm = diagram
            .add_struct(
                root,
                count_slots(
                    NodeSpec::new("tm_data").slot("type_next").slot("type_prev"),
                )
                .color("green"),
            )
            .context("failed to register the root bookkeeping struct")?;
        Ok(Self {
            diagram,
            tm,
            type_seq: 0,
            block_seq: 0,
            node_seq: 0,
        })
    }

    /// The root bookkeeping struct.
    pub fn tm(&self) -> NodeId {
        self.tm
    }

    /// The diagram under construction.
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Finish building and take the diagram.
    pub fn finish(self) -> Diagram {
        self.diagram
    }

    /// Build the example scene in one call.
    pub fn build(spec: &SceneSpec) -> Result<Diagram> {
        let mut scene = Scene::new()?;
        for t in 0..spec.types {
            // Object sizes cycle 16, 32, 64, 128 across types.
            let ty = scene.add_type(16 << (t % 4))?;
            let mut blocks = Vec::with_capacity(spec.blocks_per_type);
            for _ in 0..spec.blocks_per_type {
                blocks.push(scene.add_block(ty)?);
            }
            if spec.objects_per_type > 0 && blocks.is_empty() {
                anyhow::bail!("objects requested but the scene has no blocks to hold them");
            }
            for i in 0..spec.objects_per_type {
                let block = blocks[i % blocks.len()];
                let color = MARK_PATTERN[i % MARK_PATTERN.len()];
                scene.add_object(ty, block, color)?;
            }
        }
        Ok(scene.finish())
    }

    /// Register an allocation type of the given object size.
    ///
    /// The type carries the type-ring and block-ring pointer slots, the
    /// size, and per-color counts. Its interior holds one list-head node
    /// per mark color, each referenced from a same-named slot on the type.
    /// The type is appended to the root's type ring.
    pub fn add_type(&mut self, size: i64) -> Result<NodeId> {
        self.type_seq += 1;
        let name = format!("tm_type@{}", self.type_seq);

        let root = self.diagram.root();
        let ty = self
            .diagram
            .add_struct(
                root,
                count_slots(
                    NodeSpec::new(name.as_str())
                        .slot("type_next")
                        .slot("type_prev")
                        .slot("block_next")
                        .slot("block_prev")
                        .field("size", size),
                )
                .color("red"),
            )
            .with_context(|| format!("failed to register type '{name}'"))?;

        let interior = self.diagram.interior(ty);
        for color in MarkColor::ALL {
            let head = self
                .diagram
                .add_struct(
                    interior,
                    NodeSpec::new(format!("{name}.{color}"))
                        .slot("node_next")
                        .slot("node_prev")
                        .field("color", color.name())
                        .color(color.name()),
                )
                .with_context(|| format!("failed to register the {color} class head"))?;
            self.diagram.node_mut(ty).add_slot(color.name(), SlotValue::Node(head));
        }

        self.diagram.list_append("type", self.tm, ty)?;
        Ok(ty)
    }

    /// Register a memory block belonging to `ty`.
    ///
    /// The block references its type, carries per-color counts, gets an
    /// (initially empty) interior for the objects it holds, and is appended
    /// to the type's block ring. The type links the block so the two
    /// groupings render adjacent.
    pub fn add_block(&mut self, ty: NodeId) -> Result<NodeId> {
        self.block_seq += 1;
        let name = format!("tm_block@{}", self.block_seq);

        let root = self.diagram.root();
        let block = self
            .diagram
            .add_struct(
                root,
                count_slots(
                    NodeSpec::new(name.as_str())
                        .slot("block_next")
                        .slot("block_prev")
                        .field("type", ty),
                )
                .color("blue"),
            )
            .with_context(|| format!("failed to register block '{name}'"))?;

        self.diagram.interior(block);
        self.diagram.add_link(ty, block);
        self.diagram.list_append("block", ty, block)?;
        Ok(block)
    }

    /// Allocate one object of `color` in `block`, bookkeeping included.
    ///
    /// The object lives in the block's interior, joins the color's ring on
    /// the owning type, and bumps the per-color count on the type, the
    /// block, and the root.
    pub fn add_object(&mut self, ty: NodeId, block: NodeId, color: MarkColor) -> Result<NodeId> {
        self.node_seq += 1;
        let name = format!("tm_node@{}", self.node_seq);

        let size = self
            .diagram
            .get(ty, "size")?
            .as_int()
            .context("type is missing an integer 'size' slot")?;

        let interior = self.diagram.interior(block);
        let object = self
            .diagram
            .add_struct(
                interior,
                NodeSpec::new(name.as_str())
                    .slot("node_next")
                    .slot("node_prev")
                    .field("color", color.name())
                    .field("data", format!("[{size} bytes]"))
                    .color(color.name()),
            )
            .with_context(|| format!("failed to register object '{name}'"))?;

        let class_head = self
            .diagram
            .get(ty, color.name())?
            .as_node()
            .with_context(|| format!("type slot '{color}' should reference the class head"))?;
        self.diagram.list_append("node", class_head, object)?;

        self.bump_count(ty, color)?;
        self.bump_count(block, color)?;
        self.bump_count(self.tm, color)?;
        Ok(object)
    }

    fn bump_count(&mut self, node: NodeId, color: MarkColor) -> Result<()> {
        let slot = color.count_slot();
        let count = self
            .diagram
            .get(node, slot)?
            .as_int()
            .with_context(|| format!("slot '{slot}' should hold an integer count"))?;
        self.diagram.set(node, slot, SlotValue::Int(count + 1))?;
        Ok(())
    }
}

/// Append the four per-color count slots, all starting at zero.
fn count_slots(spec: NodeSpec) -> NodeSpec {
    MarkColor::ALL
        .into_iter()
        .fold(spec, |spec, color| spec.field(color.count_slot(), 0))
}

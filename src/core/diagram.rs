//! core::diagram
//!
//! The arena owning every node and memory in a model.
//!
//! # Architecture
//!
//! A [`Diagram`] owns a flat store of [`Node`]s and [`Memory`]s and hands
//! out copyable ids. All cross-references — slot values, links, intrusive
//! list pointers, memory membership — are ids into this arena, which is how
//! a cyclic object graph stays expressible under single ownership.
//!
//! # Invariants
//!
//! - Node names are unique across the diagram (enforced at registration)
//! - Exactly one root memory exists; every other memory is the interior of
//!   exactly one node
//! - Membership and slot order are insertion-ordered, never map-ordered

use std::collections::HashMap;

use super::node::{Node, NodeSpec, SlotValue};
use super::types::{ModelError, NodeName};

/// Identifies a node within its diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(super) usize);

/// Identifies a memory within its diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryId(pub(super) usize);

/// Identifies a specific slot: a node plus the slot's fixed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    node: NodeId,
    index: usize,
}

impl SlotId {
    /// The owning node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The slot's position on the owning node.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// An ordered collection of nodes living at the same nesting level.
#[derive(Debug, Default)]
pub struct Memory {
    members: Vec<NodeId>,
}

impl Memory {
    /// Member nodes in registration order.
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }
}

/// The arena for one model: every node, every memory, one root.
///
/// # Example
///
/// ```
/// use heapdot::core::{Diagram, NodeSpec};
///
/// let mut d = Diagram::new();
/// let root = d.root();
/// let a = d.add_struct(root, NodeSpec::new("a").field("size", 16)).unwrap();
/// let b = d.add_struct(root, NodeSpec::new("b").field("peer", a)).unwrap();
/// assert_eq!(d.node(b).get("peer").unwrap().as_node(), Some(a));
/// ```
#[derive(Debug)]
pub struct Diagram {
    nodes: Vec<Node>,
    memories: Vec<Memory>,
    by_name: HashMap<String, NodeId>,
    owners: Vec<MemoryId>,
    root: MemoryId,
}

impl Diagram {
    /// Create an empty diagram with a fresh root memory.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            memories: vec![Memory::default()],
            by_name: HashMap::new(),
            owners: Vec::new(),
            root: MemoryId(0),
        }
    }

    /// The root memory.
    pub fn root(&self) -> MemoryId {
        self.root
    }

    /// Borrow a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different diagram.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Mutably borrow a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different diagram.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Borrow a memory.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different diagram.
    pub fn memory(&self, id: MemoryId) -> &Memory {
        &self.memories[id.0]
    }

    /// Look up a node by name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// Number of nodes in the diagram.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Build a node from a descriptor and register it as a member.
    ///
    /// Slots are added in descriptor order; the color (if any) is applied
    /// with the alias resolution of
    /// [`DisplayColor`](super::types::DisplayColor). The node records the
    /// memory as its owner.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidName` for a name the DOT grammar cannot
    /// carry, or `ModelError::DuplicateNode` if the name is already
    /// registered.
    pub fn add_struct(&mut self, memory: MemoryId, spec: NodeSpec) -> Result<NodeId, ModelError> {
        let name = NodeName::new(spec.name)?;
        if self.by_name.contains_key(name.as_str()) {
            return Err(ModelError::DuplicateNode(name.to_string()));
        }

        let id = NodeId(self.nodes.len());
        let mut node = Node::new(name.clone());
        for (slot, value) in spec.slots {
            node.add_slot(slot, value);
        }
        if let Some(color) = spec.color {
            node.set_color(color);
        }

        self.nodes.push(node);
        self.by_name.insert(name.to_string(), id);
        self.owners.push(memory);
        self.memories[memory.0].members.push(id);
        Ok(id)
    }

    /// The memory a node is registered in.
    pub fn owner(&self, node: NodeId) -> MemoryId {
        self.owners[node.0]
    }

    /// The node's interior memory, created on first request.
    ///
    /// The interior is owned by the node and rendered nested inside it; its
    /// presence marks the node as a grouping point.
    pub fn interior(&mut self, node: NodeId) -> MemoryId {
        if let Some(id) = self.nodes[node.0].interior() {
            return id;
        }
        let id = MemoryId(self.memories.len());
        self.memories.push(Memory::default());
        self.nodes[node.0].set_interior(id);
        id
    }

    /// Record a non-owning link used only for visual adjacency.
    pub fn add_link(&mut self, from: NodeId, to: NodeId) {
        self.nodes[from.0].push_link(to);
    }

    /// Resolve a slot reference for use as a [`SlotValue::Slot`].
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownSlot` if the node has no such slot.
    pub fn slot_id(&self, node: NodeId, slot: &str) -> Result<SlotId, ModelError> {
        match self.node(node).slot_position(slot) {
            Some(index) => Ok(SlotId { node, index }),
            None => Err(ModelError::UnknownSlot {
                node: self.node(node).name().to_string(),
                slot: slot.to_string(),
            }),
        }
    }

    /// Read a slot value by node id and slot name.
    pub fn get(&self, node: NodeId, slot: &str) -> Result<&SlotValue, ModelError> {
        self.node(node).get(slot)
    }

    /// Write a slot value by node id and slot name.
    pub fn set(&mut self, node: NodeId, slot: &str, value: SlotValue) -> Result<(), ModelError> {
        self.node_mut(node).set(slot, value)
    }
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

//! core::node
//!
//! The node/slot data model.
//!
//! A [`Node`] is a named entity with an ordered list of [`Slot`]s. Slot
//! order is meaningful: a slot's position becomes its rendering anchor
//! (`s0`, `s1`, ...) and never changes once assigned. Name-based lookup is
//! layered on top of the ordered list; the two can diverge when a name is
//! re-added (see [`Node::add_slot`]).
//!
//! # Ownership
//!
//! Nodes own their slots. Everything a slot can point at (another node,
//! another slot) is an id into the owning [`Diagram`](super::Diagram) arena,
//! so reference cycles cost nothing.

use std::collections::HashMap;

use super::diagram::{MemoryId, NodeId, SlotId};
use super::types::{DisplayColor, ModelError, NodeName};

/// The value held by a slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SlotValue {
    /// No value; renders as an empty field.
    #[default]
    Absent,
    /// A text scalar.
    Text(String),
    /// An integer scalar.
    Int(i64),
    /// A reference to another node.
    Node(NodeId),
    /// A reference to a specific slot on some node.
    Slot(SlotId),
}

impl SlotValue {
    /// Whether this is the absent value.
    pub fn is_absent(&self) -> bool {
        matches!(self, SlotValue::Absent)
    }

    /// The referenced node, if this is a node reference.
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            SlotValue::Node(id) => Some(*id),
            _ => None,
        }
    }

    /// The integer scalar, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            SlotValue::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for SlotValue {
    fn from(s: &str) -> Self {
        SlotValue::Text(s.to_string())
    }
}

impl From<String> for SlotValue {
    fn from(s: String) -> Self {
        SlotValue::Text(s)
    }
}

impl From<i64> for SlotValue {
    fn from(n: i64) -> Self {
        SlotValue::Int(n)
    }
}

impl From<NodeId> for SlotValue {
    fn from(id: NodeId) -> Self {
        SlotValue::Node(id)
    }
}

impl From<SlotId> for SlotValue {
    fn from(id: SlotId) -> Self {
        SlotValue::Slot(id)
    }
}

/// A named, positioned field on a node.
#[derive(Debug, Clone)]
pub struct Slot {
    name: String,
    value: SlotValue,
    index: usize,
}

impl Slot {
    /// The slot's field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The slot's current value.
    pub fn value(&self) -> &SlotValue {
        &self.value
    }

    /// The slot's position on its node, fixed at creation.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A named entity holding an ordered collection of slots.
///
/// Optionally carries a display color, a set of non-owning links to other
/// nodes, and an interior memory rendered nested inside it.
#[derive(Debug)]
pub struct Node {
    name: NodeName,
    slots: Vec<Slot>,
    slot_by_name: HashMap<String, usize>,
    color: Option<DisplayColor>,
    links: Vec<NodeId>,
    interior: Option<MemoryId>,
}

impl Node {
    pub(super) fn new(name: NodeName) -> Self {
        Self {
            name,
            slots: Vec::new(),
            slot_by_name: HashMap::new(),
            color: None,
            links: Vec::new(),
            interior: None,
        }
    }

    /// The node's name (its rendering identity).
    pub fn name(&self) -> &NodeName {
        &self.name
    }

    /// The node's slots in declaration order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// The node's display color, if set.
    pub fn color(&self) -> Option<&DisplayColor> {
        self.color.as_ref()
    }

    /// Set the display color. The `ecru` alias resolves here.
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = Some(DisplayColor::new(color));
    }

    /// Non-owning links to other nodes, in registration order.
    pub fn links(&self) -> &[NodeId] {
        &self.links
    }

    pub(super) fn push_link(&mut self, target: NodeId) {
        self.links.push(target);
    }

    /// The node's interior memory, if it has one.
    pub fn interior(&self) -> Option<MemoryId> {
        self.interior
    }

    pub(super) fn set_interior(&mut self, memory: MemoryId) {
        self.interior = Some(memory);
    }

    /// Append a slot with the next available position.
    ///
    /// Re-adding an existing name SHADOWS the earlier slot: the name now
    /// looks up the new slot, while the old slot keeps its position and
    /// still renders. Surprising, but callers rely on the positional record
    /// staying append-only.
    pub fn add_slot(&mut self, name: impl Into<String>, value: SlotValue) {
        let name = name.into();
        let index = self.slots.len();
        self.slot_by_name.insert(name.clone(), index);
        self.slots.push(Slot { name, value, index });
    }

    /// Look up a slot's position by name.
    pub fn slot_position(&self, slot: &str) -> Option<usize> {
        self.slot_by_name.get(slot).copied()
    }

    /// Read a slot's value by name.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownSlot` if no slot has that name.
    pub fn get(&self, slot: &str) -> Result<&SlotValue, ModelError> {
        self.slot_position(slot)
            .map(|i| &self.slots[i].value)
            .ok_or_else(|| ModelError::UnknownSlot {
                node: self.name.to_string(),
                slot: slot.to_string(),
            })
    }

    /// Write a slot's value by name.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownSlot` if no slot has that name.
    pub fn set(&mut self, slot: &str, value: SlotValue) -> Result<(), ModelError> {
        match self.slot_position(slot) {
            Some(i) => {
                self.slots[i].value = value;
                Ok(())
            }
            None => Err(ModelError::UnknownSlot {
                node: self.name.to_string(),
                slot: slot.to_string(),
            }),
        }
    }

    /// Dynamic attribute read: slots first, then built-ins.
    ///
    /// The built-in attributes are `name` and `color`. A declared slot named
    /// `name` or `color` wins over the built-in.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::NoSuchAttribute` if the name matches neither a
    /// slot nor a built-in.
    pub fn attr(&self, attr: &str) -> Result<SlotValue, ModelError> {
        if let Some(i) = self.slot_position(attr) {
            return Ok(self.slots[i].value.clone());
        }
        match attr {
            "name" => Ok(SlotValue::Text(self.name.to_string())),
            "color" => Ok(self
                .color
                .as_ref()
                .map(|c| SlotValue::Text(c.as_str().to_string()))
                .unwrap_or(SlotValue::Absent)),
            _ => Err(ModelError::NoSuchAttribute {
                node: self.name.to_string(),
                attr: attr.to_string(),
            }),
        }
    }

    /// Dynamic attribute write: slots first, then built-ins.
    ///
    /// Of the built-ins only `color` is writable (a text value becomes the
    /// display color); `name` is fixed because it keys the diagram.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::NoSuchAttribute` if the name matches neither a
    /// slot nor a writable built-in.
    pub fn set_attr(&mut self, attr: &str, value: SlotValue) -> Result<(), ModelError> {
        if self.slot_position(attr).is_some() {
            return self.set(attr, value);
        }
        match (attr, value) {
            ("color", SlotValue::Text(c)) => {
                self.set_color(c);
                Ok(())
            }
            _ => Err(ModelError::NoSuchAttribute {
                node: self.name.to_string(),
                attr: attr.to_string(),
            }),
        }
    }
}

/// A descriptor for building a node in one expression.
///
/// Collects the name, slot declarations, and optional color, then is handed
/// to [`Diagram::add_struct`](super::Diagram::add_struct).
///
/// # Example
///
/// ```
/// use heapdot::core::NodeSpec;
///
/// let spec = NodeSpec::new("tm_block@1")
///     .slot("block_next")
///     .slot("block_prev")
///     .field("white_count", 0)
///     .color("blue");
/// ```
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub(super) name: String,
    pub(super) color: Option<String>,
    pub(super) slots: Vec<(String, SlotValue)>,
}

impl NodeSpec {
    /// Start a descriptor for a node with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
            slots: Vec::new(),
        }
    }

    /// Declare a slot with no value.
    pub fn slot(mut self, name: impl Into<String>) -> Self {
        self.slots.push((name.into(), SlotValue::Absent));
        self
    }

    /// Declare a slot with an initial value.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<SlotValue>) -> Self {
        self.slots.push((name.into(), value.into()));
        self
    }

    /// Set the display color.
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

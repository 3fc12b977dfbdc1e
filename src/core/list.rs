//! core::list
//!
//! Intrusive circular doubly-linked lists over slot pairs.
//!
//! # Architecture
//!
//! A "prefix list" stores its pointers in two Node-valued slots named
//! `<prefix>_next` and `<prefix>_prev` on every participating node. The
//! [`ListSlots`] capability is the only place those names are derived; the
//! operations themselves are ordinary slot reads and writes on the
//! [`Diagram`] arena.
//!
//! # Invariants
//!
//! Once any node is initialized for a prefix, the nodes reachable via
//! `<prefix>_next` form a single circular chain, and the `<prefix>_prev`
//! traversal visits the same nodes in exact reverse order. A singleton
//! chain points to itself in both directions. There is no removal.
//!
//! Pointer slots must be declared by the node's descriptor up front;
//! operations surface `ModelError::UnknownSlot` otherwise.

use super::diagram::{Diagram, NodeId};
use super::node::SlotValue;
use super::types::ModelError;

/// The pointer-slot pair for a list prefix.
///
/// # Example
///
/// ```
/// use heapdot::core::list::ListSlots;
///
/// let ls = ListSlots::for_prefix("block");
/// assert_eq!(ls.next(), "block_next");
/// assert_eq!(ls.prev(), "block_prev");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSlots {
    next: String,
    prev: String,
}

impl ListSlots {
    /// Derive the slot pair for a prefix.
    pub fn for_prefix(prefix: &str) -> Self {
        Self {
            next: format!("{prefix}_next"),
            prev: format!("{prefix}_prev"),
        }
    }

    /// Name of the forward pointer slot.
    pub fn next(&self) -> &str {
        &self.next
    }

    /// Name of the backward pointer slot.
    pub fn prev(&self) -> &str {
        &self.prev
    }
}

impl Diagram {
    /// Initialize a node into the `prefix` list as a singleton.
    ///
    /// If the forward pointer slot is currently absent, both pointer slots
    /// are set to the node itself. Idempotent: a non-absent forward pointer
    /// makes this a no-op, so already-linked nodes are never reset.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownSlot` if the node never declared the
    /// pointer slot pair.
    pub fn list_init(&mut self, node: NodeId, prefix: &str) -> Result<(), ModelError> {
        let ls = ListSlots::for_prefix(prefix);
        if self.get(node, ls.next())?.is_absent() {
            self.set(node, ls.next(), SlotValue::Node(node))?;
            self.set(node, ls.prev(), SlotValue::Node(node))?;
        }
        Ok(())
    }

    /// Insert `other` immediately after `node` in the `prefix` list.
    ///
    /// Initializes `node` first, so insertion into a fresh list is valid.
    /// The fix-up order is: `other.prev = node`, `other.next = node.next`,
    /// then the two neighboring links. Returns `other`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownSlot` if either node lacks the pointer
    /// slots, or `ModelError::NotANodeRef` if a pointer slot was clobbered
    /// with a non-reference value.
    pub fn list_insert(
        &mut self,
        prefix: &str,
        node: NodeId,
        other: NodeId,
    ) -> Result<NodeId, ModelError> {
        self.list_init(node, prefix)?;
        let ls = ListSlots::for_prefix(prefix);
        let successor = self.pointer(node, ls.next())?;

        self.set(other, ls.prev(), SlotValue::Node(node))?;
        self.set(other, ls.next(), SlotValue::Node(successor))?;
        self.set(successor, ls.prev(), SlotValue::Node(other))?;
        self.set(node, ls.next(), SlotValue::Node(other))?;

        Ok(other)
    }

    /// Insert `other` immediately before `node` in the `prefix` list.
    ///
    /// With `node` acting as a notional head, this appends at the tail:
    /// repeatedly appending B, C, D to head A yields forward order
    /// A, B, C, D. Implemented by inserting after `node`'s current
    /// predecessor. Returns `other`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Diagram::list_insert`].
    pub fn list_append(
        &mut self,
        prefix: &str,
        node: NodeId,
        other: NodeId,
    ) -> Result<NodeId, ModelError> {
        self.list_init(node, prefix)?;
        let ls = ListSlots::for_prefix(prefix);
        let predecessor = self.pointer(node, ls.prev())?;
        self.list_insert(prefix, predecessor, other)
    }

    /// Walk the `prefix` list forward from `start` until it cycles back.
    ///
    /// The walk is bounded by the diagram's node count, so a corrupted
    /// chain cannot loop forever; the bound can only bind if an invariant
    /// was broken through raw slot writes.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownSlot` / `ModelError::NotANodeRef` if a
    /// visited node lacks a usable forward pointer.
    pub fn list_forward(&self, prefix: &str, start: NodeId) -> Result<Vec<NodeId>, ModelError> {
        self.walk(ListSlots::for_prefix(prefix).next(), start)
    }

    /// Walk the `prefix` list backward from `start` until it cycles back.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Diagram::list_forward`].
    pub fn list_backward(&self, prefix: &str, start: NodeId) -> Result<Vec<NodeId>, ModelError> {
        self.walk(ListSlots::for_prefix(prefix).prev(), start)
    }

    fn walk(&self, pointer_slot: &str, start: NodeId) -> Result<Vec<NodeId>, ModelError> {
        let mut visited = vec![start];
        let mut current = self.pointer(start, pointer_slot)?;
        while current != start && visited.len() < self.node_count() {
            visited.push(current);
            current = self.pointer(current, pointer_slot)?;
        }
        Ok(visited)
    }

    fn pointer(&self, node: NodeId, slot: &str) -> Result<NodeId, ModelError> {
        match self.get(node, slot)? {
            SlotValue::Node(id) => Ok(*id),
            _ => Err(ModelError::NotANodeRef {
                node: self.node(node).name().to_string(),
                slot: slot.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::NodeSpec;

    fn ring_node(d: &mut Diagram, name: &str) -> NodeId {
        let root = d.root();
        d.add_struct(root, NodeSpec::new(name).slot("p_next").slot("p_prev"))
            .unwrap()
    }

    #[test]
    fn init_creates_a_self_loop() {
        let mut d = Diagram::new();
        let a = ring_node(&mut d, "a");

        d.list_init(a, "p").unwrap();
        assert_eq!(d.get(a, "p_next").unwrap().as_node(), Some(a));
        assert_eq!(d.get(a, "p_prev").unwrap().as_node(), Some(a));
    }

    #[test]
    fn init_is_idempotent() {
        let mut d = Diagram::new();
        let a = ring_node(&mut d, "a");
        let b = ring_node(&mut d, "b");

        d.list_insert("p", a, b).unwrap();
        // A second init must not reset the linked chain.
        d.list_init(a, "p").unwrap();
        assert_eq!(d.get(a, "p_next").unwrap().as_node(), Some(b));
    }

    #[test]
    fn init_requires_declared_pointer_slots() {
        let mut d = Diagram::new();
        let root = d.root();
        let bare = d.add_struct(root, NodeSpec::new("bare")).unwrap();

        assert!(matches!(
            d.list_init(bare, "p"),
            Err(ModelError::UnknownSlot { .. })
        ));
    }

    #[test]
    fn insert_places_other_directly_after() {
        let mut d = Diagram::new();
        let a = ring_node(&mut d, "a");
        let b = ring_node(&mut d, "b");
        let c = ring_node(&mut d, "c");

        d.list_insert("p", a, b).unwrap();
        d.list_insert("p", a, c).unwrap();

        // c was inserted after a, pushing b later.
        assert_eq!(d.list_forward("p", a).unwrap(), vec![a, c, b]);
    }

    #[test]
    fn append_order_is_fifo_from_the_head() {
        let mut d = Diagram::new();
        let a = ring_node(&mut d, "a");
        let b = ring_node(&mut d, "b");
        let c = ring_node(&mut d, "c");
        let e = ring_node(&mut d, "e");

        d.list_append("p", a, b).unwrap();
        d.list_append("p", a, c).unwrap();
        d.list_append("p", a, e).unwrap();

        assert_eq!(d.list_forward("p", a).unwrap(), vec![a, b, c, e]);
    }

    #[test]
    fn backward_walk_is_exact_reverse_of_forward() {
        let mut d = Diagram::new();
        let a = ring_node(&mut d, "a");
        let b = ring_node(&mut d, "b");
        let c = ring_node(&mut d, "c");

        d.list_append("p", a, b).unwrap();
        d.list_append("p", a, c).unwrap();

        let forward = d.list_forward("p", a).unwrap();
        let mut expected = forward.clone();
        expected[1..].reverse();
        assert_eq!(d.list_backward("p", a).unwrap(), expected);
    }

    #[test]
    fn forward_from_any_member_returns_to_it() {
        let mut d = Diagram::new();
        let a = ring_node(&mut d, "a");
        let b = ring_node(&mut d, "b");
        let c = ring_node(&mut d, "c");

        d.list_append("p", a, b).unwrap();
        d.list_append("p", a, c).unwrap();

        for start in [a, b, c] {
            let ring = d.list_forward("p", start).unwrap();
            assert_eq!(ring.len(), 3);
            assert_eq!(ring[0], start);
        }
    }

    #[test]
    fn independent_prefixes_do_not_interfere() {
        let mut d = Diagram::new();
        let root = d.root();
        let a = d
            .add_struct(
                root,
                NodeSpec::new("a")
                    .slot("p_next")
                    .slot("p_prev")
                    .slot("q_next")
                    .slot("q_prev"),
            )
            .unwrap();
        let b = d
            .add_struct(
                root,
                NodeSpec::new("b")
                    .slot("p_next")
                    .slot("p_prev")
                    .slot("q_next")
                    .slot("q_prev"),
            )
            .unwrap();

        d.list_append("p", a, b).unwrap();
        d.list_init(b, "q").unwrap();

        assert_eq!(d.list_forward("p", a).unwrap(), vec![a, b]);
        assert_eq!(d.list_forward("q", b).unwrap(), vec![b]);
    }
}

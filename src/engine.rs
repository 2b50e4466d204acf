//! Insert and burst: the engine that descends the trie, writes into
//! containers, and replaces overfull containers with a deeper trie
//! level. Traversal and emission live in `emit.rs`, as a separate
//! `impl Engine` block over the same type.

use crate::arena::{Arena, NodeId, NODES_PER_PAGE};
use crate::container::{Container, GrowthPolicy};
use crate::error::EngineError;
use crate::length::MAX_LEN;
use crate::node::{Slot, TrieNode};

/// Lower bound on a legal burst threshold, per the documented
/// command-line contract.
pub const MIN_BURST_THRESHOLD: u32 = 64;
/// Upper bound on a legal burst threshold.
pub const MAX_BURST_THRESHOLD: u32 = 512;

/// Fixed per-allocation overhead assumed by the memory estimate, to
/// approximate a real allocator's bookkeeping bytes.
const ALLOC_OVERHEAD: u64 = 16;

/// An in-memory burst-trie sorter. Owns its arena, root, and every
/// container reachable from it; nothing about it is global or shared.
pub struct Engine {
    pub(crate) arena: Arena,
    pub(crate) root: NodeId,
    pub(crate) burst_threshold: u32,
    pub(crate) growth_policy: GrowthPolicy,
    inserted: u64,
}

impl Engine {
    /// Build a new engine. `burst_threshold` must fall within
    /// `[MIN_BURST_THRESHOLD, MAX_BURST_THRESHOLD]` — callers at the
    /// CLI boundary are expected to have already validated this and
    /// exited with a diagnostic otherwise; the engine itself only
    /// asserts it, since a library caller constructing an `Engine`
    /// directly has already made the same promise.
    pub fn new(burst_threshold: u32, growth_policy: GrowthPolicy) -> Result<Self, EngineError> {
        debug_assert!((MIN_BURST_THRESHOLD..=MAX_BURST_THRESHOLD).contains(&burst_threshold));

        let mut arena = Arena::new();
        let root = arena.alloc_node()?;

        Ok(Engine {
            arena,
            root,
            burst_threshold,
            growth_policy,
            inserted: 0,
        })
    }

    /// Number of keys inserted so far, duplicates included.
    pub fn inserted_count(&self) -> u64 {
        self.inserted
    }

    /// Insert one key. Keys longer than `length::MAX_LEN` at any
    /// remaining suffix are rejected up front, since no container
    /// entry could ever encode them.
    pub fn insert(&mut self, key: &[u8]) -> Result<(), EngineError> {
        if key.len() > MAX_LEN {
            return Err(EngineError::KeyTooLong { len: key.len() });
        }

        self.inserted += 1;

        let policy = self.growth_policy;
        let threshold = self.burst_threshold;

        let mut current = self.root;
        let mut pos = 0usize;

        loop {
            if pos == key.len() {
                self.arena[current].exhaust += 1;
                return Ok(());
            }

            let b = key[pos];

            // Peek without a mutable borrow first: descending into a
            // child never needs to allocate, so we only pay for the
            // mutable path when we're about to touch a leaf or empty
            // slot.
            if let Slot::Child(next) = &self.arena[current].slots[b as usize] {
                current = *next;
                pos += 1;
                continue;
            }

            let mut pending_burst: Option<Box<Container>> = None;

            {
                let node = &mut self.arena[current];

                if node.slots[b as usize].is_empty() {
                    let mut container = Box::new(Container::new());
                    if pos + 1 == key.len() {
                        container.exhaust += 1;
                    } else {
                        container.append(policy, &key[pos + 1..]);
                    }
                    node.slots[b as usize] = Slot::Leaf(container);
                } else {
                    pos += 1;

                    let count = match &mut node.slots[b as usize] {
                        Slot::Leaf(container) if pos == key.len() => {
                            container.exhaust += 1;
                            None
                        }
                        Slot::Leaf(container) => Some(container.append(policy, &key[pos..])),
                        Slot::Child(_) | Slot::Empty => unreachable!("checked above"),
                    };

                    if let Some(count) = count {
                        if count > threshold {
                            if let Slot::Leaf(overfull) =
                                std::mem::replace(&mut node.slots[b as usize], Slot::Empty)
                            {
                                pending_burst = Some(overfull);
                            }
                        }
                    }
                }
            }

            if let Some(overfull) = pending_burst {
                self.burst(current, b, overfull)?;
            }

            return Ok(());
        }
    }

    /// Replace the overfull container in `parent`'s slot `b` with a
    /// fresh trie node one level deeper, redistributing `old`'s
    /// entries by their next byte. Never recurses into another burst:
    /// a freshly split container can't itself exceed the threshold
    /// unless the threshold is pathologically small (the CLI enforces
    /// `threshold >= 64`, so this holds in practice).
    fn burst(&mut self, parent: NodeId, b: u8, mut old: Box<Container>) -> Result<(), EngineError> {
        let new_node = self.arena.alloc_node()?;
        self.arena[new_node].exhaust = old.exhaust;
        old.exhaust = 0; // defensive; `old` is dropped at the end of this call anyway

        let policy = self.growth_policy;

        for (payload_offset, len) in old.entries() {
            let payload = &old.packed()[payload_offset..payload_offset + len];
            let c = payload[0];

            let node = &mut self.arena[new_node];
            match &mut node.slots[c as usize] {
                Slot::Empty => {
                    let mut container = Box::new(Container::new());
                    if len == 1 {
                        container.exhaust += 1;
                    } else {
                        container.append_with_len(policy, &payload[1..]);
                    }
                    node.slots[c as usize] = Slot::Leaf(container);
                }
                Slot::Leaf(container) => {
                    if len == 1 {
                        container.exhaust += 1;
                    } else {
                        container.append_with_len(policy, &payload[1..]);
                    }
                }
                Slot::Child(_) => unreachable!("a node just allocated for a burst has no children yet"),
            }
        }

        self.arena[parent].slots[b as usize] = Slot::Child(new_node);
        Ok(())
    }

    /// Declared for interface parity with the sibling search structures
    /// this engine was extracted from. Never invoked by the sort
    /// pipeline, and not meaningfully implemented: always reports
    /// "not found".
    pub fn search(&self, _key: &[u8]) -> Option<()> {
        None
    }

    /// Best-effort estimate of the engine's own memory footprint:
    /// arena pages (reserved in full up front) plus every live
    /// container's allocated bytes, plus a fixed per-allocation
    /// overhead meant to approximate real allocator bookkeeping.
    pub fn estimated_bytes(&self) -> u64 {
        let node_bytes =
            self.arena.pages() as u64 * NODES_PER_PAGE as u64 * std::mem::size_of::<TrieNode>() as u64;

        let mut container_bytes = 0u64;
        self.walk_containers(self.root, &mut container_bytes);

        node_bytes + container_bytes
    }

    fn walk_containers(&self, node_id: NodeId, acc: &mut u64) {
        for slot in self.arena[node_id].slots.iter() {
            match slot {
                Slot::Empty => {}
                Slot::Child(child) => self.walk_containers(*child, acc),
                Slot::Leaf(container) => {
                    *acc += container.heap_bytes() as u64 + ALLOC_OVERHEAD * container.alloc_count() as u64;
                }
            }
        }
    }
}

// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendered-element registry with generation-checked deferred removal.
//!
//! Each rendered node or link has one [`Entry`] keyed by its id. The entry
//! owns the backend handle, the element's animation track, and the lineage
//! (recorded parent first, then its ancestors) captured the last time the
//! element was laid out. Exiting elements resolve their collapse target from
//! that cached lineage because their own ancestors may be gone from the new
//! layout.
//!
//! Removal is deferred: an exiting entry is queued with a due time and the
//! generation it had when it started exiting. Reviving the entry bumps its
//! generation, which turns the queued removal into a no-op.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::Point;

use crate::easing::{Lerp, Tween};
use crate::time::HostTime;
use crate::tree::NodeId;

/// Lifecycle of a rendered element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Growing toward its first layout position.
    Entering,
    /// At (or moving between) layout positions.
    Visible,
    /// Collapsing toward a surviving ancestor; removed when the exit ends.
    Exiting,
}

/// Per-frame geometry of a node element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeGeometry {
    /// Center in world coordinates.
    pub position: Point,
    /// Scale around the center, 0 when collapsed.
    pub scale: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl NodeGeometry {
    /// Fully grown and opaque at `position`.
    #[must_use]
    pub const fn at(position: Point) -> Self {
        Self {
            position,
            scale: 1.0,
            opacity: 1.0,
        }
    }

    /// Collapsed to nothing at `position`.
    #[must_use]
    pub const fn collapsed(position: Point) -> Self {
        Self {
            position,
            scale: 0.0,
            opacity: 0.0,
        }
    }
}

impl Lerp for NodeGeometry {
    fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            position: Lerp::lerp(self.position, other.position, t),
            scale: self.scale.lerp(other.scale, t),
            opacity: self.opacity.lerp(other.opacity, t),
        }
    }
}

/// Per-frame geometry of a link element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkGeometry {
    /// Parent end in world coordinates.
    pub source: Point,
    /// Child end in world coordinates.
    pub target: Point,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl LinkGeometry {
    /// An opaque link between two points.
    #[must_use]
    pub const fn between(source: Point, target: Point) -> Self {
        Self {
            source,
            target,
            opacity: 1.0,
        }
    }

    /// An opaque zero-length link at `at`.
    #[must_use]
    pub const fn seed(at: Point) -> Self {
        Self::between(at, at)
    }

    /// A transparent zero-length link at `at`.
    #[must_use]
    pub const fn collapsed(at: Point) -> Self {
        Self {
            source: at,
            target: at,
            opacity: 0.0,
        }
    }
}

impl Lerp for LinkGeometry {
    fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            source: Lerp::lerp(self.source, other.source, t),
            target: Lerp::lerp(self.target, other.target, t),
            opacity: self.opacity.lerp(other.opacity, t),
        }
    }
}

/// A rendered element.
#[derive(Clone, Debug)]
pub struct Entry<H, G> {
    pub(crate) handle: H,
    pub(crate) phase: Phase,
    pub(crate) generation: u32,
    pub(crate) lineage: Vec<NodeId>,
    pub(crate) track: Tween<G>,
    pub(crate) current: G,
    pub(crate) dirty: bool,
}

impl<H, G: Lerp> Entry<H, G> {
    /// The backend handle.
    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the element accepts pointer input.
    pub fn is_interactive(&self) -> bool {
        self.phase != Phase::Exiting
    }

    /// The recorded parent (the source node, for links).
    pub fn parent(&self) -> Option<NodeId> {
        self.lineage.first().copied()
    }

    /// Recorded parent followed by its ancestors, nearest first.
    pub fn lineage(&self) -> &[NodeId] {
        &self.lineage
    }

    /// Geometry as of the last sample.
    pub fn current(&self) -> G {
        self.current
    }

    /// Geometry the element is animating toward.
    pub fn target(&self) -> G {
        self.track.target()
    }

    /// Generation counter; bumped whenever the element starts or stops
    /// exiting.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Clone, Copy, Debug)]
struct Removal<K> {
    due: HostTime,
    key: K,
    generation: u32,
}

/// Id → [`Entry`] map plus its removal queue.
#[derive(Clone, Debug)]
pub struct Registry<K, H, G> {
    entries: BTreeMap<K, Entry<H, G>>,
    removals: Vec<Removal<K>>,
    next_generation: u32,
}

impl<K, H, G> Default for Registry<K, H, G> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            removals: Vec::new(),
            next_generation: 0,
        }
    }
}

impl<K: Ord + Copy, H, G: Lerp> Registry<K, H, G> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries, exiting ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry.
    #[must_use]
    pub fn get(&self, key: K) -> Option<&Entry<H, G>> {
        self.entries.get(&key)
    }

    pub(crate) fn get_mut(&mut self, key: K) -> Option<&mut Entry<H, G>> {
        self.entries.get_mut(&key)
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &Entry<H, G>)> {
        self.entries.iter().map(|(k, e)| (*k, e))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (K, &mut Entry<H, G>)> {
        self.entries.iter_mut().map(|(k, e)| (*k, e))
    }

    /// Number of entries in `phase`.
    #[must_use]
    pub fn count(&self, phase: Phase) -> usize {
        self.entries.values().filter(|e| e.phase == phase).count()
    }

    /// Number of queued removals, stale ones included.
    #[must_use]
    pub fn pending_removals(&self) -> usize {
        self.removals.len()
    }

    fn bump_generation(&mut self) -> u32 {
        self.next_generation = self.next_generation.wrapping_add(1);
        self.next_generation
    }

    pub(crate) fn insert(
        &mut self,
        key: K,
        handle: H,
        lineage: Vec<NodeId>,
        track: Tween<G>,
        now: HostTime,
    ) {
        let generation = self.bump_generation();
        self.entries.insert(
            key,
            Entry {
                handle,
                phase: Phase::Entering,
                generation,
                lineage,
                current: track.sample(now),
                track,
                dirty: true,
            },
        );
    }

    /// Brings an exiting entry back: new generation, phase `Entering`.
    /// Returns `false` if the entry is missing or not exiting.
    pub(crate) fn revive(&mut self, key: K) -> bool {
        if self.entries.get(&key).is_none_or(|e| e.phase != Phase::Exiting) {
            return false;
        }
        let generation = self.bump_generation();
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.phase = Phase::Entering;
            entry.generation = generation;
        }
        true
    }

    /// Marks an entry as exiting under a new generation and queues its
    /// removal at `due`. Returns `false` if the entry is missing or already
    /// exiting.
    pub(crate) fn begin_exit(&mut self, key: K, due: HostTime) -> bool {
        if self.entries.get(&key).is_none_or(|e| e.phase == Phase::Exiting) {
            return false;
        }
        let generation = self.bump_generation();
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.phase = Phase::Exiting;
            entry.generation = generation;
        }
        self.schedule_removal(key, generation, due);
        true
    }

    /// Queues removal of `key` at `due`, valid only while the entry keeps
    /// `generation`.
    fn schedule_removal(&mut self, key: K, generation: u32, due: HostTime) {
        self.removals.push(Removal {
            due,
            key,
            generation,
        });
    }

    /// Takes every entry whose removal is due and still current.
    ///
    /// Stale queue items (superseded by a revive, or whose entry is already
    /// gone) are dropped silently.
    pub(crate) fn take_due(&mut self, now: HostTime) -> Vec<(K, Entry<H, G>)> {
        let mut taken = Vec::new();
        let entries = &mut self.entries;
        self.removals.retain(|r| {
            if r.due > now {
                return true;
            }
            let current = entries
                .get(&r.key)
                .is_some_and(|e| e.generation == r.generation && e.phase == Phase::Exiting);
            if current && let Some(entry) = entries.remove(&r.key) {
                taken.push((r.key, entry));
            }
            false
        });
        taken
    }

    /// Removes every entry and clears the queue.
    pub(crate) fn drain(&mut self) -> Vec<(K, Entry<H, G>)> {
        self.removals.clear();
        core::mem::take(&mut self.entries).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::time::Duration;

    fn registry_with(key: u32) -> Registry<u32, (), f64> {
        let mut reg = Registry::new();
        let track = Tween::new(0.0, 1.0, HostTime(0), Duration(10), Easing::Linear);
        reg.insert(key, (), alloc::vec![NodeId(0)], track, HostTime(5));
        reg
    }

    #[test]
    fn insert_samples_the_track() {
        let reg = registry_with(1);
        let entry = reg.get(1).unwrap();
        assert_eq!(entry.current(), 0.5);
        assert_eq!(entry.parent(), Some(NodeId(0)));
        assert_eq!(entry.phase(), Phase::Entering);
    }

    #[test]
    fn due_removal_takes_the_entry() {
        let mut reg = registry_with(7);
        assert!(reg.begin_exit(7, HostTime(100)));
        assert!(!reg.begin_exit(7, HostTime(200)), "already exiting");
        assert!(reg.take_due(HostTime(99)).is_empty());
        assert_eq!(reg.take_due(HostTime(100)).len(), 1);
        assert!(reg.is_empty());
        assert_eq!(reg.pending_removals(), 0);
    }

    #[test]
    fn revived_entry_ignores_stale_removal() {
        let mut reg = registry_with(7);
        reg.begin_exit(7, HostTime(100));
        let exiting_generation = reg.get(7).unwrap().generation();
        assert!(reg.revive(7));
        assert_ne!(reg.get(7).unwrap().generation(), exiting_generation);
        assert!(!reg.revive(7), "only exiting entries revive");

        assert!(reg.take_due(HostTime(500)).is_empty());
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.pending_removals(), 0, "stale item dropped");
    }

    #[test]
    fn re_exit_after_revive_uses_the_newer_deadline() {
        let mut reg = registry_with(7);
        reg.begin_exit(7, HostTime(100));
        reg.revive(7);
        reg.begin_exit(7, HostTime(300));
        assert!(reg.take_due(HostTime(200)).is_empty(), "first deadline is stale");
        assert_eq!(reg.take_due(HostTime(300)).len(), 1);
    }

    #[test]
    fn drain_empties_entries_and_queue() {
        let mut reg = registry_with(3);
        reg.begin_exit(3, HostTime(50));
        assert_eq!(reg.drain().len(), 1);
        assert!(reg.is_empty());
        assert_eq!(reg.pending_removals(), 0);
    }
}

//! Collection insert + iterate scenario.
//!
//! Container kinds are plugged in as `ContainerVariant` implementations behind
//! one insert/iterate contract. The scenario only knows the factory list, so a
//! new variant is one struct plus one entry in `standard_variants`.
//!
//! Insertion and iteration over all variants are timed as a single duration.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList},
    hint::black_box,
    sync::Arc,
};

use dashmap::DashMap;
use indexmap::{IndexMap, IndexSet};
use parking_lot::{Mutex, RwLock};

use crate::engine::{timer::Timer, Result};
use crate::scenarios::{Measurement, Scenario};

pub const COLLECTION_SIZE: i32 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    OrderedSequence,
    LinkedSequence,
    SyncSequence,
    UnorderedSet,
    InsertionOrderedSet,
    SortedSet,
    CopyOnWriteSet,
    UnorderedMap,
    InsertionOrderedMap,
    SortedMap,
    SyncMap,
    ConcurrentMap,
}

pub trait ContainerVariant: Send {
    fn capability(&self) -> Capability;

    fn insert(&mut self, value: i32);

    /// Visits every element (keys for maps) once; returns how many were seen.
    fn iterate(&self) -> usize;
}

pub type VariantFactory = fn() -> Box<dyn ContainerVariant>;

#[inline]
fn visit<'a, I>(iter: I) -> usize
where
    I: Iterator<Item = &'a i32>,
{
    iter.map(|v| black_box(*v)).count()
}

#[derive(Default)]
struct OrderedSeq(Vec<i32>);

impl ContainerVariant for OrderedSeq {
    fn capability(&self) -> Capability {
        Capability::OrderedSequence
    }
    fn insert(&mut self, value: i32) {
        self.0.push(value);
    }
    fn iterate(&self) -> usize {
        visit(self.0.iter())
    }
}

#[derive(Default)]
struct LinkedSeq(LinkedList<i32>);

impl ContainerVariant for LinkedSeq {
    fn capability(&self) -> Capability {
        Capability::LinkedSequence
    }
    fn insert(&mut self, value: i32) {
        self.0.push_back(value);
    }
    fn iterate(&self) -> usize {
        visit(self.0.iter())
    }
}

// Every call takes the lock, like a synchronized vector.
#[derive(Default)]
struct SyncSeq(Mutex<Vec<i32>>);

impl ContainerVariant for SyncSeq {
    fn capability(&self) -> Capability {
        Capability::SyncSequence
    }
    fn insert(&mut self, value: i32) {
        self.0.lock().push(value);
    }
    fn iterate(&self) -> usize {
        visit(self.0.lock().iter())
    }
}

#[derive(Default)]
struct UnorderedSet(HashSet<i32>);

impl ContainerVariant for UnorderedSet {
    fn capability(&self) -> Capability {
        Capability::UnorderedSet
    }
    fn insert(&mut self, value: i32) {
        self.0.insert(value);
    }
    fn iterate(&self) -> usize {
        visit(self.0.iter())
    }
}

#[derive(Default)]
struct InsertionOrderedSet(IndexSet<i32>);

impl ContainerVariant for InsertionOrderedSet {
    fn capability(&self) -> Capability {
        Capability::InsertionOrderedSet
    }
    fn insert(&mut self, value: i32) {
        self.0.insert(value);
    }
    fn iterate(&self) -> usize {
        visit(self.0.iter())
    }
}

#[derive(Default)]
struct SortedSet(BTreeSet<i32>);

impl ContainerVariant for SortedSet {
    fn capability(&self) -> Capability {
        Capability::SortedSet
    }
    fn insert(&mut self, value: i32) {
        self.0.insert(value);
    }
    fn iterate(&self) -> usize {
        visit(self.0.iter())
    }
}

/// Insertion-ordered set where every successful write copies the whole backing
/// array and swaps in the new one. Readers hold an `Arc` snapshot that no
/// later write can touch.
#[derive(Default)]
pub struct CopyOnWriteSet {
    inner: RwLock<Arc<Vec<i32>>>,
}

impl CopyOnWriteSet {
    pub fn snapshot(&self) -> Arc<Vec<i32>> {
        self.inner.read().clone()
    }

    /// Linear membership check, then copy + append. Returns `false` for duplicates.
    pub fn add(&self, value: i32) -> bool {
        let mut guard = self.inner.write();
        if guard.contains(&value) {
            return false;
        }
        let mut next = Vec::with_capacity(guard.len() + 1);
        next.extend_from_slice(&guard);
        next.push(value);
        *guard = Arc::new(next);
        true
    }
}

impl ContainerVariant for CopyOnWriteSet {
    fn capability(&self) -> Capability {
        Capability::CopyOnWriteSet
    }
    fn insert(&mut self, value: i32) {
        self.add(value);
    }
    fn iterate(&self) -> usize {
        visit(self.snapshot().iter())
    }
}

#[derive(Default)]
struct UnorderedMap(HashMap<i32, i32>);

impl ContainerVariant for UnorderedMap {
    fn capability(&self) -> Capability {
        Capability::UnorderedMap
    }
    fn insert(&mut self, value: i32) {
        self.0.insert(value, value);
    }
    fn iterate(&self) -> usize {
        visit(self.0.keys())
    }
}

#[derive(Default)]
struct InsertionOrderedMap(IndexMap<i32, i32>);

impl ContainerVariant for InsertionOrderedMap {
    fn capability(&self) -> Capability {
        Capability::InsertionOrderedMap
    }
    fn insert(&mut self, value: i32) {
        self.0.insert(value, value);
    }
    fn iterate(&self) -> usize {
        visit(self.0.keys())
    }
}

#[derive(Default)]
struct SortedMap(BTreeMap<i32, i32>);

impl ContainerVariant for SortedMap {
    fn capability(&self) -> Capability {
        Capability::SortedMap
    }
    fn insert(&mut self, value: i32) {
        self.0.insert(value, value);
    }
    fn iterate(&self) -> usize {
        visit(self.0.keys())
    }
}

// Single lock around the whole table.
#[derive(Default)]
struct SyncMap(Mutex<HashMap<i32, i32>>);

impl ContainerVariant for SyncMap {
    fn capability(&self) -> Capability {
        Capability::SyncMap
    }
    fn insert(&mut self, value: i32) {
        self.0.lock().insert(value, value);
    }
    fn iterate(&self) -> usize {
        visit(self.0.lock().keys())
    }
}

// Sharded locks.
#[derive(Default)]
struct ConcurrentMap(DashMap<i32, i32>);

impl ContainerVariant for ConcurrentMap {
    fn capability(&self) -> Capability {
        Capability::ConcurrentMap
    }
    fn insert(&mut self, value: i32) {
        self.0.insert(value, value);
    }
    fn iterate(&self) -> usize {
        self.0.iter().map(|entry| black_box(*entry.key())).count()
    }
}

fn boxed<T: ContainerVariant + Default + 'static>() -> Box<dyn ContainerVariant> {
    Box::new(T::default())
}

/// The twelve standard container kinds, in report order.
pub fn standard_variants() -> Vec<VariantFactory> {
    vec![
        boxed::<OrderedSeq>,
        boxed::<LinkedSeq>,
        boxed::<SyncSeq>,
        boxed::<UnorderedSet>,
        boxed::<InsertionOrderedSet>,
        boxed::<SortedSet>,
        boxed::<CopyOnWriteSet>,
        boxed::<UnorderedMap>,
        boxed::<InsertionOrderedMap>,
        boxed::<SortedMap>,
        boxed::<SyncMap>,
        boxed::<ConcurrentMap>,
    ]
}

pub struct CollectionOps {
    size: i32,
    factories: Vec<VariantFactory>,
    visits: Vec<(Capability, usize)>,
}

impl Default for CollectionOps {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionOps {
    pub fn new() -> Self {
        Self::with_variants(COLLECTION_SIZE, standard_variants())
    }

    pub fn with_variants(size: i32, factories: Vec<VariantFactory>) -> Self {
        Self { size, factories, visits: Vec::new() }
    }

    /// Per-variant iteration counts from the last run.
    pub fn visits(&self) -> &[(Capability, usize)] {
        &self.visits
    }
}

impl Scenario for CollectionOps {
    fn name(&self) -> &str {
        "Collections"
    }

    fn run(&mut self) -> Result<Measurement> {
        let mut containers: Vec<Box<dyn ContainerVariant>> =
            self.factories.iter().map(|make| make()).collect();

        let timer = Timer::start();
        for i in 0..self.size {
            for c in containers.iter_mut() {
                c.insert(i);
            }
        }
        let visits: Vec<(Capability, usize)> = containers
            .iter()
            .map(|c| (c.capability(), c.iterate()))
            .collect();
        let elapsed = timer.elapsed_ms();

        self.visits = visits;
        Ok(Measurement::timed(elapsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_sees_every_element_once() {
        let mut scenario = CollectionOps::new();
        let m = scenario.run().unwrap();
        assert!(m.duration_ms >= 0);
        assert_eq!(scenario.visits().len(), 12);
        for (cap, count) in scenario.visits() {
            assert_eq!(*count, COLLECTION_SIZE as usize, "{:?}", cap);
        }
    }

    #[test]
    fn capabilities_are_distinct() {
        let caps: HashSet<Capability> = standard_variants().iter().map(|f| f().capability()).collect();
        assert_eq!(caps.len(), 12);
    }

    #[test]
    fn sets_ignore_duplicates() {
        for make in standard_variants() {
            let mut c = make();
            c.insert(1);
            c.insert(2);
            c.insert(1);
            let expected = match c.capability() {
                Capability::OrderedSequence | Capability::LinkedSequence | Capability::SyncSequence => 3,
                _ => 2,
            };
            assert_eq!(c.iterate(), expected, "{:?}", c.capability());
        }
    }

    #[test]
    fn copy_on_write_snapshot_is_stable() {
        let set = CopyOnWriteSet::default();
        set.add(3);
        set.add(1);
        let before = set.snapshot();
        assert!(set.add(2));
        assert!(!set.add(2));
        assert_eq!(*before, vec![3, 1]);
        assert_eq!(*set.snapshot(), vec![3, 1, 2]);
    }

    #[test]
    fn copy_on_write_replaces_backing_array_on_every_add() {
        let set = CopyOnWriteSet::default();
        set.add(7);

        // No snapshot alive across the write: the array is still replaced.
        let first = Arc::as_ptr(&set.snapshot());
        assert!(set.add(8));
        let second = Arc::as_ptr(&set.snapshot());
        assert_ne!(first, second);

        let held = set.snapshot();
        assert!(set.add(9));
        assert_eq!(*held, vec![7, 8]);
        assert!(!Arc::ptr_eq(&held, &set.snapshot()));

        // Duplicates leave the current array in place.
        let current = set.snapshot();
        assert!(!set.add(8));
        assert!(Arc::ptr_eq(&current, &set.snapshot()));
        assert_eq!(*current, vec![7, 8, 9]);
    }

    #[test]
    fn custom_variant_list_is_honoured() {
        let mut scenario = CollectionOps::with_variants(10, vec![boxed::<SortedSet> as VariantFactory]);
        scenario.run().unwrap();
        assert_eq!(scenario.visits(), &[(Capability::SortedSet, 10)]);
    }
}

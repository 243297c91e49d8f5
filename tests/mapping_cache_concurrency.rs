//! Concurrent access to `MappingCache`: one build per name per generation,
//! shared entries, and invalidation.

#![allow(missing_docs)]

use schematic_mapping::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 8;

/// Wraps an in-memory source and counts every fetch.
struct CountingSource {
    inner: InMemoryDataSource<f64>,
    fetches: AtomicUsize,
}

impl CountingSource {
    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl DataSource for CountingSource {
    type Scalar = f64;

    fn fetch_data_set(&self, name: &str) -> Result<Option<DataSet<f64>>, DataSourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_data_set(name)
    }
}

fn yard_source() -> Arc<CountingSource> {
    let inner = InMemoryDataSource::from_json_str(
        r#"[
            {
                "name": "Yard",
                "points": [
                    { "map": [0, 0], "world": [0, 0] },
                    { "map": [10, 0], "world": [0, 100] },
                    { "map": [0, 10], "world": [100, 0] },
                    { "map": [10, 10], "world": [100, 100] }
                ],
                "rects": [{ "points": [0, 1, 3, 2], "linkTarget": "Yard-Detail" }]
            },
            {
                "name": "Shed",
                "points": [
                    { "map": [0, 0], "world": [0, 0] },
                    { "map": [1, 0], "world": [0, 10] },
                    { "map": [0, 1], "world": [10, 0] }
                ]
            }
        ]"#,
    )
    .unwrap();
    Arc::new(CountingSource {
        inner,
        fetches: AtomicUsize::new(0),
    })
}

/// Runs `lookup` on `THREADS` threads released together and collects the results.
fn race<R, F>(lookup: F) -> Vec<R>
where
    R: Send,
    F: Fn() -> R + Sync,
{
    let barrier = Barrier::new(THREADS);
    thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    lookup()
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    })
}

#[test]
fn concurrent_first_lookups_share_one_build() {
    let source = yard_source();
    let cache = MappingCache::new(Arc::clone(&source));

    let entries = race(|| cache.entry("Yard").unwrap());

    assert_eq!(source.fetches(), 1);
    assert!(entries.iter().all(|entry| Arc::ptr_eq(entry, &entries[0])));
    assert_eq!(cache.len(), 1);
}

#[test]
fn concurrent_lookups_of_different_names_do_not_interfere() {
    let source = yard_source();
    let cache = MappingCache::new(Arc::clone(&source));
    let names = ["Yard", "Shed", "Unknown"];

    let results = race(|| {
        names
            .iter()
            .map(|name| cache.mapping(name, MappingDirection::WorldToMap).is_some())
            .collect::<Vec<_>>()
    });

    assert!(results.iter().all(|found| found == &[true, true, false]));
    assert_eq!(source.fetches(), names.len());
    assert_eq!(cache.len(), names.len());
}

#[test]
fn concurrent_lookups_map_consistently() {
    let source = yard_source();
    let cache = MappingCache::new(Arc::clone(&source));

    let mapped = race(|| {
        let to_map = cache.mapping("Yard", MappingDirection::WorldToMap).unwrap();
        let to_world = cache.mapping("Yard", MappingDirection::MapToWorld).unwrap();
        (
            to_map.get(&Point::new([50.0, 50.0])).unwrap(),
            to_world.get(&Point::new([5.0, 5.0])).unwrap(),
        )
    });

    for (map, world) in mapped {
        assert_eq!(map, Some(Point::new([5.0, 5.0])));
        assert_eq!(world, Some(Point::new([50.0, 50.0])));
    }
    assert_eq!(source.fetches(), 1);
}

#[test]
fn invalidation_triggers_exactly_one_rebuild() {
    let source = yard_source();
    let cache = MappingCache::new(Arc::clone(&source));

    let before = cache.entry("Yard").unwrap();
    assert_eq!(source.fetches(), 1);

    cache.invalidate();
    assert_eq!(cache.generation(), 1);
    assert!(cache.is_empty());

    let after = race(|| cache.entry("Yard").unwrap());
    assert_eq!(source.fetches(), 2);
    assert!(after.iter().all(|entry| Arc::ptr_eq(entry, &after[0])));
    assert!(!Arc::ptr_eq(&before, &after[0]));

    // Handed-out entries stay usable after invalidation.
    assert_eq!(
        before
            .mapping(MappingDirection::WorldToMap)
            .get(&Point::new([50.0, 50.0]))
            .unwrap(),
        Some(Point::new([5.0, 5.0]))
    );
}

#[test]
fn missing_data_sets_are_queried_once() {
    let source = yard_source();
    let cache = MappingCache::new(Arc::clone(&source));

    let errors = race(|| cache.entry("Unknown").unwrap_err());
    assert!(errors.iter().all(|err| matches!(
        err,
        MappingCacheError::DataSetNotFound { name } if name == "Unknown"
    )));
    assert!(cache.rects("Unknown").is_none());
    assert_eq!(source.fetches(), 1);

    cache.invalidate();
    assert!(cache.mapping("Unknown", MappingDirection::MapToWorld).is_none());
    assert_eq!(source.fetches(), 2);
}

#[test]
fn lookups_racing_invalidation_always_see_a_complete_entry() {
    let source = yard_source();
    let cache = MappingCache::new(Arc::clone(&source));

    thread::scope(|scope| {
        let readers: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    for _ in 0..50 {
                        let entry = cache.entry("Yard").unwrap();
                        assert!(entry.forward().is_triangulated());
                        assert!(entry.inverse().is_triangulated());
                        assert_eq!(entry.rects().len(), 1);
                    }
                })
            })
            .collect();
        for _ in 0..10 {
            cache.invalidate();
            thread::yield_now();
        }
        for reader in readers {
            reader.join().unwrap();
        }
    });

    assert_eq!(cache.generation(), 10);
    assert!(source.fetches() >= 1);
}

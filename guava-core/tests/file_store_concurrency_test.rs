//! Concurrent access tests for the JSON file store
//!
//! Several store instances (standing in for several `gv` processes) write
//! the same slots at once. Every read must see a complete document.
//!
//! Run with: cargo test --test file_store_concurrency_test -- --nocapture

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use tempfile::TempDir;

use guava_core::adapters::file::FileStore;
use guava_core::ports::KeyValueStore;
use guava_core::SessionSnapshot;

/// Number of concurrent writers
const THREAD_COUNT: usize = 6;

/// Number of writes per thread
const ITERATIONS_PER_THREAD: usize = 20;

fn snapshot_json(coins: u64) -> String {
    SessionSnapshot {
        id: "1".to_string(),
        name: "Kwame Asante".to_string(),
        email: "kwame@example.com".to_string(),
        avatar: "/african-male-portrait.jpg".to_string(),
        coins,
    }
    .to_json()
    .unwrap()
}

/// Test: separate store instances writing the same slot simultaneously.
/// Last write wins, and the slot always holds a parseable snapshot.
#[test]
fn test_concurrent_writers_never_tear_a_slot() {
    let temp_dir = TempDir::new().unwrap();
    let root = Arc::new(temp_dir.path().join("store"));
    FileStore::new(&root).unwrap();

    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let torn_reads = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];
    for thread_id in 0..THREAD_COUNT {
        let barrier = Arc::clone(&barrier);
        let root = Arc::clone(&root);
        let torn_reads = Arc::clone(&torn_reads);

        handles.push(thread::spawn(move || {
            let store = FileStore::new(&root).unwrap();
            barrier.wait();

            for i in 0..ITERATIONS_PER_THREAD {
                let coins = (thread_id * 1000 + i) as u64;
                store.put("guava_user", &snapshot_json(coins)).unwrap();

                if let Some(raw) = store.get("guava_user").unwrap() {
                    if SessionSnapshot::parse(&raw).is_err() {
                        torn_reads.fetch_add(1, Ordering::SeqCst);
                    }
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(torn_reads.load(Ordering::SeqCst), 0);

    let store = FileStore::new(&root).unwrap();
    let raw = store.get("guava_user").unwrap().unwrap();
    let final_snapshot = SessionSnapshot::parse(&raw).unwrap();
    assert_eq!(final_snapshot.coins % 1000, (ITERATIONS_PER_THREAD - 1) as u64 % 1000);
}

/// Test: writers on different slots do not disturb each other
#[test]
fn test_concurrent_writers_on_separate_slots() {
    let temp_dir = TempDir::new().unwrap();
    let root = Arc::new(temp_dir.path().join("store"));
    FileStore::new(&root).unwrap();

    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let mut handles = vec![];

    for thread_id in 0..THREAD_COUNT {
        let barrier = Arc::clone(&barrier);
        let root = Arc::clone(&root);

        handles.push(thread::spawn(move || {
            let store = FileStore::new(&root).unwrap();
            barrier.wait();
            let key = format!("slot_{}", thread_id);
            for i in 0..ITERATIONS_PER_THREAD {
                store.put(&key, &i.to_string()).unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let store = FileStore::new(&root).unwrap();
    for thread_id in 0..THREAD_COUNT {
        let value = store.get(&format!("slot_{}", thread_id)).unwrap();
        assert_eq!(value, Some((ITERATIONS_PER_THREAD - 1).to_string()));
    }
}

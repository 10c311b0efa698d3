//! Concurrent access tests for thread safety verification.
//!
//! Tests that a shared directory handles concurrent loads and queries
//! without panics, partial states or duplicate loads.

mod common;

use common::{sample_dataset, TestEnv};
use icn_navigator::bench_utils::synthetic_dataset;
use icn_navigator::server::NavigatorServer;
use icn_navigator::tools::{execute_load, execute_search, LoadInput, SearchInput};
use icn_navigator::{DirectoryConfig, DirectoryIndex};
use std::sync::{Arc, Barrier, RwLock};
use std::thread;

/// Shared directory with the sample export loaded.
fn setup_shared() -> Arc<RwLock<DirectoryIndex>> {
    Arc::new(RwLock::new(common::loaded(sample_dataset())))
}

// ============================================================================
// Concurrent Queries
// ============================================================================

#[test]
fn test_concurrent_searches() {
    let index = setup_shared();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let index = Arc::clone(&index);
            thread::spawn(move || {
                let guard = index.read().unwrap();
                let query = ["acme", "steel", "", "VIC", "wind", "zzz", "perth", "3000"][i];
                guard.search_companies(query).len()
            })
        })
        .collect();

    let counts: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(counts[2], 6);
    assert_eq!(counts[5], 0);
}

#[test]
fn test_concurrent_mixed_queries() {
    let index = setup_shared();

    let handles: Vec<_> = (0..12)
        .map(|i| {
            let index = Arc::clone(&index);
            thread::spawn(move || {
                let guard = index.read().unwrap();
                match i % 4 {
                    0 => guard.filter_by_state("VIC").len(),
                    1 => guard.filter_by_company_type("both").len(),
                    2 => guard.statistics().total_companies,
                    _ => guard.filter_options().sectors.len(),
                }
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let expected = [2, 2, 6, 4][i % 4];
        assert_eq!(handle.join().unwrap(), expected);
    }
}

// ============================================================================
// Concurrent Loads
// ============================================================================

#[test]
fn test_concurrent_loads_happen_once() {
    let env = TestEnv::new();
    let path = env
        .write_dataset("icn-data.json", &sample_dataset())
        .to_string_lossy()
        .into_owned();
    let index = Arc::new(RwLock::new(DirectoryIndex::new()));
    let barrier = Arc::new(Barrier::new(6));

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let index = Arc::clone(&index);
            let barrier = Arc::clone(&barrier);
            let path = path.clone();
            thread::spawn(move || {
                barrier.wait();
                let mut guard = index.write().unwrap();
                execute_load(&mut guard, LoadInput { path }).unwrap()
            })
        })
        .collect();

    let outputs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let fresh = outputs.iter().filter(|o| !o.already_loaded).count();
    assert_eq!(fresh, 1);
    assert!(outputs.iter().all(|o| o.companies == 6));

    let loaded_at = outputs[0].loaded_at.clone();
    assert!(outputs.iter().all(|o| o.loaded_at == loaded_at));
}

#[test]
fn test_readers_never_see_partial_load() {
    let index = Arc::new(RwLock::new(DirectoryIndex::new()));
    let data = synthetic_dataset(2_000, 5, 800);

    let writer = {
        let index = Arc::clone(&index);
        thread::spawn(move || {
            let mut guard = index.write().unwrap();
            guard.load(data).unwrap().len()
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let index = Arc::clone(&index);
            thread::spawn(move || {
                for _ in 0..50 {
                    let guard = index.read().unwrap();
                    let stats = guard.statistics();
                    // Either nothing or everything
                    assert_eq!(guard.is_loaded(), stats.total_companies > 0);
                    assert_eq!(stats.total_companies, guard.companies().len());
                    assert_eq!(stats.verified + stats.unverified, stats.total_companies);
                }
            })
        })
        .collect();

    let total = writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(index.read().unwrap().len(), total);
}

// ============================================================================
// Server Handle
// ============================================================================

#[test]
fn test_server_shares_one_directory() {
    let env = TestEnv::new();
    let path = env.write_dataset("icn-data.json", &sample_dataset());
    let server = NavigatorServer::with_dataset(DirectoryConfig::default(), &path).unwrap();
    let clone = server.clone();

    let handle = thread::spawn(move || {
        let shared = clone.index();
        let guard = shared.read().unwrap();
        execute_search(
            &guard,
            SearchInput {
                query: "acme".into(),
                limit: 5,
            },
        )
        .unwrap()
        .total_matches
    });

    assert_eq!(handle.join().unwrap(), 1);
    server.index().write().unwrap().clear();
    assert!(!server.index().read().unwrap().is_loaded());
}

//! Tests for the registry repository.
//!
//! Verifies:
//! - Upsert / lookup / snapshot / clear
//! - Blank agent names are ignored
//! - Repeating an identical upsert changes nothing
//! - Last write wins under concurrent upserts from many threads

use std::sync::Arc;
use std::thread;

use a2a_registry::{RegistryEntry, RegistryRepository};
use chrono::{Duration, Utc};
use serde_json::{json, Map, Value};

fn metadata(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

// ═══════════════════════════════════════════════════════════════
// Basic operations
// ═══════════════════════════════════════════════════════════════

#[test]
fn upsert_then_find_by_name() {
    let repo = RegistryRepository::new();
    repo.upsert(RegistryEntry::now("translator", metadata(json!({"v": 1}))));

    let entry = repo.find_by_name("translator").unwrap();
    assert_eq!(entry.agent_name, "translator");
    assert_eq!(entry.metadata["v"], 1);
    assert!(repo.find_by_name("summarizer").is_none());
}

#[test]
fn upsert_replaces_whole_entry_without_timestamp_check() {
    let repo = RegistryRepository::new();
    repo.upsert(RegistryEntry::new(
        "translator",
        metadata(json!({"capabilities": {"translate": true}})),
        Utc::now(),
    ));
    // Older timestamp still wins because it was written last.
    repo.upsert(RegistryEntry::new(
        "translator",
        metadata(json!({"agentCard": {"name": "translator"}})),
        Utc::now() - Duration::hours(1),
    ));

    let entry = repo.find_by_name("translator").unwrap();
    assert!(entry.metadata.get("capabilities").is_none());
    assert!(entry.agent_card().is_some());
    assert_eq!(repo.len(), 1);
}

#[test]
fn blank_agent_name_is_ignored() {
    let repo = RegistryRepository::new();
    repo.upsert(RegistryEntry::now("", Map::new()));
    repo.upsert(RegistryEntry::now("   ", Map::new()));
    assert!(repo.is_empty());
}

#[test]
fn identical_upserts_are_idempotent() {
    let repo = RegistryRepository::new();
    let entry = RegistryEntry::now("translator", metadata(json!({"capabilities": {"translate": true}})));
    repo.upsert(entry.clone());
    repo.upsert(RegistryEntry::now("summarizer", Map::new()));
    let before = repo.find_by_name("translator").unwrap();

    for _ in 0..3 {
        repo.upsert(entry.clone());
    }

    let after = repo.find_by_name("translator").unwrap();
    assert_eq!(repo.len(), 2);
    assert_eq!(after.metadata, before.metadata);
    assert_eq!(after.updated_at, before.updated_at);
}

#[test]
fn find_all_is_a_snapshot() {
    let repo = RegistryRepository::new();
    repo.upsert(RegistryEntry::now("a", Map::new()));
    repo.upsert(RegistryEntry::now("b", Map::new()));

    let snapshot = repo.find_all();
    repo.upsert(RegistryEntry::now("c", Map::new()));

    let mut names: Vec<&str> = snapshot.iter().map(|e| e.agent_name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["a", "b"]);
    assert_eq!(repo.len(), 3);
}

#[test]
fn clear_removes_everything() {
    let repo = RegistryRepository::new();
    repo.upsert(RegistryEntry::now("a", Map::new()));
    repo.clear();
    assert!(repo.is_empty());
    assert!(repo.find_all().is_empty());
}

// ═══════════════════════════════════════════════════════════════
// Concurrency
// ═══════════════════════════════════════════════════════════════

#[test]
fn concurrent_upserts_keep_one_complete_entry_per_key() {
    let repo = Arc::new(RegistryRepository::new());
    let writers: Vec<_> = (0..8)
        .map(|writer| {
            let repo = Arc::clone(&repo);
            thread::spawn(move || {
                for i in 0..200 {
                    let name = format!("agent-{}", i % 10);
                    repo.upsert(RegistryEntry::now(
                        name,
                        metadata(json!({"writer": writer, "seq": i})),
                    ));
                    let _ = repo.find_all();
                }
            })
        })
        .collect();
    for handle in writers {
        handle.join().unwrap();
    }

    assert_eq!(repo.len(), 10);
    for entry in repo.find_all() {
        // Each entry is one writer's complete metadata, never a mix.
        assert!(entry.metadata["writer"].is_u64());
        assert!(entry.metadata["seq"].is_u64());
        assert_eq!(entry.metadata.len(), 2);
    }
}

#[test]
fn concurrent_writers_on_distinct_keys_each_end_with_their_last_write() {
    const WRITERS: usize = 8;
    const WRITES: u64 = 250;

    let repo = Arc::new(RegistryRepository::new());
    let writers: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let repo = Arc::clone(&repo);
            thread::spawn(move || {
                let name = format!("agent-{writer}");
                for seq in 0..WRITES {
                    repo.upsert(RegistryEntry::now(name.as_str(), metadata(json!({"seq": seq}))));
                }
            })
        })
        .collect();
    for handle in writers {
        handle.join().unwrap();
    }

    assert_eq!(repo.len(), WRITERS);
    for writer in 0..WRITERS {
        let entry = repo.find_by_name(&format!("agent-{writer}")).unwrap();
        assert_eq!(entry.metadata["seq"], WRITES - 1);
    }
}

#[test]
fn sequential_writes_from_one_thread_end_with_the_last() {
    let repo = Arc::new(RegistryRepository::new());
    let writer = {
        let repo = Arc::clone(&repo);
        thread::spawn(move || {
            for i in 0..500 {
                repo.upsert(RegistryEntry::now("agent", metadata(json!({"seq": i}))));
            }
        })
    };
    let reader = {
        let repo = Arc::clone(&repo);
        thread::spawn(move || {
            for _ in 0..500 {
                if let Some(entry) = repo.find_by_name("agent") {
                    assert!(entry.metadata["seq"].is_u64());
                }
            }
        })
    };
    writer.join().unwrap();
    reader.join().unwrap();

    assert_eq!(repo.find_by_name("agent").unwrap().metadata["seq"], 499);
}

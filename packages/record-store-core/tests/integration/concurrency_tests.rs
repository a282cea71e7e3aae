//! Concurrent inserts and reads against one database.

use std::sync::{Arc, Barrier};
use std::thread;

use ntest::timeout;

use record_store_core::{Database, DbError};

use super::helpers::{person, Person};

const THREADS: usize = 8;
const PER_THREAD: usize = 50;

#[timeout(10000)]
#[test]
fn test_disjoint_inserts_all_succeed() {
    let db = Arc::new(Database::new());
    db.create_table::<Person>("id").unwrap();

    let mut handles = Vec::new();
    for t in 0..THREADS {
        let db = Arc::clone(&db);
        let handle = thread::spawn(move || {
            for i in 0..PER_THREAD {
                let id = format!("{}-{}", t, i);
                db.insert(&person(&id, "worker")).unwrap();
            }
        });
        handles.push(handle);
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(db.table("Person").unwrap().record_count(), THREADS * PER_THREAD);
    for t in 0..THREADS {
        for i in 0..PER_THREAD {
            let id = format!("{}-{}", t, i);
            assert_eq!(db.get::<Person>(&id).unwrap().id, id);
        }
    }
}

#[timeout(10000)]
#[test]
fn test_same_key_inserts_admit_one() {
    let db = Arc::new(Database::new());
    db.create_table::<Person>("id").unwrap();
    let barrier = Arc::new(Barrier::new(THREADS));

    let mut handles = Vec::new();
    for t in 0..THREADS {
        let db = Arc::clone(&db);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            db.insert(&person("shared", &format!("writer {}", t)))
        }));
    }

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let accepted = results.iter().filter(|r| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(DbError::DuplicateRecord { .. })))
        .count();

    assert_eq!(accepted, 1);
    assert_eq!(duplicates, THREADS - 1);
    assert_eq!(db.table("Person").unwrap().record_count(), 1);
}

#[timeout(10000)]
#[test]
fn test_reads_during_writes() {
    let db = Arc::new(Database::new());
    db.create_table::<Person>("id").unwrap();
    db.insert(&person("seed", "first")).unwrap();

    let writer = {
        let db = Arc::clone(&db);
        thread::spawn(move || {
            for i in 0..200 {
                db.insert(&person(&i.to_string(), "writer")).unwrap();
            }
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let db = Arc::clone(&db);
            thread::spawn(move || {
                for _ in 0..200 {
                    assert_eq!(db.get::<Person>("seed").unwrap().name, "first");
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(db.table("Person").unwrap().record_count(), 201);
}

//! Backend contract tests
//!
//! Every backend variant must satisfy the same contract, so the same
//! exercises run against each of them. The networked variants assume a
//! server on localhost and are ignored by default; run them with
//! `cargo test -- --ignored` against a local redis/memcached.

use std::collections::HashMap;
use std::time::Duration;

use larder::{CacheBackend, MemcachedBackend, MemoryBackend, RedisBackend};

fn sample_data() -> HashMap<String, Vec<u8>> {
    HashMap::from([
        ("alpha".to_string(), b"1".to_vec()),
        ("beta".to_string(), b"two".to_vec()),
        ("gamma".to_string(), vec![0x93, 0x01, 0x02, 0x03]),
        ("delta".to_string(), Vec::new()),
    ])
}

async fn exercise_single(backend: &dyn CacheBackend) {
    for (key, value) in sample_data() {
        backend.delete(&key).await.unwrap();
        assert_eq!(backend.get(&key).await.unwrap(), None);

        backend.set(&key, value.clone(), None).await.unwrap();
        assert_eq!(backend.get(&key).await.unwrap(), Some(value));

        backend.delete(&key).await.unwrap();
        assert_eq!(backend.get(&key).await.unwrap(), None);
    }
}

async fn exercise_multi(backend: &dyn CacheBackend) {
    let data = sample_data();
    let keys: Vec<String> = data.keys().cloned().collect();

    backend.delete_multi(&keys).await.unwrap();
    assert!(backend.get_multi(&keys).await.unwrap().is_empty());

    backend.set_multi(data.clone(), None).await.unwrap();
    assert_eq!(backend.get_multi(&keys).await.unwrap(), data);

    backend.delete_multi(&keys).await.unwrap();
    assert!(backend.get_multi(&keys).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_memory_contract() {
    let backend = MemoryBackend::new();
    exercise_single(&backend).await;
    exercise_multi(&backend).await;
}

#[tokio::test]
async fn test_memory_expiry() {
    let backend = MemoryBackend::new();

    backend
        .set("fleeting", b"value".to_vec(), Some(Duration::from_millis(60)))
        .await
        .unwrap();
    assert!(backend.get("fleeting").await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(90)).await;
    assert_eq!(backend.get("fleeting").await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires a redis server on localhost:6379"]
async fn test_redis_contract() {
    let backend = RedisBackend::connect("localhost:6379", 0, "test:", 4).unwrap();
    exercise_single(&backend).await;
    exercise_multi(&backend).await;
}

#[tokio::test]
#[ignore = "requires a redis server on localhost:6379"]
async fn test_redis_expiry() {
    let backend = RedisBackend::connect("localhost:6379", 0, "test:", 4).unwrap();

    backend
        .set("fleeting", b"value".to_vec(), Some(Duration::from_secs(1)))
        .await
        .unwrap();
    assert!(backend.get("fleeting").await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(backend.get("fleeting").await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires a redis server on localhost:6379"]
async fn test_redis_prefix_isolation() {
    let first = RedisBackend::connect("localhost:6379", 0, "first:", 4).unwrap();
    let second = RedisBackend::connect("localhost:6379", 0, "second:", 4).unwrap();

    first.set("shared", b"one".to_vec(), None).await.unwrap();
    second.set("shared", b"two".to_vec(), None).await.unwrap();

    assert_eq!(first.get("shared").await.unwrap(), Some(b"one".to_vec()));
    assert_eq!(second.get("shared").await.unwrap(), Some(b"two".to_vec()));

    first.delete("shared").await.unwrap();
    assert_eq!(first.get("shared").await.unwrap(), None);
    assert_eq!(second.get("shared").await.unwrap(), Some(b"two".to_vec()));

    second.delete("shared").await.unwrap();
}

#[tokio::test]
#[ignore = "requires a memcached server on localhost:11211"]
async fn test_memcached_contract() {
    let backend =
        MemcachedBackend::connect(&["localhost:11211".to_string()], "test:").unwrap();
    exercise_single(&backend).await;
    exercise_multi(&backend).await;
}

#[tokio::test]
#[ignore = "requires a memcached server on localhost:11211"]
async fn test_memcached_expiry() {
    let backend =
        MemcachedBackend::connect(&["localhost:11211".to_string()], "test:").unwrap();

    backend
        .set("fleeting", b"value".to_vec(), Some(Duration::from_secs(1)))
        .await
        .unwrap();
    assert!(backend.get("fleeting").await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(backend.get("fleeting").await.unwrap(), None);
}

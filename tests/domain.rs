//! Domain type tests.
//!
//! These tests verify the domain types work correctly at the API level.
//! Unit tests in src/core/domain/* already cover most of the behavior.

use std::sync::Arc;
use std::thread;

use envseal::core::cipher::OrgKey;
use envseal::core::domain::{KPMap, KVMap, Payload, Secret};
use envseal::error::ErrorKind;

#[test]
fn test_keys_after_distinct_sets() {
    let map = KPMap::new();
    for i in 0..25 {
        map.set(format!("KEY_{:02}", i), Payload::new(format!("v{}", i)));
    }

    let keys = map.keys();
    assert_eq!(keys.len(), 25);
    assert_eq!(keys.first().map(String::as_str), Some("KEY_00"));
    assert_eq!(keys.last().map(String::as_str), Some("KEY_24"));
}

#[test]
fn test_rename_moves_payload() {
    let map = KPMap::new();
    let mut payload = Payload::new("secret");
    payload.mark_exposable();
    map.set("a", payload.clone());

    map.rename("a", "b").unwrap();
    assert!(map.get("a").is_none());
    assert_eq!(map.get("b"), Some(payload));

    let err = map.rename("a", "c").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MapKeyNotFound);
    assert!(!map.contains_key("c"));
    assert_eq!(map.len(), 1);
}

#[test]
fn test_version_increments() {
    let mut secret = Secret::new("sec_1", "user_1", "env_dev").with_version(3);
    secret.increment_version();
    assert_eq!(secret.version(), Some(4));

    let mut unknown = Secret::new("sec_2", "user_1", "env_dev");
    unknown.increment_version();
    assert_eq!(unknown.version(), None);
}

#[test]
fn test_encrypted_copy_is_independent() {
    let key = OrgKey::generate();
    let a = Secret::new("sec_1", "user_1", "env_dev");
    a.set("API_KEY", Payload::new("sk-test-12345"));
    a.set("PORT", Payload::new("8080"));

    let b = a.encrypted(&key).unwrap();
    b.set("API_KEY", Payload::new("changed"));
    b.delete("PORT");
    b.rename("API_KEY", "RENAMED").unwrap();
    b.data().encode();

    assert_eq!(a.keys(), ["API_KEY", "PORT"]);
    assert_eq!(a.get("API_KEY").unwrap().value(), "sk-test-12345");
    assert!(!a.get("API_KEY").unwrap().is_encoded());
}

#[test]
fn test_secret_roundtrip_through_encryption() {
    let key = OrgKey::generate();
    let secret = Secret::new("sec_1", "user_1", "env_dev");
    secret.set("DATABASE_URL", Payload::new("postgres://localhost/mydb"));
    secret.set("EMPTY", Payload::new(""));
    secret.set("UNICODE", Payload::new("こんにちは世界 🚀"));

    secret.encrypt(&key).unwrap();
    for key_name in secret.keys() {
        assert!(secret.get(&key_name).unwrap().is_encoded());
    }

    secret.decrypt(&key).unwrap();
    assert_eq!(secret.get("UNICODE").unwrap().value(), "こんにちは世界 🚀");
    assert_eq!(secret.get("EMPTY").unwrap().value(), "");
}

#[test]
fn test_bulk_decrypt_fails_fast_in_key_order() {
    let key = OrgKey::generate();
    let map = KPMap::new();
    map.set("A", Payload::new("one"));
    map.set("C", Payload::new("three"));
    map.encrypt(&key).unwrap();
    map.set("B", Payload::from_encoded("bm90IGNpcGhlcnRleHQ="));

    let err = map.decrypt(&key).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decryption);

    // A was processed before the failure, C was not reached.
    assert!(!map.get("A").unwrap().is_encoded());
    assert!(map.get("C").unwrap().is_encoded());
}

#[test]
fn test_concurrent_set_get_delete() {
    let map = Arc::new(KPMap::new());
    let threads = 8;
    let per_thread = 200;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                for i in 0..per_thread {
                    let key = format!("T{}_{}", t, i);
                    map.set(key.clone(), Payload::new(format!("{}", i)));
                    assert_eq!(map.get(&key).unwrap().value(), i.to_string());
                    // Drop every third key again.
                    if i % 3 == 0 {
                        assert!(map.delete(&key).is_some());
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let survivors_per_thread = (0..per_thread).filter(|i| i % 3 != 0).count();
    assert_eq!(map.len(), threads * survivors_per_thread);
    assert_eq!(map.keys().len(), map.len());
}

#[test]
fn test_concurrent_bulk_and_point_operations() {
    let key = Arc::new(OrgKey::generate());
    let map = Arc::new(KPMap::new());
    for i in 0..50 {
        map.set(format!("K{}", i), Payload::new("value"));
    }

    let writer = {
        let map = Arc::clone(&map);
        thread::spawn(move || {
            for i in 50..150 {
                map.set(format!("K{}", i), Payload::new("value"));
            }
        })
    };
    let sealer = {
        let map = Arc::clone(&map);
        let key = Arc::clone(&key);
        thread::spawn(move || {
            for _ in 0..10 {
                let copy = map.encrypted(&key).unwrap();
                copy.decrypt(&key).unwrap();
            }
        })
    };

    writer.join().unwrap();
    sealer.join().unwrap();
    assert_eq!(map.len(), 150);
}

#[test]
fn test_kvmap_from_kpmap_and_back() {
    let kv = KVMap::from_dotenv("A=1\nB=\"two words\"\n");
    let map = KPMap::from(&kv);
    assert_eq!(map.get("B").unwrap().value(), "two words");
    assert_eq!(map.to_kv_map(), kv);
}

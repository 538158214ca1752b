//! Property tests for canonical bytes and digests.
//!
//! Key order must never influence the digest of a sign-off record.

use std::collections::BTreeMap;

use greenlink_core::{sha256_digest, CanonicalBytes};
use proptest::prelude::*;

proptest! {
    #[test]
    fn digest_ignores_insertion_order(entries in proptest::collection::vec(("[a-z]{1,8}", any::<i64>()), 0..16)) {
        let mut forward = serde_json::Map::new();
        for (k, v) in &entries {
            forward.insert(k.clone(), serde_json::json!(v));
        }
        let mut reverse = serde_json::Map::new();
        for (k, v) in entries.iter().rev() {
            if !reverse.contains_key(k) {
                reverse.insert(k.clone(), serde_json::json!(forward[k].clone()));
            }
        }
        let a = CanonicalBytes::new(&serde_json::Value::Object(forward)).unwrap();
        let b = CanonicalBytes::new(&serde_json::Value::Object(reverse)).unwrap();
        prop_assert_eq!(sha256_digest(&a), sha256_digest(&b));
    }

    #[test]
    fn string_maps_always_canonicalize(map in proptest::collection::btree_map("[A-Za-z0-9-]{1,12}", "[ -~]{0,24}", 0..12)) {
        let map: BTreeMap<String, String> = map;
        let cb = CanonicalBytes::new(&map);
        prop_assert!(cb.is_ok());
        prop_assert_eq!(sha256_digest(cb.as_ref().unwrap()).to_hex().len(), 64);
    }
}

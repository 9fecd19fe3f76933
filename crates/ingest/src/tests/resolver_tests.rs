#![expect(clippy::unwrap_used, reason = "test code")]

use std::collections::HashMap;
use std::sync::Arc;

use oews_atlas_core::{LocationKey, NewLocation};

use super::create_test_storage;
use crate::LocationResolver;

#[tokio::test]
async fn test_same_key_resolves_to_one_pending_location() {
    let (storage, _temp_dir) = create_test_storage();
    let mut resolver = LocationResolver::preload(Arc::clone(&storage)).await.unwrap();

    let first = resolver.resolve("Bristol", "TN", None).await.unwrap();
    let second = resolver.resolve(" Bristol ", "tn", None).await.unwrap();

    assert_eq!(first, second);
    let pending = resolver.take_pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].state_name, "Tennessee");
    assert_eq!(pending[0].slug, "bristol-tn");
    assert!(resolver.take_pending().is_empty());
}

#[tokio::test]
async fn test_preloaded_locations_are_not_recreated() {
    let (storage, _temp_dir) = create_test_storage();
    let texas = NewLocation::for_key(&LocationKey::state_level("TX"), "Texas");
    storage.insert_locations(std::slice::from_ref(&texas)).unwrap();

    let mut resolver = LocationResolver::preload(Arc::clone(&storage)).await.unwrap();
    assert_eq!(resolver.len(), 1);

    let id = resolver.resolve_state("TX", "Texas").await.unwrap();

    assert_eq!(id, texas.id);
    assert_eq!(resolver.pending_len(), 0);
}

#[tokio::test]
async fn test_cache_miss_falls_back_to_store() {
    let (storage, _temp_dir) = create_test_storage();
    let mut resolver = LocationResolver::new(Arc::clone(&storage));

    // given: a Location written after the resolver was built
    let mut foreign = NewLocation::for_key(&LocationKey::new("Plano", "TX"), "Texas");
    foreign.id = "written-elsewhere".to_owned();
    storage.insert_locations(&[foreign]).unwrap();

    // when: the key is first resolved
    let id = resolver.resolve("Plano", "TX", None).await.unwrap();

    // then: the stored id is reused and nothing is queued
    assert_eq!(id, "written-elsewhere");
    assert_eq!(resolver.pending_len(), 0);
}

#[tokio::test]
async fn test_state_rows_use_provider_name() {
    let (storage, _temp_dir) = create_test_storage();
    let mut resolver = LocationResolver::new(storage);

    resolver.resolve_state("DC", "District of Columbia").await.unwrap();
    resolver.resolve("Hagåtña", "GU", Some("Guam (territory)")).await.unwrap();

    let pending = resolver.take_pending();
    assert_eq!(pending[0].slug, "district-of-columbia");
    assert_eq!(pending[0].city, "");
    assert_eq!(pending[1].state_name, "Guam (territory)");
}

#[tokio::test]
async fn test_reconcile_reports_lost_ids() {
    let (storage, _temp_dir) = create_test_storage();
    let mut resolver = LocationResolver::new(storage);
    let ours = resolver.resolve("Dallas", "TX", None).await.unwrap();
    let kept = resolver.resolve("Plano", "TX", None).await.unwrap();

    let stored = HashMap::from([
        (LocationKey::new("Dallas", "TX"), "theirs".to_owned()),
        (LocationKey::new("Plano", "TX"), kept.clone()),
    ]);
    let remapped = resolver.reconcile(&stored);

    assert_eq!(remapped, HashMap::from([(ours, "theirs".to_owned())]));
    assert_eq!(resolver.resolve("Dallas", "TX", None).await.unwrap(), "theirs");
}

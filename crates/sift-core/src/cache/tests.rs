use super::*;
use crate::{
    schema::{IndexField, IndexMetadata, IndexType},
    test_fixtures::{FakeDiscovery, orders_metadata},
};
use std::{sync::Arc, time::Duration};

const TTL: Duration = Duration::from_secs(300);

fn caching(
    discovery: &Arc<FakeDiscovery>,
    cache_missing: bool,
) -> CachingSchemaDiscovery<Arc<FakeDiscovery>> {
    CachingSchemaDiscovery::new(Arc::clone(discovery), TTL, cache_missing)
}

//
// TtlCache
//

#[test]
fn ttl_cache_serves_hits_after_first_load() {
    let cache: TtlCache<u32, String> = TtlCache::new("test", TTL);

    let first = cache.get_or_try_load(&1, || Ok::<_, ()>("one".to_string())).unwrap();
    let second = cache
        .get_or_try_load(&1, || Ok::<_, ()>("other".to_string()))
        .unwrap();

    assert_eq!(*first, "one");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(
        cache.stats(),
        CacheStats {
            hits: 1,
            misses: 1,
            size: 1
        }
    );
}

#[test]
fn ttl_cache_does_not_cache_errors() {
    let cache: TtlCache<u32, String> = TtlCache::new("test", TTL);

    assert_eq!(cache.get_or_try_load(&1, || Err("down")).unwrap_err(), "down");
    let value = cache
        .get_or_try_load(&1, || Ok::<_, &str>("up".to_string()))
        .unwrap();

    assert_eq!(*value, "up");
    assert_eq!(cache.stats().size, 1);
}

#[test]
fn zero_ttl_disables_caching() {
    let cache: TtlCache<u32, u32> = TtlCache::new("test", Duration::ZERO);
    let mut loads = 0;

    for _ in 0..3 {
        cache
            .get_or_try_load(&1, || {
                loads += 1;
                Ok::<_, ()>(loads)
            })
            .unwrap();
    }

    assert!(!cache.is_enabled());
    assert_eq!(loads, 3);
    assert_eq!(cache.stats(), CacheStats::default());
}

#[test]
fn expired_entries_are_reloaded() {
    let cache: TtlCache<u32, u32> = TtlCache::new("test", Duration::from_millis(1));

    cache.get_or_try_load(&1, || Ok::<_, ()>(1)).unwrap();
    std::thread::sleep(Duration::from_millis(5));
    let value = cache.get_or_try_load(&1, || Ok::<_, ()>(2)).unwrap();

    assert_eq!(*value, 2);
    assert_eq!(cache.stats().misses, 2);
}

#[test]
fn load_overlapping_a_flush_is_not_cached() {
    let cache: TtlCache<u32, u32> = TtlCache::new("test", TTL);

    let value = cache
        .get_or_try_load(&1, || {
            cache.invalidate_all();
            Ok::<_, ()>(1)
        })
        .unwrap();
    assert_eq!(*value, 1);
    assert_eq!(cache.stats().size, 0);

    let value = cache.get_or_try_load(&1, || Ok::<_, ()>(2)).unwrap();
    assert_eq!(*value, 2);
}

#[test]
fn panicking_loader_leaves_cache_usable() {
    let cache: Arc<TtlCache<u32, u32>> = Arc::new(TtlCache::new("test", TTL));
    cache.get_or_try_load(&1, || Ok::<_, ()>(1)).unwrap();

    let panicking = Arc::clone(&cache);
    let joined = std::thread::spawn(move || {
        let _ = panicking.get_or_try_load(&2, || -> Result<u32, ()> { panic!("loader failed") });
    })
    .join();
    assert!(joined.is_err());

    assert_eq!(*cache.get_or_try_load(&1, || Ok::<_, ()>(9)).unwrap(), 1);
    cache.invalidate_all();
    assert_eq!(cache.stats().size, 0);
}

//
// CachingSchemaDiscovery
//

#[test]
fn discovery_requests_are_cached() {
    let fake = Arc::new(FakeDiscovery::with_orders());
    let discovery = caching(&fake, false);

    for _ in 0..3 {
        assert_eq!(discovery.list_schemas().unwrap(), ["s1"]);
        assert_eq!(discovery.list_tables("s1").unwrap(), ["idx1"]);
        assert_eq!(discovery.index_metadata("s1", "idx1").unwrap(), orders_metadata());
    }

    assert_eq!(fake.schema_calls(), 1);
    assert_eq!(fake.table_calls(), 1);
    assert_eq!(fake.metadata_calls(), 1);
    assert_eq!(discovery.stats().hits, 6);
}

#[test]
fn flush_makes_changes_visible() {
    let fake = Arc::new(FakeDiscovery::with_orders());
    let discovery = caching(&fake, false);
    assert_eq!(discovery.index_metadata("s1", "idx1").unwrap(), orders_metadata());

    let widened = IndexMetadata::new(vec![
        IndexField::new("a", IndexType::primitive("integer")),
        IndexField::new("b", IndexType::primitive("keyword")),
    ]);
    fake.put_index("s1", "idx1", widened.clone());

    // still the cached mapping
    assert_eq!(discovery.index_metadata("s1", "idx1").unwrap(), orders_metadata());

    discovery.flush_cache().unwrap();
    assert_eq!(discovery.index_metadata("s1", "idx1").unwrap(), widened);
    assert_eq!(fake.metadata_calls(), 2);
}

#[test]
fn missing_index_is_cached_only_when_enabled() {
    let fake = Arc::new(FakeDiscovery::with_orders());

    let plain = caching(&fake, false);
    for _ in 0..2 {
        assert!(matches!(
            plain.index_metadata("s1", "nope"),
            Err(DiscoveryError::IndexNotFound { .. })
        ));
    }
    assert_eq!(fake.metadata_calls(), 2);

    let negative = caching(&fake, true);
    for _ in 0..2 {
        assert!(matches!(
            negative.index_metadata("s1", "nope"),
            Err(DiscoveryError::IndexNotFound { .. })
        ));
    }
    assert_eq!(fake.metadata_calls(), 3);

    fake.put_index("s1", "nope", orders_metadata());
    negative.flush_cache().unwrap();
    assert!(negative.index_metadata("s1", "nope").is_ok());
}

#[test]
fn unavailable_discovery_is_not_cached() {
    let fake = Arc::new(FakeDiscovery::with_orders());
    let discovery = caching(&fake, true);

    fake.set_unavailable(true);
    assert!(matches!(
        discovery.list_schemas(),
        Err(DiscoveryError::Unavailable { .. })
    ));

    fake.set_unavailable(false);
    assert_eq!(discovery.list_schemas().unwrap(), ["s1"]);
}

#[test]
fn flush_is_idempotent() {
    let fake = Arc::new(FakeDiscovery::with_orders());
    let discovery = caching(&fake, false);

    discovery.flush_cache().unwrap();
    discovery.flush_cache().unwrap();
    assert_eq!(discovery.list_tables("s1").unwrap(), ["idx1"]);
    assert_eq!(discovery.stats().size, 1);
}

#[test]
fn flushed_mapping_stays_valid_for_holders() {
    let fake = Arc::new(FakeDiscovery::with_orders());
    let discovery = caching(&fake, false);

    let held = discovery.shared_index_metadata("s1", "idx1").unwrap();
    fake.remove_index("s1", "idx1");
    discovery.flush_cache().unwrap();

    assert_eq!(*held, orders_metadata());
    assert!(discovery.shared_index_metadata("s1", "idx1").is_err());
}

//
// CachingIdentifierMapping
//

#[test]
fn identifiers_resolve_case_insensitively() {
    let fake = Arc::new(FakeDiscovery::default());
    fake.put_index("Sales", "OrderLog", orders_metadata());
    let mapping = CachingIdentifierMapping::new(fake.clone(), TTL);

    assert_eq!(mapping.remote_schema("sales").unwrap(), "Sales");
    assert_eq!(mapping.remote_table("Sales", "orderlog").unwrap(), "OrderLog");
    assert_eq!(mapping.remote_schema("SALES").unwrap(), "Sales");
    assert_eq!(fake.schema_calls(), 1);
    assert_eq!(fake.table_calls(), 1);
}

#[test]
fn unknown_identifiers_pass_through() {
    let fake = Arc::new(FakeDiscovery::with_orders());
    let mapping = CachingIdentifierMapping::new(fake, TTL);

    assert_eq!(mapping.remote_schema("other").unwrap(), "other");
    assert_eq!(mapping.remote_table("s1", "Missing").unwrap(), "Missing");
}

#[test]
fn case_colliding_identifiers_are_ambiguous() {
    let fake = Arc::new(FakeDiscovery::default());
    fake.put_index("s1", "events", orders_metadata());
    fake.put_index("s1", "Events", orders_metadata());
    let mapping = CachingIdentifierMapping::new(fake, TTL);

    let err = mapping.remote_table("s1", "events").unwrap_err();
    assert_eq!(
        err,
        DiscoveryError::AmbiguousName {
            name: "events".into(),
            candidates: vec!["Events".into(), "events".into()],
        }
    );
}

#[test]
fn identifier_flush_reloads_listings() {
    let fake = Arc::new(FakeDiscovery::with_orders());
    let mapping = CachingIdentifierMapping::new(fake.clone(), TTL);

    assert_eq!(mapping.remote_table("s1", "late").unwrap(), "late");
    fake.put_index("s1", "Late", orders_metadata());
    assert_eq!(mapping.remote_table("s1", "late").unwrap(), "late");

    mapping.flush_cache().unwrap();
    assert_eq!(mapping.remote_table("s1", "late").unwrap(), "Late");
    assert_eq!(fake.table_calls(), 2);
}

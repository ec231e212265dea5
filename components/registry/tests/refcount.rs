use std::sync::{Arc, Barrier};
use std::thread;

use models::{Nullable, PartialUser, Presentable, Snowflake};
use proptest::prelude::*;
use registry::{RegistryError, Upsert, UserRegistry};

fn sf(id: u64) -> Snowflake {
    Snowflake::new(id).unwrap()
}

proptest! {
    /// Any sequence of creates, add_refs and remove_refs leaves each user registered
    /// exactly while its net count is positive.
    #[test]
    fn prop_net_count_matches_operations(ops in prop::collection::vec((0..16usize, 0..3u8), 0..2000)) {
        let registry = UserRegistry::with_shards(8);

        // expected count per user, 0 means absent
        let mut expected = [0u16; 16];

        for (idx, op) in ops {
            let id = sf(idx as u64 + 1);

            match op {
                0 => {
                    let (_, outcome) = registry.upsert(&PartialUser::empty(id));

                    if expected[idx] == 0 {
                        prop_assert_eq!(outcome, Upsert::Created);
                        expected[idx] = 1;
                    } else {
                        prop_assert_eq!(outcome, Upsert::Unchanged);
                    }
                }
                1 => match registry.try_add_ref(id) {
                    Ok(refs) => {
                        expected[idx] += 1;
                        prop_assert_eq!(refs, expected[idx]);
                    }
                    Err(err) => {
                        prop_assert_eq!(expected[idx], 0);
                        prop_assert_eq!(err, RegistryError::NotRegistered(id));
                    }
                },
                _ => match registry.try_remove_ref(id) {
                    Ok(refs) => {
                        expected[idx] -= 1;
                        prop_assert_eq!(refs, expected[idx]);
                    }
                    Err(err) => {
                        prop_assert_eq!(expected[idx], 0);
                        prop_assert_eq!(err, RegistryError::NotRegistered(id));
                    }
                },
            }

            let count = expected[idx];
            prop_assert_eq!(registry.ref_count(id), (count > 0).then_some(count));
            prop_assert_eq!(registry.lookup(id).is_some(), count > 0);
        }

        let live = expected.iter().filter(|&&refs| refs > 0).count();
        prop_assert_eq!(registry.len(), live);
    }
}

#[test]
fn test_release_to_zero_evicts() {
    let registry = UserRegistry::default();

    let snapshot = PartialUser {
        username: Nullable::Some("abc".into()),
        ..PartialUser::empty(sf(1))
    };

    registry.get_or_create(&snapshot);
    registry.add_ref(sf(1));
    registry.add_ref(sf(1));

    for _ in 0..3 {
        assert!(registry.lookup(sf(1)).is_some());
        registry.remove_ref(sf(1));
    }

    assert!(registry.lookup(sf(1)).is_none());
    assert!(registry.handle(sf(1)).is_none());
}

#[test]
fn test_rich_snapshot_starts_at_one() {
    let registry = UserRegistry::default();

    let snapshot: PartialUser = serde_json::from_str(
        r#"{
            "id": "175928847299117063",
            "username": "nelly",
            "discriminator": "1337",
            "global_name": "Nelly",
            "avatar": "8342729096ea3675442027381ff50dfe",
            "banner": null,
            "accent_color": 16711680,
            "bot": false,
            "public_flags": 131072
        }"#,
    )
    .unwrap();

    let handle = registry.get_or_create(&snapshot);

    assert_eq!(registry.ref_count(snapshot.id), Some(1));
    assert_eq!(handle.display_name(), "Nelly");
    assert_eq!(handle.full_name(false), "nelly#1337");

    let user = registry.lookup(snapshot.id).unwrap();
    assert_eq!(user.accent_color, Some(0xFF0000));
    assert_eq!(user.banner, None);
    assert_eq!(user.discriminator_value(), Ok(1337));
}

#[test]
fn test_contended_refcount_is_exact() {
    const THREADS: usize = 8;
    const ROUNDS: usize = 2_000;

    let registry = UserRegistry::with_shards(4);
    registry.get_or_create(&PartialUser::empty(sf(1)));

    let barrier = Arc::new(Barrier::new(THREADS));

    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            let registry = registry.clone();
            let barrier = barrier.clone();

            thread::spawn(move || {
                barrier.wait();

                for i in 0..ROUNDS {
                    registry.add_ref(sf(1));

                    if i % 2 == 1 {
                        registry.remove_ref(sf(1));
                    }

                    // concurrent merges must not disturb the count
                    if i % 64 == 0 {
                        registry.upsert(&PartialUser {
                            global_name: Nullable::Some(format!("worker {t}").into()),
                            ..PartialUser::empty(sf(1))
                        });
                    }
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    let expected = 1 + THREADS * ROUNDS / 2;
    assert_eq!(registry.ref_count(sf(1)), Some(expected as u16));

    for _ in 0..expected {
        registry.remove_ref(sf(1));
    }

    assert!(registry.is_empty());
}

#[test]
fn test_members_across_threads() {
    let registry = UserRegistry::with_shards(4);

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || registry.acquire(&PartialUser::empty(sf(9))).unwrap())
        })
        .collect();

    let refs: Vec<_> = workers.into_iter().map(|worker| worker.join().unwrap()).collect();

    assert_eq!(registry.ref_count(sf(9)), Some(4));
    assert!(refs.windows(2).all(|w| w[0].ptr_eq(&w[1])));

    drop(refs);
    assert!(!registry.contains(sf(9)));
}

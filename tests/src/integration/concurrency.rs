//! # Concurrent Signature Deposits
//!
//! Organizations sign from independent processes on their own schedule.
//! The deposit directory is the only shared mutable resource: these tests
//! interleave deposits with collection and assert a collector never
//! observes a torn file or a duplicate org.

use channel_update::adapters::FileSignatureStore;
use channel_update::ports::outbound::SignatureStore;
use channel_update::{ConfigSignature, Creator, SignatureHeader};
use std::sync::Arc;

fn signature_for(msp_id: &str) -> ConfigSignature {
    let header = SignatureHeader {
        creator: Creator {
            msp_id: msp_id.to_string(),
            certificate: format!("{msp_id}-cert"),
        },
        nonce: vec![0xAB; 24],
    };
    ConfigSignature {
        signature_header: serde_json::to_vec(&header).unwrap(),
        // a chunky signature so a torn write would be observable
        signature: vec![0xCD; 64 * 1024],
    }
}

/// Test: deposits from many concurrent writers interleaved with a
/// polling collector: every collect sees only complete files, and the
/// final set holds every org exactly once
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_interleaved_store_and_collect() {
    let dir = Arc::new(tempfile::tempdir().unwrap());
    let org_count = 8;

    let mut writers = Vec::new();
    for i in 0..org_count {
        let dir = Arc::clone(&dir);
        writers.push(tokio::spawn(async move {
            // each org is its own process in production: its own store
            let store = FileSignatureStore::new();
            let org = format!("Org{i}");
            store
                .store(dir.path(), &org, &signature_for(&format!("{org}MSP")))
                .await
                .unwrap();
        }));
    }

    // collector races the writers; atomic publish means it must never
    // error on a half-written deposit
    let collector = {
        let dir = Arc::clone(&dir);
        tokio::spawn(async move {
            let store = FileSignatureStore::new();
            let mut last_seen = 0;
            while last_seen < org_count {
                let set = store
                    .collect(dir.path())
                    .await
                    .expect("collect observed a torn deposit");
                assert!(set.len() >= last_seen, "a published deposit disappeared");
                last_seen = set.len();
                tokio::task::yield_now().await;
            }
        })
    };

    for writer in writers {
        writer.await.unwrap();
    }
    collector.await.unwrap();

    let final_set = FileSignatureStore::new().collect(dir.path()).await.unwrap();
    assert_eq!(final_set.len(), org_count);
    let orgs: Vec<_> = final_set.orgs().map(str::to_string).collect();
    let mut sorted = orgs.clone();
    sorted.sort();
    assert_eq!(orgs, sorted, "collection order must be stable");
}

/// Test: arrival order {A, C, B} aggregates to exactly {A, B, C}
#[tokio::test]
async fn test_arrival_order_is_irrelevant() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSignatureStore::new();

    for org in ["OrgA", "OrgC", "OrgB"] {
        store
            .store(dir.path(), org, &signature_for(&format!("{org}MSP")))
            .await
            .unwrap();
    }

    let set = store.collect(dir.path()).await.unwrap();
    let orgs: Vec<_> = set.orgs().collect();
    assert_eq!(orgs, ["OrgAMSP", "OrgBMSP", "OrgCMSP"]);
}

/// Test: a re-deposit by the same org replaces its file without ever
/// exposing a mixed state to a concurrent collector
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_redeposit_is_atomic() {
    let dir = Arc::new(tempfile::tempdir().unwrap());
    let store = FileSignatureStore::new();
    let first = signature_for("Org1MSP");
    store.store(dir.path(), "Org1", &first).await.unwrap();

    let writer = {
        let dir = Arc::clone(&dir);
        tokio::spawn(async move {
            let store = FileSignatureStore::new();
            for _ in 0..50 {
                store
                    .store(dir.path(), "Org1", &signature_for("Org1MSP"))
                    .await
                    .unwrap();
            }
        })
    };

    let store_reader = FileSignatureStore::new();
    for _ in 0..50 {
        let set = store_reader.collect(dir.path()).await.unwrap();
        assert_eq!(set.len(), 1, "org must always have exactly one deposit");
        tokio::task::yield_now().await;
    }
    writer.await.unwrap();
}

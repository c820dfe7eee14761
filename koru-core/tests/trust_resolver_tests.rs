// SPDX-FileCopyrightText: 2026 Koru Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for the trust state resolver

use std::sync::Arc;

use koru_core::trust::{
    session_key, verification_key, EncryptionStatus, MemoryStore, MetadataStore, MockOracle,
    SessionMetadata, TrustResolver, TrustStatus,
};

fn setup() -> (Arc<MockOracle>, Arc<MemoryStore>, TrustResolver) {
    let oracle = Arc::new(MockOracle::new(true));
    let store = Arc::new(MemoryStore::new());
    let resolver = TrustResolver::new(oracle.clone(), store.clone());
    (oracle, store, resolver)
}

async fn seed_session(store: &MemoryStore, conversation_id: &str, session_id: &str) {
    let meta = SessionMetadata {
        session_id: Some(session_id.to_string()),
    };
    store
        .set(
            &session_key(conversation_id),
            serde_json::to_vec(&meta).unwrap(),
        )
        .await
        .unwrap();
}

async fn seed_verified(store: &MemoryStore, peer_id: &str) {
    store
        .set(&verification_key(peer_id), serde_json::to_vec(&true).unwrap())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_resolve_without_stored_session() {
    // Scenario A: store empty, oracle available.
    let (_oracle, _store, resolver) = setup();

    let status = resolver.resolve("c1").await;

    assert_eq!(
        status,
        EncryptionStatus {
            can_encrypt: true,
            has_encryption: false,
            is_verified: false,
            session_id: None,
        }
    );
    assert!(resolver.status("c1").await.is_ready());
}

#[tokio::test]
async fn test_resolve_valid_session_and_verified_peer() {
    // Scenario B: valid session s1, peer9 verified.
    let (oracle, store, resolver) = setup();
    resolver.bind("c1", "peer9").await;
    seed_session(&store, "c1", "s1").await;
    seed_verified(&store, "peer9").await;
    oracle.add_valid_session("s1");

    let status = resolver.resolve("c1").await;

    assert!(status.can_encrypt);
    assert!(status.has_encryption);
    assert!(status.is_verified);
    assert_eq!(status.session_id.as_deref(), Some("s1"));
}

#[tokio::test]
async fn test_invalid_session_is_cleared() {
    // Scenario C: stored session the oracle rejects. No zombie sessions
    // survive one resolution.
    let (oracle, store, resolver) = setup();
    resolver.bind("c1", "peer9").await;
    seed_session(&store, "c1", "s1").await;
    seed_verified(&store, "peer9").await;
    oracle.invalidate_session("s1");

    let status = resolver.resolve("c1").await;

    assert!(!status.has_encryption);
    assert_eq!(status.session_id, None);
    assert!(!store.contains(&session_key("c1")));
    // Invalidation never clears verification.
    assert!(status.is_verified);
    assert!(store.contains(&verification_key("peer9")));
}

#[tokio::test]
async fn test_empty_conversation_id_short_circuits() {
    let (oracle, store, resolver) = setup();

    let status = resolver.resolve("").await;
    assert_eq!(
        status,
        EncryptionStatus {
            can_encrypt: true,
            ..Default::default()
        }
    );
    assert_eq!(store.read_count(), 0);

    oracle.set_available(false);
    let status = resolver.resolve("").await;
    assert!(!status.can_encrypt);
}

#[tokio::test]
async fn test_resolve_is_idempotent() {
    let (oracle, store, resolver) = setup();
    resolver.bind("c1", "peer9").await;
    seed_session(&store, "c1", "s1").await;
    oracle.add_valid_session("s1");

    let first = resolver.resolve("c1").await;
    let second = resolver.resolve("c1").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_verification_independent_of_session() {
    let (oracle, store, resolver) = setup();
    resolver.bind("c1", "peer9").await;
    seed_verified(&store, "peer9").await;

    // Verified with no session at all.
    let status = resolver.resolve("c1").await;
    assert!(status.is_verified);
    assert!(!status.has_encryption);

    // Still verified after a session is invalidated.
    seed_session(&store, "c1", "s1").await;
    oracle.invalidate_session("s1");
    let status = resolver.resolve("c1").await;
    assert!(status.is_verified);
    assert!(!status.has_encryption);
}

#[tokio::test]
async fn test_oracle_failure_keeps_session_metadata() {
    // A failed validity check means "unknown", not "invalid": report not
    // encrypted but do not delete potentially-valid metadata.
    let (oracle, store, resolver) = setup();
    seed_session(&store, "c1", "s1").await;
    oracle.add_valid_session("s1");
    oracle.fail_validation(true);

    let status = resolver.resolve("c1").await;

    assert!(!status.has_encryption);
    assert_eq!(status.session_id, None);
    assert!(store.contains(&session_key("c1")));
    assert!(resolver.status("c1").await.is_ready());

    // Recoverable: the next resolve sees the session again.
    oracle.fail_validation(false);
    let status = resolver.resolve("c1").await;
    assert!(status.has_encryption);
}

#[tokio::test]
async fn test_malformed_session_metadata_is_discarded() {
    let (_oracle, store, resolver) = setup();
    store
        .set(&session_key("c1"), b"not json".to_vec())
        .await
        .unwrap();

    let status = resolver.resolve("c1").await;

    assert!(!status.has_encryption);
    assert_eq!(status.session_id, None);
    assert!(!store.contains(&session_key("c1")));
}

#[tokio::test]
async fn test_malformed_verification_flag_is_discarded() {
    let (_oracle, store, resolver) = setup();
    store
        .set(&verification_key("peer9"), b"maybe?".to_vec())
        .await
        .unwrap();
    resolver.bind("c1", "peer9").await;

    let status = resolver.resolve("c1").await;

    assert!(!status.is_verified);
    assert!(!store.contains(&verification_key("peer9")));
}

#[tokio::test]
async fn test_store_read_failure_degrades_silently() {
    let (oracle, store, resolver) = setup();
    resolver.bind("c1", "peer9").await;
    seed_session(&store, "c1", "s1").await;
    oracle.add_valid_session("s1");
    store.fail_reads(true);

    let status = resolver.resolve("c1").await;

    // Both fields degrade to their safe defaults, resolution still
    // completes.
    assert_eq!(
        status,
        EncryptionStatus {
            can_encrypt: true,
            ..Default::default()
        }
    );
    assert!(resolver.status("c1").await.is_ready());
    // No validity query without readable metadata.
    assert_eq!(oracle.validation_count(), 0);
}

#[tokio::test]
async fn test_status_pending_until_first_resolution() {
    let (_oracle, _store, resolver) = setup();

    assert_eq!(resolver.status("c1").await, TrustStatus::Pending);

    let status = resolver.resolve("c1").await;
    assert_eq!(resolver.status("c1").await, TrustStatus::Resolved(status));
}

#[tokio::test]
async fn test_refresh_observes_new_store_state() {
    let (oracle, store, resolver) = setup();
    resolver.bind("c1", "peer9").await;

    let status = resolver.resolve("c1").await;
    assert!(!status.has_encryption);

    // A new session is established externally, then the UI refreshes.
    seed_session(&store, "c1", "s1").await;
    oracle.add_valid_session("s1");
    let status = resolver.refresh("c1").await;

    assert!(status.has_encryption);
    assert_eq!(status.session_id.as_deref(), Some("s1"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refreshes_settle_on_latest_state() {
    let (oracle, store, resolver) = setup();
    resolver.bind("c1", "peer9").await;
    seed_session(&store, "c1", "s1").await;
    oracle.add_valid_session("s1");

    let mut handles = Vec::new();
    for _ in 0..8 {
        let resolver = resolver.clone();
        handles.push(tokio::spawn(async move { resolver.refresh("c1").await }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let status = resolver.status("c1").await;
    let resolved = status.resolved().expect("final state must be resolved");
    assert!(resolved.has_encryption);
    assert_eq!(resolved.session_id.as_deref(), Some("s1"));
    // Serialized resolution: exactly one valid session remains stored.
    assert!(store.contains(&session_key("c1")));
}

#[tokio::test]
async fn test_unbound_conversation_uses_direct_peer_convention() {
    // A conversation id that is itself a peer id (direct relationship).
    let (_oracle, store, resolver) = setup();
    seed_verified(&store, "peer9").await;

    let status = resolver.resolve("peer9").await;

    assert!(status.is_verified);
}

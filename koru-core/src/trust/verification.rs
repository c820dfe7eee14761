// SPDX-FileCopyrightText: 2026 Koru Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Verification Action Handler
//!
//! User-initiated verify/unverify of a peer's keys. Writes the per-peer
//! flag to the store, then refreshes every conversation bound to the peer
//! so the new state propagates without a stale read.
//!
//! Verification is independent of session state: neither action touches
//! session metadata, and verifying a peer with no active session is valid
//! ("previously confirmed identity").

use std::sync::Arc;

use tracing::warn;

use super::resolver::TrustResolver;
use super::store::MetadataStore;
use super::types::verification_key;

/// Performs manual verification actions on behalf of the user.
pub struct VerificationHandler {
    store: Arc<dyn MetadataStore>,
    resolver: TrustResolver,
}

impl VerificationHandler {
    /// Creates a handler writing to the given store and refreshing through
    /// the given resolver. The store must be the same one the resolver
    /// reads, or refreshes will not observe the writes.
    pub fn new(store: Arc<dyn MetadataStore>, resolver: TrustResolver) -> Self {
        VerificationHandler { store, resolver }
    }

    /// Marks the peer's keys as verified.
    ///
    /// Returns false (never raises) if the flag could not be persisted; in
    /// that case no refresh runs and status is unchanged.
    pub async fn verify(&self, peer_id: &str) -> bool {
        let value = match serde_json::to_vec(&true) {
            Ok(value) => value,
            Err(_) => return false,
        };
        if let Err(err) = self.store.set(&verification_key(peer_id), value).await {
            warn!(peer = peer_id, error = %err, "failed to persist verification flag");
            return false;
        }
        self.refresh_bound(peer_id).await;
        true
    }

    /// Clears the peer's verification flag.
    pub async fn unverify(&self, peer_id: &str) -> bool {
        if let Err(err) = self.store.delete(&verification_key(peer_id)).await {
            warn!(peer = peer_id, error = %err, "failed to clear verification flag");
            return false;
        }
        self.refresh_bound(peer_id).await;
        true
    }

    /// Refreshes every conversation bound to the peer. Runs after the
    /// store write completes, so resolutions observe the new flag.
    async fn refresh_bound(&self, peer_id: &str) {
        for conversation_id in self.resolver.conversations_for_peer(peer_id).await {
            self.resolver.refresh(&conversation_id).await;
        }
    }
}

// SPDX-FileCopyrightText: 2026 Koru Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Trust State Resolver
//!
//! Computes a consistent [`EncryptionStatus`] per conversation from the
//! capability oracle and the metadata store, performing invalidation
//! cleanup along the way.
//!
//! Resolution is serialized per conversation with a keyed async mutex, so
//! two concurrent resolutions can never race an invalidation delete.
//! A per-conversation epoch implements last-write-wins by request recency:
//! a resolution superseded by a newer [`refresh`](TrustResolver::refresh)
//! commits nothing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use super::error::{TrustError, TrustResult};
use super::oracle::CapabilityOracle;
use super::store::MetadataStore;
use super::types::{session_key, verification_key, EncryptionStatus, SessionMetadata, TrustStatus};

/// Tracking state for one conversation the resolver has been asked about.
#[derive(Default)]
struct ConversationEntry {
    /// Peer this conversation is bound to. Absent for direct peer
    /// relationships, where the conversation id doubles as the peer id.
    peer_id: Option<String>,
    /// Bumped by every refresh; a resolution only commits if the epoch it
    /// started under is still current.
    epoch: u64,
    status: TrustStatus,
}

struct ResolverInner {
    oracle: Arc<dyn CapabilityOracle>,
    store: Arc<dyn MetadataStore>,
    conversations: RwLock<HashMap<String, ConversationEntry>>,
    /// Keyed mutex map serializing resolution per conversation. A single
    /// global lock would kill cross-conversation concurrency.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    /// Last observed oracle availability. Updated by polls and by explicit
    /// resolutions, nothing else.
    capability: AtomicBool,
}

/// Computes consistent encryption status snapshots per conversation.
///
/// Cheap to clone; clones share all tracking state.
#[derive(Clone)]
pub struct TrustResolver {
    inner: Arc<ResolverInner>,
}

impl TrustResolver {
    /// Creates a resolver over the given collaborators.
    ///
    /// Capability starts from a synchronous oracle probe, so a freshly
    /// created resolver already knows whether encryption is on the table.
    pub fn new(oracle: Arc<dyn CapabilityOracle>, store: Arc<dyn MetadataStore>) -> Self {
        let capability = AtomicBool::new(oracle.is_available());
        TrustResolver {
            inner: Arc::new(ResolverInner {
                oracle,
                store,
                conversations: RwLock::new(HashMap::new()),
                locks: Mutex::new(HashMap::new()),
                capability,
            }),
        }
    }

    /// Binds a conversation to a peer.
    ///
    /// Verification flags are keyed per peer, so the resolver needs this
    /// mapping to evaluate them. Unbound conversations are treated as
    /// direct peer relationships (conversation id == peer id).
    pub async fn bind(&self, conversation_id: &str, peer_id: &str) {
        let mut conversations = self.inner.conversations.write().await;
        let entry = conversations.entry(conversation_id.to_string()).or_default();
        entry.peer_id = Some(peer_id.to_string());
    }

    /// Returns the current snapshot for a conversation.
    ///
    /// `Pending` until the first resolution completes, and again while a
    /// forced refresh is in flight — callers render the pessimistic default
    /// until then.
    pub async fn status(&self, conversation_id: &str) -> TrustStatus {
        self.inner
            .conversations
            .read()
            .await
            .get(conversation_id)
            .map(|entry| entry.status.clone())
            .unwrap_or_default()
    }

    /// Conversations currently bound to the given peer.
    pub async fn conversations_for_peer(&self, peer_id: &str) -> Vec<String> {
        self.inner
            .conversations
            .read()
            .await
            .iter()
            .filter(|(id, entry)| entry.peer_id.as_deref().unwrap_or(id.as_str()) == peer_id)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Resolves the encryption status of a conversation. Total: any
    /// collaborator failure degrades the affected field instead of
    /// propagating.
    ///
    /// An empty conversation id short-circuits — there is nothing to
    /// evaluate, only current capability is reported.
    pub async fn resolve(&self, conversation_id: &str) -> EncryptionStatus {
        let can_encrypt = self.probe_capability();
        if conversation_id.is_empty() {
            return EncryptionStatus {
                can_encrypt,
                ..Default::default()
            };
        }

        let epoch = self.begin(conversation_id).await;
        let lock = self.conversation_lock(conversation_id).await;
        let _guard = lock.lock().await;

        let status = self.resolve_fields(conversation_id, can_encrypt).await;
        self.commit(conversation_id, epoch, &status).await;
        status
    }

    /// Forces the conversation back to `Pending` and resolves it afresh.
    ///
    /// Used after external mutation (verification change, new session
    /// established). Any resolution still in flight from before this call
    /// is superseded and will not commit.
    pub async fn refresh(&self, conversation_id: &str) -> EncryptionStatus {
        if !conversation_id.is_empty() {
            let mut conversations = self.inner.conversations.write().await;
            let entry = conversations.entry(conversation_id.to_string()).or_default();
            entry.epoch += 1;
            entry.status = TrustStatus::Pending;
        }
        self.resolve(conversation_id).await
    }

    /// One capability poll tick: re-probe availability and, on a
    /// false→true transition, re-resolve every tracked conversation that is
    /// not currently encrypted (a session may now be establishable).
    /// Unchanged availability causes no store or oracle traffic.
    pub(crate) async fn poll_capability(&self) {
        let available = self.inner.oracle.is_available();
        let was = self.inner.capability.swap(available, Ordering::SeqCst);
        if !available || was {
            return;
        }

        let stale: Vec<String> = {
            let conversations = self.inner.conversations.read().await;
            conversations
                .iter()
                .filter(|(_, entry)| !entry.status.is_encrypted())
                .map(|(id, _)| id.clone())
                .collect()
        };
        if stale.is_empty() {
            return;
        }
        debug!(
            conversations = stale.len(),
            "encryption capability became available, re-resolving"
        );
        for conversation_id in stale {
            self.resolve(&conversation_id).await;
        }
    }

    /// Probes oracle availability and records it.
    fn probe_capability(&self) -> bool {
        let available = self.inner.oracle.is_available();
        self.inner.capability.store(available, Ordering::SeqCst);
        available
    }

    /// Ensures a tracking entry exists and returns its current epoch.
    async fn begin(&self, conversation_id: &str) -> u64 {
        let mut conversations = self.inner.conversations.write().await;
        conversations
            .entry(conversation_id.to_string())
            .or_default()
            .epoch
    }

    /// Returns the per-conversation resolution lock, creating it on first
    /// use.
    async fn conversation_lock(&self, conversation_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.inner.locks.lock().await;
        locks
            .entry(conversation_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Commits a resolved snapshot unless a newer refresh superseded it.
    async fn commit(&self, conversation_id: &str, epoch: u64, status: &EncryptionStatus) {
        let mut conversations = self.inner.conversations.write().await;
        if let Some(entry) = conversations.get_mut(conversation_id) {
            if entry.epoch == epoch {
                entry.status = TrustStatus::Resolved(status.clone());
            } else {
                debug!(conversation = conversation_id, "resolution superseded, discarding");
            }
        }
    }

    /// Computes the snapshot fields from store and oracle state.
    ///
    /// Verification is evaluated independently of the session: a peer can
    /// be verified with no active session, and session invalidation never
    /// clears the flag.
    async fn resolve_fields(&self, conversation_id: &str, can_encrypt: bool) -> EncryptionStatus {
        let mut status = EncryptionStatus {
            can_encrypt,
            ..Default::default()
        };

        match self.load_session_metadata(conversation_id).await {
            Ok(Some(SessionMetadata {
                session_id: Some(session_id),
            })) => match self.inner.oracle.is_session_valid(&session_id).await {
                Ok(true) => {
                    status.has_encryption = true;
                    status.session_id = Some(session_id);
                }
                Ok(false) => {
                    // Stale pointer must not survive this resolution, or
                    // the next load shows a zombie "looks encrypted" state.
                    debug!(conversation = conversation_id, "session invalidated");
                    self.discard_session_metadata(conversation_id).await;
                }
                Err(err) => {
                    // Unknown, not invalid: keep the metadata. A transient
                    // oracle failure must not delete a valid session.
                    warn!(
                        conversation = conversation_id,
                        error = %err,
                        "session validity check failed, reporting not encrypted"
                    );
                }
            },
            Ok(_) => {}
            Err(TrustError::MalformedMetadata(key)) => {
                warn!(key = %key, "malformed session metadata, discarding");
                self.discard_session_metadata(conversation_id).await;
            }
            Err(err) => {
                warn!(
                    conversation = conversation_id,
                    error = %err,
                    "session metadata read failed, reporting not encrypted"
                );
            }
        }

        let peer_id = self.peer_for(conversation_id).await;
        match self.load_verification_flag(&peer_id).await {
            Ok(verified) => status.is_verified = verified,
            Err(TrustError::MalformedMetadata(key)) => {
                warn!(key = %key, "malformed verification flag, discarding");
                if let Err(err) = self.inner.store.delete(&verification_key(&peer_id)).await {
                    warn!(peer = %peer_id, error = %err, "failed to discard verification flag");
                }
            }
            Err(err) => {
                warn!(
                    peer = %peer_id,
                    error = %err,
                    "verification flag read failed, reporting not verified"
                );
            }
        }

        status
    }

    /// Peer bound to a conversation, defaulting to the conversation id.
    async fn peer_for(&self, conversation_id: &str) -> String {
        self.inner
            .conversations
            .read()
            .await
            .get(conversation_id)
            .and_then(|entry| entry.peer_id.clone())
            .unwrap_or_else(|| conversation_id.to_string())
    }

    async fn load_session_metadata(
        &self,
        conversation_id: &str,
    ) -> TrustResult<Option<SessionMetadata>> {
        let key = session_key(conversation_id);
        match self.inner.store.get(&key).await? {
            None => Ok(None),
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|_| TrustError::MalformedMetadata(key)),
        }
    }

    async fn load_verification_flag(&self, peer_id: &str) -> TrustResult<bool> {
        let key = verification_key(peer_id);
        match self.inner.store.get(&key).await? {
            None => Ok(false),
            Some(bytes) => {
                serde_json::from_slice(&bytes).map_err(|_| TrustError::MalformedMetadata(key))
            }
        }
    }

    /// Deletes a conversation's session metadata, logging (not raising) on
    /// failure.
    async fn discard_session_metadata(&self, conversation_id: &str) {
        let key = session_key(conversation_id);
        if let Err(err) = self.inner.store.delete(&key).await {
            warn!(key = %key, error = %err, "failed to clear stale session metadata");
        }
    }
}

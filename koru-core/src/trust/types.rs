// SPDX-FileCopyrightText: 2026 Koru Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared Trust Status Types
//!
//! Persisted record shapes, storage key conventions, and the in-memory
//! status snapshot produced by the resolver.

use serde::{Deserialize, Serialize};

/// Per-conversation session linkage, persisted in the metadata store.
///
/// Created when a conversation first establishes an encrypted session.
/// The resolver only ever clears it, as invalidation cleanup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Identifier of the session backing this conversation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Storage key for a conversation's session metadata.
pub fn session_key(conversation_id: &str) -> String {
    format!("conversation:{}", conversation_id)
}

/// Storage key for a peer's manual verification flag.
///
/// Keyed per peer, not per conversation: verification has an independent
/// lifecycle and survives session invalidation.
pub fn verification_key(peer_id: &str) -> String {
    format!("verified:{}", peer_id)
}

/// Resolved, in-memory encryption status snapshot.
///
/// Never persisted; recomputed on every resolution. `has_encryption` is
/// only true when the oracle reported the referenced session valid at
/// resolution time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncryptionStatus {
    /// Whether the cryptographic service can currently encrypt at all.
    pub can_encrypt: bool,
    /// Whether a valid session backs this conversation.
    pub has_encryption: bool,
    /// Whether the user has manually verified the peer's keys.
    pub is_verified: bool,
    /// Session backing the conversation, present only when valid.
    pub session_id: Option<String>,
}

/// Per-conversation resolution state.
///
/// A conversation is `Pending` until its first resolution completes, and
/// again while a forced refresh is in flight. Modelled as a tagged variant
/// so impossible combinations (not ready, yet carrying a session id) cannot
/// be represented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TrustStatus {
    /// No resolution has completed yet, or a refresh is in flight.
    #[default]
    Pending,
    /// Snapshot from the last completed resolution.
    Resolved(EncryptionStatus),
}

impl TrustStatus {
    /// Returns true once a resolution has completed.
    pub fn is_ready(&self) -> bool {
        matches!(self, TrustStatus::Resolved(_))
    }

    /// Returns the resolved snapshot, if any.
    pub fn resolved(&self) -> Option<&EncryptionStatus> {
        match self {
            TrustStatus::Resolved(status) => Some(status),
            TrustStatus::Pending => None,
        }
    }

    /// Whether the last completed resolution found an active session.
    pub(crate) fn is_encrypted(&self) -> bool {
        matches!(self, TrustStatus::Resolved(status) if status.has_encryption)
    }
}

// SPDX-FileCopyrightText: 2026 Koru Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Persistent Metadata Store Interface
//!
//! Key/value abstraction over whatever persistence the platform provides.
//! Values are small serialized records; keys follow the conventions in
//! [`types`](super::types): `conversation:<id>` for session metadata and
//! `verified:<peer>` for verification flags.
//!
//! The store is shared across all resolvers in a process. Per-conversation
//! write serialization is the resolver's job, not the store's.

use async_trait::async_trait;

use super::error::TrustResult;

/// Asynchronous key/value store for trust metadata.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Reads the record at `key`, or `None` if absent.
    async fn get(&self, key: &str) -> TrustResult<Option<Vec<u8>>>;

    /// Writes the record at `key`, replacing any existing value.
    async fn set(&self, key: &str, value: Vec<u8>) -> TrustResult<()>;

    /// Deletes the record at `key`. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> TrustResult<()>;
}

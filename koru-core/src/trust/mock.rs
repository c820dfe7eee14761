// SPDX-FileCopyrightText: 2026 Koru Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mock Collaborators
//!
//! In-memory oracle and store implementations with failure injection and
//! call counting. Used by the test suite and by embedders that want to run
//! the trust subsystem without a real crypto service (demo mode).

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::error::{TrustError, TrustResult};
use super::oracle::CapabilityOracle;
use super::store::MetadataStore;

/// Scriptable capability oracle.
///
/// Availability and per-session validity are toggled from the outside;
/// validity queries can be made to fail to exercise the degraded paths.
#[derive(Default)]
pub struct MockOracle {
    available: AtomicBool,
    valid_sessions: Mutex<HashSet<String>>,
    fail_validation: AtomicBool,
    validation_calls: AtomicUsize,
}

impl MockOracle {
    /// Creates an oracle with the given initial availability.
    pub fn new(available: bool) -> Self {
        MockOracle {
            available: AtomicBool::new(available),
            ..Default::default()
        }
    }

    /// Sets current availability.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Marks a session as valid.
    pub fn add_valid_session(&self, session_id: &str) {
        self.valid_sessions
            .lock()
            .expect("oracle lock poisoned")
            .insert(session_id.to_string());
    }

    /// Marks a session as invalid.
    pub fn invalidate_session(&self, session_id: &str) {
        self.valid_sessions
            .lock()
            .expect("oracle lock poisoned")
            .remove(session_id);
    }

    /// Makes subsequent validity queries fail.
    pub fn fail_validation(&self, fail: bool) {
        self.fail_validation.store(fail, Ordering::SeqCst);
    }

    /// Number of validity queries received.
    pub fn validation_count(&self) -> usize {
        self.validation_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CapabilityOracle for MockOracle {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn is_session_valid(&self, session_id: &str) -> TrustResult<bool> {
        self.validation_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_validation.load(Ordering::SeqCst) {
            return Err(TrustError::OracleUnavailable);
        }
        Ok(self
            .valid_sessions
            .lock()
            .expect("oracle lock poisoned")
            .contains(session_id))
    }
}

/// In-memory metadata store with failure injection.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Makes subsequent reads fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent writes and deletes fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of reads received (including failed ones).
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of writes and deletes received (including failed ones).
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Whether a record exists at `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .expect("store lock poisoned")
            .contains_key(key)
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("store lock poisoned").len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MetadataStore for MemoryStore {
    async fn get(&self, key: &str) -> TrustResult<Option<Vec<u8>>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(TrustError::StoreRead("injected read failure".to_string()));
        }
        Ok(self
            .entries
            .lock()
            .expect("store lock poisoned")
            .get(key)
            .cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> TrustResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TrustError::StoreWrite("injected write failure".to_string()));
        }
        self.entries
            .lock()
            .expect("store lock poisoned")
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> TrustResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TrustError::StoreWrite("injected write failure".to_string()));
        }
        self.entries
            .lock()
            .expect("store lock poisoned")
            .remove(key);
        Ok(())
    }
}

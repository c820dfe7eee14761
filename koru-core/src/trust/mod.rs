// SPDX-FileCopyrightText: 2026 Koru Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Conversation Trust Status
//!
//! Reconciles three independently-mutable facts — cryptographic service
//! availability, session validity, and manual peer verification — into one
//! consistent, UI-safe status per conversation.
//!
//! # Architecture
//!
//! - **CapabilityOracle trait**: external cryptographic service answering
//!   availability and session-validity queries
//! - **MetadataStore trait**: external key/value store holding session
//!   linkage and verification flags
//! - **TrustResolver**: computes `EncryptionStatus` snapshots, cleans up
//!   invalidated sessions, serializes resolution per conversation
//! - **CapabilityMonitor**: background poll that re-resolves unencrypted
//!   conversations when the service becomes available
//! - **VerificationHandler**: user-initiated verify/unverify actions
//! - **Display mapping**: pure `EncryptionStatus` → icon/color/tooltip
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use koru_core::trust::{MemoryStore, MockOracle, TrustResolver};
//!
//! let oracle = Arc::new(MockOracle::new(true));
//! let store = Arc::new(MemoryStore::new());
//! let resolver = TrustResolver::new(oracle, store);
//!
//! resolver.bind("conv-1", "peer-1").await;
//! let status = resolver.resolve("conv-1").await;
//! let attrs = status.display();
//! ```
//!
//! Every resolver entry point is total: collaborator failures degrade the
//! affected field to its safe default ("not encrypted", "not verified")
//! instead of propagating. Security chrome must never crash primary UI flow.

#[cfg(feature = "testing")]
pub mod display;
#[cfg(not(feature = "testing"))]
mod display;

#[cfg(feature = "testing")]
pub mod error;
#[cfg(not(feature = "testing"))]
mod error;

#[cfg(feature = "testing")]
pub mod mock;
#[cfg(not(feature = "testing"))]
mod mock;

#[cfg(feature = "testing")]
pub mod monitor;
#[cfg(not(feature = "testing"))]
mod monitor;

#[cfg(feature = "testing")]
pub mod oracle;
#[cfg(not(feature = "testing"))]
mod oracle;

#[cfg(feature = "testing")]
pub mod resolver;
#[cfg(not(feature = "testing"))]
mod resolver;

#[cfg(feature = "testing")]
pub mod store;
#[cfg(not(feature = "testing"))]
mod store;

#[cfg(feature = "testing")]
pub mod types;
#[cfg(not(feature = "testing"))]
mod types;

#[cfg(feature = "testing")]
pub mod verification;
#[cfg(not(feature = "testing"))]
mod verification;

pub use display::{DisplayAttributes, LockIcon, StatusColor};
pub use error::{TrustError, TrustResult};
pub use mock::{MemoryStore, MockOracle};
pub use monitor::{CapabilityMonitor, DEFAULT_POLL_INTERVAL};
pub use oracle::CapabilityOracle;
pub use resolver::TrustResolver;
pub use store::MetadataStore;
pub use types::{session_key, verification_key, EncryptionStatus, SessionMetadata, TrustStatus};
pub use verification::VerificationHandler;

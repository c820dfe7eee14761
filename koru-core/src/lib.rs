// SPDX-FileCopyrightText: 2026 Koru Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Koru Core Library
//!
//! Platform-independent core for the Koru client. This crate owns the
//! conversation encryption/trust status subsystem: deciding, per
//! conversation, whether end-to-end encryption is active, whether the
//! backing session is still valid, and whether the user has manually
//! verified the remote party's keys.
//!
//! Cryptographic key exchange, message encryption, persistent storage
//! engines, and transports are external collaborators reached through the
//! [`trust::CapabilityOracle`] and [`trust::MetadataStore`] traits.

pub mod trust;

pub use trust::{
    CapabilityMonitor, CapabilityOracle, DisplayAttributes, EncryptionStatus, LockIcon,
    MemoryStore, MetadataStore, MockOracle, SessionMetadata, StatusColor, TrustError,
    TrustResolver, TrustResult, TrustStatus, VerificationHandler,
};

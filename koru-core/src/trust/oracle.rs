// SPDX-FileCopyrightText: 2026 Koru Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Capability Oracle Interface
//!
//! Platform-agnostic abstraction over the cryptographic service. The real
//! implementation lives in the crypto module; the resolver only asks two
//! questions and treats every failure as "unknown".

use async_trait::async_trait;

use super::error::TrustResult;

/// External cryptographic service answering availability and validity
/// queries.
///
/// Implementations must not panic; a service that cannot answer returns
/// [`TrustError::OracleUnavailable`](super::TrustError::OracleUnavailable)
/// and the resolver degrades the affected field.
#[async_trait]
pub trait CapabilityOracle: Send + Sync {
    /// Whether the service can encrypt right now (keys generated, device
    /// capable). Synchronous and cheap; the capability monitor calls this
    /// on every poll tick.
    fn is_available(&self) -> bool;

    /// Whether the given session is still valid.
    ///
    /// A definitive `Ok(false)` lets the resolver clean up stale session
    /// metadata; an `Err` does not — a transient failure must not delete
    /// potentially-valid records.
    async fn is_session_valid(&self, session_id: &str) -> TrustResult<bool>;
}

// SPDX-FileCopyrightText: 2026 Koru Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Trust Status Error Types

use thiserror::Error;

/// Result type for trust status collaborator operations.
pub type TrustResult<T> = Result<T, TrustError>;

/// Errors surfaced by the oracle and store collaborators.
///
/// None of these reach presentation code. The resolver and the verification
/// handler catch every variant at their boundary and downgrade the affected
/// field to its safe default; [`TrustError::MalformedMetadata`] additionally
/// triggers a corrective delete of the offending record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrustError {
    /// The cryptographic service could not answer a validity query.
    #[error("encryption service unavailable")]
    OracleUnavailable,

    /// Reading a record from the metadata store failed.
    #[error("metadata read failed: {0}")]
    StoreRead(String),

    /// Writing or deleting a record in the metadata store failed.
    #[error("metadata write failed: {0}")]
    StoreWrite(String),

    /// A persisted record failed to parse.
    #[error("malformed metadata record: {0}")]
    MalformedMetadata(String),
}

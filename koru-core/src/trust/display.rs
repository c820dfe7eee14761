// SPDX-FileCopyrightText: 2026 Koru Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Status Presentation Mapping
//!
//! Pure derivation of display attributes from a resolved status. No I/O,
//! no failure path; rendering itself belongs to the UI layer.

use super::types::EncryptionStatus;

/// Lock glyph shown next to the conversation title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockIcon {
    Open,
    Closed,
}

/// Color tier for the lock glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    /// Not encrypted: neutral/gray.
    Neutral,
    /// Encrypted: standard secure tone.
    Secure,
    /// Encrypted and manually verified: stronger tone, visually distinct.
    VerifiedSecure,
}

/// Visual attributes derived from a resolved encryption status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayAttributes {
    pub icon: LockIcon,
    pub color: StatusColor,
    pub tooltip: &'static str,
}

impl EncryptionStatus {
    /// Maps this status to its display attributes.
    pub fn display(&self) -> DisplayAttributes {
        match (self.has_encryption, self.is_verified) {
            (false, _) => DisplayAttributes {
                icon: LockIcon::Open,
                color: StatusColor::Neutral,
                tooltip: if self.can_encrypt {
                    "Not encrypted yet"
                } else {
                    "Encryption not available"
                },
            },
            (true, false) => DisplayAttributes {
                icon: LockIcon::Closed,
                color: StatusColor::Secure,
                tooltip: "End-to-end encrypted",
            },
            (true, true) => DisplayAttributes {
                icon: LockIcon::Closed,
                color: StatusColor::VerifiedSecure,
                tooltip: "End-to-end encrypted & verified",
            },
        }
    }
}

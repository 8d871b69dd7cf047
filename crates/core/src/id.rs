//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Prefix of every canonical employee identifier.
const EMPLOYEE_ID_PREFIX: &str = "EMP-";

/// Identifier of an employee record (`EMP-001`, `EMP-002`, ...).
///
/// Employee ids are business-visible (they appear in URLs and derived
/// usernames), so they are strings with a canonical `EMP-NNN` form rather
/// than UUIDs. The numeric suffix is zero-padded to at least three digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    /// Build an id from a sequence number: `EmployeeId::from_sequence(7)` → `EMP-007`.
    pub fn from_sequence(n: u32) -> Self {
        Self(format!("{EMPLOYEE_ID_PREFIX}{n:03}"))
    }

    /// The first id in the canonical sequence.
    pub fn first() -> Self {
        Self::from_sequence(1)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric suffix of a canonical id, if it has one.
    ///
    /// Non-canonical ids (imported from legacy systems) return `None` and are
    /// ignored by sequence generation.
    pub fn sequence(&self) -> Option<u32> {
        self.0.strip_prefix(EMPLOYEE_ID_PREFIX)?.parse().ok()
    }

    /// The id following this one in the canonical sequence, if derivable.
    pub fn next(&self) -> Option<Self> {
        Some(Self::from_sequence(self.sequence()? + 1))
    }
}

impl core::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EmployeeId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::invalid_id("employee id cannot be empty"));
        }
        if s.contains('/') || s.contains(char::is_whitespace) {
            return Err(DomainError::invalid_id(format!(
                "employee id contains forbidden characters: {s:?}"
            )));
        }
        Ok(Self(s.to_string()))
    }
}

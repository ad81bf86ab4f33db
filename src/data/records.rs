//! Typed rows held by the test-data pools.

use std::fmt;

/// Beneficiary identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BeneId(String);

impl BeneId {
    /// Wrap a raw beneficiary id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

    /// Borrow the raw id.
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for BeneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Hash of a Medicare Beneficiary Identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HashedMbi(String);

impl HashedMbi {
    /// Wrap a raw MBI hash.
    #[must_use]
    pub fn new(hash: impl Into<String>) -> Self { Self(hash.into()) }

    /// Borrow the raw hash.
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for HashedMbi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Part D contract enrolment to search patients by.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContractData {
    /// Contract identifier, e.g. `Y9999`.
    pub id: String,
    /// Two-digit enrolment month, `01` to `12`.
    pub month: String,
    /// Four-digit reference year.
    pub year: String,
}

impl ContractData {
    /// Build a contract row.
    #[must_use]
    pub fn new(id: impl Into<String>, month: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            month: month.into(),
            year: year.into(),
        }
    }
}

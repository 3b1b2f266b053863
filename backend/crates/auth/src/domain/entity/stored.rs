//! Soft-delete state at the storage-read boundary
//!
//! Rows with a `deleted_at` timestamp are decoded into [`Stored::Deleted`].
//! Lookups hand out only the [`Stored::Active`] payload, so a tombstoned
//! client or token cannot reach a caller by accident.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum Stored<T> {
    Active(T),
    Deleted { record: T, deleted_at: DateTime<Utc> },
}

impl<T> Stored<T> {
    /// Decode a row given its nullable tombstone column
    pub fn from_parts(record: T, deleted_at: Option<DateTime<Utc>>) -> Self {
        match deleted_at {
            None => Stored::Active(record),
            Some(deleted_at) => Stored::Deleted { record, deleted_at },
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Stored::Active(_))
    }

    /// The live record, or `None` for a tombstone
    pub fn into_active(self) -> Option<T> {
        match self {
            Stored::Active(record) => Some(record),
            Stored::Deleted { .. } => None,
        }
    }

    /// Underlying record regardless of state (audit reads)
    pub fn record(&self) -> &T {
        match self {
            Stored::Active(record) | Stored::Deleted { record, .. } => record,
        }
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Stored::Active(_) => None,
            Stored::Deleted { deleted_at, .. } => Some(*deleted_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        let now = Utc::now();
        assert_eq!(Stored::from_parts(1, None), Stored::Active(1));

        let deleted = Stored::from_parts(2, Some(now));
        assert!(!deleted.is_active());
        assert_eq!(*deleted.record(), 2);
        assert_eq!(deleted.deleted_at(), Some(now));
        assert_eq!(deleted.into_active(), None);
    }
}

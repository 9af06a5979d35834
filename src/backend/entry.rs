//! Stored entry for the in-process backend

use chrono::{DateTime, Utc};
use std::time::Duration;

/// A value held by the in-process backend, with an optional absolute expiry.
///
/// Expiry is resolved to an absolute timestamp when the entry is written, so
/// a read only has to compare against the clock. An entry with a past expiry
/// must be treated as absent and physically removed by the first read that
/// observes it (lazy expiry).
#[derive(Debug, Clone)]
pub struct StoredEntry {
    /// The stored value bytes
    pub value: Vec<u8>,

    /// When the entry expires; `None` means it never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredEntry {
    /// Create an entry, resolving a relative expiry against the current time.
    pub fn new(value: Vec<u8>, expire: Option<Duration>) -> Self {
        let expires_at = expire.map(|ttl| {
            Utc::now() + chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::seconds(3600))
        });

        Self { value, expires_at }
    }

    /// Check if the entry has expired.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() > expires_at,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_without_expiry_never_expires() {
        let entry = StoredEntry::new(b"value".to_vec(), None);
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = StoredEntry::new(b"value".to_vec(), Some(Duration::from_millis(50)));

        assert!(!entry.is_expired());
        sleep(Duration::from_millis(80));
        assert!(entry.is_expired());
    }
}

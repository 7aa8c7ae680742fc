use chrono::Utc;
use serde::Serialize;

use crate::identifier::Identifier;

/// A single evaluated scan, as stored in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRecord {
    /// Unix epoch seconds at which the scan was recorded
    pub ts: i64,

    /// Identifier exactly as evaluated (may be short or empty)
    pub uid: Identifier,

    /// Whether the identifier was on the allowlist
    pub ok: bool,
}

impl ScanRecord {
    /// Create a record stamped with the current time
    pub fn new(uid: Identifier, ok: bool) -> Self {
        Self::at(Utc::now().timestamp(), uid, ok)
    }

    /// Create a record with an explicit timestamp
    pub fn at(ts: i64, uid: Identifier, ok: bool) -> Self {
        Self { ts, uid, ok }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scan_record_json_shape() {
        let record = ScanRecord::at(1_700_000_000, Identifier::normalize("ab12cd34ef"), true);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(
            value,
            json!({ "ts": 1_700_000_000, "uid": "AB12CD34EF", "ok": true })
        );
    }

    #[test]
    fn test_new_uses_current_time() {
        let before = Utc::now().timestamp();
        let record = ScanRecord::new(Identifier::normalize(""), false);
        let after = Utc::now().timestamp();

        assert!(record.ts >= before && record.ts <= after);
        assert_eq!(record.uid.as_str(), "");
        assert!(!record.ok);
    }
}

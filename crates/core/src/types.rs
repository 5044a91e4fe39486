use chrono::SubsecRound;

/// Record identifiers are opaque strings (UUID v4 for the file backend).
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Current time truncated to millisecond precision.
///
/// Timestamps are persisted as epoch milliseconds, so anything finer would not
/// survive a save/load cycle.
pub fn now() -> Timestamp {
    chrono::Utc::now().trunc_subsecs(3)
}

/// Generate a fresh record identifier.
pub fn new_id() -> EntityId {
    uuid::Uuid::new_v4().to_string()
}

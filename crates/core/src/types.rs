/// Server-assigned identifiers are opaque strings.
pub type EntityId = String;

/// The API serializes timestamps as zone-less ISO-8601 local date-times.
pub type Timestamp = chrono::NaiveDateTime;

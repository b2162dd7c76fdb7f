use serde::Serialize;

/// Numeric movie field the featured endpoint sorts on.
/// Documents missing the field simply sort last; no schema is enforced.
pub const RATING_FIELD: &str = "movieRating";

/// Outcome of an insert, mirroring the driver's acknowledged result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertOutcome {
    pub fn new(inserted_id: String) -> Self {
        InsertOutcome {
            acknowledged: true,
            inserted_id,
        }
    }
}

/// Outcome of a delete-by-id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub deleted_count: u64,
}

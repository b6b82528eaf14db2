use uuid::Uuid;

/// Generates a fresh identifier for user-created records.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

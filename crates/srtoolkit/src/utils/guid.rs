use uuid::Uuid;

/// Correlation id for pairing a worker request with its response.
pub fn generate_guid() -> String {
    Uuid::new_v4().to_string()
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AppendEntryRequest {
    /// Any JSON value.
    #[schema(value_type = Object)]
    pub entry: Value,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AppendEntryResponse {
    /// Number of entries in the file after the append.
    pub total: usize,
}

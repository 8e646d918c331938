//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `/api/status` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatusDto {
    pub participants: usize,
    pub speaker: Option<String>,
    pub floor_remaining_ms: Option<u64>,
    pub clients: Vec<ParticipantDetailDto>,
}

/// One connected participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDetailDto {
    pub id: String,
    /// RFC 3339
    pub connected_at: String,
    pub metadata: Option<Value>,
}

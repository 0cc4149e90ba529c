//! HTTP API response bodies.

use serde::{Deserialize, Serialize};

/// Entry of `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    /// Number of connections in the room
    pub members: usize,
    pub host: Option<String>,
    /// RFC 3339
    pub created_at: String,
}

/// Body of `GET /api/rooms/{room_key}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub members: Vec<MemberDetailDto>,
    pub host: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDetailDto {
    pub connection_id: String,
    /// Display name, once the connection has sent `join`
    pub username: Option<String>,
    pub connected_at: String,
    pub is_host: bool,
}

//! Conversion logic between DTOs and domain types.

use thiserror::Error;
use trivia_relay_shared::time::millis_to_rfc3339;

use crate::domain::{Envelope, GameCommand, RoomSnapshot};
use crate::infrastructure::dto::{http, websocket as dto};

/// Inbound payload could not be parsed at all
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

// ========================================
// Wire → Domain
// ========================================

/// Decode a raw text frame into a command.
///
/// # Returns
///
/// * `Ok(Some(command))` - a known command with its required fields
/// * `Ok(None)` - valid JSON, but an unknown command or a missing/empty field
/// * `Err(ProtocolError)` - not JSON, or no string `command` field
pub fn decode_command(raw: &str) -> Result<Option<GameCommand>, ProtocolError> {
    let message: dto::InboundMessage = serde_json::from_str(raw)?;
    Ok(message.into())
}

impl From<dto::InboundMessage> for Option<GameCommand> {
    fn from(message: dto::InboundMessage) -> Self {
        match message.command.as_str() {
            "join" => message.username.map(|username| GameCommand::Join { username }),
            "start" => Some(GameCommand::Start),
            "question" => message
                .question
                .filter(|q| !q.is_empty())
                .map(|question| GameCommand::Question {
                    username: message.username,
                    question,
                }),
            "answer" => message
                .answer
                .filter(|a| !a.is_empty())
                .map(|answer| GameCommand::Answer {
                    username: message.username,
                    answer,
                }),
            _ => None,
        }
    }
}

// ========================================
// Domain → Wire
// ========================================

impl From<Envelope> for dto::OutboundMessage {
    fn from(envelope: Envelope) -> Self {
        match envelope {
            Envelope::Joined { players } => {
                Self::Broadcast(dto::BroadcastMessage::Joined { players })
            }
            Envelope::Start => Self::Broadcast(dto::BroadcastMessage::Start),
            Envelope::Question { username, question } => {
                Self::Broadcast(dto::BroadcastMessage::Question { username, question })
            }
            Envelope::Answer { username, answer } => {
                Self::Broadcast(dto::BroadcastMessage::Answer { username, answer })
            }
            Envelope::BecomeHost { host_id } => Self::HostNotice(dto::HostNoticeMessage {
                is_host: host_id.into_string(),
            }),
        }
    }
}

/// Encode an envelope as the JSON text sent over the socket
pub fn encode_envelope(envelope: &Envelope) -> Result<String, serde_json::Error> {
    serde_json::to_string(&dto::OutboundMessage::from(envelope.clone()))
}

impl From<&RoomSnapshot> for http::RoomSummaryDto {
    fn from(snapshot: &RoomSnapshot) -> Self {
        Self {
            id: snapshot.key.as_str().to_string(),
            members: snapshot.members.len(),
            host: snapshot.host_id.as_ref().map(|id| id.as_str().to_string()),
            created_at: millis_to_rfc3339(snapshot.created_at.value()),
        }
    }
}

impl From<RoomSnapshot> for http::RoomDetailDto {
    fn from(snapshot: RoomSnapshot) -> Self {
        let host = snapshot.host_id.map(|id| id.into_string());
        Self {
            id: snapshot.key.into_string(),
            members: snapshot
                .members
                .into_iter()
                .map(|m| http::MemberDetailDto {
                    is_host: host.as_deref() == Some(m.connection_id.as_str()),
                    connection_id: m.connection_id.into_string(),
                    username: m.username,
                    connected_at: millis_to_rfc3339(m.connected_at.value()),
                })
                .collect(),
            host,
            created_at: millis_to_rfc3339(snapshot.created_at.value()),
        }
    }
}

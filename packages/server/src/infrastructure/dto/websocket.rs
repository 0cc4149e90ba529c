//! WebSocket wire messages.
//!
//! Inbound:
//! - `{ "command": "join", "username": string }`
//! - `{ "command": "start" }`
//! - `{ "command": "question", "username": string, "question": string }`
//! - `{ "command": "answer", "username": string, "answer": string }`
//!
//! Outbound broadcast is tagged by `command`; the targeted host notice is
//! `{ "isHost": <connection id> }`.

use serde::{Deserialize, Serialize};

/// Raw inbound message. Only `command` is required at the JSON level.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InboundMessage {
    pub command: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
}

/// Room-wide broadcast message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum BroadcastMessage {
    Joined {
        players: Vec<String>,
    },
    Start,
    Question {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        question: String,
    },
    Answer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        answer: String,
    },
}

/// Targeted "you are host" notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostNoticeMessage {
    #[serde(rename = "isHost")]
    pub is_host: String,
}

/// Any message the server sends over a socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    Broadcast(BroadcastMessage),
    HostNotice(HostNoticeMessage),
}

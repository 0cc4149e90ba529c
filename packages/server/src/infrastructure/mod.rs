//! Infrastructure 層
//!
//! - `dto`: ワイヤーフォーマット（WebSocket / HTTP の JSON）
//! - `message_pusher`: `MessagePusher` trait の実装

pub mod dto;
pub mod message_pusher;

//! ドメイン層
//!
//! ルームのメンバーシップ、ホスト選出、表示名の重複解消といった
//! ビジネスルールと、外部へのメッセージ送信の抽象（`MessagePusher`）を定義します。

pub mod error;
pub mod message;
pub mod message_pusher;
pub mod room;
pub mod value_object;

pub use error::{MessagePushError, RoomError, ValueObjectError};
pub use message::{Envelope, GameCommand};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use room::{HostChange, MemberSnapshot, RoomSnapshot, RoomState};
pub use value_object::{ConnectionId, RoomKey, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;

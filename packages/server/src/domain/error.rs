//! ドメイン層のエラー定義

use thiserror::Error;

/// 値オブジェクトの生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    ConnectionIdEmpty,

    #[error("room key must not be empty")]
    RoomKeyEmpty,

    #[error("room key must be at most {0} characters")]
    RoomKeyTooLong(usize),

    #[error("room key contains invalid character '{0}'")]
    RoomKeyInvalidChar(char),
}

/// ルーム操作のエラー
///
/// どのエラーもルームの状態を変更しない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// 同じ接続 ID で二重に connect された（トランスポート側の不変条件違反）
    #[error("connection '{0}' is already a member of the room")]
    DuplicateConnection(String),

    /// 未登録の接続 ID が disconnect された
    #[error("connection '{0}' is not a member of the room")]
    UnknownConnection(String),

    /// ルームのタスクが既に終了している
    #[error("room '{0}' is closed")]
    RoomClosed(String),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to encode envelope: {0}")]
    Encode(String),
}

//! UseCase 層のエラー定義

use thiserror::Error;

/// 参加者接続のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("connection '{0}' is already connected")]
    DuplicateConnectionId(String),

    #[error("room '{0}' is not available")]
    RoomUnavailable(String),
}

/// メッセージ中継のエラー
///
/// メッセージは破棄され、送信者への応答は無い。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayMessageError {
    #[error("room '{0}' is not available")]
    RoomUnavailable(String),
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,
}

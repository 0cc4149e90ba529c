//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - 送信チャンネルの登録とルームへの参加
//!
//! ### どのような状況を想定しているか
//! - 正常系：最初の接続がホストになり、ホスト通知と joined を受け取る
//! - 異常系：同じ接続 ID での二重接続（登録は巻き戻される）

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel, RoomError, RoomKey};

use super::{error::ConnectError, room_registry::RoomRegistry};

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// RoomRegistry（ルームの生成・破棄）
    registry: Arc<RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    pub fn new(registry: Arc<RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 参加者接続を実行
    ///
    /// ルームがホスト通知・joined を送る前に送信チャンネルを登録しておく。
    ///
    /// # Arguments
    ///
    /// * `room_key` - 接続先のルーム
    /// * `connection_id` - トランスポートが割り当てた接続 ID
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    pub async fn execute(
        &self,
        room_key: &RoomKey,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<(), ConnectError> {
        if self.message_pusher.is_connected(&connection_id).await {
            return Err(ConnectError::DuplicateConnectionId(
                connection_id.into_string(),
            ));
        }

        // 1. MessagePusher にクライアントを登録
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;

        // 2. ルームに参加（失敗したら登録を巻き戻す）
        match self.registry.connect(room_key, connection_id.clone()).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.message_pusher.unregister_client(&connection_id).await;
                Err(match e {
                    RoomError::DuplicateConnection(id) => ConnectError::DuplicateConnectionId(id),
                    RoomError::UnknownConnection(_) | RoomError::RoomClosed(_) => {
                        ConnectError::RoomUnavailable(room_key.as_str().to_string())
                    }
                })
            }
        }
    }
}

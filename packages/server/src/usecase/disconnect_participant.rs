//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - ルームからの離脱、ホストの引き継ぎ、送信チャンネルの登録解除
//!
//! ### どのような状況を想定しているか
//! - 正常系：ホストの切断で次のメンバーがホスト通知を受け取る
//! - エッジケース：最後の参加者の切断（ルームが破棄される）
//! - 異常系：存在しない参加者の切断（何も変わらない）

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomError, RoomKey};

use super::room_registry::RoomRegistry;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// RoomRegistry（ルームの生成・破棄）
    registry: Arc<RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    pub fn new(registry: Arc<RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 参加者切断を実行
    ///
    /// 送信チャンネルを先に登録解除するので、切断した接続には何も送られない。
    /// ルーム側でエラーになっても登録解除は行う。
    pub async fn execute(
        &self,
        room_key: &RoomKey,
        connection_id: ConnectionId,
    ) -> Result<(), RoomError> {
        // 1. MessagePusher からクライアントを登録解除
        self.message_pusher.unregister_client(&connection_id).await;

        // 2. ルームから離脱（空になればルームは破棄される）
        self.registry.disconnect(room_key, connection_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infrastructure::message_pusher::WebSocketMessagePusher,
        usecase::ConnectParticipantUseCase,
    };
    use tokio::sync::mpsc;

    struct Fixture {
        connect: ConnectParticipantUseCase,
        disconnect: DisconnectParticipantUseCase,
        registry: Arc<RoomRegistry>,
    }

    fn create_fixture() -> Fixture {
        let pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::default());
        let registry = Arc::new(RoomRegistry::new(pusher.clone()));
        Fixture {
            connect: ConnectParticipantUseCase::new(registry.clone(), pusher.clone()),
            disconnect: DisconnectParticipantUseCase::new(registry.clone(), pusher),
            registry,
        }
    }

    fn id(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    fn key() -> RoomKey {
        RoomKey::new("lobby".to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_disconnect_host_promotes_next() {
        // テスト項目: ホストが切断すると次に古い参加者がホスト通知を受け取る
        // given (前提条件):
        let fixture = create_fixture();
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        fixture.connect.execute(&key(), id("a"), tx_a).await.unwrap();
        fixture.connect.execute(&key(), id("b"), tx_b).await.unwrap();
        while rx_b.try_recv().is_ok() {}

        // when (操作):
        let result = fixture.disconnect.execute(&key(), id("a")).await;

        // then (期待する結果): ホスト通知のみで joined は送られない
        assert_eq!(result, Ok(()));
        assert_eq!(rx_b.recv().await, Some(r#"{"isHost":"b"}"#.to_string()));
        let snapshot = fixture.registry.snapshot(&key()).await.unwrap();
        assert_eq!(snapshot.host_id, Some(id("b")));
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_disconnect_last_participant_destroys_room() {
        // テスト項目: 最後の参加者が切断するとルームが破棄される
        // given (前提条件):
        let fixture = create_fixture();
        let (tx, _rx) = mpsc::unbounded_channel();
        fixture.connect.execute(&key(), id("a"), tx).await.unwrap();

        // when (操作):
        let result = fixture.disconnect.execute(&key(), id("a")).await;

        // then (期待する結果):
        assert_eq!(result, Ok(()));
        assert!(fixture.registry.room_keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_unknown_participant() {
        // テスト項目: 存在しない参加者の切断はエラーになり、ルームは変わらない
        // given (前提条件):
        let fixture = create_fixture();
        let (tx, _rx) = mpsc::unbounded_channel();
        fixture.connect.execute(&key(), id("a"), tx).await.unwrap();

        // when (操作):
        let result = fixture.disconnect.execute(&key(), id("ghost")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RoomError::UnknownConnection("ghost".to_string()))
        );
        let snapshot = fixture.registry.snapshot(&key()).await.unwrap();
        assert_eq!(snapshot.host_id, Some(id("a")));
    }
}
